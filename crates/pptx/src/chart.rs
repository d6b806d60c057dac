//! Clustered column chart parts (DrawingML charts).
//!
//! Data is written as literals (`c:strLit` / `c:numLit`) so the chart
//! renders without an embedded workbook.

use crate::shape::{fmt_err, xml_text};
use deckgen_core::Result;
use std::fmt::Write as FmtWrite;

/// A single-series clustered column chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnChart {
    pub categories: Vec<String>,
    pub series_name: String,
    pub values: Vec<f64>,
    /// Built-in chart style number.
    pub style: u32,
    pub show_legend: bool,
    pub major_gridlines: bool,
    /// Show value labels at the outside end of each column.
    pub value_labels: bool,
}

impl ColumnChart {
    pub fn new(series_name: impl Into<String>, categories: Vec<String>, values: Vec<f64>) -> Self {
        Self {
            categories,
            series_name: series_name.into(),
            values,
            style: 2,
            show_legend: false,
            major_gridlines: true,
            value_labels: true,
        }
    }

    /// Generate the `chartN.xml` part.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(2048);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(concat!(
            r#"<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" "#,
            r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#
        ));
        xml.push_str(r#"<c:date1904 val="0"/>"#);
        write!(xml, r#"<c:style val="{}"/>"#, self.style).map_err(fmt_err)?;
        xml.push_str(r#"<c:chart><c:autoTitleDeleted val="1"/><c:plotArea><c:layout/>"#);

        xml.push_str(r#"<c:barChart><c:barDir val="col"/><c:grouping val="clustered"/><c:varyColors val="0"/>"#);
        xml.push_str(r#"<c:ser><c:idx val="0"/><c:order val="0"/>"#);
        write!(xml, "<c:tx><c:v>{}</c:v></c:tx>", xml_text(self.series_name.as_str())).map_err(fmt_err)?;
        xml.push_str(r#"<c:invertIfNegative val="0"/>"#);

        if self.value_labels {
            xml.push_str(concat!(
                r#"<c:dLbls><c:dLblPos val="outEnd"/><c:showLegendKey val="0"/><c:showVal val="1"/>"#,
                r#"<c:showCatName val="0"/><c:showSerName val="0"/><c:showPercent val="0"/>"#,
                r#"<c:showBubbleSize val="0"/></c:dLbls>"#
            ));
        }

        write!(xml, r#"<c:cat><c:strLit><c:ptCount val="{}"/>"#, self.categories.len()).map_err(fmt_err)?;
        for (idx, category) in self.categories.iter().enumerate() {
            write!(xml, r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#, idx, xml_text(category.as_str()))
                .map_err(fmt_err)?;
        }
        xml.push_str("</c:strLit></c:cat>");

        write!(
            xml,
            r#"<c:val><c:numLit><c:formatCode>General</c:formatCode><c:ptCount val="{}"/>"#,
            self.values.len()
        )
        .map_err(fmt_err)?;
        for (idx, value) in self.values.iter().enumerate() {
            write!(xml, r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#, idx, value).map_err(fmt_err)?;
        }
        xml.push_str("</c:numLit></c:val></c:ser>");

        xml.push_str(r#"<c:gapWidth val="150"/><c:axId val="100"/><c:axId val="200"/></c:barChart>"#);

        xml.push_str(concat!(
            r#"<c:catAx><c:axId val="100"/><c:scaling><c:orientation val="minMax"/></c:scaling>"#,
            r#"<c:delete val="0"/><c:axPos val="b"/><c:numFmt formatCode="General" sourceLinked="0"/>"#,
            r#"<c:tickLblPos val="nextTo"/><c:crossAx val="200"/><c:crosses val="autoZero"/>"#,
            r#"<c:auto val="1"/><c:lblAlgn val="ctr"/><c:lblOffset val="100"/></c:catAx>"#
        ));
        xml.push_str(r#"<c:valAx><c:axId val="200"/><c:scaling><c:orientation val="minMax"/></c:scaling>"#);
        xml.push_str(r#"<c:delete val="0"/><c:axPos val="l"/>"#);
        if self.major_gridlines {
            xml.push_str("<c:majorGridlines/>");
        }
        xml.push_str(concat!(
            r#"<c:numFmt formatCode="General" sourceLinked="0"/><c:tickLblPos val="nextTo"/>"#,
            r#"<c:crossAx val="100"/><c:crosses val="autoZero"/><c:crossBetween val="between"/></c:valAx>"#
        ));
        xml.push_str("</c:plotArea>");

        if self.show_legend {
            xml.push_str(r#"<c:legend><c:legendPos val="r"/><c:overlay val="0"/></c:legend>"#);
        }
        xml.push_str(r#"<c:plotVisOnly val="1"/><c:dispBlanksAs val="gap"/></c:chart></c:chartSpace>"#);

        Ok(xml)
    }
}
