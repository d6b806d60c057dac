//! A single slide: an ordered list of shapes.

use crate::shape::{fmt_err, Shape, ShapeKind};
use deckgen_core::Result;
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;

/// Relationship ID reserved for the slide layout.
const LAYOUT_REL_ID: &str = "rId1";

/// Target of a slide-level relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SlideRelTarget {
    Media(usize),
    Chart(usize),
}

/// A slide under construction. Shapes are drawn in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slide {
    shapes: Vec<Shape>,
}

impl Slide {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape on top of the existing ones.
    pub fn add_shape(&mut self, shape: Shape) -> &mut Self {
        self.shapes.push(shape);
        self
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// First shape with the given name.
    pub fn shape_named(&self, name: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.name == name)
    }

    /// All non-empty paragraph texts, in shape order.
    pub fn texts(&self) -> Vec<&str> {
        self.shapes
            .iter()
            .flat_map(|s| s.texts())
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn has_picture(&self) -> bool {
        self.shapes
            .iter()
            .any(|s| matches!(s.kind, ShapeKind::Picture { .. }))
    }

    pub fn has_chart(&self) -> bool {
        self.shapes
            .iter()
            .any(|s| matches!(s.kind, ShapeKind::Chart { .. }))
    }

    /// Relationship targets in the order their IDs are assigned (rId2, rId3, ...).
    pub(crate) fn relationship_targets(&self) -> Vec<SlideRelTarget> {
        self.shapes
            .iter()
            .filter_map(|s| match &s.kind {
                ShapeKind::Picture { media, .. } => Some(SlideRelTarget::Media(media.0)),
                ShapeKind::Chart { chart } => Some(SlideRelTarget::Chart(chart.0)),
                _ => None,
            })
            .collect()
    }

    /// Generate `slideN.xml`.
    pub(crate) fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(4096);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(concat!(
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
            r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#
        ));
        xml.push_str(concat!(
            r#"<p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
            r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
            r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
        ));

        let mut next_rel = 2;
        for (idx, shape) in self.shapes.iter().enumerate() {
            let rel_id = if shape.needs_relationship() {
                let rid = format!("rId{}", next_rel);
                next_rel += 1;
                Some(rid)
            } else {
                None
            };
            shape.write_xml(&mut xml, idx + 2, rel_id.as_deref())?;
        }

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
        Ok(xml)
    }

    /// Generate `_rels/slideN.xml.rels`.
    ///
    /// `media_target` and `chart_target` map deck-level indices to part paths
    /// relative to the slide.
    pub(crate) fn rels_xml<M, C>(&self, media_target: M, chart_target: C) -> Result<String>
    where
        M: Fn(usize) -> String,
        C: Fn(usize) -> String,
    {
        let mut xml = String::with_capacity(512);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
        write!(
            xml,
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#,
            LAYOUT_REL_ID
        )
        .map_err(fmt_err)?;

        for (i, target) in self.relationship_targets().into_iter().enumerate() {
            let (rel_type, path) = match target {
                SlideRelTarget::Media(idx) => ("image", media_target(idx)),
                SlideRelTarget::Chart(idx) => ("chart", chart_target(idx)),
            };
            write!(
                xml,
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/{}" Target="{}"/>"#,
                i + 2,
                rel_type,
                escape(path.as_str())
            )
            .map_err(fmt_err)?;
        }

        xml.push_str("</Relationships>");
        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{ChartId, Frame, MediaId, Paragraph, TextBody, TextStyle};
    use deckgen_core::theme::palette;
    use deckgen_core::TextRole;

    fn text_shape(name: &str, text: &str) -> Shape {
        let mut body = TextBody::new();
        body.set_first(Paragraph::new(
            text,
            TextStyle::new(TextRole::Body.font(), palette::INK),
        ));
        Shape::text(name, Frame::new(0, 0, 10, 10), body)
    }

    #[test]
    fn test_texts_skip_empty() {
        let mut slide = Slide::new();
        slide
            .add_shape(Shape::rect("Background", Frame::new(0, 0, 1, 1), palette::BG))
            .add_shape(text_shape("Title", "Hello"))
            .add_shape(Shape::text("Body", Frame::new(0, 0, 1, 1), TextBody::new()));

        assert_eq!(slide.texts(), vec!["Hello"]);
        assert_eq!(slide.shape_count(), 3);
        assert!(slide.shape_named("Title").is_some());
        assert!(slide.shape_named("Missing").is_none());
    }

    #[test]
    fn test_relationship_ids_follow_shape_order() {
        let mut slide = Slide::new();
        slide
            .add_shape(Shape::picture("Picture", Frame::new(0, 0, 1, 1), MediaId(3), ""))
            .add_shape(text_shape("Title", "Hi"))
            .add_shape(Shape::chart("Chart", Frame::new(0, 0, 1, 1), ChartId(0)));

        assert!(slide.has_picture());
        assert!(slide.has_chart());
        assert_eq!(
            slide.relationship_targets(),
            vec![SlideRelTarget::Media(3), SlideRelTarget::Chart(0)]
        );

        let xml = slide.to_xml().unwrap();
        assert!(xml.contains(r#"r:embed="rId2""#));
        assert!(xml.contains(r#"r:id="rId3""#));

        let rels = slide
            .rels_xml(
                |i| format!("../media/image{}.jpeg", i + 1),
                |i| format!("../charts/chart{}.xml", i + 1),
            )
            .unwrap();
        assert!(rels.contains(r#"Id="rId1""#));
        assert!(rels.contains(r#"Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image4.jpeg""#));
        assert!(rels.contains(r#"Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart" Target="../charts/chart1.xml""#));
    }

    #[test]
    fn test_shape_ids_start_at_two() {
        let mut slide = Slide::new();
        slide.add_shape(text_shape("Title", "Hi"));
        let xml = slide.to_xml().unwrap();
        assert!(xml.contains(r#"<p:cNvPr id="1" name=""/>"#));
        assert!(xml.contains(r#"<p:cNvPr id="2" name="Title"/>"#));
    }
}
