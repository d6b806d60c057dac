//! Shapes placed on a slide and their DrawingML serialization.

use deckgen_core::theme::{points, Font, Rgb};
use deckgen_core::{Error, Result};
use quick_xml::escape::escape;
use std::borrow::Cow;
use std::fmt::Write as FmtWrite;

/// Position and size of a shape, in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Frame {
    pub fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }
}

/// Index of an embedded media part within a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaId(pub(crate) usize);

/// Index of a chart part within a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartId(pub(crate) usize);

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Run-level text styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub bold: bool,
    pub color: Rgb,
}

impl TextStyle {
    pub fn new(font: Font, color: Rgb) -> Self {
        Self {
            font,
            bold: false,
            color,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// One paragraph of a text body, holding a single styled run.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub style: Option<TextStyle>,
    pub align: Option<Align>,
    /// Spacing before, in points.
    pub space_before: Option<f64>,
    /// Spacing after, in points.
    pub space_after: Option<f64>,
}

impl Paragraph {
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            style: None,
            align: None,
            space_before: None,
            space_after: None,
        }
    }

    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style: Some(style),
            ..Self::empty()
        }
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    pub fn space_before(mut self, pt: f64) -> Self {
        self.space_before = Some(pt);
        self
    }

    pub fn space_after(mut self, pt: f64) -> Self {
        self.space_after = Some(pt);
        self
    }
}

/// Text frame contents. Always holds at least one paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBody {
    paragraphs: Vec<Paragraph>,
    pub word_wrap: bool,
    pub shrink_to_fit: bool,
}

impl TextBody {
    /// A body with a single empty default paragraph.
    pub fn new() -> Self {
        Self {
            paragraphs: vec![Paragraph::empty()],
            word_wrap: false,
            shrink_to_fit: false,
        }
    }

    pub fn wrapped(mut self) -> Self {
        self.word_wrap = true;
        self
    }

    pub fn shrink_to_fit(mut self) -> Self {
        self.shrink_to_fit = true;
        self
    }

    /// Replace the default paragraph.
    pub fn set_first(&mut self, paragraph: Paragraph) {
        self.paragraphs[0] = paragraph;
    }

    /// Append a paragraph after the existing ones.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Fill the body as a list: the first item reuses the default paragraph,
    /// later items append new ones. An empty list leaves the body untouched.
    pub fn fill_list<F>(&mut self, items: &[String], make: F)
    where
        F: Fn(&str) -> Paragraph,
    {
        for (i, item) in items.iter().enumerate() {
            if i == 0 {
                self.set_first(make(item));
            } else {
                self.add_paragraph(make(item));
            }
        }
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }
}

impl Default for TextBody {
    fn default() -> Self {
        Self::new()
    }
}

/// The kinds of shape the renderers place.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Solid-filled rectangle without an outline.
    Rect { fill: Rgb },
    /// Text box.
    Text(TextBody),
    /// Picture referencing an embedded media part.
    Picture { media: MediaId, descr: String },
    /// Graphic frame referencing a chart part.
    Chart { chart: ChartId },
}

/// A named shape with its frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub name: String,
    pub frame: Frame,
    pub kind: ShapeKind,
}

impl Shape {
    pub fn rect(name: impl Into<String>, frame: Frame, fill: Rgb) -> Self {
        Self {
            name: name.into(),
            frame,
            kind: ShapeKind::Rect { fill },
        }
    }

    pub fn text(name: impl Into<String>, frame: Frame, body: TextBody) -> Self {
        Self {
            name: name.into(),
            frame,
            kind: ShapeKind::Text(body),
        }
    }

    pub fn picture(name: impl Into<String>, frame: Frame, media: MediaId, descr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frame,
            kind: ShapeKind::Picture {
                media,
                descr: descr.into(),
            },
        }
    }

    pub fn chart(name: impl Into<String>, frame: Frame, chart: ChartId) -> Self {
        Self {
            name: name.into(),
            frame,
            kind: ShapeKind::Chart { chart },
        }
    }

    /// Paragraph texts of a text box; empty for other shapes.
    pub fn texts(&self) -> Vec<&str> {
        match &self.kind {
            ShapeKind::Text(body) => body.paragraphs().iter().map(|p| p.text.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Whether this shape needs a slide-level relationship.
    pub(crate) fn needs_relationship(&self) -> bool {
        matches!(self.kind, ShapeKind::Picture { .. } | ShapeKind::Chart { .. })
    }

    /// Write this shape as `p:sp`, `p:pic` or `p:graphicFrame`.
    ///
    /// `rel_id` is required for pictures and charts.
    pub(crate) fn write_xml(&self, xml: &mut String, id: usize, rel_id: Option<&str>) -> Result<()> {
        let name = xml_text(self.name.as_str());
        match &self.kind {
            ShapeKind::Rect { fill } => {
                xml.push_str("<p:sp><p:nvSpPr>");
                write!(xml, r#"<p:cNvPr id="{}" name="{}"/>"#, id, name).map_err(fmt_err)?;
                xml.push_str("<p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>");
                write_xfrm(xml, "a", &self.frame)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                write!(xml, r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, fill.hex())
                    .map_err(fmt_err)?;
                xml.push_str("<a:ln><a:noFill/></a:ln></p:spPr></p:sp>");
            }
            ShapeKind::Text(body) => {
                xml.push_str("<p:sp><p:nvSpPr>");
                write!(xml, r#"<p:cNvPr id="{}" name="{}"/>"#, id, name).map_err(fmt_err)?;
                xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>"#);
                write_xfrm(xml, "a", &self.frame)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);
                write_text_body(xml, body)?;
                xml.push_str("</p:sp>");
            }
            ShapeKind::Picture { descr, .. } => {
                let rid = rel_id.ok_or_else(|| Error::XmlError(format!("picture '{}' has no relationship", self.name)))?;
                xml.push_str("<p:pic><p:nvPicPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="{}" descr="{}"/>"#,
                    id,
                    name,
                    xml_text(descr.as_str())
                )
                .map_err(fmt_err)?;
                xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#);
                write!(
                    xml,
                    r#"<p:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
                    rid
                )
                .map_err(fmt_err)?;
                xml.push_str("<p:spPr>");
                write_xfrm(xml, "a", &self.frame)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#);
            }
            ShapeKind::Chart { .. } => {
                let rid = rel_id.ok_or_else(|| Error::XmlError(format!("chart '{}' has no relationship", self.name)))?;
                xml.push_str("<p:graphicFrame><p:nvGraphicFramePr>");
                write!(xml, r#"<p:cNvPr id="{}" name="{}"/>"#, id, name).map_err(fmt_err)?;
                xml.push_str("<p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr>");
                write_xfrm(xml, "p", &self.frame)?;
                write!(
                    xml,
                    concat!(
                        r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart">"#,
                        r#"<c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="{}"/>"#,
                        r#"</a:graphicData></a:graphic>"#
                    ),
                    rid
                )
                .map_err(fmt_err)?;
                xml.push_str("</p:graphicFrame>");
            }
        }
        Ok(())
    }
}

pub(crate) fn fmt_err(e: std::fmt::Error) -> Error {
    Error::XmlError(e.to_string())
}

/// Escape `text` for element or attribute content, dropping the control
/// characters XML 1.0 forbids.
pub(crate) fn xml_text(text: &str) -> Cow<'_, str> {
    if text.chars().any(is_forbidden_char) {
        let kept: String = text.chars().filter(|&c| !is_forbidden_char(c)).collect();
        Cow::Owned(escape(kept.as_str()).into_owned())
    } else {
        escape(text)
    }
}

fn is_forbidden_char(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

fn write_xfrm(xml: &mut String, prefix: &str, frame: &Frame) -> Result<()> {
    write!(
        xml,
        r#"<{p}:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></{p}:xfrm>"#,
        frame.x,
        frame.y,
        frame.cx.max(0),
        frame.cy.max(0),
        p = prefix
    )
    .map_err(fmt_err)
}

fn write_text_body(xml: &mut String, body: &TextBody) -> Result<()> {
    xml.push_str("<p:txBody>");
    write!(
        xml,
        r#"<a:bodyPr wrap="{}" rtlCol="0">"#,
        if body.word_wrap { "square" } else { "none" }
    )
    .map_err(fmt_err)?;
    xml.push_str(if body.shrink_to_fit {
        "<a:normAutofit/>"
    } else {
        "<a:noAutofit/>"
    });
    xml.push_str("</a:bodyPr><a:lstStyle/>");

    for paragraph in body.paragraphs() {
        write_paragraph(xml, paragraph)?;
    }

    xml.push_str("</p:txBody>");
    Ok(())
}

fn write_paragraph(xml: &mut String, paragraph: &Paragraph) -> Result<()> {
    xml.push_str("<a:p>");

    let has_ppr =
        paragraph.align.is_some() || paragraph.space_before.is_some() || paragraph.space_after.is_some();
    if has_ppr {
        xml.push_str("<a:pPr");
        match paragraph.align {
            Some(Align::Left) => xml.push_str(r#" algn="l""#),
            Some(Align::Right) => xml.push_str(r#" algn="r""#),
            None => {}
        }
        xml.push('>');
        if let Some(pt) = paragraph.space_before {
            write!(xml, r#"<a:spcBef><a:spcPts val="{}"/></a:spcBef>"#, points(pt)).map_err(fmt_err)?;
        }
        if let Some(pt) = paragraph.space_after {
            write!(xml, r#"<a:spcAft><a:spcPts val="{}"/></a:spcAft>"#, points(pt)).map_err(fmt_err)?;
        }
        xml.push_str("</a:pPr>");
    }

    if paragraph.text.is_empty() {
        xml.push_str("<a:endParaRPr");
        write_run_props(xml, paragraph.style.as_ref())?;
        xml.push_str("</a:endParaRPr>");
    } else {
        xml.push_str("<a:r><a:rPr");
        write_run_props(xml, paragraph.style.as_ref())?;
        xml.push_str("</a:rPr>");
        write!(xml, "<a:t>{}</a:t></a:r>", xml_text(paragraph.text.as_str())).map_err(fmt_err)?;
    }

    xml.push_str("</a:p>");
    Ok(())
}

/// Attributes and children of `a:rPr` / `a:endParaRPr`. Closes the start tag.
fn write_run_props(xml: &mut String, style: Option<&TextStyle>) -> Result<()> {
    xml.push_str(r#" lang="en-US""#);
    let Some(style) = style else {
        xml.push_str(r#" dirty="0">"#);
        return Ok(());
    };

    write!(xml, r#" sz="{}""#, points(style.font.size_pt)).map_err(fmt_err)?;
    if style.bold {
        xml.push_str(r#" b="1""#);
    }
    xml.push_str(r#" dirty="0">"#);
    write!(
        xml,
        r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:latin typeface="{}"/>"#,
        style.color.hex(),
        escape(style.font.family)
    )
    .map_err(fmt_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckgen_core::theme::palette;
    use deckgen_core::TextRole;

    fn body_style() -> TextStyle {
        TextStyle::new(TextRole::Body.font(), palette::INK)
    }

    #[test]
    fn test_text_body_starts_with_default_paragraph() {
        let body = TextBody::new();
        assert_eq!(body.paragraphs().len(), 1);
        assert_eq!(body.paragraphs()[0].text, "");
    }

    #[test]
    fn test_fill_list_reuses_first_paragraph() {
        let mut body = TextBody::new();
        let items = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        body.fill_list(&items, |t| Paragraph::new(t, body_style()));

        let texts: Vec<_> = body.paragraphs().iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_fill_list_empty_keeps_default() {
        let mut body = TextBody::new();
        body.fill_list(&[], |t| Paragraph::new(t, body_style()));
        assert_eq!(body.paragraphs().len(), 1);
    }

    #[test]
    fn test_text_xml_escapes_and_styles() {
        let mut body = TextBody::new().wrapped();
        body.set_first(
            Paragraph::new("Pros & <Cons>", body_style().bold())
                .aligned(Align::Right)
                .space_after(6.0),
        );
        let shape = Shape::text("Title", Frame::new(1, 2, 3, 4), body);

        let mut xml = String::new();
        shape.write_xml(&mut xml, 5, None).unwrap();

        assert!(xml.contains(r#"<p:cNvPr id="5" name="Title"/>"#));
        assert!(xml.contains(r#"wrap="square""#));
        assert!(xml.contains("Pros &amp; &lt;Cons&gt;"));
        assert!(xml.contains(r#"sz="1800""#));
        assert!(xml.contains(r#"b="1""#));
        assert!(xml.contains(r#"algn="r""#));
        assert!(xml.contains(r#"<a:spcPts val="600"/>"#));
        assert!(xml.contains(r#"<a:srgbClr val="1E293B"/>"#));
        assert!(xml.contains(r#"<a:latin typeface="Inter"/>"#));
    }

    #[test]
    fn test_xml_text_drops_forbidden_controls() {
        assert_eq!(xml_text("a\u{1}b\u{B}c\u{FFFE}"), "abc");
        assert_eq!(xml_text("keep\ttab\nand <lt>"), "keep\ttab\nand &lt;lt&gt;");
        assert!(matches!(xml_text("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_empty_paragraph_writes_end_props() {
        let shape = Shape::text("Body", Frame::new(0, 0, 10, 10), TextBody::new());
        let mut xml = String::new();
        shape.write_xml(&mut xml, 2, None).unwrap();
        assert!(xml.contains("<a:p><a:endParaRPr"));
        assert!(!xml.contains("<a:r>"));
    }

    #[test]
    fn test_rect_xml() {
        let shape = Shape::rect("Background", Frame::new(0, 0, 100, 50), palette::BG);
        let mut xml = String::new();
        shape.write_xml(&mut xml, 2, None).unwrap();
        assert!(xml.contains(r#"<a:srgbClr val="F5F7FA"/>"#));
        assert!(xml.contains("<a:ln><a:noFill/></a:ln>"));
        assert!(xml.contains(r#"<a:ext cx="100" cy="50"/>"#));
    }

    #[test]
    fn test_picture_requires_relationship() {
        let shape = Shape::picture("Picture", Frame::new(0, 0, 1, 1), MediaId(0), "solar");
        let mut xml = String::new();
        assert!(shape.write_xml(&mut xml, 2, None).is_err());

        let mut xml = String::new();
        shape.write_xml(&mut xml, 2, Some("rId2")).unwrap();
        assert!(xml.contains(r#"<a:blip r:embed="rId2"/>"#));
        assert!(xml.contains(r#"descr="solar""#));
    }

    #[test]
    fn test_chart_frame_uses_p_xfrm() {
        let shape = Shape::chart("Chart", Frame::new(1, 2, 3, 4), ChartId(0));
        let mut xml = String::new();
        shape.write_xml(&mut xml, 3, Some("rId2")).unwrap();
        assert!(xml.contains("<p:xfrm>"));
        assert!(xml.contains(r#"r:id="rId2""#));
    }
}
