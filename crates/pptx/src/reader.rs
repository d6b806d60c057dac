//! Read back a written `.pptx`: per-slide text and which slides carry
//! pictures or charts. Used by the CLI's verbose summary and by tests.

use deckgen_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// What a single slide contains.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideSummary {
    /// 1-based position in the deck.
    pub number: usize,
    /// Non-empty paragraph texts in drawing order.
    pub texts: Vec<String>,
    pub has_picture: bool,
    pub has_chart: bool,
}

impl SlideSummary {
    fn new(number: usize) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    /// Whether any paragraph equals `text` exactly.
    pub fn contains_text(&self, text: &str) -> bool {
        self.texts.iter().any(|t| t == text)
    }
}

/// Reader for `.pptx` packages.
pub struct DeckReader;

impl DeckReader {
    pub fn new() -> Self {
        Self
    }

    /// Summarize every slide, in presentation order.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Vec<SlideSummary>> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let slide_order = self.slide_order(&mut archive)?;

        slide_order
            .iter()
            .enumerate()
            .map(|(idx, path)| {
                let content = self.read_file_from_archive(&mut archive, path)?;
                summarize_slide(&content, idx + 1)
            })
            .collect()
    }

    /// Ordered slide part paths from `ppt/_rels/presentation.xml.rels`.
    fn slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = self.read_file_from_archive(archive, "ppt/_rels/presentation.xml.rels")?;
        let mut slides: Vec<(String, Option<usize>)> = Vec::new();

        let mut reader = Reader::from_str(&rels_content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if e.name().as_ref() == b"Relationship" => {
                    let mut rel_type = String::new();
                    let mut target = String::new();
                    let mut id = String::new();

                    for attr in e.attributes().flatten() {
                        let value = String::from_utf8_lossy(&attr.value).to_string();
                        match attr.key.as_ref() {
                            b"Type" => rel_type = value,
                            b"Target" => target = value,
                            b"Id" => id = value,
                            _ => {}
                        }
                    }

                    if rel_type.ends_with("/slide") {
                        let order_num = extract_slide_number(&id).or_else(|| extract_slide_number(&target));
                        let full_path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("ppt/{}", target),
                        };
                        slides.push((full_path, order_num));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!("Error parsing relationships: {}", e)));
                }
                _ => {}
            }
        }

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    fn read_file_from_archive<R: Read + Seek>(&self, archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for DeckReader {
    fn default() -> Self {
        Self::new()
    }
}

fn summarize_slide(xml: &str, number: usize) -> Result<SlideSummary> {
    let mut summary = SlideSummary::new(number);
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut in_text = false;
    let mut paragraph = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"pic" => summary.has_picture = true,
                b"p" => paragraph.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if local_name(e.name().as_ref()) == b"chart" {
                    summary.has_chart = true;
                }
            }
            Ok(Event::Text(ref e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|e| Error::XmlError(format!("Bad text in slide {}: {}", number, e)))?;
                paragraph.push_str(&text);
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"p" => {
                    let text = paragraph.trim();
                    if !text.is_empty() {
                        summary.texts.push(text.to_string());
                    }
                    paragraph.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing slide {}: {}", number, e)));
            }
            _ => {}
        }
    }

    Ok(summary)
}

/// Local part of a possibly prefixed element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Trailing number of "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");
    let start = s
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    s[start..].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Frame, Paragraph, Shape, TextBody, TextStyle};
    use crate::{ColumnChart, Deck, Slide};
    use deckgen_core::theme::palette;
    use deckgen_core::TextRole;
    use std::io::Cursor;

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("rId1"), Some(1));
        assert_eq!(extract_slide_number("rId12"), Some(12));
        assert_eq!(extract_slide_number("slides/slide123.xml"), Some(123));
        assert_eq!(extract_slide_number("nodigits"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_summarize_paragraphs() {
        let xml = r#"<p:sld xmlns:p="p" xmlns:a="a"><p:txBody><a:p><a:r><a:t>One &amp; two</a:t></a:r></a:p><a:p><a:endParaRPr/></a:p><a:p><a:r><a:t>Three</a:t></a:r></a:p></p:txBody></p:sld>"#;
        let summary = summarize_slide(xml, 4).unwrap();
        assert_eq!(summary.number, 4);
        assert_eq!(summary.texts, vec!["One & two", "Three"]);
        assert!(!summary.has_picture);
        assert!(!summary.has_chart);
    }

    #[test]
    fn test_read_written_deck() {
        let mut deck = Deck::new();
        for title in ["First", "Second", "Third"] {
            let mut body = TextBody::new();
            body.set_first(Paragraph::new(title, TextStyle::new(TextRole::H2.font(), palette::INK)));
            let mut slide = Slide::new();
            slide.add_shape(Shape::text("Title", Frame::new(0, 0, 100, 100), body));
            deck.push_slide(slide);
        }
        let chart = deck.add_chart(ColumnChart::new("2025", vec!["A".into()], vec![1.0]));
        let mut slide = Slide::new();
        slide.add_shape(Shape::chart("Chart", Frame::new(0, 0, 100, 100), chart));
        deck.push_slide(slide);

        let bytes = deck.to_bytes().unwrap();
        let slides = DeckReader::new().read(Cursor::new(bytes)).unwrap();

        assert_eq!(slides.len(), 4);
        assert_eq!(slides[0].texts, vec!["First"]);
        assert_eq!(slides[2].texts, vec!["Third"]);
        assert!(slides[1].contains_text("Second"));
        assert!(slides[3].has_chart);
        assert!(!slides[0].has_chart);
    }

    #[test]
    fn test_read_rejects_non_zip() {
        let err = DeckReader::new().read(Cursor::new(b"plain text".to_vec())).unwrap_err();
        assert!(matches!(err, Error::ZipError(_)));
    }
}
