//! Slide renderers. Each call appends exactly one slide to the deck.
//!
//! Every content slide shares the same frame: a full-bleed background, a
//! white header bar carrying the slide title as a caption, and a page number
//! equal to the number of slides already in the deck.

use crate::chart::ColumnChart;
use crate::deck::Deck;
use crate::shape::{Align, Frame, Paragraph, Shape, TextBody, TextStyle};
use crate::slide::Slide;
use deckgen_core::theme::{inches, margins, palette, Rgb, HEADER_HEIGHT, SLIDE_HEIGHT, SLIDE_WIDTH};
use deckgen_core::{ResolvedImage, TextRole};
use std::path::Path;

/// Right column ink, as a literal rather than the palette token.
const RIGHT_COLUMN_INK: Rgb = Rgb(30, 41, 59);

const CHART_CATEGORIES: [&str; 4] = ["A", "B", "C", "D"];
const CHART_SERIES: &str = "2025";
const CHART_VALUES: [f64; 4] = [4.3, 2.7, 3.8, 1.9];

/// Inputs of the opening slide.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleContent<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub author: &'a str,
    pub logo: Option<&'a Path>,
}

fn style(role: TextRole, color: Rgb) -> TextStyle {
    TextStyle::new(role.font(), color)
}

fn single_line(name: &str, frame: Frame, paragraph: Paragraph) -> Shape {
    let mut body = TextBody::new();
    body.set_first(paragraph);
    Shape::text(name, frame, body)
}

fn heading_shape(title: &str, y: f64) -> Shape {
    single_line(
        "Title",
        Frame::new(margins::LEFT, inches(y), inches(10.0), inches(0.8)),
        Paragraph::new(title, style(TextRole::H2, palette::INK).bold()),
    )
}

fn list_shape(
    name: &str,
    frame: Frame,
    mut body: TextBody,
    items: &[String],
    color: Rgb,
    space_after: Option<f64>,
) -> Shape {
    body.fill_list(items, |item| {
        let paragraph = Paragraph::new(item, style(TextRole::Body, color));
        match space_after {
            Some(pt) => paragraph.space_after(pt),
            None => paragraph,
        }
    });
    Shape::text(name, frame, body)
}

fn background(slide: &mut Slide) {
    slide.add_shape(Shape::rect(
        "Background",
        Frame::new(0, 0, SLIDE_WIDTH, SLIDE_HEIGHT),
        palette::BG,
    ));
}

/// White header bar with an optional caption and page number.
fn header(slide: &mut Slide, caption: &str, page: usize) {
    slide.add_shape(Shape::rect(
        "Header",
        Frame::new(0, 0, SLIDE_WIDTH, HEADER_HEIGHT),
        palette::WHITE,
    ));

    if !caption.is_empty() {
        slide.add_shape(single_line(
            "Header Caption",
            Frame::new(margins::LEFT, inches(0.08), inches(8.0), inches(0.34)),
            Paragraph::new(caption, style(TextRole::Caption, palette::MUTED)).aligned(Align::Left),
        ));
    }

    if page > 0 {
        slide.add_shape(single_line(
            "Page Number",
            Frame::new(inches(12.6), inches(0.08), inches(0.6), inches(0.34)),
            Paragraph::new(page.to_string(), style(TextRole::Caption, palette::MUTED)).aligned(Align::Right),
        ));
    }
}

/// New slide with background and header already drawn.
fn content_slide(deck: &Deck, caption: &str) -> Slide {
    let mut slide = Slide::new();
    background(&mut slide);
    header(&mut slide, caption, deck.slide_count());
    slide
}

pub fn title_slide(deck: &mut Deck, content: &TitleContent) {
    let mut slide = Slide::new();
    background(&mut slide);

    slide.add_shape(Shape::rect(
        "Band",
        Frame::new(0, inches(6.5), SLIDE_WIDTH, inches(1.0)),
        palette::PRIMARY,
    ));

    let mut body = TextBody::new().wrapped();
    body.set_first(Paragraph::new(content.title, style(TextRole::Title, palette::INK).bold()));
    if !content.subtitle.is_empty() {
        body.add_paragraph(
            Paragraph::new(content.subtitle, style(TextRole::Subtitle, palette::MUTED)).space_before(10.0),
        );
    }
    slide.add_shape(Shape::text(
        "Title",
        Frame::new(margins::LEFT, inches(2.3), inches(9.0), inches(2.0)),
        body,
    ));

    if !content.author.is_empty() {
        slide.add_shape(single_line(
            "Author",
            Frame::new(margins::LEFT, inches(4.6), inches(9.0), inches(0.6)),
            Paragraph::new(content.author, style(TextRole::Caption, palette::MUTED)),
        ));
    }

    header(&mut slide, "", 0);

    if let Some(logo) = content.logo.filter(|p| p.exists()) {
        match deck.embed_image(logo) {
            Ok(embedded) => {
                let height = inches(0.38);
                let width = ResolvedImage::new(logo, embedded.width_px, embedded.height_px).width_for_height(height);
                slide.add_shape(Shape::picture(
                    "Logo",
                    Frame::new(inches(12.7), inches(0.06), width, height),
                    embedded.media,
                    "logo",
                ));
            }
            Err(e) => log::warn!("Skipping logo {}: {}", logo.display(), e),
        }
    }

    deck.push_slide(slide);
}

pub fn section_slide(deck: &mut Deck, heading: &str, blurb: &str) {
    let mut slide = content_slide(deck, heading);

    let mut body = TextBody::new();
    body.set_first(Paragraph::new(heading, style(TextRole::H2, palette::INK).bold()));
    if !blurb.is_empty() {
        body.add_paragraph(Paragraph::new(blurb, style(TextRole::Body, palette::MUTED)).space_before(8.0));
    }
    slide.add_shape(Shape::text(
        "Heading",
        Frame::new(margins::LEFT, inches(1.7), inches(10.0), inches(1.6)),
        body,
    ));

    slide.add_shape(Shape::rect(
        "Accent Rule",
        Frame::new(margins::LEFT, inches(2.8), inches(1.5), inches(0.12)),
        palette::ACCENT,
    ));

    deck.push_slide(slide);
}

pub fn bullets_slide(deck: &mut Deck, title: &str, bullets: &[String]) {
    let mut slide = content_slide(deck, title);
    slide.add_shape(heading_shape(title, 1.1));

    slide.add_shape(list_shape(
        "Bullets",
        Frame::new(margins::LEFT, inches(2.0), inches(11.4), inches(4.8)),
        TextBody::new().wrapped().shrink_to_fit(),
        bullets,
        palette::INK,
        Some(6.0),
    ));

    deck.push_slide(slide);
}

pub fn two_column_slide(deck: &mut Deck, title: &str, left: &[String], right: &[String]) {
    let mut slide = content_slide(deck, title);
    slide.add_shape(heading_shape(title, 1.1));

    slide.add_shape(list_shape(
        "Left Column",
        Frame::new(margins::LEFT, inches(2.0), inches(5.5), inches(4.8)),
        TextBody::new().wrapped(),
        left,
        palette::INK,
        Some(6.0),
    ));
    slide.add_shape(list_shape(
        "Right Column",
        Frame::new(inches(7.0), inches(2.0), inches(5.8), inches(4.9)),
        TextBody::new().wrapped(),
        right,
        RIGHT_COLUMN_INK,
        Some(6.0),
    ));

    deck.push_slide(slide);
}

/// Column chart with fixed sample data. The outline carries no series.
pub fn chart_slide(deck: &mut Deck, title: &str) {
    let mut slide = content_slide(deck, title);
    slide.add_shape(heading_shape(title, 1.1));

    let chart = deck.add_chart(ColumnChart::new(
        CHART_SERIES,
        CHART_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        CHART_VALUES.to_vec(),
    ));
    slide.add_shape(Shape::chart(
        "Chart",
        Frame::new(inches(1.0), inches(2.0), inches(11.3), inches(4.9)),
        chart,
    ));

    deck.push_slide(slide);
}

/// Bullets on the left, picture on the right. An image that fails to embed
/// leaves the text-only layout.
pub fn image_right_slide(deck: &mut Deck, title: &str, bullets: &[String], image: &ResolvedImage) {
    let mut slide = content_slide(deck, title);
    slide.add_shape(heading_shape(title, 1.0));
    slide.add_shape(list_shape(
        "Bullets",
        Frame::new(margins::LEFT, inches(1.8), inches(5.6), inches(4.9)),
        TextBody::new().wrapped(),
        bullets,
        palette::INK,
        None,
    ));

    match deck.embed_image(image.path()) {
        Ok(embedded) => {
            let height = inches(4.9);
            let width = image.width_for_height(height);
            slide.add_shape(Shape::picture(
                "Picture",
                Frame::new(inches(7.2), inches(1.8), width, height),
                embedded.media,
                title,
            ));
        }
        Err(e) => log::warn!("Skipping image {}: {}", image.path().display(), e),
    }

    deck.push_slide(slide);
}

/// Full-width picture under the header, or a secondary-colored block of
/// the same bounds when there is no usable image.
pub fn image_hero_slide(deck: &mut Deck, image: Option<&ResolvedImage>, caption: &str) {
    let mut slide = content_slide(deck, "");

    let embedded = image.and_then(|img| match deck.embed_image(img.path()) {
        Ok(embedded) => Some((img, embedded)),
        Err(e) => {
            log::warn!("Skipping image {}: {}", img.path().display(), e);
            None
        }
    });

    match embedded {
        Some((img, embedded)) => {
            let height = img.height_for_width(SLIDE_WIDTH);
            slide.add_shape(Shape::picture(
                "Hero Picture",
                Frame::new(0, HEADER_HEIGHT, SLIDE_WIDTH, height),
                embedded.media,
                caption,
            ));
        }
        None => {
            slide.add_shape(Shape::rect(
                "Hero Placeholder",
                Frame::new(0, HEADER_HEIGHT, SLIDE_WIDTH, inches(6.5)),
                palette::SECONDARY,
            ));
        }
    }

    if !caption.is_empty() {
        slide.add_shape(Shape::rect(
            "Caption Strip",
            Frame::new(0, inches(6.6), SLIDE_WIDTH, inches(0.8)),
            palette::WHITE,
        ));
        slide.add_shape(single_line(
            "Caption",
            Frame::new(margins::LEFT, inches(6.65), inches(10.0), inches(0.7)),
            Paragraph::new(caption, style(TextRole::Body, palette::MUTED)),
        ));
    }

    deck.push_slide(slide);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKind;
    use image::{ImageBuffer, ImageFormat, Rgb as PixelRgb};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> ResolvedImage {
        let path = dir.join(name);
        let img: ImageBuffer<PixelRgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(w, h, PixelRgb([200, 100, 50]));
        img.save_with_format(&path, ImageFormat::Png).unwrap();
        ResolvedImage::new(path, w, h)
    }

    fn page_number(slide: &Slide) -> Option<String> {
        slide.shape_named("Page Number").map(|s| s.texts()[0].to_string())
    }

    #[test]
    fn test_title_slide_has_no_page_number() {
        let mut deck = Deck::new();
        title_slide(
            &mut deck,
            &TitleContent {
                title: "Solar",
                subtitle: "A primer",
                author: "Ada",
                logo: None,
            },
        );

        let slide = &deck.slides()[0];
        assert_eq!(slide.texts(), vec!["Solar", "A primer", "Ada"]);
        assert!(page_number(slide).is_none());
        assert!(slide.shape_named("Header Caption").is_none());
        assert!(!slide.has_picture());
    }

    #[test]
    fn test_title_slide_places_logo() {
        let dir = tempfile::tempdir().unwrap();
        let logo = write_png(dir.path(), "logo.png", 200, 100);

        let mut deck = Deck::new();
        title_slide(
            &mut deck,
            &TitleContent {
                title: "Solar",
                logo: Some(logo.path()),
                ..TitleContent::default()
            },
        );

        let shape = deck.slides()[0].shape_named("Logo").unwrap();
        assert_eq!(shape.frame.cy, inches(0.38));
        assert_eq!(shape.frame.cx, inches(0.38) * 2);
        assert_eq!(deck.media().len(), 1);
    }

    #[test]
    fn test_missing_logo_is_skipped() {
        let mut deck = Deck::new();
        title_slide(
            &mut deck,
            &TitleContent {
                title: "Solar",
                logo: Some(Path::new("/nonexistent/logo.png")),
                ..TitleContent::default()
            },
        );
        assert!(!deck.slides()[0].has_picture());
        assert!(deck.media().is_empty());
    }

    #[test]
    fn test_page_numbers_count_prior_slides() {
        let mut deck = Deck::new();
        title_slide(&mut deck, &TitleContent { title: "T", ..TitleContent::default() });
        section_slide(&mut deck, "Intro", "");
        bullets_slide(&mut deck, "Points", &strings(&["a"]));
        chart_slide(&mut deck, "Numbers");

        assert_eq!(page_number(&deck.slides()[1]).as_deref(), Some("1"));
        assert_eq!(page_number(&deck.slides()[2]).as_deref(), Some("2"));
        assert_eq!(page_number(&deck.slides()[3]).as_deref(), Some("3"));
    }

    #[test]
    fn test_section_slide_layout() {
        let mut deck = Deck::new();
        section_slide(&mut deck, "Intro", "Why now");

        let slide = &deck.slides()[0];
        assert_eq!(slide.texts(), vec!["Intro", "Intro", "Why now"]);
        let rule = slide.shape_named("Accent Rule").unwrap();
        assert_eq!(rule.frame, Frame::new(margins::LEFT, inches(2.8), inches(1.5), inches(0.12)));
        assert!(matches!(rule.kind, ShapeKind::Rect { fill } if fill == palette::ACCENT));
    }

    #[test]
    fn test_bullets_fill_default_paragraph() {
        let mut deck = Deck::new();
        bullets_slide(&mut deck, "Points", &strings(&["one", "two", "three"]));
        bullets_slide(&mut deck, "Empty", &[]);

        let list = deck.slides()[0].shape_named("Bullets").unwrap();
        assert_eq!(list.texts(), vec!["one", "two", "three"]);

        let empty = deck.slides()[1].shape_named("Bullets").unwrap();
        match &empty.kind {
            ShapeKind::Text(body) => {
                assert_eq!(body.paragraphs().len(), 1);
                assert!(body.paragraphs()[0].text.is_empty());
                assert!(body.shrink_to_fit);
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn test_two_column_right_uses_literal_ink() {
        let mut deck = Deck::new();
        two_column_slide(&mut deck, "Pros & Cons", &strings(&["Pro 1"]), &strings(&["Con 1"]));

        let slide = &deck.slides()[0];
        assert_eq!(slide.shape_named("Left Column").unwrap().texts(), vec!["Pro 1"]);
        match &slide.shape_named("Right Column").unwrap().kind {
            ShapeKind::Text(body) => {
                assert_eq!(body.paragraphs()[0].style.unwrap().color, RIGHT_COLUMN_INK);
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn test_chart_slide_uses_fixed_data() {
        let mut deck = Deck::new();
        chart_slide(&mut deck, "Numbers");

        assert!(deck.slides()[0].has_chart());
        let chart = &deck.charts()[0];
        assert_eq!(chart.categories, strings(&["A", "B", "C", "D"]));
        assert_eq!(chart.series_name, "2025");
        assert_eq!(chart.values, vec![4.3, 2.7, 3.8, 1.9]);
        assert!(!chart.show_legend);
    }

    #[test]
    fn test_image_right_keeps_aspect() {
        let dir = tempfile::tempdir().unwrap();
        let image = write_png(dir.path(), "img.png", 300, 200);

        let mut deck = Deck::new();
        image_right_slide(&mut deck, "Visual", &strings(&["a", "b"]), &image);

        let slide = &deck.slides()[0];
        let picture = slide.shape_named("Picture").unwrap();
        assert_eq!(picture.frame.x, inches(7.2));
        assert_eq!(picture.frame.cy, inches(4.9));
        assert_eq!(picture.frame.cx, inches(4.9) * 3 / 2);
        assert_eq!(slide.shape_named("Bullets").unwrap().texts(), vec!["a", "b"]);
    }

    #[test]
    fn test_image_right_with_unreadable_image() {
        let mut deck = Deck::new();
        let image = ResolvedImage::new("/nonexistent/img.jpg", 10, 10);
        image_right_slide(&mut deck, "Visual", &strings(&["a"]), &image);

        assert_eq!(deck.slide_count(), 1);
        assert!(!deck.slides()[0].has_picture());
    }

    #[test]
    fn test_image_hero_with_image() {
        let dir = tempfile::tempdir().unwrap();
        let image = write_png(dir.path(), "hero.png", 400, 200);

        let mut deck = Deck::new();
        image_hero_slide(&mut deck, Some(&image), "Sunset");

        let slide = &deck.slides()[0];
        let picture = slide.shape_named("Hero Picture").unwrap();
        assert_eq!(picture.frame.cx, SLIDE_WIDTH);
        assert_eq!(picture.frame.cy, SLIDE_WIDTH / 2);
        assert!(slide.shape_named("Caption Strip").is_some());
        assert!(slide.texts().contains(&"Sunset"));
    }

    #[test]
    fn test_image_hero_placeholder() {
        let mut deck = Deck::new();
        image_hero_slide(&mut deck, None, "");

        let slide = &deck.slides()[0];
        assert!(!slide.has_picture());
        let placeholder = slide.shape_named("Hero Placeholder").unwrap();
        assert_eq!(placeholder.frame, Frame::new(0, HEADER_HEIGHT, SLIDE_WIDTH, inches(6.5)));
        assert!(matches!(placeholder.kind, ShapeKind::Rect { fill } if fill == palette::SECONDARY));
        assert!(slide.shape_named("Caption Strip").is_none());
        assert!(slide.shape_named("Header Caption").is_none());
    }
}
