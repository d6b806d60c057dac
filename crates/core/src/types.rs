//! Domain types for deck requests, outlines, and resolved images.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default audience when the caller does not specify one.
pub const DEFAULT_AUDIENCE: &str = "General";

/// Default tone when the caller does not specify one.
pub const DEFAULT_TONE: &str = "Crisp, clear, professional";

/// Default visual style when the caller does not specify one.
pub const DEFAULT_VISUAL_STYLE: &str = "Modern, clean, minimal";

/// Default soft target for the number of outline slides.
pub const DEFAULT_SLIDE_COUNT: u32 = 8;

/// Everything the caller supplies for one deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckRequest {
    /// Subject of the deck. Never empty.
    pub topic: String,

    /// Who the deck is for.
    pub audience: String,

    /// Writing tone passed to the model.
    pub tone: String,

    /// Visual style passed to the model.
    pub visual_style: String,

    /// Soft target for the number of outline slides.
    pub slide_count: u32,

    /// Deck title override.
    pub title: Option<String>,

    /// Deck subtitle override.
    pub subtitle: Option<String>,

    /// Author line on the title slide.
    pub author: Option<String>,

    /// Optional logo image placed on the title slide.
    pub logo_path: Option<PathBuf>,
}

impl DeckRequest {
    /// Create a request for the given topic with default settings.
    ///
    /// Fails with [`Error::InvalidRequest`] if the topic is blank.
    pub fn new(topic: impl Into<String>) -> Result<Self> {
        let topic = topic.into().trim().to_string();
        if topic.is_empty() {
            return Err(Error::InvalidRequest("topic must not be empty".to_string()));
        }

        Ok(Self {
            topic,
            audience: DEFAULT_AUDIENCE.to_string(),
            tone: DEFAULT_TONE.to_string(),
            visual_style: DEFAULT_VISUAL_STYLE.to_string(),
            slide_count: DEFAULT_SLIDE_COUNT,
            title: None,
            subtitle: None,
            author: None,
            logo_path: None,
        })
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }

    pub fn with_visual_style(mut self, style: impl Into<String>) -> Self {
        self.visual_style = style.into();
        self
    }

    pub fn with_slide_count(mut self, count: u32) -> Self {
        self.slide_count = count.max(1);
        self
    }

    /// Set the title override. Blank values are ignored.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = non_blank(title.into());
        self
    }

    /// Set the subtitle override. Blank values are ignored.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = non_blank(subtitle.into());
        self
    }

    /// Set the author line. Blank values are ignored.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = non_blank(author.into());
        self
    }

    pub fn with_logo(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo_path = Some(path.into());
        self
    }

    /// Title to show when the outline does not provide one.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.topic)
    }
}

/// Deck-level metadata suggested by the outline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

/// A validated outline: metadata plus slide specs in presentation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedOutline {
    pub meta: OutlineMeta,
    pub slides: Vec<SlideSpec>,
}

/// One slide's intended type and content.
///
/// Every field is already defaulted, so renderers never deal with absent
/// values beyond the optional image query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SlideSpec {
    Section {
        heading: String,
        blurb: String,
    },
    Bullets {
        title: String,
        bullets: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_query: Option<String>,
    },
    TwoColumn {
        title: String,
        left: Vec<String>,
        right: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_query: Option<String>,
    },
    ImageHero {
        caption: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_query: Option<String>,
    },
    Chart {
        title: String,
    },
}

impl SlideSpec {
    /// Wire name of this slide type.
    pub fn kind(&self) -> &'static str {
        match self {
            SlideSpec::Section { .. } => "section",
            SlideSpec::Bullets { .. } => "bullets",
            SlideSpec::TwoColumn { .. } => "two-column",
            SlideSpec::ImageHero { .. } => "image-hero",
            SlideSpec::Chart { .. } => "chart",
        }
    }

    /// Image search query, if this slide asks for one.
    pub fn image_query(&self) -> Option<&str> {
        match self {
            SlideSpec::Bullets { image_query, .. }
            | SlideSpec::TwoColumn { image_query, .. }
            | SlideSpec::ImageHero { image_query, .. } => image_query.as_deref(),
            SlideSpec::Section { .. } | SlideSpec::Chart { .. } => None,
        }
    }
}

/// A re-encoded RGB JPEG in the run's working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub path: PathBuf,
    pub width_px: u32,
    pub height_px: u32,
}

impl ResolvedImage {
    pub fn new(path: impl Into<PathBuf>, width_px: u32, height_px: u32) -> Self {
        Self {
            path: path.into(),
            width_px,
            height_px,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Height that keeps the aspect ratio at the given width (same unit).
    pub fn height_for_width(&self, width: i64) -> i64 {
        if self.width_px == 0 {
            return width;
        }
        width * i64::from(self.height_px) / i64::from(self.width_px)
    }

    /// Width that keeps the aspect ratio at the given height (same unit).
    pub fn width_for_height(&self, height: i64) -> i64 {
        if self.height_px == 0 {
            return height;
        }
        height * i64::from(self.width_px) / i64::from(self.height_px)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rejects_blank_topic() {
        assert!(matches!(
            DeckRequest::new("   "),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_request_defaults() {
        let req = DeckRequest::new("  Solar Energy ").unwrap();
        assert_eq!(req.topic, "Solar Energy");
        assert_eq!(req.audience, DEFAULT_AUDIENCE);
        assert_eq!(req.slide_count, DEFAULT_SLIDE_COUNT);
        assert_eq!(req.display_title(), "Solar Energy");
    }

    #[test]
    fn test_request_blank_overrides_ignored() {
        let req = DeckRequest::new("Solar")
            .unwrap()
            .with_title("  ")
            .with_subtitle("Why now")
            .with_slide_count(0);
        assert_eq!(req.title, None);
        assert_eq!(req.subtitle.as_deref(), Some("Why now"));
        assert_eq!(req.slide_count, 1);
        assert_eq!(req.display_title(), "Solar");
    }

    #[test]
    fn test_slide_spec_serializes_kebab_tag() {
        let spec = SlideSpec::TwoColumn {
            title: "Pros & Cons".to_string(),
            left: vec!["a".to_string()],
            right: vec![],
            image_query: None,
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["type"], "two-column");
        assert!(json.get("image_query").is_none());
        assert_eq!(spec.kind(), "two-column");
    }

    #[test]
    fn test_image_query_accessor() {
        let hero = SlideSpec::ImageHero {
            caption: String::new(),
            image_query: Some("wind turbines".to_string()),
        };
        assert_eq!(hero.image_query(), Some("wind turbines"));

        let chart = SlideSpec::Chart {
            title: "Growth".to_string(),
        };
        assert_eq!(chart.image_query(), None);
    }

    #[test]
    fn test_resolved_image_aspect() {
        let img = ResolvedImage::new("/tmp/x.jpg", 400, 200);
        assert_eq!(img.height_for_width(1000), 500);
        assert_eq!(img.width_for_height(500), 1000);

        let degenerate = ResolvedImage::new("/tmp/y.jpg", 0, 0);
        assert_eq!(degenerate.height_for_width(10), 10);
    }
}
