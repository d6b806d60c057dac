//! Outline normalization for model output.
//!
//! Strips code-fence wrapping and leading/trailing prose, parses the greedy
//! `{ ... }` span as JSON, then maps it onto [`NormalizedOutline`] without
//! ever failing on missing or oddly typed fields.

use crate::types::{DeckRequest, NormalizedOutline, OutlineMeta, SlideSpec};
use crate::{Error, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex matching a code-fence marker, optionally tagged `json`.
static FENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)```(?:json)?").unwrap());

/// Parse raw model output into a validated outline.
///
/// Fails with [`Error::MalformedOutline`] when no JSON object can be
/// located or the located span does not parse as a whole.
pub fn normalize(raw: &str) -> Result<NormalizedOutline> {
    let stripped = strip_fences(raw);
    let span = object_span(&stripped)
        .ok_or_else(|| Error::MalformedOutline("no JSON object found in model output".to_string()))?;

    let value: Value = serde_json::from_str(span)
        .map_err(|e| Error::MalformedOutline(format!("invalid JSON: {}", e)))?;

    let Value::Object(root) = value else {
        return Err(Error::MalformedOutline("outline is not a JSON object".to_string()));
    };

    let meta = root
        .get("meta")
        .and_then(Value::as_object)
        .map(|m| OutlineMeta {
            title: opt_text(m, "title"),
            subtitle: opt_text(m, "subtitle"),
        })
        .unwrap_or_default();

    let slides: Vec<SlideSpec> = root
        .get("slides")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .map(slide_from_object)
                .collect()
        })
        .unwrap_or_default();

    log::debug!(
        "Normalized outline: {} slides, title {:?}",
        slides.len(),
        meta.title
    );

    Ok(NormalizedOutline { meta, slides })
}

/// The fixed four-slide outline used when the model cannot supply one.
pub fn fallback_outline(request: &DeckRequest) -> NormalizedOutline {
    let list = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    NormalizedOutline {
        meta: OutlineMeta::default(),
        slides: vec![
            SlideSpec::Section {
                heading: request.topic.clone(),
                blurb: request.audience.clone(),
            },
            SlideSpec::Bullets {
                title: "Overview".to_string(),
                bullets: list(&["What it is", "Why it matters", "Key points"]),
                image_query: None,
            },
            SlideSpec::TwoColumn {
                title: "Pros & Cons".to_string(),
                left: list(&["Pro 1", "Pro 2"]),
                right: list(&["Con 1", "Con 2"]),
                image_query: None,
            },
            SlideSpec::Bullets {
                title: "Next Steps".to_string(),
                bullets: list(&["Do X", "Measure Y", "Review Z"]),
                image_query: None,
            },
        ],
    }
}

/// Remove code-fence markers when the text is fenced.
fn strip_fences(raw: &str) -> String {
    let text = raw.trim();
    if text.starts_with("```") {
        FENCE_REGEX.replace_all(text, "").trim().to_string()
    } else {
        text.to_string()
    }
}

/// Greedy span from the first `{` to the last `}`.
fn object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Map one slide object onto its typed variant. Types match exactly;
/// anything else becomes bullets.
fn slide_from_object(obj: &Map<String, Value>) -> SlideSpec {
    let kind = obj.get("type").and_then(Value::as_str).unwrap_or_default();

    match kind {
        "section" => SlideSpec::Section {
            heading: text(obj, "heading"),
            blurb: text(obj, "blurb"),
        },
        "two-column" => SlideSpec::TwoColumn {
            title: text(obj, "title"),
            left: text_list(obj, "left"),
            right: text_list(obj, "right"),
            image_query: opt_text(obj, "image_query"),
        },
        "image-hero" => SlideSpec::ImageHero {
            caption: text(obj, "caption"),
            image_query: opt_text(obj, "image_query"),
        },
        "chart" => SlideSpec::Chart {
            title: text(obj, "title"),
        },
        other => {
            if other != "bullets" {
                log::debug!("Unknown slide type {:?}, rendering as bullets", other);
            }
            SlideSpec::Bullets {
                title: text(obj, "title"),
                bullets: text_list(obj, "bullets"),
                image_query: opt_text(obj, "image_query"),
            }
        }
    }
}

/// Render a scalar JSON value as cleaned text. Objects, arrays and null yield None.
fn scalar_text(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    Some(clean(&raw))
}

/// Trim, drop control characters XML 1.0 cannot carry, and compose to NFC.
fn clean(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .nfc()
        .collect()
}

fn text(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).and_then(scalar_text).unwrap_or_default()
}

fn opt_text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    Some(text(obj, key)).filter(|s| !s.is_empty())
}

fn text_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(scalar_text).collect())
        .unwrap_or_default()
}
