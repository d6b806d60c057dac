//! Core domain types, theme constants, and outline normalization
//! for slide-deck generation.

pub mod error;
pub mod outline;
pub mod prompt;
pub mod theme;
pub mod types;

pub use error::{Error, Result};
pub use outline::{fallback_outline, normalize};
pub use prompt::build_prompt;
pub use theme::{Rgb, TextRole};
pub use types::{
    DeckRequest, NormalizedOutline, OutlineMeta, ResolvedImage, SlideSpec, DEFAULT_AUDIENCE, DEFAULT_SLIDE_COUNT,
    DEFAULT_TONE, DEFAULT_VISUAL_STYLE,
};
