//! Deck generation pipeline.
//!
//! A [`DeckGenerator`] asks an [`OutlineModel`] for an outline, optionally
//! resolves stock photos through an [`ImageSource`], and renders the result
//! with `deckgen-pptx`.

pub mod assembler;
pub mod config;
pub mod images;
pub mod model;

pub use assembler::DeckGenerator;
pub use config::{Config, DEFAULT_MODEL};
pub use images::{normalize_image, ImageResolver, ImageSource, PexelsClient};
pub use model::{GeminiClient, OutlineModel};
