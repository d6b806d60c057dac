//! PowerPoint (Office Open XML) output for generated decks.
//!
//! Slides are built in memory from named shapes, then serialized as a
//! `.pptx` ZIP package. A small reader reopens written files for summaries.

pub mod chart;
pub mod deck;
mod package;
pub mod reader;
pub mod render;
pub mod shape;
pub mod slide;

pub use chart::ColumnChart;
pub use deck::{Deck, DeckProperties, EmbeddedImage, Media};
pub use reader::{DeckReader, SlideSummary};
pub use render::TitleContent;
pub use shape::{Align, ChartId, Frame, MediaId, Paragraph, Shape, ShapeKind, TextBody, TextStyle};
pub use slide::Slide;
