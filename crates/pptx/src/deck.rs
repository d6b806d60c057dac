//! In-memory presentation: slides plus the media and chart parts they reference.

use crate::chart::ColumnChart;
use crate::package::write_package;
use crate::shape::{ChartId, MediaId};
use crate::slide::Slide;
use deckgen_core::{Error, Result};
use image::ImageFormat;
use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

/// An embedded image part.
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    pub bytes: Vec<u8>,
    /// File extension of the part (`jpeg`, `png` or `gif`).
    pub ext: &'static str,
}

/// A picture added to the deck, with its pixel dimensions for aspect math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub media: MediaId,
    pub width_px: u32,
    pub height_px: u32,
}

/// Document properties written to `docProps/core.xml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeckProperties {
    pub title: String,
    pub author: String,
}

/// A presentation under construction.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    slides: Vec<Slide>,
    media: Vec<Media>,
    charts: Vec<ColumnChart>,
    properties: DeckProperties,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn push_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    pub fn media(&self) -> &[Media] {
        &self.media
    }

    pub fn charts(&self) -> &[ColumnChart] {
        &self.charts
    }

    pub fn properties(&self) -> &DeckProperties {
        &self.properties
    }

    pub fn set_properties(&mut self, title: impl Into<String>, author: impl Into<String>) {
        self.properties = DeckProperties {
            title: title.into(),
            author: author.into(),
        };
    }

    pub(crate) fn media_ext(&self, index: usize) -> &'static str {
        self.media.get(index).map(|m| m.ext).unwrap_or("jpeg")
    }

    /// Read an image file and add it as a media part.
    ///
    /// JPEG, PNG and GIF are stored as-is; any other decodable format is
    /// re-encoded as PNG.
    pub fn embed_image(&mut self, path: &Path) -> Result<EmbeddedImage> {
        let bytes = fs::read(path)?;
        self.embed_image_bytes(bytes)
    }

    /// Add an in-memory image as a media part.
    pub fn embed_image_bytes(&mut self, bytes: Vec<u8>) -> Result<EmbeddedImage> {
        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| Error::Image(format!("Failed to decode image: {}", e)))?;
        let (width_px, height_px) = (decoded.width(), decoded.height());

        let (bytes, ext) = match image::guess_format(&bytes) {
            Ok(ImageFormat::Jpeg) => (bytes, "jpeg"),
            Ok(ImageFormat::Png) => (bytes, "png"),
            Ok(ImageFormat::Gif) => (bytes, "gif"),
            _ => {
                let mut out = Cursor::new(Vec::new());
                decoded
                    .write_to(&mut out, ImageFormat::Png)
                    .map_err(|e| Error::Image(format!("Failed to re-encode image: {}", e)))?;
                (out.into_inner(), "png")
            }
        };

        let media = MediaId(self.media.len());
        self.media.push(Media { bytes, ext });
        log::debug!("Embedded image {} ({}x{}, {})", media.0 + 1, width_px, height_px, ext);

        Ok(EmbeddedImage {
            media,
            width_px,
            height_px,
        })
    }

    pub fn add_chart(&mut self, chart: ColumnChart) -> ChartId {
        let id = ChartId(self.charts.len());
        self.charts.push(chart);
        id
    }

    /// Serialize the package into any seekable writer.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        write_package(self, writer)
    }

    /// Serialize the package into a byte buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }

    /// Write the `.pptx` file. The archive is built in memory first, so a
    /// failure never leaves a truncated file behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes)?;
        log::info!("Wrote {} slides to {}", self.slide_count(), path.display());
        Ok(())
    }
}
