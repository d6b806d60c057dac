//! Stock-photo lookup and local image normalization.
//!
//! Network failures never surface as errors here: a slide whose image cannot
//! be found, downloaded or decoded simply renders without one.

use deckgen_core::{Error, ResolvedImage, Result};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

const PEXELS_SEARCH_URL: &str = "https://api.pexels.com/v1/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// JPEG quality for normalized images.
pub const JPEG_QUALITY: u8 = 88;

/// A searchable source of images.
pub trait ImageSource {
    /// URL of the best match for `query`, if any.
    fn search(&self, query: &str) -> Option<String>;

    /// Raw bytes at `url`.
    fn fetch(&self, url: &str) -> Option<Vec<u8>>;
}

/// Pexels photo search.
pub struct PexelsClient {
    client: Client,
    api_key: String,
}

impl PexelsClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Image(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }
}

impl ImageSource for PexelsClient {
    fn search(&self, query: &str) -> Option<String> {
        let response = self
            .client
            .get(PEXELS_SEARCH_URL)
            .header("Authorization", &self.api_key)
            .query(&[("query", query), ("per_page", "1"), ("orientation", "landscape")])
            .send();

        let response = match response {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                log::warn!("Image search for '{}' failed: HTTP {}", query, r.status());
                return None;
            }
            Err(e) => {
                log::warn!("Image search for '{}' failed: {}", query, e);
                return None;
            }
        };

        match response.json::<SearchResponse>() {
            Ok(results) => {
                let url = first_photo_url(results);
                if url.is_none() {
                    log::debug!("No photos for '{}'", query);
                }
                url
            }
            Err(e) => {
                log::warn!("Unreadable search response for '{}': {}", query, e);
                None
            }
        }
    }

    fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        let response = match self.client.get(url).send() {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                log::warn!("Image download failed: HTTP {}", r.status());
                return None;
            }
            Err(e) => {
                log::warn!("Image download failed: {}", e);
                return None;
            }
        };

        match response.bytes() {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(e) => {
                log::warn!("Image download interrupted: {}", e);
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    src: PhotoSrc,
}

#[derive(Debug, Deserialize)]
struct PhotoSrc {
    large: Option<String>,
    original: Option<String>,
}

fn first_photo_url(results: SearchResponse) -> Option<String> {
    let src = results.photos.into_iter().next()?.src;
    let usable = |url: Option<String>| url.filter(|u| !u.is_empty());
    usable(src.large).or_else(|| usable(src.original))
}

/// Decode `bytes`, flatten to RGB and write a JPEG at `dest`.
pub fn normalize_image(bytes: &[u8], dest: &Path) -> Result<ResolvedImage> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| Error::Image(format!("Failed to decode image: {}", e)))?;
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());

    let writer = BufWriter::new(File::create(dest)?);
    let encoder = JpegEncoder::new_with_quality(writer, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| Error::Image(format!("Failed to encode {}: {}", dest.display(), e)))?;

    Ok(ResolvedImage::new(dest, rgb.width(), rgb.height()))
}

/// Search, download and normalize images into a working directory.
pub struct ImageResolver<'a> {
    source: &'a dyn ImageSource,
}

impl<'a> ImageResolver<'a> {
    pub fn new(source: &'a dyn ImageSource) -> Self {
        Self { source }
    }

    /// Resolve `query` to `dir/<name>.jpg`. Every failure yields `None`.
    pub fn resolve(&self, query: &str, dir: &Path, name: &str) -> Option<ResolvedImage> {
        let url = self.source.search(query)?;
        let bytes = self.source.fetch(&url)?;
        let dest = dir.join(format!("{}.jpg", name));

        match normalize_image(&bytes, &dest) {
            Ok(image) => {
                log::debug!("Resolved '{}' to {}", query, dest.display());
                Some(image)
            }
            Err(e) => {
                log::warn!("Discarding image for '{}': {}", query, e);
                None
            }
        }
    }
}
