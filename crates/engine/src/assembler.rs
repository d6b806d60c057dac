//! Deck assembly: outline, optional images, slide dispatch, serialization.

use crate::config::Config;
use crate::images::{ImageResolver, ImageSource, PexelsClient};
use crate::model::{GeminiClient, OutlineModel};
use deckgen_core::{
    build_prompt, fallback_outline, normalize, DeckRequest, Error, NormalizedOutline, ResolvedImage, Result, SlideSpec,
};
use deckgen_pptx::render::{self, TitleContent};
use deckgen_pptx::Deck;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Prefix of the per-run scratch directory holding downloaded images.
const SCRATCH_PREFIX: &str = "deck_imgs_";

/// Turns a [`DeckRequest`] into a `.pptx` file.
pub struct DeckGenerator {
    config: Config,
    model: Box<dyn OutlineModel>,
    images: Option<Box<dyn ImageSource>>,
}

impl DeckGenerator {
    pub fn new(config: Config, model: Box<dyn OutlineModel>, images: Option<Box<dyn ImageSource>>) -> Self {
        Self { config, model, images }
    }

    /// Build the network-backed generator. Fails when no model key is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .google_api_key
            .as_deref()
            .ok_or_else(|| Error::Config("GOOGLE_API_KEY (or GEMINI_API_KEY) is not set".to_string()))?;
        let model = GeminiClient::new(api_key, config.model.as_str())?;

        let images: Option<Box<dyn ImageSource>> = match config.pexels_api_key.as_deref() {
            Some(key) if config.download_images => Some(Box::new(PexelsClient::new(key)?)),
            _ => {
                log::info!("Image downloads disabled");
                None
            }
        };

        Ok(Self::new(config.clone(), Box::new(model), images))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate the deck and write it to `output`.
    ///
    /// Model and image failures degrade the deck instead of failing; only
    /// serialization errors are returned. The scratch directory is removed
    /// before this returns, on every path.
    pub fn generate(&self, request: &DeckRequest, output: &Path) -> Result<PathBuf> {
        log::info!("Generating deck for '{}'", request.topic);

        let scratch = self.scratch_dir();
        let deck = self.build_deck(request, scratch.as_ref().map(TempDir::path));
        deck.save(output)?;

        Ok(output.to_path_buf())
    }

    /// Outline plus rendering, without writing anything but scratch images.
    /// `workdir` of `None` disables images.
    pub fn build_deck(&self, request: &DeckRequest, workdir: Option<&Path>) -> Deck {
        let outline = self.outline(request);
        self.render_outline(request, &outline, workdir)
    }

    /// Ask the model for an outline; any failure yields the fallback outline.
    pub fn outline(&self, request: &DeckRequest) -> NormalizedOutline {
        let prompt = build_prompt(request);
        match self.model.generate(&prompt).and_then(|raw| normalize(&raw)) {
            Ok(outline) => {
                log::info!("Outline has {} slides", outline.slides.len());
                outline
            }
            Err(e) => {
                log::warn!("Using fallback outline: {}", e);
                fallback_outline(request)
            }
        }
    }

    /// Render a title slide followed by one slide per spec, in order.
    pub fn render_outline(&self, request: &DeckRequest, outline: &NormalizedOutline, workdir: Option<&Path>) -> Deck {
        let mut deck = Deck::new();

        let title = outline
            .meta
            .title
            .as_deref()
            .unwrap_or_else(|| request.display_title());
        let subtitle = outline
            .meta
            .subtitle
            .as_deref()
            .or(request.subtitle.as_deref())
            .unwrap_or("");
        let author = request.author.as_deref().unwrap_or("");

        deck.set_properties(title, author);
        render::title_slide(
            &mut deck,
            &TitleContent {
                title,
                subtitle,
                author,
                logo: request.logo_path.as_deref(),
            },
        );

        let resolver = match (self.images.as_deref(), workdir) {
            (Some(source), Some(dir)) if self.config.download_images => Some((ImageResolver::new(source), dir)),
            _ => None,
        };

        for spec in &outline.slides {
            let image = match (spec.image_query(), &resolver) {
                (Some(query), Some((resolver, dir))) if !query.trim().is_empty() => {
                    resolver.resolve(query, dir, &format!("img_{}", deck.slide_count()))
                }
                _ => None,
            };
            log::debug!(
                "Slide {}: {}{}",
                deck.slide_count(),
                spec.kind(),
                if image.is_some() { " with image" } else { "" }
            );
            render_spec(&mut deck, spec, image.as_ref());
        }

        deck
    }

    fn scratch_dir(&self) -> Option<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        let created = match &self.config.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };

        match created {
            Ok(dir) => Some(dir),
            Err(e) => {
                log::warn!("No scratch directory, images disabled: {}", e);
                None
            }
        }
    }
}

/// Pick the renderer for one spec. A resolved image turns bullet and
/// two-column slides into the image-right layout.
fn render_spec(deck: &mut Deck, spec: &SlideSpec, image: Option<&ResolvedImage>) {
    match spec {
        SlideSpec::Section { heading, blurb } => render::section_slide(deck, heading, blurb),
        SlideSpec::Bullets { title, bullets, .. } => match image {
            Some(image) => render::image_right_slide(deck, title, bullets, image),
            None => render::bullets_slide(deck, title, bullets),
        },
        SlideSpec::TwoColumn {
            title, left, right, ..
        } => match image {
            Some(image) => {
                let points = if left.is_empty() { right } else { left };
                render::image_right_slide(deck, title, points, image)
            }
            None => render::two_column_slide(deck, title, left, right),
        },
        SlideSpec::ImageHero { caption, .. } => render::image_hero_slide(deck, image, caption),
        SlideSpec::Chart { title } => render::chart_slide(deck, title),
    }
}
