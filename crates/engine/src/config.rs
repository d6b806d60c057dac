//! Run configuration, built once at process entry and passed in explicitly.

use std::env;
use std::path::PathBuf;

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemma-3-27b-it";

/// Credentials and switches for one generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Key for the outline model. Required by [`crate::DeckGenerator::from_config`].
    pub google_api_key: Option<String>,
    pub model: String,
    /// Stock-photo key. Without it no images are downloaded.
    pub pexels_api_key: Option<String>,
    pub download_images: bool,
    /// Parent of the per-run scratch directory. `None` uses the system temp dir.
    pub scratch_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            pexels_api_key: None,
            download_images: true,
            scratch_root: None,
        }
    }
}

impl Config {
    /// Read `GOOGLE_API_KEY` (or `GEMINI_API_KEY`), `GEMINI_MODEL` and
    /// `PEXELS_API_KEY` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            google_api_key: get("GOOGLE_API_KEY").or_else(|| get("GEMINI_API_KEY")),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            pexels_api_key: get("PEXELS_API_KEY"),
            download_images: true,
            scratch_root: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.trim().is_empty() {
            self.model = model.trim().to_string();
        }
        self
    }

    pub fn without_images(mut self) -> Self {
        self.download_images = false;
        self
    }

    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Whether image slides may hit the stock-photo service.
    pub fn images_enabled(&self) -> bool {
        self.download_images && self.pexels_api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert!(!config.images_enabled());
    }

    #[test]
    fn test_reads_keys() {
        let config = Config::from_lookup(lookup(&[
            ("GOOGLE_API_KEY", "g-key"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("PEXELS_API_KEY", "p-key"),
        ]));
        assert_eq!(config.google_api_key.as_deref(), Some("g-key"));
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.pexels_api_key.as_deref(), Some("p-key"));
        assert!(config.images_enabled());
    }

    #[test]
    fn test_gemini_key_alias() {
        let config = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "alias")]));
        assert_eq!(config.google_api_key.as_deref(), Some("alias"));

        let both = Config::from_lookup(lookup(&[("GOOGLE_API_KEY", "primary"), ("GEMINI_API_KEY", "alias")]));
        assert_eq!(both.google_api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = Config::from_lookup(lookup(&[
            ("GOOGLE_API_KEY", "   "),
            ("GEMINI_MODEL", ""),
            ("PEXELS_API_KEY", " "),
        ]));
        assert!(config.google_api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.pexels_api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[("PEXELS_API_KEY", "p")]))
            .with_model("other-model")
            .without_images();
        assert_eq!(config.model, "other-model");
        assert!(!config.images_enabled());

        let unchanged = Config::default().with_model("  ");
        assert_eq!(unchanged.model, DEFAULT_MODEL);
    }
}
