//! Editor configuration loaded from TOML.

use crate::core::error::ConfigError;
use crate::core::kernel::Category;
use crate::core::types::Intensity;
use crate::pipeline::catalog::{FilterCatalog, FilterId};
use crate::pipeline::policy::{ParameterPolicy, DEFAULT_RADIUS_FACTOR, DEFAULT_SCALE_FACTOR};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up by [`EditorConfig::discover`].
pub const CONFIG_FILENAME: &str = "instafilter.toml";

/// Settings for an editing session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Filter selected at startup
    pub default_filter: FilterId,
    /// Slider position at startup
    pub initial_intensity: f64,
    /// Radius bound at full intensity
    pub radius_factor: f64,
    /// Scale bound at full intensity
    pub scale_factor: f64,
    /// Engine categories filters are looked up in; empty means all
    pub categories: Vec<Category>,
    /// Where saved images are written
    pub output_dir: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_filter: FilterId::TwirlDistortion,
            initial_intensity: Intensity::default().value(),
            radius_factor: DEFAULT_RADIUS_FACTOR,
            scale_factor: DEFAULT_SCALE_FACTOR,
            categories: Vec::new(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl EditorConfig {
    /// Parse from a TOML string.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = toml::from_str(text)?;
        Ok(config.sanitize())
    }

    /// Load from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `instafilter.toml` from `dir` if present, defaults otherwise.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let candidate = dir.as_ref().join(CONFIG_FILENAME);
        if candidate.is_file() {
            log::info!("Loading config from {}", candidate.display());
            Self::load(candidate)
        } else {
            Ok(Self::default())
        }
    }

    fn sanitize(mut self) -> Self {
        let defaults = Self::default();
        self.initial_intensity = Intensity::new(self.initial_intensity).value();
        if !self.radius_factor.is_finite() || self.radius_factor < 0.0 {
            log::warn!("Ignoring radius_factor {}", self.radius_factor);
            self.radius_factor = defaults.radius_factor;
        }
        if !self.scale_factor.is_finite() || self.scale_factor < 0.0 {
            log::warn!("Ignoring scale_factor {}", self.scale_factor);
            self.scale_factor = defaults.scale_factor;
        }
        self
    }

    /// Slider position at startup.
    pub fn intensity(&self) -> Intensity {
        Intensity::new(self.initial_intensity)
    }

    /// Binding policy for these settings.
    pub fn policy(&self) -> ParameterPolicy {
        ParameterPolicy::with_factors(self.radius_factor, self.scale_factor)
    }

    /// Catalog for these settings.
    pub fn catalog(&self) -> FilterCatalog {
        FilterCatalog::new().with_categories(self.categories.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        let config = EditorConfig::from_toml_str("").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.default_filter, FilterId::TwirlDistortion);
        assert_eq!(config.policy(), ParameterPolicy::new());
    }

    #[test]
    fn test_parse_fields() {
        let config = EditorConfig::from_toml_str(
            r#"
            default_filter = "sepiaTone"
            initial_intensity = 0.25
            categories = ["blur", "color_effect"]
            output_dir = "out"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_filter, FilterId::SepiaTone);
        assert_eq!(config.intensity(), Intensity::new(0.25));
        assert_eq!(config.categories, vec![Category::Blur, Category::ColorEffect]);
        assert_eq!(config.catalog().categories(), &[Category::Blur, Category::ColorEffect]);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_sanitize_out_of_range_values() {
        let config = EditorConfig::from_toml_str(
            "initial_intensity = 3.0\nradius_factor = -1.0\nscale_factor = 4.0",
        )
        .unwrap();

        assert_eq!(config.initial_intensity, 1.0);
        assert_eq!(config.radius_factor, DEFAULT_RADIUS_FACTOR);
        assert_eq!(config.scale_factor, 4.0);
    }

    #[test]
    fn test_filter_spellings() {
        let config = EditorConfig::from_toml_str("default_filter = \"sepia_tone\"").unwrap();
        assert_eq!(config.default_filter, FilterId::SepiaTone);

        let config = EditorConfig::from_toml_str("default_filter = \"CIPixellate\"").unwrap();
        assert_eq!(config.default_filter, FilterId::Pixellate);
    }

    #[test]
    fn test_unknown_filter_is_rejected() {
        let err = EditorConfig::from_toml_str("default_filter = \"colorInvert\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("colorInvert"));
    }

    #[test]
    fn test_discover() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(EditorConfig::discover(dir.path()).unwrap(), EditorConfig::default());

        let mut file = fs::File::create(dir.path().join(CONFIG_FILENAME)).unwrap();
        writeln!(file, "default_filter = \"vignette\"").unwrap();

        let config = EditorConfig::discover(dir.path()).unwrap();
        assert_eq!(config.default_filter, FilterId::Vignette);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = EditorConfig::load("/nonexistent/instafilter.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
