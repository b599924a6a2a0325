use std::fs;
use std::path::{Path, PathBuf};

use foundation::LatLon;
use layers::DeclutterConfig;
use scene::{NormalizeConfig, Normalizer, OverrideError};
use serde::{Deserialize, Serialize};

use crate::camera::{FitOptions, InitialView};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    Override(#[from] OverrideError),
}

/// Viewer tunables. Every field has a default, so a partial JSON object is a
/// valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub declutter_padding_px: f64,
    pub fit_padding_ratio: f64,
    pub fit_max_zoom: f64,
    pub select_min_zoom: f64,
    pub animation_duration_s: f64,
    /// `[lat, lon]` shown before any data arrives.
    pub initial_center: [f64; 2],
    pub initial_zoom: f64,
    pub normalize: NormalizeConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            declutter_padding_px: 4.0,
            fit_padding_ratio: 0.2,
            fit_max_zoom: 13.0,
            select_min_zoom: 12.0,
            animation_duration_s: 0.6,
            initial_center: [35.2, 129.1],
            initial_zoom: 5.0,
            normalize: NormalizeConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(payload)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&payload)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("declutter_padding_px", self.declutter_padding_px),
            ("fit_padding_ratio", self.fit_padding_ratio),
            ("fit_max_zoom", self.fit_max_zoom),
            ("select_min_zoom", self.select_min_zoom),
            ("animation_duration_s", self.animation_duration_s),
            ("initial_zoom", self.initial_zoom),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        if !LatLon::new(self.initial_center[0], self.initial_center[1]).is_finite() {
            return Err(ConfigError::Invalid("initial_center must be finite".into()));
        }
        if self.normalize.uncategorized_label.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "normalize.uncategorized_label must not be blank".into(),
            ));
        }
        Ok(())
    }

    pub fn normalizer(&self) -> Result<Normalizer, ConfigError> {
        Ok(Normalizer::new(self.normalize.clone())?)
    }

    pub fn declutter(&self) -> DeclutterConfig {
        DeclutterConfig {
            padding_px: self.declutter_padding_px,
        }
    }

    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            animate: true,
            duration_s: self.animation_duration_s,
            max_zoom: self.fit_max_zoom,
        }
    }

    pub fn initial_view(&self) -> InitialView {
        InitialView {
            center: LatLon::new(self.initial_center[0], self.initial_center[1]),
            zoom: self.initial_zoom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json_str(r#"{ "fit_max_zoom": 15 }"#).unwrap();
        assert_eq!(config.fit_max_zoom, 15.0);
        assert_eq!(config.declutter_padding_px, 4.0);
        assert_eq!(config.normalize.uncategorized_label, "미분류");
        assert_eq!(config.initial_view().zoom, 5.0);
    }

    #[test]
    fn rejects_bad_values() {
        let err = ViewerConfig::from_json_str(r#"{ "declutter_padding_px": -1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("declutter_padding_px"));

        let err = ViewerConfig::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn bad_override_pattern_surfaces_at_normalizer_build() {
        let config = ViewerConfig::from_json_str(
            r#"{ "normalize": { "video_overrides": [ { "keyword": "(", "url": "https://youtu.be/x" } ] } }"#,
        )
        .unwrap();
        assert!(matches!(
            config.normalizer().unwrap_err(),
            ConfigError::Override(OverrideError::BadKeyword { index: 0, .. })
        ));
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "initial_center": [37.5, 127.0] }}"#).unwrap();
        let config = ViewerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.initial_view().center, LatLon::new(37.5, 127.0));

        let missing = ViewerConfig::from_json_file(file.path().with_extension("nope"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
