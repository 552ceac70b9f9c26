use crate::color::ColorScale;
use crate::error::AggregatorError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for an aggregation run.
///
/// Stored as a JSON object on disk; every field is optional:
/// ```json
/// {
///   "csv_path": "data/TrafficCounts.csv",
///   "normalize_names": true,
///   "scale": { "scale_min": 1.0, "scale_max": 500.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    pub csv_path: PathBuf,
    pub normalize_names: bool,
    pub strict_header: bool,
    pub scale: ColorScale,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("TrafficCounts.csv"),
            normalize_names: true,
            strict_header: false,
            scale: ColorScale::default(),
        }
    }
}

impl AggregatorConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AggregatorError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| AggregatorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| AggregatorError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if config.scale.scale_max < config.scale.scale_min {
            return Err(AggregatorError::Config {
                path: path.to_path_buf(),
                reason: format!(
                    "scale_max ({}) is below scale_min ({})",
                    config.scale.scale_max, config.scale.scale_min
                ),
            });
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_defaults() {
        let config = AggregatorConfig::default();
        assert_eq!(config.csv_path, PathBuf::from("TrafficCounts.csv"));
        assert!(config.normalize_names);
        assert_eq!(config.scale.scale_min, 1.0);
        assert_eq!(config.scale.scale_max, 500.0);
    }

    #[test]
    fn test_load_partial_file() {
        let path = temp_path("traffic_count_aggregator_config_partial.json");
        fs::write(&path, r#"{"normalize_names": false, "scale": {"scale_max": 900}}"#).unwrap();

        let config = AggregatorConfig::load(&path).unwrap();
        assert!(!config.normalize_names);
        assert_eq!(config.scale.scale_max, 900.0);
        assert_eq!(config.csv_path, PathBuf::from("TrafficCounts.csv"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_inverted_scale() {
        let path = temp_path("traffic_count_aggregator_config_inverted.json");
        fs::write(&path, r#"{"scale": {"scale_min": 10, "scale_max": 5}}"#).unwrap();

        let err = AggregatorConfig::load(&path).unwrap_err();
        assert!(matches!(err, AggregatorError::Config { .. }));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let err = AggregatorConfig::load(temp_path("traffic_count_aggregator_nope.json"))
            .unwrap_err();
        assert!(matches!(err, AggregatorError::Io { .. }));
    }
}
