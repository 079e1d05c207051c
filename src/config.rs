//! Predictor configuration.
//!
//! A small JSON document naming the coefficient table and, optionally,
//! overriding the physical property limits:
//!
//! ```json
//! {
//!   "coefficients": "coefficients.json",
//!   "limits": { "lumo": { "min": -3.91109452, "max": 0.70178201 } }
//! }
//! ```
//!
//! Relative coefficient paths are resolved against the directory holding the
//! configuration file. Limits not mentioned keep their defaults.
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data_io::read_coefficients;
use crate::properties::{PredictionError, Predictor, PropertyLimits};

/// Where to find fitted coefficients, and which limits to scale them with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Path of the JSON coefficient table.
    pub coefficients: PathBuf,
    /// Property limits; defaults when omitted.
    #[serde(default)]
    pub limits: PropertyLimits,
}

impl PredictorConfig {
    /// Config pointing at `coefficients` with default limits.
    pub fn new(coefficients: impl Into<PathBuf>) -> Self {
        Self {
            coefficients: coefficients.into(),
            limits: PropertyLimits::default(),
        }
    }

    /// Parse a configuration document.
    pub fn from_json(json: &str) -> Result<Self, PredictionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration file, resolving a relative coefficient path
    /// against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PredictionError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| PredictionError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_json(&json)?;
        if config.coefficients.is_relative() {
            if let Some(dir) = path.parent() {
                config.coefficients = dir.join(&config.coefficients);
            }
        }
        debug!(config = %path.display(), coefficients = %config.coefficients.display(), "loaded predictor config");
        Ok(config)
    }

    /// Load the coefficients and build a [`Predictor`].
    pub fn build(&self) -> Result<Predictor, PredictionError> {
        let coefficients = read_coefficients(&self.coefficients)?;
        Predictor::with_limits(coefficients, self.limits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::Range;

    #[test]
    fn limits_default_when_omitted() {
        let config = PredictorConfig::from_json(r#"{"coefficients": "c.json"}"#).unwrap();
        assert_eq!(config, PredictorConfig::new("c.json"));
    }

    #[test]
    fn partial_limits_keep_other_defaults() {
        let json = r#"{"coefficients": "c.json", "limits": {"homo": {"min": -9.0, "max": -4.0}}}"#;
        let config = PredictorConfig::from_json(json).unwrap();
        assert_eq!(config.limits.homo, Range::new(-9.0, -4.0));
        assert_eq!(config.limits.lumo, PropertyLimits::default().lumo);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = PredictorConfig::from_path("/nonexistent/electroprop.json").unwrap_err();
        assert!(matches!(err, PredictionError::Io { .. }));
    }
}
