// src/properties.rs
//! Orbital energies and redox potentials from a functional-group fingerprint.
//!
//! Each property is a fitted [`PropertyModel`]:
//!
//! ```text
//! y = bias + Σ_f ( c_lin·x_f + c_tanh·tanh(x_f) + c_sig·σ(x_f) )
//! ```
//!
//! evaluated on normalized features `x_f`. The output `y` lives in `[0, 1]` and
//! is mapped back to physical units with the matching [`Range`] of
//! [`PropertyLimits`].
//!
//! Prediction runs in a fixed order. LUMO comes first. HOMO is predicted as a
//! band gap added to LUMO, with LUMO available as an input feature. The redox
//! potentials are predicted last, with both orbital energies available as
//! features. A caller who already knows LUMO or HOMO can supply it through
//! [`KnownProperties`]; the known value replaces the prediction and flows into
//! the later models.
//!
//! # Example
//!
//! ```
//! use electroprop::properties::{Coefficients, KnownProperties, Predictor, PropertyModel};
//!
//! let flat = PropertyModel::constant(0.5);
//! let coefficients = Coefficients {
//!     lumo: flat.clone(),
//!     homo: flat.clone(),
//!     reduction: flat.clone(),
//!     oxidation: flat,
//! };
//! let predictor = Predictor::new(coefficients).unwrap();
//! let props = predictor.predict("C1=CC=CC=C1", KnownProperties::default()).unwrap();
//! assert!(props.homo < props.lumo);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::descriptors::extract::{extract_features, normalize, FeatureVector};
use crate::descriptors::registry::FunctionalGroupRegistry;
use crate::descriptors::DescriptorError;

/// Errors returned while predicting properties.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// The fingerprint registry could not be built.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    /// A model term refers to a feature the fingerprint does not provide.
    #[error("model '{model}' needs feature '{feature}', which the fingerprint does not provide")]
    MissingFeature {
        /// Property model name.
        model: &'static str,
        /// Missing feature name.
        feature: String,
    },

    /// Reading a coefficient or configuration file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that could not be read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A coefficient or configuration file is not valid JSON for its type.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Logistic sigmoid.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Closed interval of a physical property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Range {
    /// A new range.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Map a model output in `[0, 1]` to physical units.
    pub fn unscale(&self, scaled: f64) -> f64 {
        scaled * (self.max - self.min) + self.min
    }

    /// Map a physical value to the `[0, 1]` model output space.
    pub fn scale(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    /// Map a physical value to the `[-2, 2]` feature space.
    pub fn normalize(&self, value: f64) -> f64 {
        normalize(value, self.min, self.max)
    }
}

/// Physical bounds of every predicted quantity, in eV (energies) and V
/// (potentials).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyLimits {
    /// Oxidation potential.
    pub oxidation: Range,
    /// Reduction potential.
    pub reduction: Range,
    /// HOMO − LUMO band gap.
    pub bandgap: Range,
    /// LUMO energy.
    pub lumo: Range,
    /// HOMO energy.
    pub homo: Range,
}

impl Default for PropertyLimits {
    fn default() -> Self {
        Self {
            oxidation: Range::new(-0.485437, 3.68406),
            reduction: Range::new(-4.89283, 0.201063),
            bandgap: Range::new(-9.06482453, -1.06047362),
            lumo: Range::new(-3.91109452, 0.70178201),
            homo: Range::new(-8.495, -4.625),
        }
    }
}

/// JSON key of [`PropertyModel::bias`]; no term may use it as a feature name.
pub const BIAS_KEY: &str = "bias";

/// One fitted property: bias plus a `[linear, tanh, sigmoid]` coefficient
/// triple per feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyModel {
    /// Constant term.
    pub bias: f64,
    /// Per-feature coefficients.
    #[serde(flatten)]
    pub terms: BTreeMap<String, [f64; 3]>,
}

impl PropertyModel {
    /// A model that ignores its input.
    pub fn constant(bias: f64) -> Self {
        Self {
            bias,
            terms: BTreeMap::new(),
        }
    }

    /// Add (or replace) the coefficients of one feature.
    ///
    /// Terms share the JSON object with the bias, so a feature named
    /// [`BIAS_KEY`] is skipped.
    pub fn with_term(mut self, feature: impl Into<String>, coefficients: [f64; 3]) -> Self {
        let feature = feature.into();
        if feature == BIAS_KEY {
            warn!(feature = %feature, "reserved term name, skipped");
            return self;
        }
        self.terms.insert(feature, coefficients);
        self
    }

    /// Feature names this model reads.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// Evaluate on `features`. The result is in scaled `[0, 1]` units.
    ///
    /// # Errors
    ///
    /// `MissingFeature` if a term names a feature absent from `features`.
    pub fn evaluate(&self, model: &'static str, features: &FeatureVector) -> Result<f64, PredictionError> {
        self.terms.iter().try_fold(self.bias, |acc, (name, [lin, tanh, sig])| {
            let x = features.get(name).ok_or_else(|| PredictionError::MissingFeature {
                model,
                feature: name.clone(),
            })?;
            Ok(acc + lin * x + tanh * x.tanh() + sig * sigmoid(x))
        })
    }
}

/// The four fitted models. `homo` predicts the band gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    /// LUMO model.
    pub lumo: PropertyModel,
    /// Band gap model, added to LUMO to obtain HOMO.
    pub homo: PropertyModel,
    /// Reduction potential model.
    pub reduction: PropertyModel,
    /// Oxidation potential model.
    pub oxidation: PropertyModel,
}

impl Coefficients {
    /// Parse the JSON coefficient table.
    pub fn from_json(json: &str) -> Result<Self, PredictionError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Orbital energies or potentials the caller already knows.
///
/// `None` means "predict it".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KnownProperties {
    /// Measured LUMO, eV.
    pub lumo: Option<f64>,
    /// Measured HOMO, eV.
    pub homo: Option<f64>,
}

/// Prediction result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectronicProperties {
    /// LUMO energy, eV.
    pub lumo: f64,
    /// HOMO energy, eV.
    pub homo: f64,
    /// Reduction potential, V.
    pub reduction: f64,
    /// Oxidation potential, V.
    pub oxidation: f64,
}

/// Fingerprint registry plus fitted models.
#[derive(Debug, Clone)]
pub struct Predictor {
    registry: &'static FunctionalGroupRegistry,
    coefficients: Coefficients,
    limits: PropertyLimits,
}

impl Predictor {
    /// A predictor using the standard registry and default limits.
    pub fn new(coefficients: Coefficients) -> Result<Self, PredictionError> {
        Self::with_limits(coefficients, PropertyLimits::default())
    }

    /// A predictor using the standard registry and custom limits.
    pub fn with_limits(coefficients: Coefficients, limits: PropertyLimits) -> Result<Self, PredictionError> {
        Ok(Self {
            registry: FunctionalGroupRegistry::standard()?,
            coefficients,
            limits,
        })
    }

    /// Property limits in use.
    pub fn limits(&self) -> &PropertyLimits {
        &self.limits
    }

    /// Fitted models in use.
    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    /// Fingerprint `smiles` with this predictor's registry.
    pub fn features(&self, smiles: &str) -> FeatureVector {
        extract_features(smiles, self.registry)
    }

    /// Predict all four properties of `smiles`.
    ///
    /// # Errors
    ///
    /// `MissingFeature` if a model reads a feature the fingerprint lacks.
    pub fn predict(&self, smiles: &str, known: KnownProperties) -> Result<ElectronicProperties, PredictionError> {
        let limits = &self.limits;
        let mut features = self.features(smiles);

        let lumo = match known.lumo {
            Some(lumo) => lumo,
            None => limits.lumo.unscale(self.coefficients.lumo.evaluate("lumo", &features)?),
        };
        features.insert("lumo", limits.lumo.normalize(lumo));

        let homo = match known.homo {
            Some(homo) => homo,
            None => limits.bandgap.unscale(self.coefficients.homo.evaluate("homo", &features)?) + lumo,
        };
        features.insert("homo", limits.homo.normalize(homo));

        let reduction = limits
            .reduction
            .unscale(self.coefficients.reduction.evaluate("reduction", &features)?);
        let oxidation = limits
            .oxidation
            .unscale(self.coefficients.oxidation.evaluate("oxidation", &features)?);

        debug!(smiles, lumo, homo, reduction, oxidation, "predicted electronic properties");
        Ok(ElectronicProperties {
            lumo,
            homo,
            reduction,
            oxidation,
        })
    }
}
