// src/descriptors/extract.rs
//! Feature extraction: raw detector counts, affinely rescaled.
//!
//! Every registry entry contributes one value,
//!
//! ```text
//! normalized = -2 + 4 / (max_val - min_val) * (raw - min_val)
//! ```
//!
//! so `min_val` lands on -2 and `max_val` on +2. Counts outside the range are
//! extrapolated, not clamped.
//!
//! # Example
//!
//! ```
//! use electroprop::descriptors::extract::fingerprint;
//! use approx::assert_relative_eq;
//!
//! let benzene = fingerprint("C1=CC=CC=C1").unwrap();
//! assert_relative_eq!(benzene["rings"], 2.0);
//! assert_relative_eq!(benzene["carbon"], -2.0 + 4.0 / 46.0 * 6.0);
//! ```

use std::collections::btree_map::{self, BTreeMap};
use std::ops::Index;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::detectors::{ring_types, Detector, RingTypes};
use super::registry::FunctionalGroupRegistry;
use super::DescriptorError;

/// Normalized feature values keyed by feature name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: BTreeMap<String, f64>,
}

impl FeatureVector {
    /// An empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the named feature.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Set a feature, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(name.into(), value)
    }

    /// `true` if the named feature is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when no features are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl Index<&str> for FeatureVector {
    type Output = f64;

    fn index(&self, name: &str) -> &f64 {
        match self.values.get(name) {
            Some(value) => value,
            None => panic!("no feature named '{name}'"),
        }
    }
}

impl IntoIterator for FeatureVector {
    type Item = (String, f64);
    type IntoIter = btree_map::IntoIter<String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl FromIterator<(String, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Map `raw` from `[min_val, max_val]` onto `[-2, 2]`.
pub fn normalize(raw: f64, min_val: f64, max_val: f64) -> f64 {
    -2.0 + (4.0 / (max_val - min_val)) * (raw - min_val)
}

/// Evaluate every feature of `registry` on `smiles`.
///
/// The ring classification is computed at most once and shared by all
/// ring-type features.
pub fn extract_features(smiles: &str, registry: &FunctionalGroupRegistry) -> FeatureVector {
    let mut rings: Option<RingTypes> = None;
    let mut features = FeatureVector::new();

    for spec in registry {
        let raw = match spec.detector {
            Detector::RingType(field) => rings.get_or_insert_with(|| ring_types(smiles)).field(field),
            detector => detector.count(spec.pattern, smiles),
        };
        features.insert(spec.name, normalize(raw, spec.min_val, spec.max_val));
    }

    trace!(smiles, features = features.len(), "extracted fingerprint");
    features
}

/// Fingerprint `smiles` with the standard registry.
///
/// # Errors
///
/// Only if the standard registry failed to build.
pub fn fingerprint(smiles: &str) -> Result<FeatureVector, DescriptorError> {
    let registry = FunctionalGroupRegistry::standard()?;
    Ok(extract_features(smiles, registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::detectors::RingField;
    use crate::descriptors::registry::FunctionalGroupSpec;
    use approx::assert_relative_eq;

    const BENZENE: &str = "C1=CC=CC=C1";

    #[test]
    fn normalize_maps_bounds_to_plus_minus_two() {
        assert_relative_eq!(normalize(0.0, 0.0, 46.0), -2.0);
        assert_relative_eq!(normalize(46.0, 0.0, 46.0), 2.0);
        assert_relative_eq!(normalize(23.0, 0.0, 46.0), 0.0);
        // no clamping
        assert_relative_eq!(normalize(2.0, 0.0, 1.0), 6.0);
        assert_relative_eq!(normalize(-1.0, 0.0, 1.0), -6.0);
    }

    #[test]
    fn benzene_fingerprint() {
        let features = fingerprint(BENZENE).unwrap();
        assert_eq!(features.len(), 88);
        assert_relative_eq!(features["rings"], 2.0);
        assert_relative_eq!(features["carbon"], -1.478, epsilon = 1e-3);
        assert_relative_eq!(features["dbond"], -2.0 + 4.0 / 24.0 * 3.0);
        assert_relative_eq!(features["benz"], -2.0 + 4.0 / 7.0);
        assert_relative_eq!(features["maxringlength"], -2.0 + 4.0 / 91.0 * 8.0);
        // no oxygen, no haloformyl
        assert_relative_eq!(features["oxygen"], -2.0);
        assert_relative_eq!(features["haloformyl"], -2.0);
    }

    #[test]
    fn every_registry_feature_is_present() {
        let registry = FunctionalGroupRegistry::standard().unwrap();
        let features = extract_features("CC(=O)OC1=CC=CC=C1C(=O)O", registry);
        for spec in registry {
            assert!(features.contains(spec.name), "missing {}", spec.name);
        }
        assert_eq!(features.len(), registry.len());
    }

    #[test]
    fn redundant_features_agree() {
        let features = fingerprint("CCC(=O)OCC").unwrap();
        // carbox has a [0, 6] range, ester the default [0, 1]
        assert_relative_eq!(features["carbox"], -2.0 + 4.0 / 6.0);
        assert_relative_eq!(features["ester"], 2.0);
        assert_eq!(features["sec_ketamine"], features["sec_aldimine"]);
    }

    #[test]
    fn empty_smiles_is_type_stable() {
        let features = fingerprint("").unwrap();
        assert_eq!(features.len(), 88);
        assert!(features.iter().all(|(_, value)| value.is_finite()));
        assert_relative_eq!(features["rings"], -2.0);
        assert_relative_eq!(features["endc"], -2.0);
    }

    #[test]
    fn extraction_is_deterministic() {
        let registry = FunctionalGroupRegistry::standard().unwrap();
        let a = extract_features("CN1C=NC2=C1C(=O)N(C(=O)N2C)C", registry);
        let b = extract_features("CN1C=NC2=C1C(=O)N(C(=O)N2C)C", registry);
        assert_eq!(a, b);
    }

    #[test]
    fn custom_registry_is_honoured() {
        let registry = FunctionalGroupRegistry::new(vec![
            FunctionalGroupSpec::new("c", "C", Detector::Substring).range(0.0, 4.0),
            FunctionalGroupSpec::new("bz", "bz", Detector::RingType(RingField::Benzene)),
        ])
        .unwrap();
        let features = extract_features(BENZENE, &registry);
        assert_eq!(features.len(), 2);
        assert_relative_eq!(features["c"], 4.0);
        assert_relative_eq!(features["bz"], 2.0);
    }

    #[test]
    fn feature_vector_serializes_as_a_flat_map() {
        let mut features = FeatureVector::new();
        features.insert("rings", 2.0);
        features.insert("carbon", -1.5);
        let json = serde_json::to_string(&features).unwrap();
        assert_eq!(json, r#"{"carbon":-1.5,"rings":2.0}"#);
        let back: FeatureVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, features);
    }
}
