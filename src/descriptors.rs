//! Functional-group fingerprints computed directly from SMILES text.
//!
//! This module holds the fingerprinting engine: a fixed catalogue of named
//! detectors ([`registry`]), the counting algorithms they dispatch to
//! ([`detectors`]), and the extraction loop that turns raw counts into a
//! normalized [`FeatureVector`](extract::FeatureVector) ([`extract`]).
//!
//! No molecular graph is built. Every detector reads the SMILES string as a
//! plain character sequence, and ring membership is recovered from paired ring
//! closure digits. Malformed input is never rejected; it simply produces
//! different counts. The only failure this module reports is a registry entry
//! whose normalization range is empty, and that is caught when the registry
//! is built, never during extraction.
use thiserror::Error;

pub mod detectors;
pub mod extract;
pub mod registry;

/// Errors returned while building a functional-group registry.
///
/// - `DegenerateRange`: an entry's `max_val` does not exceed its `min_val`,
///   which would make normalization divide by zero.
/// - `DuplicateFeature`: two entries share a name.
/// - `UnknownRingField`: a ring classification key was not recognized.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DescriptorError {
    /// The normalization range of a feature is empty or not finite.
    #[error("feature '{name}' has a degenerate normalization range [{min_val}, {max_val}]")]
    DegenerateRange {
        /// Feature name.
        name: String,
        /// Lower bound.
        min_val: f64,
        /// Upper bound.
        max_val: f64,
    },

    /// Two registry entries use the same feature name.
    #[error("duplicate feature name: {0}")]
    DuplicateFeature(String),

    /// The key does not name a ring classification.
    #[error("unknown ring classification: {0}")]
    UnknownRingField(String),
}
