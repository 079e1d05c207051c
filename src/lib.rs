#![warn(missing_docs)]
//! electroprop — orbital energies and redox potentials of organic molecules
//! from SMILES.
//!
//! The crate works in two stages:
//!
//! - **descriptors** — a functional-group fingerprint computed directly from
//!   the SMILES text (no molecular graph, no RDKit/OpenBabel)
//!   - 88 named detectors: substring patterns with C/Cl disambiguation, ring
//!     closures, ring classes, chain-terminal atoms, haloformyl groups
//!   - every raw count rescaled onto `[-2, 2]` with fixed per-feature bounds
//! - **properties** — small fitted regressions (bias + linear/tanh/sigmoid
//!   terms per feature) mapping the fingerprint to LUMO, HOMO, reduction and
//!   oxidation potentials
//!
//! Around them sit **data_io** (CSV datasets, JSON coefficient tables),
//! **config** (predictor configuration) and **models** (refitting coefficients
//! with `linfa`).
//!
//! # Quick examples
//!
//! ### Fingerprint a molecule
//! ```
//! use electroprop::fingerprint;
//!
//! let features = fingerprint("C1=CC=CC=C1").unwrap();  // benzene
//! assert_eq!(features["rings"], 2.0);
//! assert!((features["carbon"] + 1.478).abs() < 1e-3);
//! ```
//!
//! ### Predict properties
//! ```no_run
//! use electroprop::{KnownProperties, PredictorConfig};
//!
//! let predictor = PredictorConfig::from_path("electroprop.json")?.build()?;
//! let props = predictor.predict("C1=CC=CC=C1", KnownProperties::default())?;
//! println!("LUMO {:.3} eV, HOMO {:.3} eV", props.lumo, props.homo);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod data_io;
pub mod descriptors;
pub mod models;
pub mod properties;

pub use config::PredictorConfig;
pub use descriptors::extract::{extract_features, fingerprint, normalize, FeatureVector};
pub use descriptors::registry::{FunctionalGroupRegistry, FunctionalGroupSpec};
pub use descriptors::DescriptorError;
pub use properties::{
    Coefficients, ElectronicProperties, KnownProperties, PredictionError, Predictor, PropertyLimits,
    PropertyModel,
};
