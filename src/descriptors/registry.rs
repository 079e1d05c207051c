// src/descriptors/registry.rs
//! The functional-group catalogue.
//!
//! Every feature of the fingerprint is one [`FunctionalGroupSpec`]: a name, a
//! SMILES pattern, the [`Detector`] that counts it, and the `[min_val, max_val]`
//! range used to normalize the raw count. Bounds default to `[0, 1]`; the
//! explicit ones are the extremes seen over the training molecules.
//!
//! Some entries share a pattern on purpose. `ket` and `carbonyl` both count
//! `C(=O)`, `carbox` and `ester` are identical, and `pri_aldimine` /
//! `sec_aldimine` repeat `pri_ketamine` / `sec_ketamine`. Downstream regression
//! coefficients are keyed by name, so each of them stays.
//!
//! # Example
//!
//! ```
//! use electroprop::descriptors::registry::FunctionalGroupRegistry;
//!
//! let registry = FunctionalGroupRegistry::standard().unwrap();
//! assert_eq!(registry.len(), 88);
//! let carbon = registry.get("carbon").unwrap();
//! assert_eq!((carbon.min_val, carbon.max_val), (0.0, 46.0));
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use tracing::debug;

use super::detectors::{Detector, RingField};
use super::DescriptorError;

/// Immutable descriptor for one named feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionalGroupSpec {
    /// Unique feature name.
    pub name: &'static str,
    /// Pattern handed to the detector.
    pub pattern: &'static str,
    /// Counting algorithm.
    pub detector: Detector,
    /// Raw count mapped to -2.
    pub min_val: f64,
    /// Raw count mapped to +2.
    pub max_val: f64,
}

impl FunctionalGroupSpec {
    /// A spec with the default `[0, 1]` range.
    pub const fn new(name: &'static str, pattern: &'static str, detector: Detector) -> Self {
        Self {
            name,
            pattern,
            detector,
            min_val: 0.0,
            max_val: 1.0,
        }
    }

    /// Replace the normalization range.
    pub const fn range(mut self, min_val: f64, max_val: f64) -> Self {
        self.min_val = min_val;
        self.max_val = max_val;
        self
    }

    /// Raw count of this feature in `smiles`.
    pub fn count(&self, smiles: &str) -> f64 {
        self.detector.count(self.pattern, smiles)
    }

    fn validate(&self) -> Result<(), DescriptorError> {
        let finite = self.min_val.is_finite() && self.max_val.is_finite();
        if finite && self.max_val > self.min_val {
            Ok(())
        } else {
            Err(DescriptorError::DegenerateRange {
                name: self.name.to_string(),
                min_val: self.min_val,
                max_val: self.max_val,
            })
        }
    }
}

const fn sub(name: &'static str, pattern: &'static str) -> FunctionalGroupSpec {
    FunctionalGroupSpec::new(name, pattern, Detector::Substring)
}

const fn ring(name: &'static str, field: RingField) -> FunctionalGroupSpec {
    FunctionalGroupSpec::new(name, field.key(), Detector::RingType(field))
}

const fn terminal(name: &'static str, atom: char, pattern: &'static str) -> FunctionalGroupSpec {
    FunctionalGroupSpec::new(name, pattern, Detector::TerminalAtom(atom))
}

/// The standard 88-feature catalogue, in fingerprint order.
pub const STANDARD_FUNCTIONAL_GROUPS: &[FunctionalGroupSpec] = &[
    sub("carbon", "C").range(0.0, 46.0),
    sub("oxygen", "O").range(0.0, 21.0),
    sub("nitro", "N").range(0.0, 15.0),
    sub("dbond", "=").range(0.0, 24.0),
    sub("tbond", "#").range(0.0, 4.0),
    sub("metals", "[").range(0.0, 15.0),
    sub("branch", "(").range(0.0, 23.0),
    FunctionalGroupSpec::new("rings", r"\d+", Detector::RingCount),
    sub("cdb", "C="),
    sub("cdbcc", "C=CC").range(0.0, 6.0),
    sub("cdbccdbcc", "C=CC=CC").range(0.0, 2.0),
    sub("cdbccdbccdbcc", "C=CC=CC=CC"),
    sub("co", "CO"),
    sub("cn", "CN").range(0.0, 8.0),
    sub("cno", "CNO"),
    sub("cc", "CC"),
    sub("coo", "COO").range(0.0, 5.0),
    sub("ccc", "CCC"),
    sub("cccc", "CCCC"),
    sub("dbo", "=O").range(0.0, 9.0),
    sub("ndbo", "N=O").range(0.0, 3.0),
    sub("sulphur", "S").range(0.0, 9.0),
    sub("fluorine", "F").range(0.0, 23.0),
    sub("chlorine", "Cl").range(0.0, 12.0),
    sub("alkene", "C=C").range(0.0, 14.0),
    sub("alkyne", "C#C").range(0.0, 4.0),
    sub("ether", "COC"),
    sub("alde", "CC=O"),
    sub("ket", "C(=O)").range(0.0, 8.0),
    sub("carbox", "C(=O)O").range(0.0, 6.0),
    sub("anhy", "CC(=O)OC(=O)C"),
    sub("ester", "C(=O)O"),
    sub("amide", "C(=O)N").range(0.0, 6.0),
    sub("nitrile", "C#N").range(0.0, 4.0),
    sub("imine", "CC(=NC)C"),
    sub("isocyanate", "N=C=O").range(0.0, 3.0),
    sub("azo", "N=N").range(0.0, 3.0),
    sub("thiol", "CS").range(0.0, 8.0),
    sub("achalide_f", "CC(=O)F"),
    sub("achalide_cl", "CC(=O)Cl"),
    sub("achalide_br", "CC(=O)Br"),
    sub("achalide_i", "CC(=O)I"),
    sub("achalide_at", "CC(=O)At"),
    sub("plus", "+"),
    sub("minus", "-"),
    sub("br", "Br").range(0.0, 15.0),
    sub("p", "P"),
    sub("at", "@"),
    sub("np", "N+").range(0.0, 6.0),
    sub("nm", "N-"),
    sub("om", "O-").range(0.0, 6.0),
    sub("branch_dbo", "(=O)").range(0.0, 8.0),
    sub("branch_dbc", "(=C").range(0.0, 8.0),
    sub("carb_ester", "OC(=O)OC"),
    sub("sec_amine", "CNC"),
    sub("tert_amine", "CN(C").range(0.0, 5.0),
    sub("pri_ketamine", "C(=N").range(0.0, 6.0),
    sub("sec_ketamine", "C(=NC"),
    sub("pri_aldimine", "C(=N"),
    sub("sec_aldimine", "C(=NC"),
    sub("imide", "C(=O)NC(=O)"),
    sub("azide", "N=[N+]=[N-]").range(0.0, 3.0),
    sub("cyanate", "OC#N"),
    sub("nitrate", "O[N+](=O)[O-]"),
    sub("nitrite", "ON=O"),
    sub("disulphide", "SS").range(0.0, 4.0),
    sub("sulfinyl", "SO"),
    sub("sulfo", "S(=O)(=O)O"),
    sub("sulfonyl", "S(=O)(=O)"),
    sub("thiocynate", "SC#N"),
    sub("isothiocynate", "N=C=S"),
    sub("phosphono", "P(=O)(O)").range(0.0, 5.0),
    sub("phosphate", "OP(=O)(O)"),
    sub("thial", "C(=S").range(0.0, 2.0),
    terminal("endo", 'O', "O)").range(0.0, 15.0),
    terminal("endc", 'C', "C)").range(0.0, 20.0),
    terminal("endn", 'N', "N)").range(0.0, 6.0),
    FunctionalGroupSpec::new("haloformyl", "X", Detector::Haloformyl),
    sub("carbonyl", "C(=O)"),
    sub("isonitrile", "N#C"),
    ring("benz", RingField::Benzene).range(0.0, 7.0),
    ring("penz", RingField::Pyrazine),
    ring("epox", RingField::Epoxide),
    ring("pentn", RingField::Pentn).range(0.0, 4.0),
    ring("pentnp", RingField::Pentnp),
    ring("pyrid", RingField::Pyridine).range(0.0, 4.0),
    ring("pyrid2", RingField::Pyridine2).range(0.0, 4.0),
    ring("maxringlength", RingField::MaxRingLength).range(0.0, 91.0),
];

static STANDARD: LazyLock<Result<FunctionalGroupRegistry, DescriptorError>> = LazyLock::new(|| {
    let registry = FunctionalGroupRegistry::new(STANDARD_FUNCTIONAL_GROUPS.to_vec());
    if let Ok(registry) = &registry {
        debug!(features = registry.len(), "built standard functional-group registry");
    }
    registry
});

/// A validated, read-only set of feature specs.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionalGroupRegistry {
    specs: Vec<FunctionalGroupSpec>,
}

impl FunctionalGroupRegistry {
    /// Validate and wrap `specs`.
    ///
    /// # Errors
    ///
    /// `DegenerateRange` if any spec has `max_val <= min_val` or a non-finite
    /// bound, `DuplicateFeature` if two specs share a name.
    pub fn new(specs: Vec<FunctionalGroupSpec>) -> Result<Self, DescriptorError> {
        let mut seen = HashSet::with_capacity(specs.len());
        for spec in &specs {
            spec.validate()?;
            if !seen.insert(spec.name) {
                return Err(DescriptorError::DuplicateFeature(spec.name.to_string()));
            }
        }
        Ok(Self { specs })
    }

    /// The process-wide standard catalogue, built on first use.
    pub fn standard() -> Result<&'static Self, DescriptorError> {
        STANDARD.as_ref().map_err(Clone::clone)
    }

    /// Iterate the specs in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &FunctionalGroupSpec> {
        self.specs.iter()
    }

    /// Spec with the given name.
    pub fn get(&self, name: &str) -> Option<&FunctionalGroupSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// `true` when the registry holds no features.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl<'a> IntoIterator for &'a FunctionalGroupRegistry {
    type Item = &'a FunctionalGroupSpec;
    type IntoIter = std::slice::Iter<'a, FunctionalGroupSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_builds() {
        let registry = FunctionalGroupRegistry::standard().expect("standard registry");
        assert_eq!(registry.len(), 88);
        assert!(!registry.is_empty());
    }

    #[test]
    fn default_range_is_unit() {
        let registry = FunctionalGroupRegistry::standard().unwrap();
        let rings = registry.get("rings").unwrap();
        assert_eq!(rings.detector, Detector::RingCount);
        assert_eq!((rings.min_val, rings.max_val), (0.0, 1.0));
    }

    #[test]
    fn redundant_entries_are_kept() {
        let registry = FunctionalGroupRegistry::standard().unwrap();
        let pattern = |name| registry.get(name).unwrap().pattern;
        assert_eq!(pattern("ket"), pattern("carbonyl"));
        assert_eq!(pattern("carbox"), pattern("ester"));
        assert_eq!(pattern("pri_ketamine"), pattern("pri_aldimine"));
        assert_eq!(pattern("sec_ketamine"), pattern("sec_aldimine"));
        // same pattern, different bounds
        assert_eq!(registry.get("ket").unwrap().max_val, 8.0);
        assert_eq!(registry.get("carbonyl").unwrap().max_val, 1.0);
    }

    #[test]
    fn ring_entries_use_their_field_keys() {
        let registry = FunctionalGroupRegistry::standard().unwrap();
        let benz = registry.get("benz").unwrap();
        assert_eq!(benz.pattern, "bz");
        assert_eq!(benz.detector, Detector::RingType(RingField::Benzene));
        assert_eq!(registry.get("maxringlength").unwrap().max_val, 91.0);
    }

    #[test]
    fn degenerate_range_is_rejected() {
        let specs = vec![sub("carbon", "C"), sub("flat", "O").range(3.0, 3.0)];
        let err = FunctionalGroupRegistry::new(specs).unwrap_err();
        assert_eq!(
            err,
            DescriptorError::DegenerateRange {
                name: "flat".into(),
                min_val: 3.0,
                max_val: 3.0
            }
        );

        let inverted = vec![sub("inverted", "O").range(2.0, 1.0)];
        assert!(FunctionalGroupRegistry::new(inverted).is_err());

        let infinite = vec![sub("infinite", "O").range(0.0, f64::INFINITY)];
        assert!(FunctionalGroupRegistry::new(infinite).is_err());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let specs = vec![sub("carbon", "C"), sub("carbon", "c")];
        assert_eq!(
            FunctionalGroupRegistry::new(specs).unwrap_err(),
            DescriptorError::DuplicateFeature("carbon".into())
        );
    }

    #[test]
    fn spec_counts_through_its_detector() {
        let registry = FunctionalGroupRegistry::standard().unwrap();
        assert_eq!(registry.get("carbon").unwrap().count("C1=CC=CC=C1"), 6.0);
        assert_eq!(registry.get("rings").unwrap().count("C1=CC=CC=C1"), 1.0);
        assert_eq!(registry.get("benz").unwrap().count("C1=CC=CC=C1"), 1.0);
        assert_eq!(registry.get("endo").unwrap().count("CCO"), 1.0);
    }
}
