// src/descriptors/detectors.rs
//! Counting algorithms behind every functional-group feature.
//!
//! Each detector reads the SMILES string purely as text. Nothing here builds a
//! molecular graph, and nothing here fails: a malformed string simply yields a
//! smaller (or larger) count than a real parser would report.
//!
//! | Detector              | Counts                                                   |
//! |-----------------------|----------------------------------------------------------|
//! | `Substring`           | Non-overlapping pattern hits, minus `Cl` for `…C` tokens |
//! | `RingCount`           | Runs of ring-closure digits / 2                          |
//! | `RingType(field)`     | One field of the [`RingTypes`] classification            |
//! | `TerminalAtom(atom)`  | Final-atom flag plus closing-branch hits (`O)`, `C)` …)  |
//! | `Haloformyl`          | `C(=O)X` and `O=CX` for the five halogens                |
//!
//! # Examples
//!
//! ```
//! use electroprop::descriptors::detectors::{ring_count, substring_count, haloformyl_count};
//!
//! assert_eq!(substring_count("C", "C1=CC=CC=C1"), 6);
//! assert_eq!(substring_count("CC", "CC(Cl)Cl"), -1); // both Cl atoms are discounted
//! assert_eq!(ring_count("C1=CC=CC=C1"), 1);
//! assert_eq!(haloformyl_count("CC(=O)Cl"), 1);
//! ```

use std::fmt;
use std::str::FromStr;

use super::DescriptorError;

/// The closed set of counting algorithms a registry entry can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Detector {
    /// Plain substring count with carbon/chlorine disambiguation.
    Substring,
    /// Number of ring closures.
    RingCount,
    /// A single field of the ring-type classification.
    RingType(RingField),
    /// Chain-terminal atom counter for the given atom symbol.
    TerminalAtom(char),
    /// Acyl halide (haloformyl) counter. Ignores the pattern.
    Haloformyl,
}

impl Detector {
    /// Raw count of `pattern` in `smiles` according to this detector.
    ///
    /// `RingType` recomputes the classification on every call; callers that
    /// evaluate several ring fields for the same molecule should compute
    /// [`ring_types`] once and use [`RingTypes::field`].
    pub fn count(&self, pattern: &str, smiles: &str) -> f64 {
        match *self {
            Detector::Substring => substring_count(pattern, smiles) as f64,
            Detector::RingCount => ring_count(smiles) as f64,
            Detector::RingType(field) => ring_types(smiles).field(field),
            Detector::TerminalAtom(atom) => terminal_atom_count(atom, pattern, smiles) as f64,
            Detector::Haloformyl => haloformyl_count(smiles) as f64,
        }
    }
}

/// Count non-overlapping occurrences of `pattern`.
///
/// A pattern that ends in the carbon symbol also matches the leading `C` of
/// every chlorine, so when the pattern ends in `C` and matched at least once,
/// the number of `Cl` tokens is subtracted. The correction is applied
/// blindly and can drive the result below zero.
pub fn substring_count(pattern: &str, smiles: &str) -> i64 {
    if pattern.is_empty() {
        return 0;
    }
    let count = smiles.matches(pattern).count() as i64;
    if pattern.ends_with('C') && count > 0 {
        count - smiles.matches("Cl").count() as i64
    } else {
        count
    }
}

/// Number of ring closures: every ring bond label appears twice, so the
/// number of rings is half the number of digit runs.
///
/// Adjacent labels (`C12`, `C43`) form a single run. An odd run count
/// truncates.
pub fn ring_count(smiles: &str) -> usize {
    smiles
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .count()
        / 2
}

/// `1` if the string ends in `atom`, plus every hit of the closing-branch
/// `pattern` (`"O)"`, `"C)"`, `"N)"`).
pub fn terminal_atom_count(atom: char, pattern: &str, smiles: &str) -> usize {
    let terminal = usize::from(smiles.ends_with(atom));
    let branches = if pattern.is_empty() {
        0
    } else {
        smiles.matches(pattern).count()
    };
    terminal + branches
}

const HALOGENS: [&str; 5] = ["F", "Cl", "Br", "I", "At"];

/// Count acyl halide groups written either with an explicit carbonyl branch
/// (`C(=O)Cl`) or carbonyl-first (`O=CCl`).
///
/// A bare `COF` is a C–O–F chain, not a haloformyl, and is not counted.
pub fn haloformyl_count(smiles: &str) -> usize {
    HALOGENS
        .iter()
        .map(|x| {
            let branched = smiles.matches(&format!("C(=O){x}")).count();
            let condensed = smiles.matches(&format!("O=C{x}")).count();
            branched + condensed
        })
        .sum()
}

/// Selector for one field of [`RingTypes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingField {
    /// Benzene-like six-membered rings.
    Benzene,
    /// Pyrazine-like rings.
    Pyrazine,
    /// Epoxide-like rings.
    Epoxide,
    /// Five-membered nitrogen rings.
    Pentn,
    /// Five-membered nitrogen rings, protonated.
    Pentnp,
    /// Pyridine-like rings.
    Pyridine,
    /// Rings with two nitrogens.
    Pyridine2,
    /// Longest ring span, in characters.
    MaxRingLength,
}

impl RingField {
    /// Every field, in declaration order.
    pub const ALL: [RingField; 8] = [
        RingField::Benzene,
        RingField::Pyrazine,
        RingField::Epoxide,
        RingField::Pentn,
        RingField::Pentnp,
        RingField::Pyridine,
        RingField::Pyridine2,
        RingField::MaxRingLength,
    ];

    /// The short key this field is known by in the registry.
    pub const fn key(self) -> &'static str {
        match self {
            RingField::Benzene => "bz",
            RingField::Pyrazine => "pz",
            RingField::Epoxide => "ep",
            RingField::Pentn => "pentn",
            RingField::Pentnp => "pentnp",
            RingField::Pyridine => "pyrid",
            RingField::Pyridine2 => "pyrid2",
            RingField::MaxRingLength => "maxringlength",
        }
    }
}

impl fmt::Display for RingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RingField {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RingField::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| DescriptorError::UnknownRingField(s.to_string()))
    }
}

/// Per-molecule ring classification.
///
/// All fields are zero for acyclic molecules.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RingTypes {
    /// Rings whose span holds five `C` and three `=`.
    pub benzene: usize,
    /// Always zero: nested under the benzene test, which it contradicts.
    pub pyrazine: usize,
    /// Always zero: nested under the benzene test, which it contradicts.
    pub epoxide: usize,
    /// Not classified yet; always zero.
    pub pentn: usize,
    /// Not classified yet; always zero.
    pub pentnp: usize,
    /// Always zero: nested under the benzene test, which it contradicts.
    pub pyridine: usize,
    /// Benzene-like rings whose span also holds two `N`.
    pub pyridine2: usize,
    /// Longest ring span in characters.
    pub max_ring_length: usize,
}

impl RingTypes {
    /// Value of the selected field.
    pub fn field(&self, field: RingField) -> f64 {
        let value = match field {
            RingField::Benzene => self.benzene,
            RingField::Pyrazine => self.pyrazine,
            RingField::Epoxide => self.epoxide,
            RingField::Pentn => self.pentn,
            RingField::Pentnp => self.pentnp,
            RingField::Pyridine => self.pyridine,
            RingField::Pyridine2 => self.pyridine2,
            RingField::MaxRingLength => self.max_ring_length,
        };
        value as f64
    }

    /// Value of the field named `key`; unknown keys read as zero.
    pub fn by_key(&self, key: &str) -> f64 {
        key.parse::<RingField>()
            .map(|field| self.field(field))
            .unwrap_or(0.0)
    }
}

/// Classify every ring closure `1..=N` of `smiles`, where `N` is
/// [`ring_count`].
///
/// The span of ring `i` is the text after the first occurrence of the label
/// `i` and before its last occurrence in what follows; a label that does not
/// occur twice gives an empty span. Only character counts inside the span
/// are inspected.
pub fn ring_types(smiles: &str) -> RingTypes {
    let rings = ring_count(smiles);
    let mut types = RingTypes::default();
    if rings == 0 {
        return types;
    }

    for label in 1..=rings {
        let span = ring_span(smiles, &label.to_string());
        types.max_ring_length = types.max_ring_length.max(span.chars().count());

        let carbons = span.matches('C').count();
        let double_bonds = span.matches('=').count();
        let oxygens = span.matches('O').count();
        let nitrogens = span.matches('N').count();

        if carbons == 5 && double_bonds == 3 {
            types.benzene += 1;
            // The three tests below contradict the enclosing one and never
            // fire. They stay so that fitted coefficients keep their meaning.
            if carbons == 4 && double_bonds == 0 {
                types.pyrazine += 1;
            }
            if carbons == 1 && oxygens == 1 {
                types.epoxide += 1;
            }
            if carbons == 4 && nitrogens == 1 && double_bonds == 3 {
                types.pyridine += 1;
            }
            if nitrogens == 2 {
                types.pyridine2 += 1;
            }
        }
    }

    types
}

fn ring_span<'a>(smiles: &'a str, label: &str) -> &'a str {
    let Some((_, rest)) = smiles.split_once(label) else {
        return "";
    };
    rest.rsplit_once(label).map_or("", |(span, _)| span)
}
