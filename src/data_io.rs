//! CSV/JSON data I/O helpers.
//!
//! - SMILES datasets: a CSV file with a SMILES column and a numeric target
//!   column (measured LUMO, HOMO, or a redox potential). Rows come back as
//!   plain `Vec`s; fingerprint them with
//!   [`extract_features`](crate::descriptors::extract::extract_features) and
//!   hand them to [`crate::models`].
//! - Coefficient tables: the JSON format consumed by
//!   [`Predictor`](crate::properties::Predictor).
use std::error::Error;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::properties::{Coefficients, PredictionError};

/// Read a CSV file and extract a SMILES column and a target column.
///
/// Returns `(smiles, targets)`, both with one entry per record. Errors are
/// returned if the CSV cannot be read, a column is missing, or a target fails
/// to parse as `f64`.
///
/// ```no_run
/// use electroprop::data_io::read_csv_smiles;
/// let (smiles, lumo) = read_csv_smiles("data/pah.csv", "SMILES", "Lumo")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn read_csv_smiles<P: AsRef<Path>>(
    path: P,
    smiles_col: &str,
    target_col: &str,
) -> Result<(Vec<String>, Vec<f64>), Box<dyn Error>> {
    let rdr = csv::Reader::from_path(&path)?;
    read_records(rdr, smiles_col, target_col)
}

/// Convenience: load a SMILES dataset from a reader (useful for tests and
/// in-memory data).
pub fn read_csv_smiles_from_reader(
    reader: impl Read,
    smiles_col: &str,
    target_col: &str,
) -> Result<(Vec<String>, Vec<f64>), Box<dyn Error>> {
    read_records(csv::Reader::from_reader(reader), smiles_col, target_col)
}

fn read_records<R: Read>(
    mut rdr: csv::Reader<R>,
    smiles_col: &str,
    target_col: &str,
) -> Result<(Vec<String>, Vec<f64>), Box<dyn Error>> {
    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| format!("column '{}' not found in CSV headers", name))
    };
    let smiles_idx = column(smiles_col)?;
    let target_idx = column(target_col)?;

    let mut smiles = Vec::new();
    let mut targets = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let s = record
            .get(smiles_idx)
            .ok_or_else(|| format!("missing SMILES at index {}", smiles_idx))?;
        let t_str = record
            .get(target_idx)
            .ok_or_else(|| format!("missing target at index {}", target_idx))?;
        let t: f64 = t_str.trim().parse().map_err(|e| {
            format!(
                "failed to parse target '{}' for '{}': {}",
                t_str,
                s.trim(),
                e
            )
        })?;
        smiles.push(s.trim().to_string());
        targets.push(t);
    }

    Ok((smiles, targets))
}

/// Read a JSON coefficient table.
pub fn read_coefficients(path: impl AsRef<Path>) -> Result<Coefficients, PredictionError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| PredictionError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Coefficients::from_json(&json)
}

/// Write a coefficient table as pretty-printed JSON.
pub fn write_coefficients(path: impl AsRef<Path>, coefficients: &Coefficients) -> Result<(), PredictionError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(coefficients)?;
    fs::write(path, json).map_err(|source| PredictionError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_csv_from_reader_example() {
        let data = "SMILES,Lumo,Homo\nC1=CC=CC=C1, -0.51, -6.2\nC1=CC=C2C=CC=CC2=C1,-1.01,-5.8\n";
        let (smiles, lumo) = read_csv_smiles_from_reader(data.as_bytes(), "SMILES", "Lumo")
            .expect("read CSV");
        assert_eq!(smiles, ["C1=CC=CC=C1", "C1=CC=C2C=CC=CC2=C1"]);
        assert_eq!(lumo.len(), 2);
        assert!((lumo[0] + 0.51).abs() < 1e-9);
    }

    #[test]
    fn missing_column_is_an_error() {
        let data = "SMILES,Lumo\nCCO,-0.1\n";
        let err = read_csv_smiles_from_reader(data.as_bytes(), "SMILES", "Homo").unwrap_err();
        assert!(err.to_string().contains("Homo"));
    }

    #[test]
    fn bad_target_is_an_error() {
        let data = "SMILES,Lumo\nCCO,n/a\n";
        assert!(read_csv_smiles_from_reader(data.as_bytes(), "SMILES", "Lumo").is_err());
    }

    #[test]
    fn missing_coefficient_file_is_an_io_error() {
        let err = read_coefficients("/nonexistent/coefficients.json").unwrap_err();
        assert!(matches!(err, PredictionError::Io { .. }));
    }
}
