//! Fitting property models with Linfa.
//!
//! This module contains:
//! - `to_ndarrays` — convert `Vec<Vec<f64>>` and `Vec<f64>` into `ndarray::Array2<f64>` and `ndarray::Array1<f64>`.
//! - `design_matrix` — expand fingerprints into the `[x, tanh x, σ(x)]` basis used by
//!   [`PropertyModel`].
//! - `fit_property_model` — ordinary least squares (`linfa_linear::LinearRegression`) over that
//!   basis, returned as a ready-to-use `PropertyModel`.
//!
//! Targets must already be in the scaled `[0, 1]` space; use
//! [`Range::scale`](crate::properties::Range::scale) on measured values.

use std::error::Error;

use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};
use tracing::debug;

use crate::descriptors::extract::FeatureVector;
use crate::properties::{sigmoid, PropertyModel, BIAS_KEY};

/// Convert row vectors and targets into ndarray arrays suitable for Linfa.
///
/// - `rows` is a Vec of samples, each sample is a Vec of columns (n_samples x n_columns).
/// - `targets` is a Vec of target values (length n_samples).
pub fn to_ndarrays(
    rows: Vec<Vec<f64>>,
    targets: Vec<f64>,
) -> Result<(Array2<f64>, Array1<f64>), Box<dyn Error>> {
    let n_samples = rows.len();
    if n_samples == 0 {
        return Err("no samples".into());
    }
    let n_columns = rows[0].len();

    let mut flat: Vec<f64> = Vec::with_capacity(n_samples * n_columns);
    for row in &rows {
        if row.len() != n_columns {
            return Err("inconsistent row lengths".into());
        }
        flat.extend_from_slice(row);
    }

    let x = Array2::from_shape_vec((n_samples, n_columns), flat)
        .map_err(|e| format!("failed to construct Array2: {}", e))?;

    let y = Array1::from_vec(targets);
    if y.len() != n_samples {
        return Err("targets length does not match number of rows".into());
    }

    Ok((x, y))
}

/// Expand each named feature into three columns: `x`, `tanh(x)`, `σ(x)`.
///
/// Column `3·i + k` holds basis function `k` of `names[i]`.
pub fn design_matrix(features: &[FeatureVector], names: &[&str]) -> Result<Vec<Vec<f64>>, Box<dyn Error>> {
    features
        .iter()
        .map(|fv| {
            names
                .iter()
                .map(|&name| -> Result<[f64; 3], Box<dyn Error>> {
                    let x = fv
                        .get(name)
                        .ok_or_else(|| format!("feature '{}' missing from fingerprint", name))?;
                    Ok([x, x.tanh(), sigmoid(x)])
                })
                .collect::<Result<Vec<_>, _>>()
                .map(|triples| triples.concat())
        })
        .collect()
}

/// Fit a [`PropertyModel`] on the named features by least squares.
///
/// The intercept becomes the bias; the parameters are split into one
/// `[linear, tanh, sigmoid]` triple per name. A name equal to the reserved
/// `"bias"` key is an error.
pub fn fit_property_model(
    features: &[FeatureVector],
    targets: &[f64],
    names: &[&str],
) -> Result<PropertyModel, Box<dyn Error>> {
    if names.contains(&BIAS_KEY) {
        return Err(format!("'{}' is reserved for the intercept", BIAS_KEY).into());
    }
    let rows = design_matrix(features, names)?;
    let (x, y) = to_ndarrays(rows, targets.to_vec())?;
    let dataset = Dataset::new(x, y);

    let fitted = LinearRegression::default().fit(&dataset)?;
    let params = fitted.params();

    let mut model = PropertyModel::constant(fitted.intercept());
    for (i, &name) in names.iter().enumerate() {
        model = model.with_term(name, [params[3 * i], params[3 * i + 1], params[3 * i + 2]]);
    }

    debug!(samples = targets.len(), terms = names.len(), "fitted property model");
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(pairs: &[(&str, f64)]) -> FeatureVector {
        pairs.iter().map(|&(name, value)| (name.to_string(), value)).collect()
    }

    #[test]
    fn conversion_checks_shapes() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let tgt = vec![3.0, 7.0];
        let (x, y) = to_ndarrays(rows, tgt).unwrap();
        assert_eq!(x.shape(), &[2, 2]);
        assert_eq!(y.len(), 2);

        assert!(to_ndarrays(vec![vec![1.0], vec![1.0, 2.0]], vec![0.0, 0.0]).is_err());
        assert!(to_ndarrays(vec![vec![1.0]], vec![0.0, 0.0]).is_err());
        assert!(to_ndarrays(vec![], vec![]).is_err());
    }

    #[test]
    fn design_matrix_expands_each_feature() {
        let fv = vector(&[("carbon", 0.0), ("rings", 1.0)]);
        let rows = design_matrix(&[fv], &["rings", "carbon"]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 6);
        assert_eq!(rows[0][0], 1.0);
        assert!((rows[0][1] - 1.0_f64.tanh()).abs() < 1e-12);
        assert_eq!(&rows[0][3..], &[0.0, 0.0, 0.5]);
    }

    #[test]
    fn design_matrix_reports_missing_features() {
        let fv = vector(&[("carbon", 0.0)]);
        assert!(design_matrix(&[fv], &["rings"]).is_err());
    }

    #[test]
    fn fit_rejects_the_bias_name() {
        let fv = vector(&[("bias", 1.0)]);
        assert!(fit_property_model(&[fv], &[0.5], &["bias"]).is_err());
    }

    #[test]
    fn fit_reproduces_synthetic_targets() {
        let truth = PropertyModel::constant(0.3)
            .with_term("carbon", [0.05, 0.1, 0.2])
            .with_term("rings", [-0.02, 0.0, 0.15]);

        let mut features = Vec::new();
        for i in 0..9 {
            for j in 0..5 {
                let carbon = -2.0 + 0.5 * i as f64;
                let rings = -2.0 + 1.0 * j as f64;
                features.push(vector(&[("carbon", carbon), ("rings", rings)]));
            }
        }
        let targets: Vec<f64> = features
            .iter()
            .map(|fv| truth.evaluate("synthetic", fv).unwrap())
            .collect();

        let fitted = fit_property_model(&features, &targets, &["carbon", "rings"]).unwrap();
        assert_eq!(fitted.terms.len(), 2);
        for (fv, &target) in features.iter().zip(&targets) {
            let predicted = fitted.evaluate("synthetic", fv).unwrap();
            assert!(
                (predicted - target).abs() < 1e-4,
                "prediction {} far from target {}",
                predicted,
                target
            );
        }
    }
}
