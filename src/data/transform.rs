use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Scales raw 0-255 pixel intensities into `[0, 1]` in place.
pub fn normalize_pixels(features: &mut Matrix) {
    features.map(|v| v / 255.0);
}

/// Expands an `N x 1` column of class labels into an `N x num_classes`
/// indicator matrix.
///
/// A label that is negative, fractional or `>= num_classes` yields an
/// all-zero row.
pub fn one_hot_encode(labels: &Matrix, num_classes: usize) -> Matrix {
    let mut encoded = Matrix::zeros(labels.rows(), num_classes);
    for i in 0..labels.rows() {
        let Some(&label) = labels.row(i).first() else {
            continue;
        };
        if label >= 0.0 && label.fract() == 0.0 && (label as usize) < num_classes {
            encoded[(i, label as usize)] = 1.0;
        }
    }
    encoded
}

/// Splits a table into `(features, target)`, taking the last column as the
/// target.
pub fn split_features_target(data: &Matrix) -> Result<(Matrix, Matrix)> {
    if data.cols() < 2 {
        return Err(Error::InvalidConfig(format!(
            "need at least two columns to split off a target, got {}",
            data.cols()
        )));
    }
    let feature_cols = data.cols() - 1;
    let mut features = Vec::with_capacity(data.rows());
    let mut target = Vec::with_capacity(data.rows());
    for row in data.iter_rows() {
        features.push(row[..feature_cols].to_vec());
        target.push(vec![row[feature_cols]]);
    }
    Ok((Matrix::from_rows(features)?, Matrix::from_rows(target)?))
}
