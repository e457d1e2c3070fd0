use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Per-column standardisation to zero mean and unit variance.
///
/// Uses the population standard deviation. Constant columns get a
/// standard deviation of 1 so they map to 0 instead of NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
    fitted: bool,
}

impl StandardScaler {
    pub fn new() -> StandardScaler {
        StandardScaler::default()
    }

    /// Learns column statistics from `data`. An empty matrix leaves the
    /// scaler unchanged.
    pub fn fit(&mut self, data: &Matrix) {
        let rows = data.rows();
        if rows == 0 {
            return;
        }
        let n = rows as f64;

        let mut mean = vec![0.0; data.cols()];
        for row in data.iter_rows() {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut std = vec![0.0; data.cols()];
        for row in data.iter_rows() {
            for ((s, v), m) in std.iter_mut().zip(row).zip(&mean) {
                *s += (v - m).powi(2);
            }
        }
        for s in std.iter_mut() {
            *s = (*s / n).sqrt();
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        self.mean = mean;
        self.std = std;
        self.fitted = true;
    }

    pub fn transform(&self, data: &Matrix) -> Result<Matrix> {
        if !self.fitted {
            return Err(Error::InvalidConfig("StandardScaler::transform called before fit".into()));
        }
        if data.cols() != self.mean.len() {
            return Err(Error::ShapeMismatch {
                op: "scaler transform",
                left: data.shape(),
                right: (1, self.mean.len()),
            });
        }
        let mut scaled = data.clone();
        for r in 0..scaled.rows() {
            for ((v, m), s) in scaled.row_mut(r).iter_mut().zip(&self.mean).zip(&self.std) {
                *v = (*v - m) / s;
            }
        }
        Ok(scaled)
    }

    pub fn fit_transform(&mut self, data: &Matrix) -> Result<Matrix> {
        self.fit(data);
        self.transform(data)
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn std(&self) -> &[f64] {
        &self.std
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }
}
