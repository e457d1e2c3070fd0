//! Evaluation helpers for classifier output. Nothing here participates in
//! backpropagation.

use std::fmt;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Per-row argmax of `y_pred` as an `N x 1` column of class indices.
pub fn predictions(y_pred: &Matrix) -> Matrix {
    let mut out = Matrix::zeros(y_pred.rows(), 1);
    for i in 0..y_pred.rows() {
        if let Some(idx) = y_pred.argmax_row(i) {
            out[(i, 0)] = idx as f64;
        }
    }
    out
}

/// Fraction of rows whose argmax equals the raw label in `y_true_raw`.
///
/// Returns 0.0 for an empty batch.
pub fn accuracy(y_pred: &Matrix, y_true_raw: &Matrix) -> Result<f64> {
    ensure_rows(y_pred, y_true_raw)?;
    if y_pred.rows() == 0 {
        return Ok(0.0);
    }
    let correct = (0..y_pred.rows())
        .filter(|&i| {
            matches!(
                (y_pred.argmax_row(i), y_true_raw.row(i).first()),
                (Some(p), Some(&t)) if p as f64 == t
            )
        })
        .count();
    Ok(correct as f64 / y_pred.rows() as f64)
}

fn ensure_rows(y_pred: &Matrix, y_true_raw: &Matrix) -> Result<()> {
    if y_pred.rows() != y_true_raw.rows() {
        return Err(Error::ShapeMismatch {
            op: "metric",
            left: y_pred.shape(),
            right: y_true_raw.shape(),
        });
    }
    Ok(())
}

/// Count grid indexed by `(true label, predicted label)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    num_classes: usize,
    counts: Vec<u64>,
}

impl ConfusionMatrix {
    pub fn new(num_classes: usize) -> ConfusionMatrix {
        ConfusionMatrix {
            num_classes,
            counts: vec![0; num_classes * num_classes],
        }
    }

    /// Tallies one batch. Rows whose true or predicted label falls outside
    /// `0..num_classes` are skipped.
    pub fn update(&mut self, y_pred: &Matrix, y_true_raw: &Matrix) -> Result<()> {
        ensure_rows(y_pred, y_true_raw)?;
        for i in 0..y_pred.rows() {
            let (Some(pred), Some(&truth)) = (y_pred.argmax_row(i), y_true_raw.row(i).first()) else {
                continue;
            };
            if truth < 0.0 || truth.fract() != 0.0 {
                continue;
            }
            let truth = truth as usize;
            if truth < self.num_classes && pred < self.num_classes {
                self.counts[truth * self.num_classes + pred] += 1;
            }
        }
        Ok(())
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Count for `(true, predicted)`; 0 when either is out of range.
    pub fn get(&self, truth: usize, predicted: usize) -> u64 {
        if truth < self.num_classes && predicted < self.num_classes {
            self.counts[truth * self.num_classes + predicted]
        } else {
            0
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Row-major counts, one row per true label.
    pub fn counts(&self) -> Vec<Vec<u64>> {
        if self.num_classes == 0 {
            return Vec::new();
        }
        self.counts.chunks(self.num_classes).map(<[u64]>::to_vec).collect()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pred ->")?;
        write!(f, "True V ")?;
        for j in 0..self.num_classes {
            write!(f, "{:>5}", j)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(7 + 5 * self.num_classes))?;
        for i in 0..self.num_classes {
            write!(f, "{:>5} |", i)?;
            for j in 0..self.num_classes {
                write!(f, "{:>5}", self.get(i, j))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
