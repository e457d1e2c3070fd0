use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Paired feature and target matrices with one sample per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub features: Matrix,
    pub targets: Matrix,
}

impl Dataset {
    /// Fails with `ShapeMismatch` unless both matrices have the same number
    /// of rows.
    pub fn new(features: Matrix, targets: Matrix) -> Result<Dataset> {
        if features.rows() != targets.rows() {
            return Err(Error::ShapeMismatch {
                op: "dataset",
                left: features.shape(),
                right: targets.shape(),
            });
        }
        Ok(Dataset { features, targets })
    }

    pub fn len(&self) -> usize {
        self.features.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Splits into rows `[0, at)` and `[at, len)`.
    ///
    /// Either side may be empty; `at > len` is an `InvalidSlice` error.
    pub fn split_at(&self, at: usize) -> Result<(Dataset, Dataset)> {
        let n = self.len();
        if at > n {
            return Err(Error::InvalidSlice { start: at, end: n, rows: n });
        }
        let head = Dataset {
            features: slice_or_empty(&self.features, 0, at)?,
            targets: slice_or_empty(&self.targets, 0, at)?,
        };
        let tail = Dataset {
            features: slice_or_empty(&self.features, at, n)?,
            targets: slice_or_empty(&self.targets, at, n)?,
        };
        Ok((head, tail))
    }
}

// `Matrix::slice` rejects empty ranges.
fn slice_or_empty(m: &Matrix, start: usize, end: usize) -> Result<Matrix> {
    if start == end {
        Ok(Matrix::zeros(0, m.cols()))
    } else {
        m.slice(start, end)
    }
}
