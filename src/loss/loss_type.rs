use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::loss::{CrossEntropyLoss, MseLoss};
use crate::math::matrix::Matrix;

/// A batch loss. Both methods take `(batch x outputs)` predictions and
/// targets of identical shape and fail with `Error::ShapeMismatch`
/// otherwise.
pub trait Loss: fmt::Debug {
    /// Scalar loss averaged over the batch rows.
    fn calculate(&self, y_pred: &Matrix, y_true: &Matrix) -> Result<f64>;

    /// Gradient w.r.t. `y_pred`, same shape as `y_pred`.
    fn backward(&self, y_pred: &Matrix, y_true: &Matrix) -> Result<Matrix>;
}

/// Selects which loss function the training loop uses.
///
/// - `Mse`: Mean-squared error; pair with a Linear output.
/// - `CrossEntropy`: Categorical cross-entropy; pair with a Softmax output.
///   The gradient is the combined Softmax+CE gradient (predicted - expected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    Mse,
    CrossEntropy,
}

impl LossType {
    pub fn build(self) -> Box<dyn Loss> {
        match self {
            LossType::Mse => Box::new(MseLoss),
            LossType::CrossEntropy => Box::new(CrossEntropyLoss),
        }
    }
}

pub(crate) fn ensure_same_shape(y_pred: &Matrix, y_true: &Matrix) -> Result<()> {
    if y_pred.shape() != y_true.shape() {
        return Err(Error::ShapeMismatch {
            op: "loss",
            left: y_pred.shape(),
            right: y_true.shape(),
        });
    }
    Ok(())
}
