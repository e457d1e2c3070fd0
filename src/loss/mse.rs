use crate::error::Result;
use crate::loss::loss_type::{ensure_same_shape, Loss};
use crate::math::matrix::Matrix;

/// Mean-squared error, averaged per sample: the squared error summed over
/// every output of a row, then averaged across the batch rows (not across
/// all elements).
#[derive(Debug, Clone, Copy, Default)]
pub struct MseLoss;

impl Loss for MseLoss {
    /// sum((predicted - expected)²) / batch_size
    fn calculate(&self, y_pred: &Matrix, y_true: &Matrix) -> Result<f64> {
        ensure_same_shape(y_pred, y_true)?;
        if y_pred.rows() == 0 {
            return Ok(0.0);
        }
        let sum_sq: f64 = y_pred
            .as_slice()
            .iter()
            .zip(y_true.as_slice())
            .map(|(p, t)| (p - t).powi(2))
            .sum();
        Ok(sum_sq / y_pred.rows() as f64)
    }

    /// 2 · (predicted - expected) / batch_size
    fn backward(&self, y_pred: &Matrix, y_true: &Matrix) -> Result<Matrix> {
        ensure_same_shape(y_pred, y_true)?;
        let grad = y_pred.sub(y_true)?;
        if y_pred.rows() == 0 {
            return Ok(grad);
        }
        Ok(grad * (2.0 / y_pred.rows() as f64))
    }
}
