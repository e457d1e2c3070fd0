use crate::error::Result;
use crate::loss::loss_type::{ensure_same_shape, Loss};
use crate::math::matrix::Matrix;

/// Categorical cross-entropy loss for use with a Softmax output layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossEntropyLoss;

/// Predictions are clipped into [EPS, 1 - EPS] before the log.
const EPS: f64 = f64::EPSILON;

impl Loss for CrossEntropyLoss {
    /// L = -sum(expected · log(clip(predicted))) / batch_size
    ///
    /// `y_pred`: softmax probabilities, shape [batch, n_classes]
    /// `y_true`: one-hot (or soft) targets, same shape
    fn calculate(&self, y_pred: &Matrix, y_true: &Matrix) -> Result<f64> {
        ensure_same_shape(y_pred, y_true)?;
        if y_pred.rows() == 0 {
            return Ok(0.0);
        }
        let total: f64 = y_pred
            .as_slice()
            .iter()
            .zip(y_true.as_slice())
            .map(|(p, t)| t * p.clamp(EPS, 1.0 - EPS).ln())
            .sum();
        Ok(-total / y_pred.rows() as f64)
    }

    /// Gradient of the combined Softmax + cross-entropy w.r.t. the logits:
    ///   ∂L/∂z = predicted - expected
    ///
    /// The Softmax layer's own backward is identity, so the combined
    /// gradient is not double-applied. Not batch-normalized.
    fn backward(&self, y_pred: &Matrix, y_true: &Matrix) -> Result<Matrix> {
        ensure_same_shape(y_pred, y_true)?;
        y_pred.sub(y_true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn averages_over_batch() {
        let pred = Matrix::from_rows(vec![vec![0.5, 0.5], vec![0.25, 0.75]]).unwrap();
        let truth = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let expected = -(0.5f64.ln() + 0.75f64.ln()) / 2.0;
        assert_abs_diff_eq!(
            CrossEntropyLoss.calculate(&pred, &truth).unwrap(),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn clipping_keeps_loss_finite() {
        let pred = Matrix::from_rows(vec![vec![0.0, 1.0]]).unwrap();
        let truth = Matrix::from_rows(vec![vec![1.0, 0.0]]).unwrap();
        let loss = CrossEntropyLoss.calculate(&pred, &truth).unwrap();
        assert!(loss.is_finite());
        assert_abs_diff_eq!(loss, -(f64::EPSILON.ln()), epsilon = 1e-9);
    }

    #[test]
    fn backward_is_exact_difference() {
        let pred = Matrix::from_rows(vec![vec![0.7, 0.2, 0.1]]).unwrap();
        let truth = Matrix::from_rows(vec![vec![0.0, 1.0, 0.0]]).unwrap();
        let g = CrossEntropyLoss.backward(&pred, &truth).unwrap();
        assert_eq!(g, pred.sub(&truth).unwrap());
    }
}
