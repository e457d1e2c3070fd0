use crate::math::matrix::Matrix;
use crate::regularizer::regularizer::{Regularizer, RegularizerKind};

/// Lasso penalty: λ·Σ|w|.
#[derive(Debug, Clone, Copy)]
pub struct L1 {
    pub lambda: f64,
}

impl L1 {
    pub fn new(lambda: f64) -> L1 {
        L1 { lambda }
    }
}

impl Regularizer for L1 {
    fn loss(&self, weights: &Matrix) -> f64 {
        self.lambda * weights.as_slice().iter().map(|w| w.abs()).sum::<f64>()
    }

    /// λ·sign(w), with sign(0) = 0.
    fn gradient(&self, weights: &Matrix) -> Matrix {
        let lambda = self.lambda;
        let mut grad = weights.clone();
        grad.map(|w| {
            if w > 0.0 {
                lambda
            } else if w < 0.0 {
                -lambda
            } else {
                0.0
            }
        });
        grad
    }

    fn kind(&self) -> RegularizerKind {
        RegularizerKind::L1 { lambda: self.lambda }
    }
}
