use crate::math::matrix::Matrix;
use crate::regularizer::regularizer::{Regularizer, RegularizerKind};

/// Ridge penalty: 0.5·λ·Σw².
#[derive(Debug, Clone, Copy)]
pub struct L2 {
    pub lambda: f64,
}

impl L2 {
    pub fn new(lambda: f64) -> L2 {
        L2 { lambda }
    }
}

impl Regularizer for L2 {
    fn loss(&self, weights: &Matrix) -> f64 {
        0.5 * self.lambda * weights.as_slice().iter().map(|w| w * w).sum::<f64>()
    }

    fn gradient(&self, weights: &Matrix) -> Matrix {
        weights * self.lambda
    }

    fn kind(&self) -> RegularizerKind {
        RegularizerKind::L2 { lambda: self.lambda }
    }
}
