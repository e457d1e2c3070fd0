use crate::activation::activation::{Activation, ActivationKind};
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Rectified linear unit. Caches the raw input of the last forward pass to
/// build the derivative mask.
#[derive(Debug, Clone, Default)]
pub struct ReLU {
    input: Matrix,
}

impl ReLU {
    pub fn new() -> ReLU {
        ReLU::default()
    }
}

impl Activation for ReLU {
    fn forward(&mut self, input: &Matrix) -> Matrix {
        self.input = input.clone();
        let mut output = input.clone();
        output.map(|x| if x > 0.0 { x } else { 0.0 });
        output
    }

    fn backward(&self, d_output: &Matrix) -> Result<Matrix> {
        if self.input.shape() != d_output.shape() {
            return Err(Error::ShapeMismatch {
                op: "relu backward",
                left: self.input.shape(),
                right: d_output.shape(),
            });
        }
        let mut d_input = self.input.clone();
        d_input.map(|x| if x > 0.0 { 1.0 } else { 0.0 });
        d_input.element_multiply(d_output)?;
        Ok(d_input)
    }

    fn kind(&self) -> ActivationKind {
        ActivationKind::ReLU
    }
}
