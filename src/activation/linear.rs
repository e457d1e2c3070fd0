use crate::activation::activation::{Activation, ActivationKind};
use crate::error::Result;
use crate::math::matrix::Matrix;

/// Identity activation; derivative is 1 everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl Activation for Linear {
    fn forward(&mut self, input: &Matrix) -> Matrix {
        input.clone()
    }

    fn backward(&self, d_output: &Matrix) -> Result<Matrix> {
        Ok(d_output.clone())
    }

    fn kind(&self) -> ActivationKind {
        ActivationKind::Linear
    }
}
