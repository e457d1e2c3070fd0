use crate::activation::activation::{Activation, ActivationKind};
use crate::error::Result;
use crate::math::matrix::Matrix;

/// Row-wise softmax, stabilized by subtracting each row's maximum.
///
/// `backward` is a pass-through. The softmax Jacobian is never applied here;
/// `CrossEntropyLoss::backward` already returns the fused gradient
/// `predicted - expected` w.r.t. the logits. Pairing Softmax with any other
/// loss silently produces wrong gradients.
#[derive(Debug, Clone, Copy, Default)]
pub struct Softmax;

impl Activation for Softmax {
    fn forward(&mut self, input: &Matrix) -> Matrix {
        let mut output = input.clone();
        for r in 0..output.rows() {
            let row = output.row_mut(r);
            let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mut sum = 0.0;
            for x in row.iter_mut() {
                *x = (*x - max).exp();
                sum += *x;
            }
            for x in row.iter_mut() {
                *x /= sum;
            }
        }
        output
    }

    fn backward(&self, d_output: &Matrix) -> Result<Matrix> {
        Ok(d_output.clone())
    }

    fn kind(&self) -> ActivationKind {
        ActivationKind::Softmax
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn logits() -> Matrix {
        Matrix::from_rows(vec![
            vec![1.0, 2.0, 3.0],
            vec![-5.0, 0.0, 5.0],
            vec![1000.0, 1000.0, 999.0],
        ])
        .unwrap()
    }

    #[test]
    fn rows_sum_to_one() {
        let out = Softmax.forward(&logits());
        for row in out.iter_rows() {
            assert_abs_diff_eq!(row.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
            assert!(row.iter().all(|p| p.is_finite() && *p >= 0.0));
        }
    }

    #[test]
    fn invariant_under_row_shift() {
        let x = logits();
        let mut shifted = x.clone();
        shifted.map(|v| v + 42.0);
        let a = Softmax.forward(&x);
        let b = Softmax.forward(&shifted);
        for (p, q) in a.as_slice().iter().zip(b.as_slice()) {
            assert_abs_diff_eq!(p, q, epsilon = 1e-9);
        }
    }

    #[test]
    fn backward_passes_gradient_through() {
        let g = Matrix::from_rows(vec![vec![0.3, -0.3]]).unwrap();
        assert_eq!(Softmax.backward(&g).unwrap(), g);
    }
}
