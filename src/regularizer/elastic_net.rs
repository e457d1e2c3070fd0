use crate::math::matrix::Matrix;
use crate::regularizer::l1::L1;
use crate::regularizer::l2::L2;
use crate::regularizer::regularizer::{Regularizer, RegularizerKind};

/// L1(λ1) + L2(λ2). The L2 term keeps the 0.5 scaling of plain L2.
#[derive(Debug, Clone, Copy)]
pub struct ElasticNet {
    l1: L1,
    l2: L2,
}

impl ElasticNet {
    pub fn new(lambda1: f64, lambda2: f64) -> ElasticNet {
        ElasticNet {
            l1: L1::new(lambda1),
            l2: L2::new(lambda2),
        }
    }
}

impl Regularizer for ElasticNet {
    fn loss(&self, weights: &Matrix) -> f64 {
        self.l1.loss(weights) + self.l2.loss(weights)
    }

    fn gradient(&self, weights: &Matrix) -> Matrix {
        let mut grad = self.l1.gradient(weights);
        let l2 = self.l2.gradient(weights);
        for r in 0..grad.rows() {
            for (g, x) in grad.row_mut(r).iter_mut().zip(l2.row(r)) {
                *g += x;
            }
        }
        grad
    }

    fn kind(&self) -> RegularizerKind {
        RegularizerKind::ElasticNet {
            lambda1: self.l1.lambda,
            lambda2: self.l2.lambda,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sums_both_components() {
        let w = Matrix::from_rows(vec![vec![-1.0, 0.0, 2.0]]).unwrap();
        let reg = ElasticNet::new(0.1, 0.2);
        let expected = L1::new(0.1).loss(&w) + L2::new(0.2).loss(&w);
        assert_abs_diff_eq!(reg.loss(&w), expected, epsilon = 1e-12);

        let g = reg.gradient(&w);
        let expected_grad = [-0.1 - 0.2, 0.0, 0.1 + 0.4];
        for (a, b) in g.as_slice().iter().zip(expected_grad) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-12);
        }
    }
}
