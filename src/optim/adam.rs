use crate::error::{Error, Result};
use crate::layers::dense::DenseLayer;
use crate::math::matrix::Matrix;
use crate::optim::optimizer::Optimizer;

/// Adam hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdamParams {
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
}

impl Default for AdamParams {
    fn default() -> Self {
        AdamParams {
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }
}

/// First and second moment estimates for one parameter matrix.
#[derive(Debug, Clone)]
struct Moments {
    m: Matrix,
    v: Matrix,
}

impl Moments {
    fn zeros_like(param: &Matrix) -> Moments {
        Moments {
            m: Matrix::zeros(param.rows(), param.cols()),
            v: Matrix::zeros(param.rows(), param.cols()),
        }
    }

    /// Folds `grad` into the moments and returns the bias-corrected update
    /// direction `m̂ / (sqrt(v̂) + ε)`.
    fn advance(&mut self, grad: &Matrix, params: &AdamParams, t: i32) -> Result<Matrix> {
        let AdamParams { beta1, beta2, epsilon } = *params;

        self.m = self.m.scale(beta1).add(&grad.scale(1.0 - beta1))?;
        let mut grad_sq = grad.clone();
        grad_sq.element_multiply(grad)?;
        self.v = self.v.scale(beta2).add(&grad_sq.scale(1.0 - beta2))?;

        let mut m_hat = self.m.scale(1.0 / (1.0 - beta1.powi(t)));
        let mut denom = self.v.scale(1.0 / (1.0 - beta2.powi(t)));
        denom.element_sqrt();
        denom.map(|x| x + epsilon);

        m_hat.element_divide(&denom)?;
        Ok(m_hat)
    }
}

/// Adam optimizer.
///
/// Moment estimates are allocated once, at construction, from the layers'
/// shapes. Every `step` checks that it still receives the same topology and
/// fails with `Error::TopologyChanged` otherwise.
#[derive(Debug, Clone)]
pub struct Adam {
    pub learning_rate: f64,
    params: AdamParams,
    t: i32,
    weights: Vec<Moments>,
    biases: Vec<Moments>,
}

impl Adam {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.001;

    pub fn new(layers: &[DenseLayer], learning_rate: f64) -> Adam {
        Adam::with_params(layers, learning_rate, AdamParams::default())
    }

    pub fn with_params(layers: &[DenseLayer], learning_rate: f64, params: AdamParams) -> Adam {
        Adam {
            learning_rate,
            params,
            t: 0,
            weights: layers.iter().map(|l| Moments::zeros_like(l.weights())).collect(),
            biases: layers.iter().map(|l| Moments::zeros_like(l.biases())).collect(),
        }
    }

    /// Number of steps taken so far.
    pub fn timestep(&self) -> i32 {
        self.t
    }

    pub fn params(&self) -> AdamParams {
        self.params
    }

    fn check_topology(&self, layers: &[DenseLayer]) -> Result<()> {
        if layers.len() != self.weights.len() {
            return Err(Error::TopologyChanged(format!(
                "built for {} layers, got {}",
                self.weights.len(),
                layers.len()
            )));
        }
        for (i, layer) in layers.iter().enumerate() {
            if layer.weights().shape() != self.weights[i].m.shape()
                || layer.biases().shape() != self.biases[i].m.shape()
            {
                return Err(Error::TopologyChanged(format!(
                    "layer {} is {:?}, optimizer state is {:?}",
                    i,
                    layer.weights().shape(),
                    self.weights[i].m.shape()
                )));
            }
        }
        Ok(())
    }
}

impl Optimizer for Adam {
    fn step(&mut self, layers: &mut [DenseLayer]) -> Result<()> {
        self.check_topology(layers)?;
        self.t += 1;

        for (i, layer) in layers.iter_mut().enumerate() {
            let w_update = self.weights[i].advance(layer.weights_gradient(), &self.params, self.t)?;
            layer.weights_mut().update(&w_update, self.learning_rate)?;

            let b_update = self.biases[i].advance(layer.biases_gradient(), &self.params, self.t)?;
            layer.biases_mut().update(&b_update, self.learning_rate)?;
        }
        Ok(())
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Linear;
    use approx::assert_abs_diff_eq;

    fn m(rows: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    /// 1x1 linear layer whose gradients are fed directly: with input 1 the
    /// weight gradient equals the output gradient.
    fn scalar_layer() -> DenseLayer {
        let mut layer = DenseLayer::new(1, 1, Box::new(Linear));
        layer.set_weights(m(vec![vec![0.0]])).unwrap();
        layer.set_biases(m(vec![vec![0.0]])).unwrap();
        layer
    }

    fn feed(layers: &mut [DenseLayer], grad: f64) {
        layers[0].forward(&m(vec![vec![1.0]])).unwrap();
        layers[0].backward(&m(vec![vec![grad]])).unwrap();
    }

    #[test]
    fn first_step_moves_against_gradient_sign() {
        for grad in [3.0, -0.25] {
            let mut layers = vec![scalar_layer()];
            let mut adam = Adam::new(&layers, Adam::DEFAULT_LEARNING_RATE);
            feed(&mut layers, grad);
            adam.step(&mut layers).unwrap();

            let w = layers[0].weights()[(0, 0)];
            assert!(w * grad < 0.0, "weight {} did not move against {}", w, grad);
            // m̂ = g and v̂ = g², so the first step is ~lr in magnitude.
            assert_abs_diff_eq!(w.abs(), 0.001, epsilon = 1e-9);
            assert_eq!(adam.timestep(), 1);
        }
    }

    #[test]
    fn constant_gradient_gives_stable_step_size() {
        let mut layers = vec![scalar_layer()];
        let mut adam = Adam::new(&layers, 0.01);
        let mut previous = 0.0;
        let mut deltas = Vec::new();
        for _ in 0..500 {
            feed(&mut layers, 2.0);
            adam.step(&mut layers).unwrap();
            let w = layers[0].weights()[(0, 0)];
            deltas.push(previous - w);
            previous = w;
        }
        for d in &deltas[400..] {
            assert!(d.is_finite());
            assert_abs_diff_eq!(*d, 0.01, epsilon = 1e-6);
        }
    }

    #[test]
    fn zero_gradient_leaves_parameters_unchanged() {
        let mut layers = vec![scalar_layer()];
        let mut adam = Adam::new(&layers, 0.1);
        feed(&mut layers, 0.0);
        adam.step(&mut layers).unwrap();
        assert_eq!(layers[0].weights()[(0, 0)], 0.0);
    }

    #[test]
    fn detects_topology_change() {
        let layers = vec![scalar_layer()];
        let mut adam = Adam::new(&layers, 0.1);

        let mut more = vec![scalar_layer(), scalar_layer()];
        assert!(matches!(adam.step(&mut more), Err(Error::TopologyChanged(_))));

        let mut reshaped = vec![DenseLayer::new(2, 1, Box::new(Linear))];
        assert!(matches!(adam.step(&mut reshaped), Err(Error::TopologyChanged(_))));
        assert_eq!(adam.timestep(), 0);
    }
}
