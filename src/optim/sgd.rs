use crate::error::Result;
use crate::layers::dense::DenseLayer;
use crate::optim::optimizer::Optimizer;

/// Plain stochastic gradient descent.
#[derive(Debug, Clone)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }
}

impl Optimizer for Sgd {
    /// `W -= lr · dW`, `b -= lr · db` for every layer.
    fn step(&mut self, layers: &mut [DenseLayer]) -> Result<()> {
        for layer in layers {
            layer.apply_gradients(self.learning_rate)?;
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
