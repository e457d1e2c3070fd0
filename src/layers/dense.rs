use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::regularizer::Regularizer;

/// Weight initialization scheme for a dense layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightInit {
    /// N(0, sqrt(2 / fan_in)); suited to ReLU stacks.
    #[default]
    He,
    /// Uniform in [-1, 1).
    Random,
}

/// Fully-connected layer: `activation(input · W + b)`.
///
/// Shapes: weights `(input_size, output_size)`, biases `(1, output_size)`,
/// cached input `(batch, input_size)`. The gradient caches always match the
/// weight and bias shapes.
#[derive(Debug)]
pub struct DenseLayer {
    weights: Matrix,
    biases: Matrix,
    activation: Box<dyn Activation>,
    regularizer: Option<Box<dyn Regularizer>>,
    init: WeightInit,
    input: Option<Matrix>,
    d_weights: Matrix,
    d_biases: Matrix,
}

impl DenseLayer {
    /// He-initialized layer.
    pub fn new(input_size: usize, output_size: usize, activation: Box<dyn Activation>) -> DenseLayer {
        DenseLayer::with_init(input_size, output_size, activation, WeightInit::He)
    }

    pub fn with_init(
        input_size: usize,
        output_size: usize,
        activation: Box<dyn Activation>,
        init: WeightInit,
    ) -> DenseLayer {
        DenseLayer::with_rng(input_size, output_size, activation, init, &mut rand::thread_rng())
    }

    /// Same as [`DenseLayer::with_init`] but draws from `rng`, for
    /// reproducible networks.
    pub fn with_rng<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Box<dyn Activation>,
        init: WeightInit,
        rng: &mut R,
    ) -> DenseLayer {
        let weights = match init {
            WeightInit::He => Matrix::he_with_rng(input_size, output_size, rng),
            WeightInit::Random => Matrix::random_with_rng(input_size, output_size, rng),
        };
        let biases = Matrix::random_with_rng(1, output_size, rng);

        DenseLayer {
            weights,
            biases,
            activation,
            regularizer: None,
            init,
            input: None,
            d_weights: Matrix::zeros(input_size, output_size),
            d_biases: Matrix::zeros(1, output_size),
        }
    }

    /// Attaches a weight penalty.
    pub fn with_regularizer(mut self, regularizer: Box<dyn Regularizer>) -> DenseLayer {
        self.regularizer = Some(regularizer);
        self
    }

    /// Forward pass for a `(batch, input_size)` input.
    ///
    /// Overwrites the cached input, so any pending backward must use the
    /// gradient of this call's output.
    pub fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        let mut z = Matrix::multiply(input, &self.weights)?;
        z.add_row_broadcast(&self.biases)?;
        self.input = Some(input.clone());
        Ok(self.activation.forward(&z))
    }

    /// Backward pass. Stores ∂L/∂W (plus the regularizer gradient) and
    /// ∂L/∂b, and returns ∂L/∂input for the previous layer.
    pub fn backward(&mut self, d_output: &Matrix) -> Result<Matrix> {
        let input = self.input.as_ref().ok_or(Error::BackwardBeforeForward)?;
        let expected = (input.rows(), self.weights.cols());
        if d_output.shape() != expected {
            return Err(Error::ShapeMismatch {
                op: "dense backward",
                left: expected,
                right: d_output.shape(),
            });
        }

        let d_linear = self.activation.backward(d_output)?;

        let mut d_weights = Matrix::multiply(&input.transpose(), &d_linear)?;
        if let Some(regularizer) = &self.regularizer {
            d_weights = d_weights.add(&regularizer.gradient(&self.weights))?;
        }
        self.d_weights = d_weights;
        self.d_biases = d_linear.sum_columns();

        Matrix::multiply(&d_linear, &self.weights.transpose())
    }

    /// Plain gradient-descent step using the cached gradients.
    pub fn apply_gradients(&mut self, learning_rate: f64) -> Result<()> {
        self.weights.update(&self.d_weights, learning_rate)?;
        self.biases.update(&self.d_biases, learning_rate)
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows()
    }

    pub fn output_size(&self) -> usize {
        self.weights.cols()
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Matrix {
        &self.biases
    }

    pub fn weights_mut(&mut self) -> &mut Matrix {
        &mut self.weights
    }

    pub fn biases_mut(&mut self) -> &mut Matrix {
        &mut self.biases
    }

    pub fn weights_gradient(&self) -> &Matrix {
        &self.d_weights
    }

    pub fn biases_gradient(&self) -> &Matrix {
        &self.d_biases
    }

    /// Input of the most recent forward pass.
    pub fn input(&self) -> Option<&Matrix> {
        self.input.as_ref()
    }

    pub fn activation(&self) -> &dyn Activation {
        self.activation.as_ref()
    }

    pub fn regularizer(&self) -> Option<&dyn Regularizer> {
        self.regularizer.as_deref()
    }

    pub fn init(&self) -> WeightInit {
        self.init
    }

    /// Penalty of the current weights, 0 without a regularizer.
    pub fn regularization_loss(&self) -> f64 {
        self.regularizer
            .as_ref()
            .map_or(0.0, |r| r.loss(&self.weights))
    }

    /// Replaces the weights; the shape is fixed at construction.
    pub fn set_weights(&mut self, weights: Matrix) -> Result<()> {
        if weights.shape() != self.weights.shape() {
            return Err(Error::ShapeMismatch {
                op: "set_weights",
                left: self.weights.shape(),
                right: weights.shape(),
            });
        }
        self.weights = weights;
        Ok(())
    }

    pub fn set_biases(&mut self, biases: Matrix) -> Result<()> {
        if biases.shape() != self.biases.shape() {
            return Err(Error::ShapeMismatch {
                op: "set_biases",
                left: self.biases.shape(),
                right: biases.shape(),
            });
        }
        self.biases = biases;
        Ok(())
    }
}
