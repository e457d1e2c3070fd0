use crate::error::Result;
use crate::layers::dense::DenseLayer;
use crate::math::matrix::Matrix;

/// An ordered stack of dense layers. Order defines the forward pass; the
/// backward pass walks it in reverse.
#[derive(Debug, Default)]
pub struct Model {
    layers: Vec<DenseLayer>,
}

impl Model {
    pub fn new() -> Model {
        Model::default()
    }

    /// Appends a layer. The model takes ownership.
    pub fn add(&mut self, layer: DenseLayer) {
        self.layers.push(layer);
    }

    /// Forward pass; each layer caches its input for backprop.
    pub fn predict(&mut self, input: &Matrix) -> Result<Matrix> {
        let mut current = input.clone();
        for layer in &mut self.layers {
            current = layer.forward(&current)?;
        }
        Ok(current)
    }

    /// Feeds the loss gradient through every layer in reverse order,
    /// leaving each layer's weight and bias gradients populated.
    pub fn backward(&mut self, d_output: &Matrix) -> Result<()> {
        let mut grad = d_output.clone();
        for layer in self.layers.iter_mut().rev() {
            grad = layer.backward(&grad)?;
        }
        Ok(())
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    /// Mutable access to the layers. A slice, so the topology cannot change
    /// through it.
    pub fn layers_mut(&mut self) -> &mut [DenseLayer] {
        &mut self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Sum of every layer's weight penalty.
    pub fn regularization_loss(&self) -> f64 {
        self.layers.iter().map(DenseLayer::regularization_loss).sum()
    }
}
