use crate::error::Result;
use crate::layers::dense::DenseLayer;

/// Applies the gradients cached on each layer by `Model::backward`.
///
/// `step` must follow a backward pass over the same layers; a step against
/// stale caches silently reapplies old gradients.
pub trait Optimizer {
    fn step(&mut self, layers: &mut [DenseLayer]) -> Result<()>;

    fn learning_rate(&self) -> f64;

    fn set_learning_rate(&mut self, learning_rate: f64);
}
