use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::model::Model;

/// Copy of every layer's weights and biases.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSnapshot {
    params: Vec<(Matrix, Matrix)>,
}

impl ParamSnapshot {
    pub fn capture(model: &Model) -> ParamSnapshot {
        ParamSnapshot {
            params: model
                .layers()
                .iter()
                .map(|l| (l.weights().clone(), l.biases().clone()))
                .collect(),
        }
    }

    /// Writes the captured parameters back. The model must have the same
    /// topology it had at capture time.
    pub fn restore(&self, model: &mut Model) -> Result<()> {
        if model.len() != self.params.len() {
            return Err(Error::TopologyChanged(format!(
                "snapshot has {} layers, model has {}",
                self.params.len(),
                model.len()
            )));
        }
        for (layer, (w, b)) in model.layers_mut().iter_mut().zip(&self.params) {
            layer.set_weights(w.clone())?;
            layer.set_biases(b.clone())?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Linear;
    use crate::layers::dense::DenseLayer;

    #[test]
    fn restore_rolls_back_parameters() {
        let mut model = Model::new();
        model.add(DenseLayer::new(2, 1, Box::new(Linear)));
        let snapshot = ParamSnapshot::capture(&model);

        let original = model.layers()[0].weights().clone();
        model.layers_mut()[0].weights_mut().map(|w| w + 1.0);
        assert_ne!(model.layers()[0].weights(), &original);

        snapshot.restore(&mut model).unwrap();
        assert_eq!(model.layers()[0].weights(), &original);
    }

    #[test]
    fn restore_rejects_other_topology() {
        let mut model = Model::new();
        model.add(DenseLayer::new(2, 1, Box::new(Linear)));
        let snapshot = ParamSnapshot::capture(&model);
        model.add(DenseLayer::new(1, 1, Box::new(Linear)));
        assert!(snapshot.restore(&mut model).is_err());
    }
}
