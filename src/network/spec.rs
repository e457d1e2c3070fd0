use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::activation::ActivationKind;
use crate::error::{Error, Result};
use crate::layers::dense::{DenseLayer, WeightInit};
use crate::loss::LossType;
use crate::network::model::Model;
use crate::regularizer::RegularizerKind;

/// Describes one layer in a network specification.
///
/// Fields:
/// - `size`: number of neurons in this layer
/// - `input_size`: number of neurons feeding into this layer (the output
///   size of the previous layer, or the raw input dimension
///   for the first layer)
/// - `activation`: activation applied after the affine transform
/// - `init`: weight initialization (He when omitted)
/// - `regularizer`: optional weight penalty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: ActivationKind,
    #[serde(default)]
    pub init: WeightInit,
    #[serde(default)]
    pub regularizer: Option<RegularizerKind>,
}

impl LayerSpec {
    pub fn new(input_size: usize, size: usize, activation: ActivationKind) -> LayerSpec {
        LayerSpec {
            size,
            input_size,
            activation,
            init: WeightInit::He,
            regularizer: None,
        }
    }

    fn build_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> DenseLayer {
        let layer = DenseLayer::with_rng(
            self.input_size,
            self.size,
            self.activation.build(),
            self.init,
            rng,
        );
        match self.regularizer {
            Some(kind) => layer.with_regularizer(kind.build()),
            None => layer,
        }
    }
}

/// A serializable description of a network architecture plus the loss it
/// is trained with.
///
/// The plain-text weight format is not self-describing; a `ModelSpec` saved
/// next to it is what lets a caller rebuild an identically shaped model
/// before calling `Model::load`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Human-readable name.
    pub name: String,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    /// Loss function to pair with this network during training.
    pub loss: LossType,
}

impl ModelSpec {
    /// Describes an existing model.
    pub fn describe(name: &str, model: &Model, loss: LossType) -> ModelSpec {
        let layers = model
            .layers()
            .iter()
            .map(|layer| LayerSpec {
                size: layer.output_size(),
                input_size: layer.input_size(),
                activation: layer.activation().kind(),
                init: layer.init(),
                regularizer: layer.regularizer().map(|r| r.kind()),
            })
            .collect();
        ModelSpec {
            name: name.to_string(),
            layers,
            loss,
        }
    }

    /// Checks that consecutive layers connect and that a Softmax output is
    /// only paired with cross-entropy.
    pub fn validate(&self) -> Result<()> {
        for (i, pair) in self.layers.windows(2).enumerate() {
            if pair[0].size != pair[1].input_size {
                return Err(Error::InvalidConfig(format!(
                    "layer {} outputs {} values but layer {} expects {}",
                    i,
                    pair[0].size,
                    i + 1,
                    pair[1].input_size
                )));
            }
        }
        if let Some(i) = self.layers.iter().position(|l| l.size == 0 || l.input_size == 0) {
            return Err(Error::InvalidConfig(format!("layer {} has a zero dimension", i)));
        }
        let softmax_output = self
            .layers
            .last()
            .map_or(false, |l| l.activation == ActivationKind::Softmax);
        if softmax_output && self.loss != LossType::CrossEntropy {
            return Err(Error::InvalidConfig(
                "a softmax output layer requires the cross_entropy loss".into(),
            ));
        }
        Ok(())
    }

    /// Builds a freshly initialized model.
    pub fn build(&self) -> Result<Model> {
        self.build_with_rng(&mut rand::thread_rng())
    }

    pub fn build_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Model> {
        self.validate()?;
        let mut model = Model::new();
        for layer in &self.layers {
            model.add(layer.build_with_rng(rng));
        }
        Ok(model)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Deserializes a `ModelSpec` from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<ModelSpec> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
