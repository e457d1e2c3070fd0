//! A from-scratch feed-forward neural network toolkit.
//!
//! Dense layers compose into a [`Model`]; activations, losses, regularizers
//! and optimizers plug in through small traits. Training is full-batch
//! backpropagation driven by [`train::fit`], and trained weights persist in
//! a plain-text format (see [`network::persist`]).

pub mod activation;
pub mod data;
pub mod error;
pub mod layers;
pub mod loss;
pub mod math;
pub mod metrics;
pub mod network;
pub mod optim;
pub mod regularizer;
pub mod tasks;
pub mod train;

// Convenience re-exports
pub use activation::{Activation, ActivationKind, Linear, ReLU, Softmax};
pub use data::{Dataset, StandardScaler};
pub use error::{Error, Result};
pub use layers::{DenseLayer, WeightInit};
pub use loss::{CrossEntropyLoss, Loss, LossType, MseLoss};
pub use math::Matrix;
pub use metrics::{accuracy, ConfusionMatrix};
pub use network::{LayerSpec, Model, ModelSpec};
pub use optim::{Adam, AdamParams, Optimizer, Sgd};
pub use regularizer::{ElasticNet, Regularizer, RegularizerKind, L1, L2};
pub use train::{fit, FitReport, TrainConfig};
