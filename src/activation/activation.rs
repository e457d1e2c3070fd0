use serde::{Deserialize, Serialize};
use std::fmt;

use crate::activation::{Linear, ReLU, Softmax};
use crate::error::Result;
use crate::math::matrix::Matrix;

/// A forward/backward transform applied after a layer's affine step.
///
/// `backward` receives the gradient w.r.t. this activation's output and
/// returns the gradient w.r.t. its input (the pre-activation `z`). It must
/// be called after the `forward` whose output produced that gradient.
///
/// An instance may cache state from its last `forward` (ReLU does), so each
/// layer owns its own activation and never shares it.
pub trait Activation: fmt::Debug {
    fn forward(&mut self, input: &Matrix) -> Matrix;

    fn backward(&self, d_output: &Matrix) -> Result<Matrix>;

    fn kind(&self) -> ActivationKind;
}

/// Serializable selector for the built-in activations.
///
/// - `Linear`: identity; regression outputs.
/// - `ReLU`: hidden layers.
/// - `Softmax`: classification outputs. Only valid together with
///   `LossType::CrossEntropy`, whose gradient already accounts for the
///   softmax Jacobian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationKind {
    Linear,
    #[serde(rename = "relu")]
    ReLU,
    Softmax,
}

impl ActivationKind {
    /// Creates a fresh, independently owned activation instance.
    pub fn build(self) -> Box<dyn Activation> {
        match self {
            ActivationKind::Linear => Box::new(Linear),
            ActivationKind::ReLU => Box::new(ReLU::new()),
            ActivationKind::Softmax => Box::new(Softmax),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_round_trips_kind() {
        for kind in [ActivationKind::Linear, ActivationKind::ReLU, ActivationKind::Softmax] {
            assert_eq!(kind.build().kind(), kind);
        }
    }

    #[test]
    fn kinds_serialize_as_snake_case() {
        let json = serde_json::to_string(&ActivationKind::ReLU).unwrap();
        assert_eq!(json, "\"relu\"");
        let back: ActivationKind = serde_json::from_str("\"softmax\"").unwrap();
        assert_eq!(back, ActivationKind::Softmax);
    }
}
