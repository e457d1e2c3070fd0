use serde::{Deserialize, Serialize};
use std::fmt;

use crate::math::matrix::Matrix;
use crate::regularizer::{ElasticNet, L1, L2};

/// Weight penalty. The gradient is added to a layer's weight gradient during
/// backward; biases are never regularized.
pub trait Regularizer: fmt::Debug {
    fn loss(&self, weights: &Matrix) -> f64;

    /// Same shape as `weights`.
    fn gradient(&self, weights: &Matrix) -> Matrix;

    fn kind(&self) -> RegularizerKind;
}

/// Serializable selector for the built-in regularizers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegularizerKind {
    L1 { lambda: f64 },
    L2 { lambda: f64 },
    ElasticNet { lambda1: f64, lambda2: f64 },
}

impl RegularizerKind {
    pub fn build(self) -> Box<dyn Regularizer> {
        match self {
            RegularizerKind::L1 { lambda } => Box::new(L1::new(lambda)),
            RegularizerKind::L2 { lambda } => Box::new(L2::new(lambda)),
            RegularizerKind::ElasticNet { lambda1, lambda2 } => {
                Box::new(ElasticNet::new(lambda1, lambda2))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_round_trips_kind() {
        let kinds = [
            RegularizerKind::L1 { lambda: 0.1 },
            RegularizerKind::L2 { lambda: 0.2 },
            RegularizerKind::ElasticNet { lambda1: 0.1, lambda2: 0.3 },
        ];
        for kind in kinds {
            assert_eq!(kind.build().kind(), kind);
        }
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_string(&RegularizerKind::L2 { lambda: 0.5 }).unwrap();
        assert_eq!(json, r#"{"type":"l2","lambda":0.5}"#);

        let kind: RegularizerKind =
            serde_json::from_str(r#"{"type":"elastic_net","lambda1":0.01,"lambda2":0.02}"#).unwrap();
        assert_eq!(kind, RegularizerKind::ElasticNet { lambda1: 0.01, lambda2: 0.02 });
    }
}
