pub mod activation;
pub mod linear;
pub mod relu;
pub mod softmax;

pub use activation::{Activation, ActivationKind};
pub use linear::Linear;
pub use relu::ReLU;
pub use softmax::Softmax;
