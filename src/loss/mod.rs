pub mod cross_entropy;
pub mod loss_type;
pub mod mse;

pub use cross_entropy::CrossEntropyLoss;
pub use loss_type::{Loss, LossType};
pub use mse::MseLoss;
