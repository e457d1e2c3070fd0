use serde::{Deserialize, Serialize};

/// Per-epoch training statistics recorded by `fit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Data loss on the training set, measured before this epoch's update.
    pub train_loss: f64,
    /// Data loss on the validation set after the update, if one was given.
    pub val_loss: Option<f64>,
    /// Summed regularization penalty of all layers before the update.
    /// Reported only; it is not part of `train_loss`.
    pub penalty: f64,
    /// Wall-clock duration of the epoch in milliseconds.
    pub elapsed_ms: u64,
}

impl EpochStats {
    /// The loss early stopping watches: validation if present, else training.
    pub fn monitored_loss(&self) -> f64 {
        self.val_loss.unwrap_or(self.train_loss)
    }
}
