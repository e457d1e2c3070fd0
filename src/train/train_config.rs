use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for a `fit` run.
///
/// # Fields
/// - `epochs`: number of full-batch iterations over the training set
/// - `patience`: stop after this many epochs without a strictly lower
///   monitored loss, restoring the best parameters seen.
///   `None` disables early stopping.
/// - `log_every`: emit an `info` line every this many epochs (and on the
///   first). `0` silences per-epoch logging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    #[serde(default)]
    pub patience: Option<usize>,
    #[serde(default = "default_log_every")]
    pub log_every: usize,
}

fn default_log_every() -> usize {
    10
}

impl TrainConfig {
    /// Creates a `TrainConfig` with no early stopping.
    pub fn new(epochs: usize) -> Self {
        TrainConfig {
            epochs,
            patience: None,
            log_every: default_log_every(),
        }
    }

    pub fn with_patience(mut self, patience: usize) -> Self {
        self.patience = Some(patience);
        self
    }

    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.patience == Some(0) {
            return Err(Error::InvalidConfig("patience must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::new(100)
    }
}
