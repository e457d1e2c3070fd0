use std::path::PathBuf;

use clap::ValueEnum;

use crate::error::{Error, Result};

/// Which bundled task to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TaskMode {
    /// Handwritten digit classification (784 pixels, 10 classes).
    Mnist,
    /// Boston housing price regression.
    Boston,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Train,
    Predict,
}

/// Everything a task driver needs from the command line.
#[derive(Debug, Clone)]
pub struct TaskConfig {
    pub mode: TaskMode,
    pub action: TaskAction,
    pub epochs: usize,
    /// Overrides the task's default CSV path.
    pub dataset: Option<PathBuf>,
    /// Model weights to start from (train) or evaluate (predict).
    pub load: Option<PathBuf>,
    /// Where to write the trained weights.
    pub save: Option<PathBuf>,
}

impl TaskConfig {
    pub fn new(mode: TaskMode, action: TaskAction) -> TaskConfig {
        TaskConfig {
            mode,
            action,
            epochs: 100,
            dataset: None,
            load: None,
            save: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.action == TaskAction::Predict && self.load.is_none() {
            return Err(Error::InvalidConfig(
                "prediction mode requires a model file, use --load <path>".into(),
            ));
        }
        Ok(())
    }

    /// The dataset path, falling back to `default`.
    pub fn dataset_or(&self, default: &str) -> PathBuf {
        self.dataset.clone().unwrap_or_else(|| PathBuf::from(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_requires_load_path() {
        let mut config = TaskConfig::new(TaskMode::Boston, TaskAction::Predict);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        config.load = Some("model.txt".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn train_without_paths_is_valid() {
        let config = TaskConfig::new(TaskMode::Mnist, TaskAction::Train);
        assert!(config.validate().is_ok());
        assert_eq!(config.dataset_or("data/x.csv"), PathBuf::from("data/x.csv"));
    }
}
