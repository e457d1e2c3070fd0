//! Drivers for the two bundled tasks. Each one loads its CSV, builds the
//! model from a `ModelSpec`, then trains or predicts and reports to stdout.

pub mod boston;
pub mod config;
pub mod mnist;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::Result;
use crate::loss::LossType;
use crate::network::{Model, ModelSpec};

pub use config::{TaskAction, TaskConfig, TaskMode};

/// Validates `config` and runs the selected task.
pub fn run(config: &TaskConfig) -> Result<()> {
    config.validate()?;
    info!(mode = ?config.mode, action = ?config.action, epochs = config.epochs, "running task");
    match config.mode {
        TaskMode::Mnist => mnist::run(config),
        TaskMode::Boston => boston::run(config),
    }
}

/// Path of the architecture file written next to a weights file:
/// `model.txt` → `model.txt.json`.
pub fn sidecar_path(weights: &Path) -> PathBuf {
    let mut name = OsString::from(weights.as_os_str());
    name.push(".json");
    PathBuf::from(name)
}

/// Writes the weights to `path` and the architecture to its sidecar.
pub fn save_model(model: &Model, name: &str, loss: LossType, path: &Path) -> Result<()> {
    model.save(path)?;
    let spec_path = sidecar_path(path);
    ModelSpec::describe(name, model, loss).save_json(&spec_path)?;
    info!(weights = %path.display(), spec = %spec_path.display(), "saved model");
    Ok(())
}

/// Warm-starts training from `path`. A failed load leaves the freshly
/// initialized model in place.
pub(crate) fn load_for_training(model: &mut Model, path: &Path) {
    match model.load(path) {
        Ok(()) => info!(path = %path.display(), "continuing from saved weights"),
        Err(e) => warn!(path = %path.display(), error = %e, "could not load model, training from scratch"),
    }
}
