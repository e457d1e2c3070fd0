use tracing::info;

use crate::activation::ActivationKind;
use crate::data::{normalize_pixels, one_hot_encode, read_labeled_csv, Dataset};
use crate::error::Result;
use crate::loss::{Loss, LossType};
use crate::math::matrix::Matrix;
use crate::metrics::{accuracy, ConfusionMatrix};
use crate::network::{LayerSpec, Model, ModelSpec};
use crate::optim::Adam;
use crate::tasks::config::{TaskAction, TaskConfig};
use crate::tasks::{load_for_training, save_model};
use crate::train::{fit, TrainConfig};

pub const DEFAULT_DATASET: &str = "data/mnist_train.csv";
pub const NUM_CLASSES: usize = 10;
pub const INPUT_SIZE: usize = 784;

const LEARNING_RATE: f64 = 0.002;
const PATIENCE: usize = 10;
const LOG_EVERY: usize = 5;
const SAMPLE_PREDICTIONS: usize = 5;

/// `784 → 128 ReLU → 10 Softmax` trained with cross-entropy.
pub fn spec() -> ModelSpec {
    ModelSpec {
        name: "mnist".into(),
        layers: vec![
            LayerSpec::new(INPUT_SIZE, 128, ActivationKind::ReLU),
            LayerSpec::new(128, NUM_CLASSES, ActivationKind::Softmax),
        ],
        loss: LossType::CrossEntropy,
    }
}

pub fn run(config: &TaskConfig) -> Result<()> {
    let path = config.dataset_or(DEFAULT_DATASET);
    info!(path = %path.display(), "loading MNIST data");
    let (mut features, labels) = read_labeled_csv(&path, None)?;
    normalize_pixels(&mut features);
    let all = Dataset::new(features, labels)?;

    let spec = spec();
    let mut model = spec.build()?;

    match config.action {
        TaskAction::Train => {
            // 80/20 split; rows keep their file order.
            let train_rows = all.len() * 4 / 5;
            let (train_raw, val_raw) = all.split_at(train_rows)?;
            let train = encode(&train_raw)?;
            let val = encode(&val_raw)?;

            if let Some(load) = &config.load {
                load_for_training(&mut model, load);
            }

            let loss = spec.loss.build();
            let mut optimizer = Adam::new(model.layers(), LEARNING_RATE);
            let train_config = TrainConfig::new(config.epochs)
                .with_patience(PATIENCE)
                .with_log_every(LOG_EVERY);
            let report = fit(&mut model, loss.as_ref(), &mut optimizer, &train, Some(&val), &train_config)?;
            info!(
                epochs_run = report.history.len(),
                best_epoch = report.best_epoch,
                best_loss = report.best_loss,
                "training complete"
            );

            if let Some(save) = &config.save {
                save_model(&model, &spec.name, spec.loss, save)?;
            }

            if val_raw.is_empty() {
                println!("\n--- Evaluation on training set (no validation rows) ---");
                report_classification(&mut model, &train_raw, 0)?;
            } else {
                println!("\n--- Evaluation on validation set ---");
                report_classification(&mut model, &val_raw, 0)?;
            }
        }
        TaskAction::Predict => {
            if let Some(load) = &config.load {
                model.load(load)?;
            }
            let encoded = encode(&all)?;
            let y_pred = model.predict(&encoded.features)?;
            let cce = spec.loss.build();
            println!("Cross-entropy loss: {:.6}", cce.calculate(&y_pred, &encoded.targets)?);
            println!("\n--- Prediction results on {} rows ---", all.len());
            report_classification(&mut model, &all, SAMPLE_PREDICTIONS)?;
        }
    }
    Ok(())
}

/// Replaces raw label targets with their one-hot encoding.
fn encode(raw: &Dataset) -> Result<Dataset> {
    Dataset::new(raw.features.clone(), one_hot_encode(&raw.targets, NUM_CLASSES))
}

/// Prints accuracy, the confusion matrix and up to `samples` individual
/// predictions for a dataset whose targets are raw labels.
fn report_classification(model: &mut Model, raw: &Dataset, samples: usize) -> Result<()> {
    let y_pred = model.predict(&raw.features)?;
    println!("Accuracy: {:.2}%", accuracy(&y_pred, &raw.targets)? * 100.0);

    let mut confusion = ConfusionMatrix::new(NUM_CLASSES);
    confusion.update(&y_pred, &raw.targets)?;
    println!("\n--- Confusion Matrix ---\n{}", confusion);

    print_samples(&y_pred, &raw.targets, samples);
    Ok(())
}

fn print_samples(y_pred: &Matrix, labels: &Matrix, samples: usize) {
    let n = samples.min(y_pred.rows());
    if n == 0 {
        return;
    }
    println!("Sample predictions (predicted vs true):");
    for i in 0..n {
        let predicted = y_pred.argmax_row(i).unwrap_or(0);
        println!("Sample {}: Predicted={}, True={}", i, predicted, labels[(i, 0)]);
    }
}
