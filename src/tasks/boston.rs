use tracing::info;

use crate::activation::ActivationKind;
use crate::data::{read_numeric_csv, split_features_target, Dataset, StandardScaler};
use crate::error::{Error, Result};
use crate::loss::{Loss, LossType};
use crate::network::{LayerSpec, ModelSpec};
use crate::optim::Adam;
use crate::tasks::config::{TaskAction, TaskConfig};
use crate::tasks::{load_for_training, save_model};
use crate::train::{fit, TrainConfig};

pub const DEFAULT_DATASET: &str = "data/boston_housing.csv";
/// Leading rows used for training; the remainder is validation.
pub const TRAIN_ROWS: usize = 400;

const LEARNING_RATE: f64 = 0.01;
const LOG_EVERY: usize = 10;
const SAMPLE_PREDICTIONS: usize = 10;

/// `in → 64 ReLU → 64 ReLU → 1 Linear` trained with MSE.
pub fn spec(input_size: usize) -> ModelSpec {
    ModelSpec {
        name: "boston".into(),
        layers: vec![
            LayerSpec::new(input_size, 64, ActivationKind::ReLU),
            LayerSpec::new(64, 64, ActivationKind::ReLU),
            LayerSpec::new(64, 1, ActivationKind::Linear),
        ],
        loss: LossType::Mse,
    }
}

pub fn run(config: &TaskConfig) -> Result<()> {
    let path = config.dataset_or(DEFAULT_DATASET);
    info!(path = %path.display(), "loading Boston housing data");
    let table = read_numeric_csv(&path, None)?;
    let (features, target) = split_features_target(&table)?;
    let all = Dataset::new(features, target)?;
    if all.is_empty() {
        return Err(Error::InvalidConfig(format!("{} has no data rows", path.display())));
    }

    let (train, val) = all.split_at(TRAIN_ROWS.min(all.len()))?;
    let mut scaler = StandardScaler::new();
    let train = Dataset::new(scaler.fit_transform(&train.features)?, train.targets)?;
    let val = Dataset::new(scaler.transform(&val.features)?, val.targets)?;
    info!(train_rows = train.len(), val_rows = val.len(), "scaled features");

    let spec = spec(train.features.cols());
    let mut model = spec.build()?;
    let loss = spec.loss.build();

    match config.action {
        TaskAction::Train => {
            if let Some(load) = &config.load {
                load_for_training(&mut model, load);
            }

            let mut optimizer = Adam::new(model.layers(), LEARNING_RATE);
            let train_config = TrainConfig::new(config.epochs).with_log_every(LOG_EVERY);
            let report = fit(&mut model, loss.as_ref(), &mut optimizer, &train, Some(&val), &train_config)?;
            info!(epochs_run = report.history.len(), "training complete");

            if let Some(save) = &config.save {
                save_model(&model, &spec.name, spec.loss, save)?;
            }

            if val.is_empty() {
                let y_pred = model.predict(&train.features)?;
                println!("Final training MSE: {:.6}", loss.calculate(&y_pred, &train.targets)?);
            } else {
                let y_pred = model.predict(&val.features)?;
                println!("Final validation MSE: {:.6}", loss.calculate(&y_pred, &val.targets)?);
            }
        }
        TaskAction::Predict => {
            if let Some(load) = &config.load {
                model.load(load)?;
            }
            let eval = if val.is_empty() { &train } else { &val };
            let y_pred = model.predict(&eval.features)?;
            println!("MSE on {} rows: {:.6}", eval.len(), loss.calculate(&y_pred, &eval.targets)?);

            println!("\nSample predictions vs true values:");
            for i in 0..SAMPLE_PREDICTIONS.min(y_pred.rows()) {
                println!("Pred: {:.3}, True: {}", y_pred[(i, 0)], eval.targets[(i, 0)]);
            }
        }
    }
    Ok(())
}
