use std::time::Instant;

use tracing::{debug, info};

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};
use crate::loss::loss_type::Loss;
use crate::network::model::Model;
use crate::optim::optimizer::Optimizer;
use crate::train::epoch_stats::EpochStats;
use crate::train::snapshot::ParamSnapshot;
use crate::train::train_config::TrainConfig;

/// Outcome of a `fit` run.
///
/// `best_epoch` is 1-based and `best_loss` is the lowest monitored loss;
/// they are `0` and `f64::INFINITY` when no epoch ran.
#[derive(Debug, Clone)]
pub struct FitReport {
    pub history: Vec<EpochStats>,
    pub best_epoch: usize,
    pub best_loss: f64,
    pub stopped_early: bool,
}

impl FitReport {
    pub fn final_stats(&self) -> Option<&EpochStats> {
        self.history.last()
    }
}

/// Trains `model` with full-batch gradient descent for up to
/// `config.epochs` epochs.
///
/// Each epoch runs `predict → loss.backward → model.backward →
/// optimizer.step` over the whole training set, then evaluates the
/// validation set if one is given. The monitored loss is the validation
/// loss, or the training loss without a validation set. With
/// `config.patience` set, training stops once the monitored loss has not
/// strictly improved for that many epochs and the best parameters are
/// restored.
///
/// # Errors
/// `InvalidConfig` for an empty training set or zero patience; any shape
/// error from the model, loss or optimizer is propagated unchanged.
pub fn fit(
    model: &mut Model,
    loss: &dyn Loss,
    optimizer: &mut dyn Optimizer,
    train: &Dataset,
    val: Option<&Dataset>,
    config: &TrainConfig,
) -> Result<FitReport> {
    config.validate()?;
    if train.is_empty() {
        return Err(Error::InvalidConfig("training set is empty".into()));
    }
    let val = val.filter(|v| !v.is_empty());

    info!(
        epochs = config.epochs,
        train_rows = train.len(),
        val_rows = val.map_or(0, Dataset::len),
        lr = optimizer.learning_rate(),
        "starting training"
    );

    let mut report = FitReport {
        history: Vec::with_capacity(config.epochs),
        best_epoch: 0,
        best_loss: f64::INFINITY,
        stopped_early: false,
    };
    let mut best_params: Option<ParamSnapshot> = None;
    let mut epochs_no_improve = 0;

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        let y_pred = model.predict(&train.features)?;
        let train_loss = loss.calculate(&y_pred, &train.targets)?;
        let penalty = model.regularization_loss();
        let grad = loss.backward(&y_pred, &train.targets)?;
        model.backward(&grad)?;
        // The training loss was measured on the pre-step parameters.
        let pre_step = match (config.patience, val) {
            (Some(_), None) => Some(ParamSnapshot::capture(model)),
            _ => None,
        };
        optimizer.step(model.layers_mut())?;

        let val_loss = match val {
            Some(v) => {
                let y_val = model.predict(&v.features)?;
                Some(loss.calculate(&y_val, &v.targets)?)
            }
            None => None,
        };

        let stats = EpochStats {
            epoch,
            train_loss,
            val_loss,
            penalty,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        if config.log_every > 0 && (epoch == 1 || epoch % config.log_every == 0) {
            match val_loss {
                Some(v) => info!("Epoch {}: train_loss={:.6}, val_loss={:.6}", epoch, train_loss, v),
                None => info!("Epoch {}: train_loss={:.6}", epoch, train_loss),
            }
        }

        let monitored = stats.monitored_loss();
        if monitored < report.best_loss {
            report.best_loss = monitored;
            report.best_epoch = epoch;
            epochs_no_improve = 0;
            if config.patience.is_some() {
                best_params = Some(match pre_step {
                    Some(snapshot) => snapshot,
                    None => ParamSnapshot::capture(model),
                });
            }
        } else {
            epochs_no_improve += 1;
        }
        report.history.push(stats);

        if config.patience.is_some_and(|p| epochs_no_improve >= p) {
            if let Some(snapshot) = &best_params {
                snapshot.restore(model)?;
            }
            report.stopped_early = true;
            info!(
                epoch,
                best_epoch = report.best_epoch,
                best_loss = report.best_loss,
                "early stopping, restored best parameters"
            );
            break;
        }
    }

    debug!(epochs_run = report.history.len(), "training finished");
    Ok(report)
}
