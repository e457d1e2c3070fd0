//! ferrite-dense CLI
//!
//! Trains or evaluates the bundled MNIST and Boston housing models.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use ferrite_dense::tasks::{self, TaskAction, TaskConfig, TaskMode};

#[derive(Parser)]
#[command(name = "ferrite-dense")]
#[command(about = "Dense neural network trainer for the MNIST and Boston housing tasks", long_about = None)]
#[command(group(ArgGroup::new("action").required(true).multiple(false).args(["train", "predict"])))]
struct Cli {
    /// Task to run
    #[arg(long, value_enum)]
    mode: TaskMode,

    /// Train a model
    #[arg(long)]
    train: bool,

    /// Evaluate a saved model (requires --load)
    #[arg(long, requires = "load")]
    predict: bool,

    /// Number of training epochs
    #[arg(long, default_value = "100")]
    epochs: usize,

    /// CSV dataset path (defaults to the task's file under data/)
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Model weights to load
    #[arg(long)]
    load: Option<PathBuf>,

    /// Where to save the trained weights
    #[arg(long)]
    save: Option<PathBuf>,

    /// Verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", value_parser = clap::value_parser!(Level))]
    log_level: Level,
}

impl Cli {
    fn task_config(&self) -> TaskConfig {
        let action = if self.predict { TaskAction::Predict } else { TaskAction::Train };
        TaskConfig {
            mode: self.mode,
            action,
            epochs: self.epochs,
            dataset: self.dataset.clone(),
            load: self.load.clone(),
            save: self.save.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version requests go to stdout and are not failures.
            let code = if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
            let _ = e.print();
            return code;
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: a global tracing subscriber was already installed");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.task_config();
    tasks::run(&config).with_context(|| format!("{:?} task failed", config.mode))
}
