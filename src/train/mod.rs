pub mod epoch_stats;
pub mod loop_fn;
pub mod snapshot;
pub mod train_config;

pub use epoch_stats::EpochStats;
pub use loop_fn::{fit, FitReport};
pub use snapshot::ParamSnapshot;
pub use train_config::TrainConfig;
