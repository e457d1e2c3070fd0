pub mod csv;
pub mod dataset;
pub mod scaler;
pub mod transform;

pub use self::csv::{
    read_labeled_csv, read_labeled_csv_from_reader, read_numeric_csv, read_numeric_csv_from_reader,
};
pub use dataset::Dataset;
pub use scaler::StandardScaler;
pub use transform::{normalize_pixels, one_hot_encode, split_features_target};
