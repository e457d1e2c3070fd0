pub mod dense;

pub use dense::{DenseLayer, WeightInit};
