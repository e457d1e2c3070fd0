pub mod model;
pub mod persist;
pub mod spec;

pub use model::Model;
pub use spec::{LayerSpec, ModelSpec};
