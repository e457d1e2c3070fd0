pub mod elastic_net;
pub mod l1;
pub mod l2;
pub mod regularizer;

pub use elastic_net::ElasticNet;
pub use l1::L1;
pub use l2::L2;
pub use regularizer::{Regularizer, RegularizerKind};
