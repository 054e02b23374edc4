pub mod combine;
pub mod fault;
pub mod metric;
pub mod outcome;
pub mod text;

pub use combine::{assess, combine};
pub use fault::FaultCodeClassifier;
pub use metric::MetricClassifier;
pub use outcome::Assessment;
