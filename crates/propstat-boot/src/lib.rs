#![deny(missing_docs)]
#![doc = "Stratified bootstrap estimates for observables drawn from one or more sub-runs."]

pub mod estimator;
/// Named numeric series handed to aggregation functions.
pub mod named;
/// Bootstrap configuration.
pub mod options;
/// Sub-run group partitions.
pub mod partition;

pub use estimator::{bootstrap, BootstrapResult, Estimator};
pub use named::NamedSeries;
pub use options::BootstrapOptions;
pub use partition::GroupPartition;
