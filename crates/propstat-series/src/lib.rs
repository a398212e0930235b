#![deny(missing_docs)]
#![doc = "Aligned per-frame observable channels produced by molecular simulations."]

/// Observable channel kinds, their units and column headers.
pub mod kind;
/// The aligned channel container.
pub mod series;
pub mod table;

pub use kind::ObservableKind;
pub use series::ObservableSeries;
