#![deny(missing_docs)]
#![doc = "Shared error taxonomy, seeding policy and physical quantities for propstat."]

pub mod errors;
pub mod rng;
pub mod units;

pub use errors::{ErrorInfo, PropError};
pub use rng::{derive_substream_seed, RngHandle};
pub use units::{Pressure, AVOGADRO};
