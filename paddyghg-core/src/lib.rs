pub mod aggregate;
pub mod blend;
pub mod config;
pub mod dataset;
pub mod gwp;
pub mod python;
pub mod report;
pub mod spatial;
pub mod timeseries;
pub mod units;
pub mod variable;

pub mod errors;

pub use errors::{GhgError, GhgResult};
