// src/lib.rs
pub mod check;
pub mod config;
pub mod probe;
pub mod transport;

pub use check::{CheckType, SearchTerm};
pub use config::{Probe, ProbeConfig};
pub use probe::{healthcheck, run, ProbeError, SUCCESS};
