// src/probe/mod.rs
mod engine;
mod error;

pub use engine::{healthcheck, run, SUCCESS};
pub use error::ProbeError;
