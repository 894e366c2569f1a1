// src/check/mod.rs
pub mod json_path;
mod kind;
mod search;
mod verdict;

pub use kind::CheckType;
pub use search::SearchTerm;
pub use verdict::{Check, HeaderExpectation, JsonSearch};
