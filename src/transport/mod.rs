// src/transport/mod.rs
mod exchange;
mod http;

pub use exchange::{Exchange, Transport};
pub use http::HttpTransport;
