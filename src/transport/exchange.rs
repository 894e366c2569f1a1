// src/transport/exchange.rs
use crate::config::Probe;
use crate::probe::ProbeError;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

/// Sends the single request a probe makes.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, probe: &Probe) -> Result<Box<dyn Exchange>, ProbeError>;

    fn name(&self) -> &'static str;
}

/// A response whose status line and headers have arrived.
///
/// The body stays on the wire until [`Exchange::text`] is called, so status
/// and header checks never read it.
#[async_trait]
pub trait Exchange: Send {
    fn status(&self) -> StatusCode;

    fn headers(&self) -> &HeaderMap;

    async fn text(self: Box<Self>) -> Result<String, ProbeError>;
}
