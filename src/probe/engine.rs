// src/probe/engine.rs
use super::ProbeError;
use crate::check::Check;
use crate::config::{Probe, ProbeConfig};
use crate::transport::{HttpTransport, Transport};
use reqwest::StatusCode;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

/// Token returned by a passing probe.
pub const SUCCESS: &str = "OK";

/// Validate `config` and probe the target over HTTP(S).
pub async fn healthcheck(config: ProbeConfig) -> Result<&'static str, ProbeError> {
    let probe = config.validate()?;
    let transport = HttpTransport::new(probe.timeout)?;
    run(&probe, &transport).await
}

/// Send the probe once through `transport` and turn the response into a
/// verdict.
///
/// The whole exchange, body included, must finish within `probe.timeout`.
pub async fn run(probe: &Probe, transport: &dyn Transport) -> Result<&'static str, ProbeError> {
    let span = info_span!(
        "probe",
        id = %Uuid::new_v4(),
        method = %probe.method,
        url = %probe.url,
        check = %probe.check_type()
    );

    let start = Instant::now();
    let result = match timeout(probe.timeout, execute(probe, transport))
        .instrument(span.clone())
        .await
    {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout(probe.timeout)),
    };

    let elapsed_ms = start.elapsed().as_millis() as u64;
    span.in_scope(|| match &result {
        Ok(_) => info!(elapsed_ms, transport = transport.name(), "Probe passed"),
        Err(e) => info!(elapsed_ms, transport = transport.name(), error = %e, "Probe failed"),
    });

    result
}

async fn execute(probe: &Probe, transport: &dyn Transport) -> Result<&'static str, ProbeError> {
    if probe.verbose {
        debug!("URL: {}", probe.url);
        debug!(
            "Options: method={} timeout={}ms type={} headers={:?}",
            probe.method,
            probe.timeout.as_millis(),
            probe.check_type(),
            probe.headers
        );
    }

    let exchange = transport.send(probe).await?;
    let status = exchange.status();

    if probe.verbose {
        debug!("Status Code: {}", status.as_u16());
        debug!("Headers: {:?}", exchange.headers());
    }

    // Error-range responses fail before any check runs.
    if status.as_u16() >= 400 {
        return Err(ProbeError::from_status(status));
    }

    match &probe.check {
        Check::Status(_) => probe.check.verify_status(status)?,
        Check::Header(_) => probe.check.verify_headers(exchange.headers())?,
        Check::Html(_) | Check::Json(_) => {
            if status != StatusCode::OK {
                debug!("Status {} is not 200, body not inspected", status.as_u16());
                return Ok(SUCCESS);
            }

            let body = exchange.text().await?;

            if probe.verbose {
                debug!("Body: {}", body);
                if let Check::Html(Some(pattern)) = &probe.check {
                    debug!("Search: /{}/", pattern.as_str());
                }
            }

            probe.check.verify_body(&body)?;
        }
    }

    Ok(SUCCESS)
}
