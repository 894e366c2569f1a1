// src/transport/http.rs
use super::{Exchange, Transport};
use crate::config::Probe;
use crate::probe::ProbeError;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Plain HTTP/HTTPS transport backed by `reqwest`.
///
/// Redirects are not followed: a 3xx answer is the response the probe
/// judges.
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()?;

        Ok(Self { client, timeout })
    }

    fn classify(&self, err: reqwest::Error) -> ProbeError {
        if err.is_timeout() {
            ProbeError::Timeout(self.timeout)
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, probe: &Probe) -> Result<Box<dyn Exchange>, ProbeError> {
        debug!("Sending {} {}", probe.method, probe.url);

        let response = self
            .client
            .request(probe.method.clone(), probe.url.clone())
            .headers(probe.headers.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        Ok(Box::new(HttpExchange {
            response,
            timeout: self.timeout,
        }))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

struct HttpExchange {
    response: Response,
    timeout: Duration,
}

#[async_trait]
impl Exchange for HttpExchange {
    fn status(&self) -> StatusCode {
        self.response.status()
    }

    fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    async fn text(self: Box<Self>) -> Result<String, ProbeError> {
        let timeout = self.timeout;
        self.response.text().await.map_err(|e| {
            if e.is_timeout() {
                ProbeError::Timeout(timeout)
            } else {
                e.into()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProbeConfig;

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let probe = ProbeConfig::new(format!("http://{}/health", addr))
            .validate()
            .unwrap();
        let transport = HttpTransport::new(probe.timeout).unwrap();

        let err = match transport.send(&probe).await {
            Ok(_) => panic!("expected a transport error"),
            Err(err) => err,
        };
        assert!(err.is_transport(), "unexpected error: {:?}", err);
        assert!(matches!(err, ProbeError::Transport(_)));
    }
}
