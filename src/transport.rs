//! HTTP transport for prepared requests.

use thiserror::Error;
use tracing::debug;

use crate::request::{HttpRequest, Method};

/// A failed exchange: either no response at all, or a non-2xx status.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub status: Option<u16>,
    /// Response body, when the server sent one.
    pub body: Option<String>,
    pub message: String,
}

impl TransportError {
    pub fn status(status: u16, message: impl Into<String>, body: Option<String>) -> Self {
        Self {
            status: Some(status),
            body,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            status: err.status().map(|status| status.as_u16()),
            body: None,
            message: err.to_string(),
        }
    }
}

/// Executes a prepared request and returns the raw response body.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<String, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking `reqwest` transport. Each call blocks until the response arrives
/// or the request's timeout elapses.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder().build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &HttpRequest) -> Result<String, TransportError> {
        debug!(method = %request.method, url = %request.url, "sending request");

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        }
        .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }
        if let Some(payload) = &request.payload {
            builder = builder.body(payload.clone());
        }

        let response = builder.send()?;
        let status = response.status();
        let body = response.text()?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(TransportError::status(
                status.as_u16(),
                status.to_string(),
                Some(body),
            ))
        }
    }
}
