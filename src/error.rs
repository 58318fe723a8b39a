//! Error types surfaced by the client.

use thiserror::Error;

use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum RoutificError {
    /// Malformed call arguments or configuration. Never gated by
    /// `raise_on_error`.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Transport-level failure, carrying whatever `error` text the server sent.
    #[error("{}", request_message(.message, .source))]
    Request {
        message: Option<String>,
        #[source]
        source: TransportError,
    },

    /// A polled job reported `status: "error"`.
    #[error("job failed: {0}")]
    Response(String),

    #[error("invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),
}

fn request_message(message: &Option<String>, source: &TransportError) -> String {
    match message {
        Some(message) => format!("{message} ({source})"),
        None => source.to_string(),
    }
}
