//! Client configuration.
//!
//! A `ClientConfig` is owned by each client. Mutating it through
//! `RoutificClient::config_mut` requires `&mut` access, so a client shared
//! across threads must be wrapped in external synchronisation before its
//! configuration can change.

use std::env;
use std::time::Duration;

use crate::error::RoutificError;
use crate::request::{BASE_URL, DEFAULT_TIMEOUT, Endpoint};

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    token: Option<String>,
    endpoint: Endpoint,
    base_url: String,
    timeout: Duration,
    raise_on_error: bool,
    log_responses: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token: None,
            endpoint: Endpoint::default(),
            base_url: BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            raise_on_error: true,
            log_responses: false,
        }
    }
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Reads `ROUTIFIC_*` variables, loading a `.env` file first if present.
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, RoutificError> {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        if let Ok(token) = env::var("ROUTIFIC_TOKEN") {
            config.set_token(Some(token));
        }
        if let Ok(endpoint) = env::var("ROUTIFIC_ENDPOINT") {
            config.set_endpoint(&endpoint)?;
        }
        if let Ok(base_url) = env::var("ROUTIFIC_BASE_URL") {
            config.set_base_url(base_url);
        }
        config.timeout = Duration::from_secs(parse_or_default(
            "ROUTIFIC_TIMEOUT_SECS",
            DEFAULT_TIMEOUT.as_secs(),
        )?);
        config.raise_on_error = parse_or_default("ROUTIFIC_RAISE_ON_ERROR", config.raise_on_error)?;
        config.log_responses = parse_or_default("ROUTIFIC_LOG_RESPONSES", config.log_responses)?;

        Ok(config)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) -> &mut Self {
        self.token = token;
        self
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Fails with `InvalidEndpoint` and leaves the current endpoint in place
    /// if `endpoint` is not recognised.
    pub fn set_endpoint(&mut self, endpoint: &str) -> Result<&mut Self, RoutificError> {
        self.endpoint = endpoint.parse()?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Paths are appended directly, so a missing trailing slash is added.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> &mut Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// When off, transport and job errors are logged and the call returns
    /// `Ok(None)` instead of an error.
    pub fn raise_on_error(&self) -> bool {
        self.raise_on_error
    }

    pub fn set_raise_on_error(&mut self, raise: bool) -> &mut Self {
        self.raise_on_error = raise;
        self
    }

    pub fn log_responses(&self) -> bool {
        self.log_responses
    }

    pub fn set_log_responses(&mut self, log: bool) -> &mut Self {
        self.log_responses = log;
        self
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, RoutificError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| RoutificError::InvalidArgument(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
