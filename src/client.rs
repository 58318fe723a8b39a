//! Client that sends prepared requests and interprets the responses.

use serde_json::Value;
use tracing::{error, info};

use crate::config::ClientConfig;
use crate::error::RoutificError;
use crate::job::Job;
use crate::models::RouteRequest;
use crate::params::Params;
use crate::request::{Endpoint, HttpRequest, job_request, project_request, route_request};
use crate::route::Route;
use crate::transport::{HttpTransport, Transport, TransportError};

/// Answer to a route submission.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// Synchronous endpoints return the solution directly.
    Route(Route),
    /// `-long` endpoints return a job to poll with [`RoutificClient::job`].
    Job(Job),
}

impl RouteOutcome {
    pub fn into_route(self) -> Option<Route> {
        match self {
            RouteOutcome::Route(route) => Some(route),
            RouteOutcome::Job(_) => None,
        }
    }

    pub fn into_job(self) -> Option<Job> {
        match self {
            RouteOutcome::Job(job) => Some(job),
            RouteOutcome::Route(_) => None,
        }
    }
}

/// Every call blocks until the transport answers. Nothing is retried and
/// jobs are never polled automatically.
///
/// Calls return `Ok(None)` when the exchange failed and
/// [`ClientConfig::raise_on_error`] is off.
#[derive(Debug, Clone)]
pub struct RoutificClient<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl RoutificClient<HttpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_transport(config, HttpTransport::new()?))
    }
}

impl<T: Transport> RoutificClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ClientConfig {
        &mut self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Submits `request` to the configured endpoint with the configured token.
    pub fn get_route(&self, request: &RouteRequest) -> Result<Option<RouteOutcome>, RoutificError> {
        self.get_route_with(request, self.config.endpoint().as_str(), self.config.token())
    }

    /// Submits `request` to `endpoint` using exactly the given token; `None`
    /// is rejected even if the configuration holds one.
    pub fn get_route_with(
        &self,
        request: &RouteRequest,
        endpoint: &str,
        token: Option<&str>,
    ) -> Result<Option<RouteOutcome>, RoutificError> {
        let endpoint: Endpoint = endpoint.parse()?;
        let http_request = route_request(&self.config, request, endpoint.as_str(), token)?;

        let Some(json) = self.dispatch(&http_request)? else {
            return Ok(None);
        };

        let outcome = if endpoint.is_long() {
            RouteOutcome::Job(Job {
                id: json.get("job_id").and_then(Value::as_str).map(str::to_string),
                ..Job::default()
            })
        } else {
            RouteOutcome::Route(Route::parse(&json))
        };
        Ok(Some(outcome))
    }

    /// Polls a job with the configured token.
    pub fn job(&self, job_id: &str) -> Result<Option<Job>, RoutificError> {
        self.job_with_token(job_id, self.config.token())
    }

    /// A job whose payload reports `status: "error"` fails with
    /// [`RoutificError::Response`] when `raise_on_error` is on. Otherwise the
    /// payload is parsed like any other job.
    pub fn job_with_token(
        &self,
        job_id: &str,
        token: Option<&str>,
    ) -> Result<Option<Job>, RoutificError> {
        let http_request = job_request(&self.config, job_id, token)?;

        let Some(json) = self.dispatch(&http_request)? else {
            return Ok(None);
        };

        if self.config.raise_on_error() && json.get("status").and_then(Value::as_str) == Some("error")
        {
            let output = json.get("output").map(text).unwrap_or_default();
            return Err(RoutificError::Response(output));
        }

        Ok(Some(Job::parse(&json)))
    }

    /// Creates a project and returns the service's JSON answer unchanged.
    pub fn create_project(&self, data: &Params) -> Result<Option<Value>, RoutificError> {
        let http_request = project_request(&self.config, data, self.config.token())?;
        self.dispatch(&http_request)
    }

    fn dispatch(&self, request: &HttpRequest) -> Result<Option<Value>, RoutificError> {
        match self.transport.execute(request) {
            Ok(body) => {
                let json: Value = serde_json::from_str(&body)?;
                if self.config.log_responses() {
                    info!(url = %request.url, response = %json, "received response");
                }
                Ok(Some(json))
            }
            Err(err) => self.handle_failure(err),
        }
    }

    fn handle_failure(&self, err: TransportError) -> Result<Option<Value>, RoutificError> {
        let message = server_error(&err);

        if self.config.raise_on_error() {
            return Err(RoutificError::Request {
                message,
                source: err,
            });
        }

        error!(status = ?err.status, body = ?err.body, "{err}");
        error!(
            "Received HTTP {}: {}",
            err.message,
            message.as_deref().unwrap_or("no error message")
        );
        Ok(None)
    }
}

/// Best-effort read of the `error` field from a failure body.
fn server_error(err: &TransportError) -> Option<String> {
    let body: Value = serde_json::from_str(err.body.as_deref()?).ok()?;
    body.get("error").filter(|error| !error.is_null()).map(text)
}

fn text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
