//! Request construction: endpoint validation, token normalisation and
//! payload formatting.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::RoutificError;
use crate::models::RouteRequest;
use crate::params::{Params, format_times};

pub const BASE_URL: &str = "https://api.routific.com/";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const TOKEN_PREFIX: &str = "bearer ";

const JSON: &str = "application/json";

/// Endpoints recognised by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endpoint {
    #[default]
    Vrp,
    VrpLong,
    Pdp,
    PdpLong,
    MinIdle,
    ProductProjects,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Vrp,
        Endpoint::VrpLong,
        Endpoint::Pdp,
        Endpoint::PdpLong,
        Endpoint::MinIdle,
        Endpoint::ProductProjects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Vrp => "vrp",
            Endpoint::VrpLong => "vrp-long",
            Endpoint::Pdp => "pdp",
            Endpoint::PdpLong => "pdp-long",
            Endpoint::MinIdle => "min-idle",
            Endpoint::ProductProjects => "product/projects",
        }
    }

    /// Whether route submissions may be posted to this endpoint.
    pub fn is_routing(&self) -> bool {
        !matches!(self, Endpoint::ProductProjects)
    }

    /// Long endpoints answer with a job id instead of a solution.
    pub fn is_long(&self) -> bool {
        self.as_str().ends_with("-long")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = RoutificError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Endpoint::ALL
            .into_iter()
            .find(|endpoint| endpoint.as_str() == value)
            .ok_or_else(|| RoutificError::InvalidEndpoint(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
        })
    }
}

impl FromStr for Method {
    type Err = RoutificError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("get") {
            Ok(Method::Get)
        } else if value.eq_ignore_ascii_case("post") {
            Ok(Method::Post)
        } else {
            Err(RoutificError::InvalidArgument(format!(
                "only GET and POST methods are supported, got `{value}`"
            )))
        }
    }
}

/// A fully specified request, ready for a [`Transport`](crate::transport::Transport).
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub timeout: Duration,
    /// Serialized JSON body. Always `None` for GET.
    pub payload: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Prefixes `bearer ` unless the token already carries it.
pub fn normalize_token(token: Option<&str>) -> Result<String, RoutificError> {
    let token = token
        .ok_or_else(|| RoutificError::InvalidArgument("access token must be set".to_string()))?;

    if token.starts_with(TOKEN_PREFIX) {
        Ok(token.to_string())
    } else {
        Ok(format!("{TOKEN_PREFIX}{token}"))
    }
}

/// Validates the token and method, then assembles url, headers, timeout
/// and body.
pub fn build_request(
    config: &ClientConfig,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<&Value>,
) -> Result<HttpRequest, RoutificError> {
    let authorization = normalize_token(token)?;
    let method: Method = method.parse()?;

    let payload = match (method, body) {
        (Method::Post, Some(body)) if !body.is_null() => Some(serde_json::to_string(body)?),
        _ => None,
    };

    Ok(HttpRequest {
        method,
        url: format!("{}{}", config.base_url(), path),
        headers: vec![
            ("authorization", authorization),
            ("content-type", JSON.to_string()),
            ("accept", JSON.to_string()),
        ],
        timeout: config.timeout(),
        payload,
    })
}

/// POST `v1/<endpoint>` with the formatted `{visits, fleet, options}` bundle.
/// `product/projects` is not a routing endpoint and is rejected here; use
/// [`project_request`] instead.
pub fn route_request(
    config: &ClientConfig,
    request: &RouteRequest,
    endpoint: &str,
    token: Option<&str>,
) -> Result<HttpRequest, RoutificError> {
    let payload = Value::Object(format_times(&request.to_params()));
    let endpoint: Endpoint = endpoint.parse()?;
    if !endpoint.is_routing() {
        return Err(RoutificError::InvalidEndpoint(endpoint.to_string()));
    }

    build_request(config, "POST", &format!("v1/{endpoint}"), token, Some(&payload))
}

/// GET `jobs/<job_id>`.
pub fn job_request(
    config: &ClientConfig,
    job_id: &str,
    token: Option<&str>,
) -> Result<HttpRequest, RoutificError> {
    build_request(config, "GET", &format!("jobs/{job_id}"), token, None)
}

/// POST `product/projects` with arbitrary project data.
pub fn project_request(
    config: &ClientConfig,
    data: &Params,
    token: Option<&str>,
) -> Result<HttpRequest, RoutificError> {
    let payload = Value::Object(format_times(data));

    build_request(
        config,
        "POST",
        Endpoint::ProductProjects.as_str(),
        token,
        Some(&payload),
    )
}
