//! Asynchronous optimisation jobs submitted to the `-long` endpoints.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::route::Route;

/// A long-running optimisation.
///
/// Right after submission only `id` is known; polling returns a fully
/// populated job, with `route` set once the service attaches an `output`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Job {
    /// The polled payload this job was parsed from.
    pub raw: Option<Value>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub id: Option<String>,
    pub opts: Option<Value>,
    pub status: Option<String>,
    /// Number of visits in the submitted problem.
    pub visits: Option<u64>,
    /// Number of vehicles in the submitted problem.
    pub fleet: Option<u64>,
    pub region: Option<String>,
    pub route: Option<Route>,
}

impl Job {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn parse(json: &Value) -> Self {
        Self {
            raw: Some(json.clone()),
            started_at: timestamp(json, "started_at"),
            finished_at: timestamp(json, "finished_at"),
            id: string(json, "id"),
            opts: json.get("opts").filter(|opts| !opts.is_null()).cloned(),
            status: string(json, "status"),
            visits: json.get("visits").and_then(Value::as_u64),
            fleet: json.get("fleet").and_then(Value::as_u64),
            region: string(json, "region"),
            route: json
                .get("output")
                .filter(|output| !output.is_null())
                .map(Route::parse),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status.as_deref() == Some("pending")
    }

    pub fn is_finished(&self) -> bool {
        self.status.as_deref() == Some("finished")
    }
}

fn string(json: &Value, key: &str) -> Option<String> {
    json.get(key).and_then(Value::as_str).map(str::to_string)
}

fn timestamp(json: &Value, key: &str) -> Option<DateTime<Utc>> {
    let raw = json.get(key)?.as_str()?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(err) => {
            warn!(field = key, value = raw, error = %err, "ignoring unparsable job timestamp");
            None
        }
    }
}
