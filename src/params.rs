//! Parameter trees handed to the request builder.
//!
//! Callers describe visits, vehicles and options as `Params`, a string-keyed
//! map of `Param` values. Time-of-day values are a distinct variant so the
//! builder can render them as `H:MM` without guessing at plain strings.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde_json::{Map, Number, Value};

pub type Params = BTreeMap<String, Param>;

#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    /// Rendered as `H:MM` (no leading zero on the hour) when found in a map.
    Time(NaiveTime),
    /// Lists are passed through as-is; their elements are not normalised.
    List(Vec<Param>),
    Map(Params),
}

impl Param {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Param::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Param::Number(number) => number.as_f64(),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Params> {
        match self {
            Param::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Param::Null)
    }

    /// Converts without normalising times; a time becomes chrono's `HH:MM:SS`.
    fn to_raw_json(&self) -> Value {
        match self {
            Param::Null => Value::Null,
            Param::Bool(flag) => Value::Bool(*flag),
            Param::Number(number) => Value::Number(number.clone()),
            Param::Text(text) => Value::String(text.clone()),
            Param::Time(time) => Value::String(time.to_string()),
            Param::List(items) => Value::Array(items.iter().map(Param::to_raw_json).collect()),
            Param::Map(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_raw_json()))
                    .collect(),
            ),
        }
    }
}

/// Renders a time of day as `H:MM`, e.g. `9:05`.
pub fn format_time(time: &NaiveTime) -> String {
    time.format("%-H:%M").to_string()
}

/// Walks `params` recursively, rewriting every time value found in a map to
/// `H:MM`. Everything else, lists included, passes through untouched.
pub fn format_times(params: &Params) -> Map<String, Value> {
    params
        .iter()
        .map(|(key, value)| (key.clone(), format_param(value)))
        .collect()
}

fn format_param(param: &Param) -> Value {
    match param {
        Param::Time(time) => Value::String(format_time(time)),
        Param::Map(map) => Value::Object(format_times(map)),
        other => other.to_raw_json(),
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Param::Bool(value)
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Param::Number(value.into())
    }
}

impl From<u32> for Param {
    fn from(value: u32) -> Self {
        Param::Number(value.into())
    }
}

impl From<f64> for Param {
    /// Non-finite floats have no JSON form and become `Null`.
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Param::Null, Param::Number)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(value)
    }
}

impl From<NaiveTime> for Param {
    fn from(value: NaiveTime) -> Self {
        Param::Time(value)
    }
}

impl From<Params> for Param {
    fn from(value: Params) -> Self {
        Param::Map(value)
    }
}

impl From<Vec<Param>> for Param {
    fn from(value: Vec<Param>) -> Self {
        Param::List(value)
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(value: Option<T>) -> Self {
        value.map_or(Param::Null, Into::into)
    }
}

impl From<Value> for Param {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Param::Null,
            Value::Bool(flag) => Param::Bool(flag),
            Value::Number(number) => Param::Number(number),
            Value::String(text) => Param::Text(text),
            Value::Array(items) => Param::List(items.into_iter().map(Param::from).collect()),
            Value::Object(map) => Param::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Param::from(value)))
                    .collect(),
            ),
        }
    }
}
