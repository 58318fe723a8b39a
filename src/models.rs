//! Request-side domain values: locations, visits, vehicles and options.
//!
//! Each value can be built directly or from a `Params` mapping. Absent
//! optional fields stay `None`; nothing is defaulted to zero.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde_json::Number;

use crate::error::RoutificError;
use crate::params::{Param, Params};

/// A time-of-day field as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeOfDay {
    /// Formatted as `H:MM` when the request is built.
    Clock(NaiveTime),
    /// Sent verbatim, e.g. `"08:00"`.
    Text(String),
    /// Any other value (minutes past midnight, a window map, ...), sent
    /// unchanged for the service to judge.
    Raw(Param),
}

impl TimeOfDay {
    fn from_param(param: &Param) -> Option<Self> {
        match param {
            Param::Null => None,
            Param::Time(time) => Some(TimeOfDay::Clock(*time)),
            Param::Text(text) => Some(TimeOfDay::Text(text.clone())),
            other => Some(TimeOfDay::Raw(other.clone())),
        }
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(value: NaiveTime) -> Self {
        TimeOfDay::Clock(value)
    }
}

impl From<&str> for TimeOfDay {
    fn from(value: &str) -> Self {
        TimeOfDay::Text(value.to_string())
    }
}

impl From<TimeOfDay> for Param {
    fn from(value: TimeOfDay) -> Self {
        match value {
            TimeOfDay::Clock(time) => Param::Time(time),
            TimeOfDay::Text(text) => Param::Text(text),
            TimeOfDay::Raw(param) => param,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            name: None,
            lat,
            lng,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds a location from `name`, `lat` and `lng` keys. Both coordinates
    /// must be present and numeric.
    pub fn from_params(params: &Params) -> Result<Self, RoutificError> {
        let coordinate = |key: &str| {
            params.get(key).and_then(Param::as_f64).ok_or_else(|| {
                RoutificError::InvalidArgument(format!("location requires a numeric `{key}`"))
            })
        };

        Ok(Self {
            name: text(params, "name")?,
            lat: coordinate("lat")?,
            lng: coordinate("lng")?,
        })
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        insert(&mut params, "name", self.name.clone());
        params.insert("lat".into(), self.lat.into());
        params.insert("lng".into(), self.lng.into());
        params
    }
}

/// A stop to be served by the fleet.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub id: String,
    pub start: Option<TimeOfDay>,
    pub end: Option<TimeOfDay>,
    /// Service time in minutes, kept exactly as given.
    pub duration: Option<Number>,
    /// Sent as `load`; a number or a map of capacity dimensions.
    pub demand: Option<Param>,
    pub location: Option<Location>,
    pub notes: Option<String>,
    pub priority: Option<Param>,
    /// Sent as `type`, e.g. `pickup` or `dropoff` on pdp endpoints.
    pub visit_type: Option<String>,
}

impl Visit {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start: None,
            end: None,
            duration: None,
            demand: None,
            location: None,
            notes: None,
            priority: None,
            visit_type: None,
        }
    }

    pub fn with_window(mut self, start: impl Into<TimeOfDay>, end: impl Into<TimeOfDay>) -> Self {
        self.start = Some(start.into());
        self.end = Some(end.into());
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes.into());
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_demand(mut self, demand: impl Into<Param>) -> Self {
        self.demand = Some(demand.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// `demand` and `load` are both accepted as the demand key. Values of
    /// the wrong kind (a non-numeric `duration`, a non-string `notes`, a
    /// non-map `location`) are rejected rather than dropped.
    pub fn from_params(id: impl Into<String>, params: &Params) -> Result<Self, RoutificError> {
        Ok(Self {
            id: id.into(),
            start: params.get("start").and_then(TimeOfDay::from_param),
            end: params.get("end").and_then(TimeOfDay::from_param),
            duration: number(params, "duration")?,
            demand: present(params, "demand").or_else(|| present(params, "load")),
            location: location(params, "location")?,
            notes: text(params, "notes")?,
            priority: present(params, "priority"),
            visit_type: text(params, "type")?,
        })
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        insert(&mut params, "start", self.start.clone());
        insert(&mut params, "end", self.end.clone());
        insert(&mut params, "duration", self.duration.clone().map(Param::Number));
        insert(&mut params, "load", self.demand.clone());
        insert(&mut params, "location", self.location.as_ref().map(Location::to_params));
        insert(&mut params, "notes", self.notes.clone());
        insert(&mut params, "priority", self.priority.clone());
        insert(&mut params, "type", self.visit_type.clone());
        params
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: String,
    pub start_location: Option<Location>,
    pub end_location: Option<Location>,
    pub shift_start: Option<TimeOfDay>,
    pub shift_end: Option<TimeOfDay>,
    pub capacity: Option<Param>,
    /// Sent as `type`; matched against visit types by the service.
    pub vehicle_type: Option<Param>,
    pub speed: Option<Param>,
}

impl Vehicle {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start_location: None,
            end_location: None,
            shift_start: None,
            shift_end: None,
            capacity: None,
            vehicle_type: None,
            speed: None,
        }
    }

    pub fn with_start_location(mut self, location: Location) -> Self {
        self.start_location = Some(location);
        self
    }

    pub fn with_end_location(mut self, location: Location) -> Self {
        self.end_location = Some(location);
        self
    }

    pub fn with_shift(mut self, start: impl Into<TimeOfDay>, end: impl Into<TimeOfDay>) -> Self {
        self.shift_start = Some(start.into());
        self.shift_end = Some(end.into());
        self
    }

    pub fn with_capacity(mut self, capacity: impl Into<Param>) -> Self {
        self.capacity = Some(capacity.into());
        self
    }

    pub fn from_params(id: impl Into<String>, params: &Params) -> Result<Self, RoutificError> {
        Ok(Self {
            id: id.into(),
            start_location: location(params, "start_location")?,
            end_location: location(params, "end_location")?,
            shift_start: params.get("shift_start").and_then(TimeOfDay::from_param),
            shift_end: params.get("shift_end").and_then(TimeOfDay::from_param),
            capacity: present(params, "capacity"),
            vehicle_type: present(params, "type"),
            speed: present(params, "speed"),
        })
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        insert(
            &mut params,
            "start_location",
            self.start_location.as_ref().map(Location::to_params),
        );
        insert(
            &mut params,
            "end_location",
            self.end_location.as_ref().map(Location::to_params),
        );
        insert(&mut params, "shift_start", self.shift_start.clone());
        insert(&mut params, "shift_end", self.shift_end.clone());
        insert(&mut params, "capacity", self.capacity.clone());
        insert(&mut params, "type", self.vehicle_type.clone());
        insert(&mut params, "speed", self.speed.clone());
        params
    }
}

/// Free-form routing options (traffic, balance, shortest_distance, ...),
/// forwarded unchanged apart from time formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options(Params);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Param>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Param> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_params(&self) -> Params {
        self.0.clone()
    }
}

impl From<Params> for Options {
    fn from(value: Params) -> Self {
        Self(value)
    }
}

/// The `{visits, fleet, options}` bundle submitted to a routing endpoint.
///
/// Visits and vehicles are keyed by id; setting an id twice replaces the
/// earlier entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteRequest {
    visits: BTreeMap<String, Visit>,
    fleet: BTreeMap<String, Vehicle>,
    options: Option<Options>,
}

impl RouteRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_visit(&mut self, visit: Visit) -> &mut Self {
        self.visits.insert(visit.id.clone(), visit);
        self
    }

    pub fn set_vehicle(&mut self, vehicle: Vehicle) -> &mut Self {
        self.fleet.insert(vehicle.id.clone(), vehicle);
        self
    }

    pub fn set_options(&mut self, options: Options) -> &mut Self {
        self.options = Some(options);
        self
    }

    pub fn visits(&self) -> &BTreeMap<String, Visit> {
        &self.visits
    }

    pub fn fleet(&self) -> &BTreeMap<String, Vehicle> {
        &self.fleet
    }

    pub fn options(&self) -> Option<&Options> {
        self.options.as_ref()
    }

    pub fn to_params(&self) -> Params {
        let visits = self
            .visits
            .iter()
            .map(|(id, visit)| (id.clone(), Param::Map(visit.to_params())))
            .collect();
        let fleet = self
            .fleet
            .iter()
            .map(|(id, vehicle)| (id.clone(), Param::Map(vehicle.to_params())))
            .collect();

        let mut params = Params::new();
        params.insert("visits".into(), Param::Map(visits));
        params.insert("fleet".into(), Param::Map(fleet));
        if let Some(options) = self.options.as_ref().filter(|options| !options.is_empty()) {
            params.insert("options".into(), Param::Map(options.to_params()));
        }
        params
    }
}

fn insert<T: Into<Param>>(params: &mut Params, key: &str, value: Option<T>) {
    if let Some(value) = value {
        params.insert(key.to_string(), value.into());
    }
}

fn present(params: &Params, key: &str) -> Option<Param> {
    params.get(key).filter(|value| !value.is_null()).cloned()
}

fn mismatch(key: &str, expected: &str) -> RoutificError {
    RoutificError::InvalidArgument(format!("`{key}` must be {expected}"))
}

fn text(params: &Params, key: &str) -> Result<Option<String>, RoutificError> {
    match params.get(key) {
        None | Some(Param::Null) => Ok(None),
        Some(Param::Text(text)) => Ok(Some(text.clone())),
        Some(_) => Err(mismatch(key, "a string")),
    }
}

fn number(params: &Params, key: &str) -> Result<Option<Number>, RoutificError> {
    match params.get(key) {
        None | Some(Param::Null) => Ok(None),
        Some(Param::Number(number)) => Ok(Some(number.clone())),
        Some(_) => Err(mismatch(key, "a number")),
    }
}

fn location(params: &Params, key: &str) -> Result<Option<Location>, RoutificError> {
    match params.get(key) {
        None | Some(Param::Null) => Ok(None),
        Some(Param::Map(map)) => Location::from_params(map).map(Some),
        Some(_) => Err(mismatch(key, "a map with `lat` and `lng`")),
    }
}
