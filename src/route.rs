//! Route solutions returned by the synchronous endpoints.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// One stop in a vehicle's visiting sequence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WayPoint {
    pub location_id: String,
    pub arrival_time: String,
    /// Absent for a vehicle's start and idle stops.
    #[serde(default)]
    pub finish_time: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub idle_time: Option<f64>,
}

impl WayPoint {
    /// Builds a stop by hand, e.g. for fixtures or callers assembling routes.
    pub fn new(
        location_id: impl Into<String>,
        arrival_time: impl Into<String>,
        finish_time: Option<String>,
    ) -> Self {
        Self {
            location_id: location_id.into(),
            arrival_time: arrival_time.into(),
            finish_time,
            location_name: None,
            idle_time: None,
        }
    }
}

/// Per-vehicle stop sequences, in the order the service listed the vehicles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleRoutes {
    routes: Vec<(String, Vec<WayPoint>)>,
}

impl VehicleRoutes {
    pub fn get(&self, vehicle_id: &str) -> Option<&[WayPoint]> {
        self.routes
            .iter()
            .find(|(id, _)| id == vehicle_id)
            .map(|(_, way_points)| way_points.as_slice())
    }

    pub fn vehicle_ids(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[WayPoint])> {
        self.routes
            .iter()
            .map(|(id, way_points)| (id.as_str(), way_points.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn insert(&mut self, vehicle_id: String, way_points: Vec<WayPoint>) {
        match self.routes.iter_mut().find(|(id, _)| *id == vehicle_id) {
            Some((_, existing)) => *existing = way_points,
            None => self.routes.push((vehicle_id, way_points)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    pub status: Option<String>,
    pub fitness: Option<f64>,
    /// Ids of visits the solution could not serve.
    pub unserved: Option<Vec<String>>,
    pub num_unserved: Option<u64>,
    pub total_travel_time: Option<f64>,
    pub total_idle_time: Option<f64>,
    pub vehicle_routes: VehicleRoutes,
}

impl Route {
    /// Builds a route without vehicle routes; [`Route::parse`] is the usual way in.
    pub fn new(status: Option<String>, fitness: Option<f64>, unserved: Option<Vec<String>>) -> Self {
        Self {
            status,
            fitness,
            unserved,
            ..Self::default()
        }
    }

    /// Builds a route from a solution payload.
    ///
    /// Parsing never fails: missing fields stay `None` and a missing
    /// `solution` yields no vehicle routes. Stop records that lack a
    /// `location_id` or `arrival_time` are skipped.
    pub fn parse(json: &Value) -> Self {
        let mut route = Self {
            status: json.get("status").and_then(Value::as_str).map(str::to_string),
            fitness: json.get("fitness").and_then(Value::as_f64),
            unserved: json.get("unserved").and_then(parse_unserved),
            num_unserved: json.get("num_unserved").and_then(Value::as_u64),
            total_travel_time: json.get("total_travel_time").and_then(Value::as_f64),
            total_idle_time: json.get("total_idle_time").and_then(Value::as_f64),
            vehicle_routes: VehicleRoutes::default(),
        };

        if let Some(solution) = json.get("solution").and_then(Value::as_object) {
            for (vehicle_id, stops) in solution {
                route
                    .vehicle_routes
                    .insert(vehicle_id.clone(), parse_stops(vehicle_id, stops));
            }
        }

        route
    }
}

fn parse_stops(vehicle_id: &str, stops: &Value) -> Vec<WayPoint> {
    let Some(stops) = stops.as_array() else {
        warn!(vehicle_id, "solution entry is not a list of stops");
        return Vec::new();
    };

    stops
        .iter()
        .filter_map(|stop| match WayPoint::deserialize(stop) {
            Ok(way_point) => Some(way_point),
            Err(err) => {
                warn!(vehicle_id, error = %err, "skipping malformed stop record");
                None
            }
        })
        .collect()
}

// Older responses list unserved ids; newer ones map id -> reason.
fn parse_unserved(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(ids) => Some(
            ids.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        ),
        Value::Object(reasons) => Some(reasons.keys().cloned().collect()),
        _ => None,
    }
}
