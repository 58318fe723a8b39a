//! Shared fixtures for client tests.
//!
//! - Canned service responses (route solution, finished job)
//! - A recording transport that never touches the network
//! - A log capture helper backed by `tracing-subscriber`

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tracing_subscriber::fmt::MakeWriter;

use routific_client::request::HttpRequest;
use routific_client::transport::{Transport, TransportError};
use routific_client::{Location, RouteRequest, Vehicle, Visit};

pub fn route_api_response() -> Value {
    json!({
        "status": "success",
        "total_travel_time": 69.03333,
        "total_idle_time": 139.08333,
        "num_unserved": 0,
        "unserved": null,
        "solution": {
            "vehicle_1": [
                {"location_id": "vehicle_1_start", "location_name": "Nameless Node", "arrival_time": "17:30"},
                {"location_id": "5476", "location_name": "Nameless Node", "arrival_time": "17:32", "idle_time": 27.866667, "finish_time": "18:05"}
            ],
            "vehicle_2": [
                {"location_id": "vehicle_2_start", "location_name": "Nameless Node", "arrival_time": "17:30"},
                {"location_id": "5481", "location_name": "Nameless Node", "arrival_time": "17:32", "idle_time": 27.833334, "finish_time": "18:05"}
            ],
            "vehicle_3": [
                {"location_id": "vehicle_3_start", "location_name": "Nameless Node", "arrival_time": "17:30"},
                {"location_id": "5485", "location_name": "Nameless Node", "arrival_time": "17:32", "idle_time": 27.833334, "finish_time": "18:05"},
                {"location_id": "5480", "location_name": "Nameless Node", "arrival_time": "18:09", "finish_time": "18:14"},
                {"location_id": "5479", "location_name": "Nameless Node", "arrival_time": "18:16", "finish_time": "18:21"},
                {"location_id": "5493", "location_name": "Nameless Node", "arrival_time": "18:24", "finish_time": "18:29"}
            ]
        }
    })
}

pub fn job_api_response() -> Value {
    json!({
        "started_at": "2015-12-14T11:40:34.001Z",
        "finished_at": "2015-12-14T11:40:35.008Z",
        "id": "ii5w2kb5846",
        "opts": {"traffic": 1, "problem": "vrp"},
        "status": "finished",
        "visits": 30,
        "fleet": 5,
        "region": "europe",
        "output": route_api_response()
    })
}

pub fn vancouver_request() -> RouteRequest {
    let mut request = RouteRequest::new();
    request
        .set_visit(
            Visit::new("order_1")
                .with_window("9:00", "12:00")
                .with_duration(10)
                .with_location(Location::new(49.227107, -123.1163085).with_name("6800 Cambie")),
        )
        .set_vehicle(
            Vehicle::new("vehicle_1")
                .with_start_location(Location::new(49.2553636, -123.0873365).with_name("800 Kingsway"))
                .with_end_location(Location::new(49.2553636, -123.0873365).with_name("800 Kingsway"))
                .with_shift("8:00", "12:00"),
        );
    request
}

/// Replays canned responses in order and records every request it sees.
#[derive(Default)]
pub struct RecordingTransport {
    responses: RefCell<VecDeque<Result<String, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn replying(json: Value) -> Self {
        let transport = Self::default();
        transport.responses.borrow_mut().push_back(Ok(json.to_string()));
        transport
    }

    pub fn failing(err: TransportError) -> Self {
        let transport = Self::default();
        transport.responses.borrow_mut().push_back(Err(err));
        transport
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for RecordingTransport {
    fn execute(&self, request: &HttpRequest) -> Result<String, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::network("no canned response")))
    }
}

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with a thread-local subscriber and returns its log output.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    (result, logs)
}
