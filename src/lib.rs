//! Client for the Routific vehicle routing API.
//!
//! Describe a fleet and its visits, submit them to a routing endpoint and
//! get back either a route solution or a job to poll. The optimisation itself
//! runs on the service; this crate shapes requests and parses responses.

pub mod client;
pub mod config;
pub mod error;
pub mod job;
pub mod models;
pub mod params;
pub mod request;
pub mod route;
pub mod transport;

pub use client::{RouteOutcome, RoutificClient};
pub use config::ClientConfig;
pub use error::RoutificError;
pub use job::Job;
pub use models::{Location, Options, RouteRequest, TimeOfDay, Vehicle, Visit};
pub use params::{Param, Params};
pub use route::{Route, VehicleRoutes, WayPoint};
