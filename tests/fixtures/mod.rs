//! Test fixtures for day-route-planner.
//!
//! Provides:
//! - Jersey postcodes with approximate coordinates
//! - An in-memory postcode lookup that counts its calls
//! - Job builders

#![allow(dead_code)]

pub mod fake_lookup;
pub mod jersey_locations;

pub use fake_lookup::*;
pub use jersey_locations::*;

use day_route_planner::JobRequest;

pub fn flexible_job(name: &str, postcode: &str, service: &str) -> JobRequest {
    JobRequest::new(name, postcode, service)
}

pub fn fixed_job(name: &str, postcode: &str, service: &str, time: &str) -> JobRequest {
    JobRequest::new(name, postcode, service).with_fixed_time(time)
}
