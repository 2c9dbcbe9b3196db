//! day-route-planner
//!
//! Plans a field-service working day: geocodes the day's jobs, orders them
//! around fixed appointments and estimates travel between stops.

pub mod clock;
pub mod config;
pub mod drive_time;
pub mod error;
pub mod geocode_cache;
pub mod haversine;
pub mod model;
pub mod planner;
pub mod postcodes;
pub mod route_url;
pub mod scheduler;
pub mod sequencer;
pub mod traits;

pub use config::PlannerConfig;
pub use model::{DayPlan, GeoLocation, JobRequest, PlannedStop, TravelSegment};
pub use planner::{distance_from_base, plan_day};
