//! Planner input and output records.

use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::haversine::Coordinates;

/// A client visit requested for the day. Supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub postcode: String,
    /// Key into the service duration table.
    #[serde(default)]
    pub service: String,
    /// Appointment time as "HH:MM". Anything unparseable makes the job flexible.
    #[serde(default)]
    pub fixed_time: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl JobRequest {
    pub fn new(name: impl Into<String>, postcode: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            postcode: postcode.into(),
            service: service.into(),
            ..Self::default()
        }
    }

    pub fn with_fixed_time(mut self, time: impl Into<String>) -> Self {
        self.fixed_time = Some(time.into());
        self
    }

    /// Parsed appointment time, or `None` for flexible jobs.
    pub fn fixed_clock(&self) -> Option<ClockTime> {
        self.fixed_time.as_deref().and_then(ClockTime::parse)
    }
}

/// A resolved postcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub lat: f64,
    pub lng: f64,
    /// Canonical form as returned by the lookup service.
    pub postcode: String,
    pub parish: Option<String>,
    pub district: Option<String>,
}

impl GeoLocation {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Estimated travel between two points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelSegment {
    pub straight_miles: f64,
    pub driving_miles: f64,
    pub drive_minutes: u32,
    pub avg_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedStop {
    #[serde(flatten)]
    pub job: JobRequest,
    pub location: Option<GeoLocation>,
    /// Travel from the previous stop (or home base). Absent when either end is unlocated.
    pub travel: Option<TravelSegment>,
    pub duration_hours: f64,
    pub planned_start: ClockTime,
    pub planned_end: ClockTime,
}

impl PlannedStop {
    pub fn is_fixed(&self) -> bool {
        self.job.fixed_clock().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub route: Vec<PlannedStop>,
    pub total_drive_minutes: u32,
    pub total_drive_miles: f64,
    pub total_work_hours: f64,
    pub total_day_hours: f64,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub route_url: String,
    pub warnings: Vec<String>,
}

impl DayPlan {
    pub fn len(&self) -> usize {
        self.route.len()
    }

    pub fn is_empty(&self) -> bool {
        self.route.is_empty()
    }
}
