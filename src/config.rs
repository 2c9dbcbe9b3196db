//! Planner configuration.
//!
//! Every field has a default so a partial JSON document is enough to
//! override just what differs for a given business.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::haversine::Coordinates;

/// Average speeds by trip length, used to turn driving miles into minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedBrackets {
    /// Speed for trips shorter than `short_trip_miles`.
    pub rural_mph: f64,
    /// Speed for trips shorter than `mid_trip_miles`.
    pub moderate_mph: f64,
    /// Speed for everything longer.
    pub main_road_mph: f64,
    pub short_trip_miles: f64,
    pub mid_trip_miles: f64,
}

impl Default for SpeedBrackets {
    fn default() -> Self {
        Self {
            rural_mph: 22.0,
            moderate_mph: 30.0,
            main_road_mph: 40.0,
            short_trip_miles: 3.0,
            mid_trip_miles: 8.0,
        }
    }
}

impl SpeedBrackets {
    /// Pick the average speed for a trip of `driving_miles`.
    pub fn speed_for(&self, driving_miles: f64) -> f64 {
        if driving_miles < self.short_trip_miles {
            self.rural_mph
        } else if driving_miles < self.mid_trip_miles {
            self.moderate_mph
        } else {
            self.main_road_mph
        }
    }
}

/// Service name to on-site duration in hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDurations {
    pub hours: HashMap<String, f64>,
    /// Used for services missing from `hours`.
    pub default_hours: f64,
}

impl Default for ServiceDurations {
    fn default() -> Self {
        let hours = [
            ("inspection", 0.5),
            ("service", 1.0),
            ("repair", 2.0),
            ("installation", 4.0),
        ]
        .into_iter()
        .map(|(name, hours)| (name.to_string(), hours))
        .collect();

        Self {
            hours,
            default_hours: 1.0,
        }
    }
}

impl ServiceDurations {
    /// Duration in hours, matching service names case-insensitively.
    pub fn hours_for(&self, service: &str) -> f64 {
        let service = service.trim();
        self.hours
            .get(service)
            .or_else(|| {
                self.hours
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(service))
                    .map(|(_, hours)| hours)
            })
            .copied()
            .unwrap_or(self.default_hours)
    }

    pub fn minutes_for(&self, service: &str) -> u32 {
        (self.hours_for(service) * 60.0).round().max(0.0) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Where every day starts and ends.
    pub home_base: Coordinates,
    /// Label used as the navigation origin; coordinates are used when absent.
    pub home_postcode: Option<String>,
    /// Straight-line to road distance multiplier.
    pub winding_factor: f64,
    pub speeds: SpeedBrackets,
    pub day_start_hour: u32,
    pub day_end_hour: u32,
    pub max_jobs_per_day: usize,
    /// Slack reserved between a flexible job and the next fixed appointment.
    pub fixed_travel_buffer_minutes: u32,
    /// How many fixed appointments may push back a flexible job before it is reported.
    pub max_deferrals: u32,
    pub service_durations: ServiceDurations,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            home_base: Coordinates::new(49.1858, -2.1100),
            home_postcode: None,
            winding_factor: 1.4,
            speeds: SpeedBrackets::default(),
            day_start_hour: 8,
            day_end_hour: 17,
            max_jobs_per_day: 6,
            fixed_travel_buffer_minutes: 30,
            max_deferrals: 3,
            service_durations: ServiceDurations::default(),
        }
    }
}

impl PlannerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.home_base.lat.is_finite() || !self.home_base.lng.is_finite() {
            return Err(ConfigError::invalid("home_base must be finite coordinates"));
        }
        if !self.winding_factor.is_finite() || self.winding_factor <= 0.0 {
            return Err(ConfigError::invalid("winding_factor must be positive"));
        }
        if self.winding_factor < 1.0 {
            tracing::warn!(
                winding_factor = self.winding_factor,
                "winding factor below 1.0 makes roads shorter than straight lines"
            );
        }

        let speeds = [
            ("rural_mph", self.speeds.rural_mph),
            ("moderate_mph", self.speeds.moderate_mph),
            ("main_road_mph", self.speeds.main_road_mph),
            ("short_trip_miles", self.speeds.short_trip_miles),
            ("mid_trip_miles", self.speeds.mid_trip_miles),
        ];
        for (name, value) in speeds {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(format!("{name} must be a non-negative number")));
            }
        }

        if self.day_start_hour > 23 || self.day_end_hour > 24 {
            return Err(ConfigError::invalid("working day hours must be within 0..=24"));
        }
        if self.day_end_hour <= self.day_start_hour {
            return Err(ConfigError::invalid(format!(
                "day_end_hour ({}) must be after day_start_hour ({})",
                self.day_end_hour, self.day_start_hour
            )));
        }

        if self.max_deferrals == 0 {
            return Err(ConfigError::invalid("max_deferrals must be at least 1"));
        }

        let durations = &self.service_durations;
        if !durations.default_hours.is_finite() || durations.default_hours < 0.0 {
            return Err(ConfigError::invalid("default service duration must be non-negative"));
        }
        if let Some((name, _)) = durations
            .hours
            .iter()
            .find(|(_, hours)| !hours.is_finite() || **hours < 0.0)
        {
            return Err(ConfigError::invalid(format!(
                "duration for service '{name}' must be non-negative"
            )));
        }

        Ok(())
    }

    pub fn day_start_minute(&self) -> u32 {
        self.day_start_hour * 60
    }

    pub fn day_end_minute(&self) -> u32 {
        self.day_end_hour * 60
    }
}
