//! Straight-line distance to driving distance and time.
//!
//! Roads are modelled as a constant winding factor over the great-circle
//! distance, with an average speed chosen by trip length. Short hops run at
//! lane speeds, longer trips get onto main roads.

use crate::config::{PlannerConfig, SpeedBrackets};
use crate::haversine::{distance_miles, Coordinates};
use crate::model::TravelSegment;

#[derive(Debug, Clone)]
pub struct DriveTimeEstimator {
    pub winding_factor: f64,
    pub speeds: SpeedBrackets,
}

impl DriveTimeEstimator {
    pub fn new(winding_factor: f64, speeds: SpeedBrackets) -> Self {
        Self {
            winding_factor,
            speeds,
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.winding_factor, config.speeds.clone())
    }

    /// Estimate a segment from a straight-line distance in miles.
    pub fn estimate(&self, straight_miles: f64) -> TravelSegment {
        let driving_miles = straight_miles * self.winding_factor;
        let avg_speed = self.speeds.speed_for(driving_miles);
        let drive_minutes = if avg_speed > 0.0 {
            (driving_miles / avg_speed * 60.0).round().max(0.0) as u32
        } else {
            0
        };

        TravelSegment {
            straight_miles: round_1dp(straight_miles),
            driving_miles: round_1dp(driving_miles),
            drive_minutes,
            avg_speed,
        }
    }

    /// Estimate the drive between two coordinates.
    pub fn between(&self, from: Coordinates, to: Coordinates) -> TravelSegment {
        self.estimate(distance_miles(from, to))
    }
}

pub(crate) fn round_1dp(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
