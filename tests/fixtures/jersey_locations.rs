//! Jersey locations for test fixtures.
//!
//! Coordinates are approximate; tests only rely on their relative distances.

use day_route_planner::haversine::Coordinates;
use day_route_planner::GeoLocation;

/// Miles per degree of latitude at the haversine Earth radius.
pub const MILES_PER_DEGREE_LAT: f64 = 3958.8 * std::f64::consts::PI / 180.0;

/// Home base in St Helier.
pub const HOME: Coordinates = Coordinates::new(49.1858, -2.1100);

/// A named postcode with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub postcode: &'static str,
    pub parish: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, postcode: &'static str, parish: &'static str, lat: f64, lng: f64) -> Self {
        Self {
            name,
            postcode,
            parish,
            lat,
            lng,
        }
    }

    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    pub fn geo(&self) -> GeoLocation {
        GeoLocation {
            lat: self.lat,
            lng: self.lng,
            postcode: self.postcode.to_string(),
            parish: Some(self.parish.to_string()),
            district: Some("Jersey".to_string()),
        }
    }
}

pub const GOREY: Location = Location::new("Gorey Pier", "JE3 6DR", "Grouville", 49.1990, -2.0200);
pub const ST_AUBIN: Location = Location::new("St Aubin Harbour", "JE3 8AB", "St Brelade", 49.1880, -2.1680);
pub const ST_OUEN: Location = Location::new("St Ouen's Bay", "JE3 2FN", "St Ouen", 49.2290, -2.2380);
pub const TRINITY: Location = Location::new("Trinity Church", "JE3 5JB", "Trinity", 49.2390, -2.0930);
pub const ST_BRELADE: Location = Location::new("St Brelade's Bay", "JE3 8EF", "St Brelade", 49.1790, -2.1970);
pub const ROZEL: Location = Location::new("Rozel Harbour", "JE3 6AN", "St Martin", 49.2380, -2.0470);
pub const ST_CLEMENT: Location = Location::new("St Clement", "JE2 6RB", "St Clement", 49.1710, -2.0720);
pub const FIRST_TOWER: Location = Location::new("First Tower", "JE2 3NN", "St Helier", 49.1870, -2.1250);

pub const ALL: &[Location] = &[GOREY, ST_AUBIN, ST_OUEN, TRINITY, ST_BRELADE, ROZEL, ST_CLEMENT, FIRST_TOWER];

/// A location due north of home whose estimated drive is `driving_miles`
/// under `winding_factor`.
pub fn north_of_home(name: &'static str, postcode: &'static str, driving_miles: f64, winding_factor: f64) -> Location {
    let straight = driving_miles / winding_factor;
    Location::new(
        name,
        postcode,
        "Trinity",
        HOME.lat + straight / MILES_PER_DEGREE_LAT,
        HOME.lng,
    )
}
