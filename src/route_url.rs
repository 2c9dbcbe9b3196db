//! Multi-stop navigation links.

use crate::haversine::Coordinates;

const MAPS_BASE: &str = "https://www.google.com/maps";

/// Build a directions link from home base through `postcodes` in order.
///
/// With no stops this is a plain map view centred on home base. The last
/// postcode is the destination; the ones before it are waypoints.
pub fn build_route_url(home: Coordinates, home_label: Option<&str>, postcodes: &[String]) -> String {
    if postcodes.is_empty() {
        return format!("{MAPS_BASE}/@{:.6},{:.6},12z", home.lat, home.lng);
    }

    let origin = match home_label.map(str::trim).filter(|label| !label.is_empty()) {
        Some(label) => encode_segment(label),
        None => format!("{:.6},{:.6}", home.lat, home.lng),
    };

    let stops = postcodes
        .iter()
        .map(|postcode| encode_segment(postcode.trim()))
        .collect::<Vec<_>>()
        .join("/");

    format!("{MAPS_BASE}/dir/{origin}/{stops}")
}

/// Percent-encode one path segment; spaces become `+` as the maps site expects.
fn encode_segment(text: &str) -> String {
    urlencoding::encode(text).replace("%20", "+")
}
