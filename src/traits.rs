//! Seams between the deterministic planner and the outside world.
//!
//! The planner only ever sees a [`Geocoder`]. Production wires a
//! [`PostcodeLookup`] (the HTTP client) behind the cache; tests can hand the
//! planner an in-memory geocoder and never touch the network.

use crate::error::GeocodeError;
use crate::model::GeoLocation;

/// Raw access to a postcode lookup service.
///
/// Implementations report failures as errors and let the caller decide what
/// to cache. `Ok(None)` means the service answered "no such postcode".
pub trait PostcodeLookup {
    /// Look up one normalized postcode.
    fn lookup(&self, postcode: &str) -> Result<Option<GeoLocation>, GeocodeError>;

    /// Look up several normalized postcodes in one request.
    ///
    /// The result is parallel to `postcodes`.
    fn lookup_batch(&self, postcodes: &[String]) -> Result<Vec<Option<GeoLocation>>, GeocodeError>;

    /// Largest batch a single `lookup_batch` call accepts.
    fn max_batch_size(&self) -> usize {
        100
    }
}

/// Resolves postcodes to locations without ever failing.
///
/// Anything that cannot be resolved comes back as `None`.
pub trait Geocoder {
    fn geocode(&self, postcode: &str) -> Option<GeoLocation>;

    /// Resolve many postcodes; the result has the same length and order as the input.
    fn geocode_many(&self, postcodes: &[String]) -> Vec<Option<GeoLocation>> {
        postcodes.iter().map(|postcode| self.geocode(postcode)).collect()
    }
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn geocode(&self, postcode: &str) -> Option<GeoLocation> {
        (**self).geocode(postcode)
    }

    fn geocode_many(&self, postcodes: &[String]) -> Vec<Option<GeoLocation>> {
        (**self).geocode_many(postcodes)
    }
}

impl<G: Geocoder + ?Sized> Geocoder for std::sync::Arc<G> {
    fn geocode(&self, postcode: &str) -> Option<GeoLocation> {
        (**self).geocode(postcode)
    }

    fn geocode_many(&self, postcodes: &[String]) -> Vec<Option<GeoLocation>> {
        (**self).geocode_many(postcodes)
    }
}
