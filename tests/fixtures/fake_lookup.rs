//! In-memory postcode lookup.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use day_route_planner::error::GeocodeError;
use day_route_planner::geocode_cache::normalize_postcode;
use day_route_planner::traits::PostcodeLookup;
use day_route_planner::GeoLocation;

use super::jersey_locations::Location;

/// Answers from a fixed table and records every request it receives.
pub struct FakeLookup {
    table: HashMap<String, GeoLocation>,
    failing: bool,
    max_batch: usize,
    single_calls: AtomicUsize,
    batch_calls: AtomicUsize,
    batches: Mutex<Vec<Vec<String>>>,
}

impl FakeLookup {
    pub fn new(locations: &[Location]) -> Self {
        let table = locations
            .iter()
            .map(|location| (normalize_postcode(location.postcode), location.geo()))
            .collect();

        Self {
            table,
            failing: false,
            max_batch: 100,
            single_calls: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Every request fails as if the service were down.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new(&[])
        }
    }

    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch;
        self
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.single_calls() + self.batch_calls()
    }

    /// Postcodes sent in each batch request, in order.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().clone()
    }
}

impl PostcodeLookup for FakeLookup {
    fn lookup(&self, postcode: &str) -> Result<Option<GeoLocation>, GeocodeError> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(GeocodeError::Status(503));
        }
        Ok(self.table.get(postcode).cloned())
    }

    fn lookup_batch(&self, postcodes: &[String]) -> Result<Vec<Option<GeoLocation>>, GeocodeError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().push(postcodes.to_vec());
        if self.failing {
            return Err(GeocodeError::Status(503));
        }
        if postcodes.len() > self.max_batch {
            return Err(GeocodeError::BatchTooLarge {
                size: postcodes.len(),
                max: self.max_batch,
            });
        }
        Ok(postcodes.iter().map(|postcode| self.table.get(postcode).cloned()).collect())
    }

    fn max_batch_size(&self) -> usize {
        self.max_batch
    }
}
