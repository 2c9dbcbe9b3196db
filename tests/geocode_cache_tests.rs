//! Cached geocoder behaviour against an in-memory lookup.

mod fixtures;

use std::sync::Arc;
use std::thread;

use day_route_planner::geocode_cache::{CacheEntry, CachedGeocoder, GeocodeCache};
use day_route_planner::traits::Geocoder;

use fixtures::{FakeLookup, FIRST_TOWER, GOREY, ROZEL, ST_AUBIN, ST_CLEMENT, TRINITY};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[test]
fn bulk_results_follow_input_order() {
    let geocoder = CachedGeocoder::new(FakeLookup::new(&[GOREY, ST_AUBIN]));
    let input = strings(&["JE3 8AB", "XX1 1XX", "JE3 6DR"]);

    let results = geocoder.geocode_many(&input);

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().postcode, ST_AUBIN.postcode);
    assert!(results[1].is_none());
    assert_eq!(results[2].as_ref().unwrap().postcode, GOREY.postcode);
}

#[test]
fn blanks_and_duplicates_are_handled_without_extra_queries() {
    let geocoder = CachedGeocoder::new(FakeLookup::new(&[GOREY]));
    let input = strings(&["JE3 6DR", "", "je36dr", "XX1 1XX", "   ", " JE3  6DR "]);

    let results = geocoder.geocode_many(&input);

    assert_eq!(results.len(), input.len());
    assert!(results[0].is_some());
    assert!(results[1].is_none());
    assert!(results[2].is_some());
    assert!(results[3].is_none());
    assert!(results[4].is_none());
    assert!(results[5].is_some());

    let lookup = geocoder.lookup();
    assert_eq!(lookup.batch_calls(), 1);
    assert_eq!(lookup.batches(), vec![strings(&["JE36DR", "XX11XX"])]);
}

#[test]
fn warm_cache_makes_bulk_lookup_idempotent() {
    let geocoder = CachedGeocoder::new(FakeLookup::new(&[GOREY, TRINITY, ROZEL]));
    let input = strings(&["JE3 5JB", "JE3 6AN", "ZZ9 9ZZ", "JE3 6DR"]);

    let first = geocoder.geocode_many(&input);
    let calls_after_first = geocoder.lookup().total_calls();
    let second = geocoder.geocode_many(&input);

    assert_eq!(calls_after_first, 1);
    assert_eq!(geocoder.lookup().total_calls(), calls_after_first);
    assert_eq!(first, second);
}

#[test]
fn misses_are_cached_as_not_found() {
    let geocoder = CachedGeocoder::new(FakeLookup::new(&[GOREY]));

    assert!(geocoder.geocode("XX1 1XX").is_none());
    assert!(geocoder.geocode("xx11xx").is_none());

    assert_eq!(geocoder.lookup().single_calls(), 1);
    assert_eq!(geocoder.cache().get("XX11XX"), Some(CacheEntry::NotFound));
}

#[test]
fn service_failures_degrade_to_not_found() {
    let geocoder = CachedGeocoder::new(FakeLookup::failing());

    assert!(geocoder.geocode("JE3 6DR").is_none());
    let results = geocoder.geocode_many(&strings(&["JE3 6DR", "JE3 5JB"]));
    assert_eq!(results, vec![None, None]);

    // The single lookup's miss was already cached; only JE3 5JB went out in the batch.
    assert_eq!(geocoder.lookup().single_calls(), 1);
    assert_eq!(geocoder.lookup().batches(), vec![strings(&["JE35JB"])]);

    geocoder.geocode_many(&strings(&["JE3 6DR", "JE3 5JB"]));
    assert_eq!(geocoder.lookup().total_calls(), 2);
}

#[test]
fn blank_single_lookup_never_queries() {
    let geocoder = CachedGeocoder::new(FakeLookup::new(&[GOREY]));
    assert!(geocoder.geocode("  ").is_none());
    assert_eq!(geocoder.lookup().total_calls(), 0);
    assert!(geocoder.cache().is_empty());
}

#[test]
fn large_inputs_are_chunked() {
    let locations = [GOREY, ST_AUBIN, TRINITY, ROZEL, ST_CLEMENT];
    let geocoder = CachedGeocoder::new(FakeLookup::new(&locations).with_max_batch(2));
    let input: Vec<String> = locations.iter().map(|location| location.postcode.to_string()).collect();

    let results = geocoder.geocode_many(&input);

    assert!(results.iter().all(Option::is_some));
    let batches = geocoder.lookup().batches();
    assert_eq!(batches.len(), 3);
    assert!(batches.iter().all(|batch| batch.len() <= 2));
    for (location, result) in locations.iter().zip(&results) {
        assert_eq!(result.as_ref().unwrap().postcode, location.postcode);
    }
}

#[test]
fn single_lookup_warms_bulk_cache() {
    let geocoder = CachedGeocoder::new(FakeLookup::new(&[FIRST_TOWER]));

    let single = geocoder.geocode("JE2 3NN");
    let bulk = geocoder.geocode_many(&strings(&["je2 3nn"]));

    assert_eq!(bulk, vec![single]);
    assert_eq!(geocoder.lookup().batch_calls(), 0);
}

#[test]
fn prebuilt_cache_is_consulted() {
    let cache = GeocodeCache::new();
    cache.insert("JE36DR".to_string(), CacheEntry::Found(GOREY.geo()));
    let geocoder = CachedGeocoder::with_cache(FakeLookup::failing(), cache);

    assert_eq!(geocoder.geocode("JE3 6DR"), Some(GOREY.geo()));
    assert_eq!(geocoder.lookup().total_calls(), 0);
}

#[test]
fn concurrent_planners_share_one_cache() {
    let locations = [GOREY, ST_AUBIN, TRINITY, ROZEL];
    let geocoder = Arc::new(CachedGeocoder::new(FakeLookup::new(&locations)));
    let input = strings(&["JE3 6DR", "JE3 8AB", "XX1 1XX", "JE3 5JB", "JE3 6AN"]);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let geocoder = Arc::clone(&geocoder);
            let input = input.clone();
            thread::spawn(move || geocoder.geocode_many(&input))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();

    for result in &results {
        assert_eq!(result, &results[0]);
    }
    assert_eq!(geocoder.cache().len(), 5);

    // Once warm, nothing else goes out.
    let calls = geocoder.lookup().total_calls();
    geocoder.geocode_many(&input);
    assert_eq!(geocoder.lookup().total_calls(), calls);
}
