//! Nearest-neighbour ordering of flexible jobs.
//!
//! Greedy: from home base, always drive to the closest unvisited job. This is
//! a quick approximation and makes no claim to the shortest possible tour; a
//! single far-flung job can leave the rest of the day zig-zagging.

use crate::haversine::{distance_miles, Coordinates};

/// A job to be ordered, identified by its position in the caller's job list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceItem {
    pub job_index: usize,
    pub location: Option<Coordinates>,
}

/// Order `items` by repeated nearest neighbour starting at `home`.
///
/// Returns job indices in visiting order. Ties go to the item that appears
/// first in `items`. Items without a location follow all located ones, in
/// their original relative order.
pub fn sequence_nearest_neighbor(home: Coordinates, items: &[SequenceItem]) -> Vec<usize> {
    let mut remaining: Vec<(usize, Coordinates)> = items
        .iter()
        .filter_map(|item| item.location.map(|location| (item.job_index, location)))
        .collect();
    let mut order = Vec::with_capacity(items.len());
    let mut current = home;

    while !remaining.is_empty() {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (position, (_, location)) in remaining.iter().enumerate() {
            let distance = distance_miles(current, *location);
            if distance < best_distance {
                best = position;
                best_distance = distance;
            }
        }

        let (job_index, location) = remaining.remove(best);
        order.push(job_index);
        current = location;
    }

    order.extend(
        items
            .iter()
            .filter(|item| item.location.is_none())
            .map(|item| item.job_index),
    );

    order
}
