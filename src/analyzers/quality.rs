//! Missing-data filtering and duplicate detection.

use std::collections::HashSet;

use crate::schedule::{Stop, Trip, is_missing};

/// Trips with more missing cells than this percentage are dropped.
pub const DEFAULT_MISSING_DATA_THRESHOLD: f64 = 10.0;

/// Percentage of blank, whitespace-only or absent cells across the trip's
/// whole stop table.
pub fn missing_percentage(trip: &Trip) -> f64 {
    let (missing, total) = trip
        .schedule()
        .iter()
        .flat_map(Stop::cells)
        .fold((0usize, 0usize), |(missing, total), cell| {
            (missing + usize::from(is_missing(cell)), total + 1)
        });

    if total == 0 {
        0.0
    } else {
        missing as f64 / total as f64 * 100.0
    }
}

/// Keeps trips whose `percentage_null` is at most `threshold`.
pub fn drop_incomplete(trips: Vec<Trip>, threshold: f64) -> Vec<Trip> {
    trips
        .into_iter()
        .filter(|trip| trip.percentage_null <= threshold)
        .collect()
}

/// Flags every trip whose (origin, destination, stop count, location
/// sequence) was already seen earlier in the slice.
///
/// Returns the number of trips flagged.
pub fn mark_duplicates(trips: &mut [Trip]) -> usize {
    let mut seen = HashSet::new();
    let mut flagged = 0;

    for trip in trips.iter_mut() {
        let signature = (
            trip.origin.clone(),
            trip.destination.clone(),
            trip.stops,
            trip.location_sequence(),
        );
        trip.duplicate = !seen.insert(signature);
        flagged += usize::from(trip.duplicate);
    }

    flagged
}

/// A canonical trip without its date and bookkeeping columns.
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueTrip {
    pub origin: String,
    pub destination: String,
    pub stops: u32,
    pub schedule: Vec<Stop>,
}

impl From<&Trip> for UniqueTrip {
    fn from(trip: &Trip) -> Self {
        Self {
            origin: trip.origin.clone(),
            destination: trip.destination.clone(),
            stops: trip.stops,
            schedule: trip.schedule().to_vec(),
        }
    }
}

/// Non-duplicate trips, stably sorted by origin.
pub fn unique_trips(trips: &[Trip]) -> Vec<UniqueTrip> {
    let mut unique: Vec<UniqueTrip> = trips
        .iter()
        .filter(|trip| !trip.duplicate)
        .map(UniqueTrip::from)
        .collect();
    unique.sort_by(|a, b| a.origin.cmp(&b.origin));
    unique
}
