//! CSV reader for historical trip tables.
//!
//! Each outer row describes one trip; its `5.schedule_detail` cell holds the
//! trip's stop table as an embedded CSV document.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use tracing::debug;

use crate::error::ScheduleError;
use crate::schedule::{Stop, Trip};

/// One row of the outer trip table.
#[derive(Debug, Deserialize)]
pub struct TripRecord {
    #[serde(rename = "1.date")]
    pub date: String,
    #[serde(rename = "2.origin")]
    pub origin: String,
    #[serde(rename = "3.destination")]
    pub destination: String,
    #[serde(rename = "4.stops")]
    pub stops: u32,
    #[serde(rename = "5.schedule_detail")]
    pub schedule_detail: String,
}

impl TryFrom<TripRecord> for Trip {
    type Error = ScheduleError;

    fn try_from(record: TripRecord) -> Result<Self, Self::Error> {
        let schedule = parse_schedule_detail(&record.schedule_detail)?;
        Trip::new(
            record.date,
            record.origin,
            record.destination,
            record.stops,
            schedule,
        )
    }
}

/// Parses an embedded stop table.
///
/// Columns are matched by header name, so a leading unnamed index column and
/// any extra columns are ignored. Empty cells become `None`.
///
/// # Errors
///
/// Returns [`ScheduleError::MalformedDetail`] if the text is not a well-formed
/// CSV table.
pub fn parse_schedule_detail(detail: &str) -> Result<Vec<Stop>, ScheduleError> {
    let mut rdr = csv::Reader::from_reader(detail.as_bytes());
    let mut stops = Vec::new();

    for result in rdr.deserialize() {
        let stop: Stop = result?;
        stops.push(stop);
    }

    Ok(stops)
}

/// Reads up to `limit` trips from an outer trip table.
pub fn read_trips<R: Read>(reader: R, limit: Option<usize>) -> Result<Vec<Trip>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut trips = Vec::new();

    for (row, result) in rdr.deserialize().enumerate() {
        if limit.is_some_and(|limit| row >= limit) {
            break;
        }

        let record: TripRecord = result.with_context(|| format!("Invalid trip row {row}"))?;
        let trip = Trip::try_from(record).with_context(|| format!("Invalid trip row {row}"))?;
        trips.push(trip);
    }

    debug!(trips = trips.len(), "Trip table parsed");
    Ok(trips)
}

/// Opens `path` and reads its trips.
pub fn load_trips(path: &str, limit: Option<usize>) -> Result<Vec<Trip>> {
    let file = File::open(path).with_context(|| format!("Failed to open '{path}'"))?;
    read_trips(file, limit)
}
