//! Trip and stop records.
//!
//! A [`Trip`] owns its ordered [`Stop`] sequence. Time fields stay as the raw
//! strings from the input until a metric needs them.

use serde::Deserialize;

use crate::error::ScheduleError;

pub const STARTING: &str = "starting";
pub const TERMINATING: &str = "terminating";

/// One station visit within a trip.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Stop {
    pub location: Option<String>,
    pub gbtt_pta: Option<String>,
    pub gbtt_ptd: Option<String>,
    pub actual_ta: Option<String>,
    pub actual_td: Option<String>,

    #[serde(skip)]
    pub travel_time: f64,
    #[serde(skip)]
    pub travel_time_predicted: f64,
    #[serde(skip)]
    pub dwell_time: f64,
    #[serde(skip)]
    pub dwell_time_predicted: f64,
}

impl Stop {
    /// Location as a grouping key. Stops without one take no part in
    /// station or OD grouping.
    pub fn station(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// The five raw columns of the stop table, in input order.
    pub fn cells(&self) -> [Option<&str>; 5] {
        [
            self.location.as_deref(),
            self.gbtt_pta.as_deref(),
            self.gbtt_ptd.as_deref(),
            self.actual_ta.as_deref(),
            self.actual_td.as_deref(),
        ]
    }

    /// The scheduled and actual time columns only.
    pub fn time_cells(&self) -> [Option<&str>; 4] {
        [
            self.gbtt_ptd.as_deref(),
            self.gbtt_pta.as_deref(),
            self.actual_td.as_deref(),
            self.actual_ta.as_deref(),
        ]
    }
}

/// One journey with its ordered stops and bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub date: String,
    pub origin: String,
    pub destination: String,
    /// Stop count as declared by the input metadata.
    pub stops: u32,
    schedule: Vec<Stop>,
    pub percentage_null: f64,
    pub duplicate: bool,
}

impl Trip {
    /// Builds a trip, rejecting an empty stop sequence.
    pub fn new(
        date: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        stops: u32,
        schedule: Vec<Stop>,
    ) -> Result<Self, ScheduleError> {
        let (date, origin, destination) = (date.into(), origin.into(), destination.into());

        if schedule.is_empty() {
            return Err(ScheduleError::EmptySchedule {
                date,
                origin,
                destination,
            });
        }

        Ok(Self {
            date,
            origin,
            destination,
            stops,
            schedule,
            percentage_null: 0.0,
            duplicate: false,
        })
    }

    pub fn schedule(&self) -> &[Stop] {
        &self.schedule
    }

    pub fn schedule_mut(&mut self) -> &mut [Stop] {
        &mut self.schedule
    }

    /// Overwrites the first stop's arrivals and the last stop's departures
    /// with the `starting` / `terminating` sentinels.
    pub fn mark_terminals(&mut self) {
        if let Some(first) = self.schedule.first_mut() {
            first.actual_ta = Some(STARTING.to_string());
            first.gbtt_pta = Some(STARTING.to_string());
        }
        if let Some(last) = self.schedule.last_mut() {
            last.actual_td = Some(TERMINATING.to_string());
            last.gbtt_ptd = Some(TERMINATING.to_string());
        }
    }

    /// Station identifiers joined into one comparable value.
    pub fn location_sequence(&self) -> String {
        itertools::join(
            self.schedule.iter().map(|stop| stop.station().unwrap_or_default()),
            "\n",
        )
    }

    /// Consecutive `(origin, destination)` station pairs. A pair with an
    /// unnamed end is skipped.
    pub fn od_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.schedule
            .windows(2)
            .filter_map(|pair| Some((pair[0].station()?, pair[1].station()?)))
    }
}

/// True for any present string with a non-blank value. Sentinels pass this
/// check.
pub fn is_valid_time_string(value: Option<&str>) -> bool {
    !is_missing(value)
}

/// True for absent, empty or all-whitespace cells.
pub fn is_missing(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
