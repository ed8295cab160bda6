//! Data types produced by the aggregation and reconciliation stages.

use serde::Serialize;

/// One stop's dwell values, flattened out of its trip.
#[derive(Debug, Clone, PartialEq)]
pub struct DwellObservation {
    pub station: String,
    pub dwell_time: f64,
    pub dwell_time_predicted: f64,
}

/// One consecutive stop pair's travel values, flattened out of its trip.
#[derive(Debug, Clone, PartialEq)]
pub struct OdObservation {
    pub origin: String,
    pub destination: String,
    pub travel_time: f64,
    pub travel_time_predicted: f64,
}

/// Dwell totals and averages for a single station across all trips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationDwellSummary {
    pub station: String,
    pub total_dwell_time: f64,
    pub total_dwell_time_predicted: f64,
    pub average_dwell_time: Option<f64>,
    pub average_dwell_time_predicted: Option<f64>,
}

impl StationDwellSummary {
    /// True when every aggregate is exactly zero.
    pub fn is_all_zero(&self) -> bool {
        self.total_dwell_time == 0.0
            && self.total_dwell_time_predicted == 0.0
            && self.average_dwell_time == Some(0.0)
            && self.average_dwell_time_predicted == Some(0.0)
    }
}

/// A trip holding a dwell value beyond the rollover threshold.
///
/// `trip_index` is the trip's position in the dataset the dwell values were
/// extracted from, before unreliable OD pairs are dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeValueTrip {
    pub trip_index: usize,
    pub date: String,
    pub origin: String,
    pub destination: String,
}

/// Travel totals and averages for one origin-destination pair.
///
/// An average of `None` means no valid sample contributed to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OdPairSummary {
    pub origin: String,
    pub destination: String,
    pub samples: usize,
    pub total_travel_time: f64,
    pub average_travel_time: Option<f64>,
    pub total_travel_time_predicted: f64,
    pub average_travel_time_predicted: Option<f64>,
}

impl OdPairSummary {
    pub fn is_unreliable(&self) -> bool {
        self.average_travel_time.is_none()
    }
}

/// A stop whose actual arrival is still missing after cleaning.
///
/// The four averages are placeholders for a future fill-in step and are
/// always zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingDataRecord {
    pub origin: String,
    pub destination: String,
    pub actual_departure_prev_station: Option<String>,
    pub actual_arrival: Option<String>,
    pub actual_departure_current_station: Option<String>,
    pub trip_index: usize,
    pub stop_index: usize,
    pub average_actual_travel_time: f64,
    pub average_predicted_travel_time: f64,
    pub average_dwell_time: f64,
    pub average_predicted_dwell_time: f64,
}

/// Result of measuring residual missing values.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// No time cell is missing.
    Reconciled,
    /// Missing time cells remain; `records` pinpoints missing actual arrivals.
    Unresolved {
        total_null: usize,
        records: Vec<MissingDataRecord>,
    },
}

impl Reconciliation {
    pub fn total_null(&self) -> usize {
        match self {
            Reconciliation::Reconciled => 0,
            Reconciliation::Unresolved { total_null, .. } => *total_null,
        }
    }

    pub fn records(&self) -> &[MissingDataRecord] {
        match self {
            Reconciliation::Reconciled => &[],
            Reconciliation::Unresolved { records, .. } => records,
        }
    }
}
