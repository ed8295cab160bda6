//! Residual missing-data measurement.
//!
//! There is no fill-in strategy yet, so [`reconcile`] measures once and
//! reports instead of looping until the dataset is complete.

use crate::analyzers::types::{MissingDataRecord, Reconciliation};
use crate::schedule::{Stop, Trip, is_missing};

/// Counts missing cells in the scheduled and actual time columns of every
/// trip.
pub fn total_null(trips: &[Trip]) -> usize {
    trips
        .iter()
        .flat_map(Trip::schedule)
        .flat_map(Stop::time_cells)
        .filter(|cell| is_missing(*cell))
        .count()
}

/// One record for every stop after the first whose actual arrival is
/// missing.
pub fn extract_missing_data(trips: &[Trip]) -> Vec<MissingDataRecord> {
    let mut records = Vec::new();

    for (trip_index, trip) in trips.iter().enumerate() {
        for (j, pair) in trip.schedule().windows(2).enumerate() {
            let (prev, curr) = (&pair[0], &pair[1]);
            if !is_missing(curr.actual_ta.as_deref()) {
                continue;
            }

            records.push(MissingDataRecord {
                origin: prev.station().unwrap_or_default().to_string(),
                destination: curr.station().unwrap_or_default().to_string(),
                actual_departure_prev_station: prev.actual_td.clone(),
                actual_arrival: curr.actual_ta.clone(),
                actual_departure_current_station: curr.actual_td.clone(),
                trip_index,
                stop_index: j + 1,
                average_actual_travel_time: 0.0,
                average_predicted_travel_time: 0.0,
                average_dwell_time: 0.0,
                average_predicted_dwell_time: 0.0,
            });
        }
    }

    records
}

/// Stops at zero missing time cells, otherwise returns the diagnostics.
pub fn reconcile(trips: &[Trip]) -> Reconciliation {
    let total_null = total_null(trips);
    if total_null == 0 {
        return Reconciliation::Reconciled;
    }

    Reconciliation::Unresolved {
        total_null,
        records: extract_missing_data(trips),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_dataset_is_reconciled() {
        let trips = vec![create_trip(), create_trip()];
        assert_eq!(total_null(&trips), 0);
        assert_eq!(reconcile(&trips), Reconciliation::Reconciled);
    }

    #[test]
    fn test_total_null_ignores_location() {
        let mut trip = create_trip();
        trip.schedule_mut()[1].location = None;
        trip.schedule_mut()[1].gbtt_pta = Some(" ".to_string());
        trip.schedule_mut()[2].actual_ta = None;

        assert_eq!(total_null(&[trip]), 2);
    }

    #[test]
    fn test_unresolved_report_pinpoints_missing_arrivals() {
        let mut first = create_trip();
        first.schedule_mut()[2].gbtt_ptd = None;
        let mut second = create_trip();
        second.schedule_mut()[1].actual_ta = None;
        second.schedule_mut()[2].actual_ta = Some(String::new());

        let report = reconcile(&[first, second]);

        assert_eq!(report.total_null(), 3);
        let records = report.records();
        assert_eq!(records.len(), 2);

        let r = &records[0];
        assert_eq!((r.origin.as_str(), r.destination.as_str()), ("A", "B"));
        assert_eq!(r.trip_index, 1);
        assert_eq!(r.stop_index, 1);
        assert_eq!(r.actual_departure_prev_station.as_deref(), Some("0801"));
        assert_eq!(r.actual_arrival, None);
        assert_eq!(r.actual_departure_current_station.as_deref(), Some("0811"));
        assert_eq!(r.average_actual_travel_time, 0.0);
        assert_eq!(r.average_predicted_dwell_time, 0.0);

        assert_eq!(records[1].stop_index, 2);
        assert_eq!(records[1].actual_arrival.as_deref(), Some(""));
    }

    #[test]
    fn test_missing_departure_alone_yields_no_record() {
        let mut trip = create_trip();
        trip.schedule_mut()[1].actual_td = None;

        let report = reconcile(&[trip]);
        assert_eq!(report.total_null(), 1);
        assert!(report.records().is_empty());
    }

    fn create_trip() -> Trip {
        let stop = |location: &str, arrival: &str, departure: &str| Stop {
            location: Some(location.to_string()),
            gbtt_pta: Some(arrival.to_string()),
            gbtt_ptd: Some(departure.to_string()),
            actual_ta: Some(arrival.to_string()),
            actual_td: Some(departure.to_string()),
            ..Default::default()
        };
        let mut trip = Trip::new(
            "2016-01-04",
            "A",
            "C",
            3,
            vec![
                stop("A", "", "0801"),
                stop("B", "0809", "0811"),
                stop("C", "0830", ""),
            ],
        )
        .unwrap();
        trip.mark_terminals();
        trip
    }
}
