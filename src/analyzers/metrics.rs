//! Travel and dwell time extraction.

use crate::error::{ParseError, ScheduleError};
use crate::schedule::{Stop, Trip, is_valid_time_string};
use crate::time::time_difference_minutes;

/// Actual and scheduled values for one derived metric, one entry per stop.
#[derive(Debug, Default, PartialEq)]
struct MetricSeries {
    actual: Vec<f64>,
    predicted: Vec<f64>,
}

/// `to - from` when both fields hold a non-blank value, otherwise 0.
fn difference_or_zero(
    from: Option<&str>,
    to: Option<&str>,
    rollover_threshold: f64,
) -> Result<f64, ParseError> {
    if !(is_valid_time_string(from) && is_valid_time_string(to)) {
        return Ok(0.0);
    }

    match (from, to) {
        (Some(from), Some(to)) => time_difference_minutes(from, to, rollover_threshold),
        _ => Ok(0.0),
    }
}

/// Travel time at `j + 1` runs from departure at `j` to arrival at `j + 1`.
/// The first stop has no predecessor and keeps 0.
fn travel_times(
    schedule: &[Stop],
    trip_index: usize,
    rollover_threshold: f64,
) -> Result<MetricSeries, ScheduleError> {
    let mut series = MetricSeries {
        actual: vec![0.0; schedule.len()],
        predicted: vec![0.0; schedule.len()],
    };

    for (j, pair) in schedule.windows(2).enumerate() {
        let (prev, curr) = (&pair[0], &pair[1]);
        let context = |source| ScheduleError::InvalidStopTime {
            trip_index,
            stop_index: j + 1,
            source,
        };

        series.actual[j + 1] = difference_or_zero(
            prev.actual_td.as_deref(),
            curr.actual_ta.as_deref(),
            rollover_threshold,
        )
        .map_err(context)?;
        series.predicted[j + 1] = difference_or_zero(
            prev.gbtt_ptd.as_deref(),
            curr.gbtt_pta.as_deref(),
            rollover_threshold,
        )
        .map_err(context)?;
    }

    Ok(series)
}

/// Dwell time at an interior stop runs from its arrival to its departure.
/// Terminal stops keep 0.
fn dwell_times(
    schedule: &[Stop],
    trip_index: usize,
    rollover_threshold: f64,
) -> Result<MetricSeries, ScheduleError> {
    let n = schedule.len();
    let mut series = MetricSeries {
        actual: vec![0.0; n],
        predicted: vec![0.0; n],
    };

    for stop_index in 1..n.saturating_sub(1) {
        let stop = &schedule[stop_index];
        let context = |source| ScheduleError::InvalidStopTime {
            trip_index,
            stop_index,
            source,
        };

        series.actual[stop_index] = difference_or_zero(
            stop.actual_ta.as_deref(),
            stop.actual_td.as_deref(),
            rollover_threshold,
        )
        .map_err(context)?;
        series.predicted[stop_index] = difference_or_zero(
            stop.gbtt_pta.as_deref(),
            stop.gbtt_ptd.as_deref(),
            rollover_threshold,
        )
        .map_err(context)?;
    }

    Ok(series)
}

/// Computes actual and predicted travel and dwell times for every stop of
/// `trip` and stores them on the stops.
///
/// Both passes read the unmodified stop table; nothing is written back
/// unless both succeed.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidStopTime`] when a non-blank time field is
/// not a valid `HHMM` string.
pub fn calculate_metrics(
    trip: &mut Trip,
    trip_index: usize,
    rollover_threshold: f64,
) -> Result<(), ScheduleError> {
    let travel = travel_times(trip.schedule(), trip_index, rollover_threshold)?;
    let dwell = dwell_times(trip.schedule(), trip_index, rollover_threshold)?;

    for (i, stop) in trip.schedule_mut().iter_mut().enumerate() {
        stop.travel_time = travel.actual[i];
        stop.travel_time_predicted = travel.predicted[i];
        stop.dwell_time = dwell.actual[i];
        stop.dwell_time_predicted = dwell.predicted[i];
    }

    Ok(())
}
