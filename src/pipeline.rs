//! Runs the cleaning stages over a full trip dataset.

use serde::Serialize;
use tracing::{info, warn};

use crate::analyzers::aggregate::{
    drop_unreliable_pairs, dwell_observations, od_observations, od_pair_summary,
    station_dwell_summary,
};
use crate::analyzers::metrics::calculate_metrics;
use crate::analyzers::quality::{
    UniqueTrip, drop_incomplete, mark_duplicates, missing_percentage, unique_trips,
};
use crate::analyzers::reconcile::reconcile;
use crate::analyzers::types::{
    ExtremeValueTrip, OdPairSummary, Reconciliation, StationDwellSummary,
};
use crate::config::PipelineConfig;
use crate::error::ScheduleError;
use crate::schedule::Trip;

/// Row counts gathered while the pipeline runs.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PipelineSummary {
    pub input_trips: usize,
    pub incomplete_trips_dropped: usize,
    pub duplicate_trips: usize,
    pub unique_trips: usize,
    pub extreme_value_trips: usize,
    pub stations: usize,
    pub od_pairs: usize,
    pub unreliable_od_pairs: usize,
    pub unreliable_trips_dropped: usize,
    pub cleaned_trips: usize,
    pub total_null: usize,
    pub missing_data_records: usize,
}

/// Every artifact produced by [`process_historical_data`].
#[derive(Debug)]
pub struct PipelineOutput {
    pub trips: Vec<Trip>,
    pub unique_trips: Vec<UniqueTrip>,
    pub station_dwell: Vec<StationDwellSummary>,
    pub od_pairs: Vec<OdPairSummary>,
    pub extreme_value_trips: Vec<ExtremeValueTrip>,
    pub reconciliation: Reconciliation,
    pub summary: PipelineSummary,
}

/// Marks terminals, filters incomplete trips, derives travel and dwell
/// times, detects duplicates, aggregates per station and OD pair, drops
/// trips over unreliable pairs and measures the remaining gaps.
///
/// # Errors
///
/// Fails only when a non-blank time field is not a valid `HHMM` string.
#[tracing::instrument(skip_all, fields(trips = trips.len()))]
pub fn process_historical_data(
    mut trips: Vec<Trip>,
    config: &PipelineConfig,
) -> Result<PipelineOutput, ScheduleError> {
    let mut summary = PipelineSummary {
        input_trips: trips.len(),
        ..Default::default()
    };

    info!("Setting arrival/departure time for starting/terminating stations");
    for trip in trips.iter_mut() {
        trip.mark_terminals();
    }

    info!("Calculating missing data percentages");
    for trip in trips.iter_mut() {
        trip.percentage_null = missing_percentage(trip);
    }

    info!(
        threshold = config.missing_data_threshold,
        "Dropping trips with too much missing data"
    );
    let mut trips = drop_incomplete(trips, config.missing_data_threshold);
    summary.incomplete_trips_dropped = summary.input_trips - trips.len();

    info!("Feature engineering actual and predicted travel and dwell times");
    for (i, trip) in trips.iter_mut().enumerate() {
        calculate_metrics(trip, i, config.rollover_threshold_minutes)?;
    }

    info!("Extracting trips to find unique ones");
    summary.duplicate_trips = mark_duplicates(&mut trips);
    let unique_trips = unique_trips(&trips);
    summary.unique_trips = unique_trips.len();

    info!("Extracting dwell times for each station");
    let (dwell, extreme_value_index) =
        dwell_observations(&trips, config.rollover_threshold_minutes);
    let extreme_value_trips: Vec<ExtremeValueTrip> = extreme_value_index
        .into_iter()
        .map(|i| ExtremeValueTrip {
            trip_index: i,
            date: trips[i].date.clone(),
            origin: trips[i].origin.clone(),
            destination: trips[i].destination.clone(),
        })
        .collect();
    summary.extreme_value_trips = extreme_value_trips.len();
    if !extreme_value_trips.is_empty() {
        warn!(
            count = extreme_value_trips.len(),
            threshold = config.rollover_threshold_minutes,
            "Trips with extreme dwell times"
        );
    }

    info!("Calculating summary statistics for dwell times");
    let station_dwell = station_dwell_summary(&dwell);
    summary.stations = station_dwell.len();

    info!("Calculating summary statistics for travel times");
    let od_pairs = od_pair_summary(&od_observations(&trips));
    summary.od_pairs = od_pairs.len();
    summary.unreliable_od_pairs = od_pairs.iter().filter(|p| p.is_unreliable()).count();

    info!(
        unreliable = summary.unreliable_od_pairs,
        "Dropping trips over OD pairs without valid travel times"
    );
    let before = trips.len();
    let trips = drop_unreliable_pairs(trips, &od_pairs);
    summary.unreliable_trips_dropped = before - trips.len();
    summary.cleaned_trips = trips.len();

    info!("Computing residual missing data");
    let reconciliation = reconcile(&trips);
    summary.total_null = reconciliation.total_null();
    summary.missing_data_records = reconciliation.records().len();
    info!(total_null = summary.total_null, "Total null values");
    if let Reconciliation::Unresolved { records, .. } = &reconciliation {
        warn!(
            records = records.len(),
            "Missing data remains and no fill-in step is available"
        );
    }

    Ok(PipelineOutput {
        trips,
        unique_trips,
        station_dwell,
        od_pairs,
        extreme_value_trips,
        reconciliation,
        summary,
    })
}
