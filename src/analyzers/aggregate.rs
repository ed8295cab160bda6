use crate::analyzers::types::{
    DwellObservation, OdObservation, OdPairSummary, StationDwellSummary,
};
use crate::analyzers::utility::{nan_mean, nan_sum};
use crate::schedule::Trip;
use std::collections::{BTreeMap, HashSet};

/// Flattens every named stop of every trip into a [`DwellObservation`].
///
/// Also returns the indices of trips holding a dwell value whose magnitude
/// exceeds `extreme_threshold`, each index listed once.
pub fn dwell_observations(
    trips: &[Trip],
    extreme_threshold: f64,
) -> (Vec<DwellObservation>, Vec<usize>) {
    let mut observations = Vec::new();
    let mut extreme_value_index = Vec::new();

    for (i, trip) in trips.iter().enumerate() {
        let mut extreme = false;

        for stop in trip.schedule() {
            if let Some(station) = stop.station() {
                observations.push(DwellObservation {
                    station: station.to_string(),
                    dwell_time: stop.dwell_time,
                    dwell_time_predicted: stop.dwell_time_predicted,
                });
            }

            extreme |= stop.dwell_time.abs() > extreme_threshold
                || stop.dwell_time_predicted.abs() > extreme_threshold;
        }

        if extreme {
            extreme_value_index.push(i);
        }
    }

    (observations, extreme_value_index)
}

/// Groups dwell observations by station and computes totals and averages.
///
/// Stations whose four aggregates are all zero are left out. Rows are
/// ordered by station.
pub fn station_dwell_summary(observations: &[DwellObservation]) -> Vec<StationDwellSummary> {
    let mut groups: BTreeMap<&str, (Vec<f64>, Vec<f64>)> = BTreeMap::new();

    for obs in observations {
        let (actual, predicted) = groups.entry(obs.station.as_str()).or_default();
        actual.push(obs.dwell_time);
        predicted.push(obs.dwell_time_predicted);
    }

    groups
        .into_iter()
        .map(|(station, (actual, predicted))| StationDwellSummary {
            station: station.to_string(),
            total_dwell_time: nan_sum(&actual),
            total_dwell_time_predicted: nan_sum(&predicted),
            average_dwell_time: nan_mean(&actual),
            average_dwell_time_predicted: nan_mean(&predicted),
        })
        .filter(|summary| !summary.is_all_zero())
        .collect()
}

/// One observation per consecutive pair of named stops, carrying the travel
/// time recorded at the later stop.
pub fn od_observations(trips: &[Trip]) -> Vec<OdObservation> {
    trips
        .iter()
        .flat_map(|trip| trip.schedule().windows(2))
        .filter_map(|pair| {
            Some(OdObservation {
                origin: pair[0].station()?.to_string(),
                destination: pair[1].station()?.to_string(),
                travel_time: pair[1].travel_time,
                travel_time_predicted: pair[1].travel_time_predicted,
            })
        })
        .collect()
}

/// Groups OD observations by `(origin, destination)` and computes totals and
/// averages. Rows are ordered by origin, then destination.
///
/// Derived travel times are never NaN, so an undefined average only comes
/// from NaN values supplied by the caller. Blank input fields yield 0.
pub fn od_pair_summary(observations: &[OdObservation]) -> Vec<OdPairSummary> {
    let mut groups: BTreeMap<(&str, &str), (Vec<f64>, Vec<f64>)> = BTreeMap::new();

    for obs in observations {
        let (actual, predicted) = groups
            .entry((obs.origin.as_str(), obs.destination.as_str()))
            .or_default();
        actual.push(obs.travel_time);
        predicted.push(obs.travel_time_predicted);
    }

    groups
        .into_iter()
        .map(|((origin, destination), (actual, predicted))| OdPairSummary {
            origin: origin.to_string(),
            destination: destination.to_string(),
            samples: actual.len(),
            total_travel_time: nan_sum(&actual),
            average_travel_time: nan_mean(&actual),
            total_travel_time_predicted: nan_sum(&predicted),
            average_travel_time_predicted: nan_mean(&predicted),
        })
        .collect()
}

/// Removes every trip that runs over at least one unreliable OD pair.
///
/// The surviving trips keep their relative order.
pub fn drop_unreliable_pairs(trips: Vec<Trip>, summary: &[OdPairSummary]) -> Vec<Trip> {
    let unreliable: HashSet<(&str, &str)> = summary
        .iter()
        .filter(|pair| pair.is_unreliable())
        .map(|pair| (pair.origin.as_str(), pair.destination.as_str()))
        .collect();

    if unreliable.is_empty() {
        return trips;
    }

    trips
        .into_iter()
        .filter(|trip| !trip.od_pairs().any(|pair| unreliable.contains(&pair)))
        .collect()
}
