//! Output formatting and persistence for pipeline artifacts.
//!
//! Every table is written as CSV, optionally gzip-compressed.

use anyhow::{Context, Result, anyhow};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::quality::UniqueTrip;
use crate::pipeline::{PipelineOutput, PipelineSummary};
use crate::schedule::Trip;

/// One stop of a cleaned trip, flattened with its trip's metadata.
#[derive(Debug, Serialize)]
pub struct CleanedStopRow<'a> {
    pub trip_index: usize,
    pub date: &'a str,
    pub origin: &'a str,
    pub destination: &'a str,
    pub stops: u32,
    pub percentage_null: f64,
    pub duplicate: bool,
    pub stop_index: usize,
    pub location: Option<&'a str>,
    pub gbtt_pta: Option<&'a str>,
    pub gbtt_ptd: Option<&'a str>,
    pub actual_ta: Option<&'a str>,
    pub actual_td: Option<&'a str>,
    pub travel_time: f64,
    pub travel_time_predicted: f64,
    pub dwell_time: f64,
    pub dwell_time_predicted: f64,
}

/// One stop of a unique trip; no date or bookkeeping columns.
#[derive(Debug, Serialize)]
pub struct UniqueStopRow<'a> {
    pub trip_index: usize,
    pub origin: &'a str,
    pub destination: &'a str,
    pub stops: u32,
    pub stop_index: usize,
    pub location: Option<&'a str>,
    pub gbtt_pta: Option<&'a str>,
    pub gbtt_ptd: Option<&'a str>,
    pub actual_ta: Option<&'a str>,
    pub actual_td: Option<&'a str>,
    pub travel_time: f64,
    pub travel_time_predicted: f64,
    pub dwell_time: f64,
    pub dwell_time_predicted: f64,
}

pub fn cleaned_rows(trips: &[Trip]) -> impl Iterator<Item = CleanedStopRow<'_>> {
    trips.iter().enumerate().flat_map(|(trip_index, trip)| {
        trip.schedule()
            .iter()
            .enumerate()
            .map(move |(stop_index, stop)| CleanedStopRow {
                trip_index,
                date: &trip.date,
                origin: &trip.origin,
                destination: &trip.destination,
                stops: trip.stops,
                percentage_null: trip.percentage_null,
                duplicate: trip.duplicate,
                stop_index,
                location: stop.location.as_deref(),
                gbtt_pta: stop.gbtt_pta.as_deref(),
                gbtt_ptd: stop.gbtt_ptd.as_deref(),
                actual_ta: stop.actual_ta.as_deref(),
                actual_td: stop.actual_td.as_deref(),
                travel_time: stop.travel_time,
                travel_time_predicted: stop.travel_time_predicted,
                dwell_time: stop.dwell_time,
                dwell_time_predicted: stop.dwell_time_predicted,
            })
    })
}

pub fn unique_rows(trips: &[UniqueTrip]) -> impl Iterator<Item = UniqueStopRow<'_>> {
    trips.iter().enumerate().flat_map(|(trip_index, trip)| {
        trip.schedule
            .iter()
            .enumerate()
            .map(move |(stop_index, stop)| UniqueStopRow {
                trip_index,
                origin: &trip.origin,
                destination: &trip.destination,
                stops: trip.stops,
                stop_index,
                location: stop.location.as_deref(),
                gbtt_pta: stop.gbtt_pta.as_deref(),
                gbtt_ptd: stop.gbtt_ptd.as_deref(),
                actual_ta: stop.actual_ta.as_deref(),
                actual_td: stop.actual_td.as_deref(),
                travel_time: stop.travel_time,
                travel_time_predicted: stop.travel_time_predicted,
                dwell_time: stop.dwell_time,
                dwell_time_predicted: stop.dwell_time_predicted,
            })
    })
}

/// Logs the run summary as pretty-printed JSON.
pub fn print_json(summary: &PipelineSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

fn serialize_rows<W, T, I>(writer: W, rows: I) -> Result<(W, usize)>
where
    W: Write,
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(writer);
    let mut count = 0;

    for row in rows {
        wtr.serialize(row)?;
        count += 1;
    }
    wtr.flush()?;

    let writer = wtr
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV writer: {}", e.error()))?;
    Ok((writer, count))
}

/// Writes `rows` to `<dir>/<name>.csv`, or `<name>.csv.gz` when `gzip` is set.
///
/// Returns the path written. An empty row set produces an empty file.
pub fn write_table<T, I>(dir: &Path, name: &str, rows: I, gzip: bool) -> Result<PathBuf>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let path = if gzip {
        dir.join(format!("{name}.csv.gz"))
    } else {
        dir.join(format!("{name}.csv"))
    };
    let file =
        File::create(&path).with_context(|| format!("Failed to create '{}'", path.display()))?;

    let count = if gzip {
        let (encoder, count) = serialize_rows(GzEncoder::new(file, Compression::default()), rows)?;
        encoder.finish()?;
        count
    } else {
        serialize_rows(file, rows)?.1
    };

    debug!(path = %path.display(), rows = count, "Table written");
    Ok(path)
}

/// Writes every artifact of a pipeline run into `dir`, creating it if needed.
pub fn write_outputs(dir: &Path, output: &PipelineOutput, gzip: bool) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create '{}'", dir.display()))?;

    let paths = vec![
        write_table(dir, "cleaned_trips", cleaned_rows(&output.trips), gzip)?,
        write_table(dir, "unique_trips", unique_rows(&output.unique_trips), gzip)?,
        write_table(dir, "station_dwell_summary", &output.station_dwell, gzip)?,
        write_table(dir, "od_travel_summary", &output.od_pairs, gzip)?,
        write_table(dir, "missing_data", output.reconciliation.records(), gzip)?,
        write_table(dir, "extreme_value_trips", &output.extreme_value_trips, gzip)?,
    ];

    info!(dir = %dir.display(), files = paths.len(), "Outputs written");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::OdPairSummary;
    use crate::schedule::Stop;
    use flate2::read::GzDecoder;
    use std::env;
    use std::fs;
    use std::io::Read;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir); // clean up any prior run
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&PipelineSummary::default()).unwrap();
    }

    #[test]
    fn test_write_table_header_and_rows() {
        let dir = temp_dir("schedule_cleaner_test_table");
        let rows = vec![od_pair("A", "B", Some(3.0)), od_pair("B", "C", None)];

        let path = write_table(&dir, "od", &rows, false).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "origin,destination,samples,total_travel_time,average_travel_time,\
             total_travel_time_predicted,average_travel_time_predicted"
        );
        // undefined averages are written as empty cells
        assert_eq!(lines[2], "B,C,1,0.0,,0.0,");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_table_gzip() {
        let dir = temp_dir("schedule_cleaner_test_gzip");
        let rows = vec![od_pair("A", "B", Some(3.0))];

        let path = write_table(&dir, "od", &rows, true).unwrap();
        assert!(path.to_string_lossy().ends_with("od.csv.gz"));

        let mut content = String::new();
        GzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content.lines().count(), 2);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_cleaned_rows_one_per_stop() {
        let stop = |location: &str| Stop {
            location: Some(location.to_string()),
            ..Default::default()
        };
        let trips = vec![
            Trip::new("d", "A", "C", 3, vec![stop("A"), stop("B"), stop("C")]).unwrap(),
            Trip::new("d", "A", "B", 2, vec![stop("A"), stop("B")]).unwrap(),
        ];

        let rows: Vec<_> = cleaned_rows(&trips).collect();

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[3].trip_index, 1);
        assert_eq!(rows[3].stop_index, 0);
        assert_eq!(rows[4].location, Some("B"));
    }

    fn od_pair(origin: &str, destination: &str, average: Option<f64>) -> OdPairSummary {
        OdPairSummary {
            origin: origin.to_string(),
            destination: destination.to_string(),
            samples: 1,
            total_travel_time: average.unwrap_or_default(),
            average_travel_time: average,
            total_travel_time_predicted: average.unwrap_or_default(),
            average_travel_time_predicted: average,
        }
    }
}
