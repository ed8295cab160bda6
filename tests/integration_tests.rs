use schedule_cleaner::analyzers::types::Reconciliation;
use schedule_cleaner::config::PipelineConfig;
use schedule_cleaner::output::write_outputs;
use schedule_cleaner::parser::read_trips;
use schedule_cleaner::pipeline::process_historical_data;
use std::fs;

const SAMPLE: &[u8] = include_bytes!("fixtures/hist_info_sample.csv");

#[test]
fn test_full_pipeline() {
    let trips = read_trips(SAMPLE, None).expect("Failed to parse trip table");
    assert_eq!(trips.len(), 4);

    let output = process_historical_data(trips, &PipelineConfig::default())
        .expect("Pipeline failed");

    // the 0830 departure is 20% blank and must not survive
    assert_eq!(output.summary.incomplete_trips_dropped, 1);
    assert_eq!(output.trips.len(), 3);
    assert!(
        output
            .trips
            .iter()
            .all(|t| t.schedule()[0].gbtt_ptd.as_deref() != Some("0830"))
    );

    // the second DIDCOTP -> PADTON run is a duplicate of the first
    let flags: Vec<_> = output.trips.iter().map(|t| t.duplicate).collect();
    assert_eq!(flags, vec![false, true, false]);
    let origins: Vec<_> = output.unique_trips.iter().map(|t| t.origin.as_str()).collect();
    assert_eq!(origins, vec!["DIDCOTP", "RDNGSTN"]);

    // only RDNGSTN is ever an interior stop
    assert_eq!(output.station_dwell.len(), 1);
    let reading = &output.station_dwell[0];
    assert_eq!(reading.station, "RDNGSTN");
    assert_eq!(reading.total_dwell_time, 8.0);
    assert_eq!(reading.total_dwell_time_predicted, 4.0);

    let pair = output
        .od_pairs
        .iter()
        .find(|p| p.origin == "RDNGSTN" && p.destination == "PADTON")
        .unwrap();
    assert_eq!(pair.samples, 2);
    assert_eq!(pair.average_travel_time, Some(42.0));
    assert_eq!(pair.average_travel_time_predicted, Some(42.0));

    // the RDNGSTN -> DIDCOTP run never recorded its actual arrival
    match &output.reconciliation {
        Reconciliation::Unresolved {
            total_null,
            records,
        } => {
            assert_eq!(*total_null, 1);
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].trip_index, 2);
            assert_eq!(records[0].stop_index, 1);
            assert_eq!(records[0].origin, "RDNGSTN");
        }
        Reconciliation::Reconciled => panic!("expected residual missing data"),
    }
    assert_eq!(output.trips[2].schedule()[1].travel_time, 0.0);
    assert_eq!(output.trips[2].schedule()[1].travel_time_predicted, 15.0);
}

#[test]
fn test_outputs_written() {
    let trips = read_trips(SAMPLE, None).unwrap();
    let output = process_historical_data(trips, &PipelineConfig::default()).unwrap();

    let dir = std::env::temp_dir().join("schedule_cleaner_integration_outputs");
    let _ = fs::remove_dir_all(&dir);

    let paths = write_outputs(&dir, &output, false).unwrap();

    assert_eq!(paths.len(), 6);
    let cleaned = fs::read_to_string(dir.join("cleaned_trips.csv")).unwrap();
    // header + 3 + 3 + 2 stops
    assert_eq!(cleaned.lines().count(), 9);
    assert!(cleaned.lines().next().unwrap().contains("percentage_null"));

    let unique = fs::read_to_string(dir.join("unique_trips.csv")).unwrap();
    let header = unique.lines().next().unwrap();
    assert!(!header.contains("date"));
    assert!(!header.contains("percentage_null"));
    assert!(!header.contains("duplicate"));
    assert_eq!(unique.lines().count(), 6);

    let missing = fs::read_to_string(dir.join("missing_data.csv")).unwrap();
    assert_eq!(missing.lines().count(), 2);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_stricter_threshold_drops_partial_trip() {
    let trips = read_trips(SAMPLE, None).unwrap();
    let config = PipelineConfig::default().with_overrides(None, Some(5.0));

    let output = process_historical_data(trips, &config).unwrap();

    assert_eq!(output.trips.len(), 2);
    assert_eq!(output.reconciliation, Reconciliation::Reconciled);
}
