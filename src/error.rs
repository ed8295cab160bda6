use thiserror::Error;

/// Failure to interpret a time field as an `HHMM` value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Time {value:?} is not a valid HHMM string")]
    InvalidTime { value: String },
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Trip on {date:?} from {origin:?} to {destination:?} has no stops")]
    EmptySchedule {
        date: String,
        origin: String,
        destination: String,
    },

    #[error("Schedule detail could not be parsed: {0}")]
    MalformedDetail(#[from] csv::Error),

    #[error("Stop {stop_index} of trip {trip_index}: {source}")]
    InvalidStopTime {
        trip_index: usize,
        stop_index: usize,
        #[source]
        source: ParseError,
    },
}
