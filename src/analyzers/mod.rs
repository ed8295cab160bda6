//! Trip enrichment, quality filtering and aggregation.
//!
//! This module derives travel and dwell times per stop, drops incomplete and
//! duplicate trips, summarizes dwell per station and travel per OD pair,
//! and reports residual missing data.

pub mod aggregate;
pub mod metrics;
pub mod quality;
pub mod reconcile;
pub mod types;
pub mod utility;
