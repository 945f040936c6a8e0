//! Subsystems
//!
//! - [`tracker`]: orientation source to transmission sink pipeline with
//!   calibration

pub mod tracker;

pub use tracker::{CalibrationOutcome, PollReport, TrackerNode, TrackerStats};
