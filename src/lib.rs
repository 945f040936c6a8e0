#![cfg_attr(not(test), no_std)]

//! body_tracker - Body-worn motion tracker node
//!
//! Reads the fused orientation of a BNO08x sensor, corrects it with the
//! mount offset or a user calibration, and hands `<joint>:<x>,<y>,<z>,<w>`
//! records to a transmission sink at a fixed rate.
//!
//! Pure math, calibration and record format live in `body_tracker_core`;
//! this crate adds the hardware seams and the pipeline around them.

#[cfg(all(feature = "mock", not(test)))]
extern crate std;

// Platform abstraction layer (pins, bus, board bindings, mocks)
pub mod platform;

// Orientation source drivers
pub mod devices;

// Logging macros
pub mod core;

// SHTP transport and the record sink
pub mod communication;

// Build-time configuration
pub mod parameters;

// Tracker node pipeline
pub mod subsystems;

pub use body_tracker_core::{
    CalibrationError, CalibrationOffset, JointRecord, Quaternion, RecordError, Vector3,
};
