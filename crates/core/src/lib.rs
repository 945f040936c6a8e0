//! body_tracker_core - Pure no_std orientation pipeline logic
//!
//! Platform-agnostic algorithms and types for the body-worn tracker node,
//! testable on the host without feature flags or embedded dependencies.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Platform services injected via traits
//!
//! # Modules
//!
//! - [`math`]: `Vector3` and unit `Quaternion` algebra
//! - [`calibration`]: Mount offset and user calibration (`CalibrationOffset`)
//! - [`record`]: `<joint>:<x>,<y>,<z>,<w>` text record encode/decode
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource)

#![no_std]

pub mod calibration;
pub mod math;
pub mod record;
pub mod traits;

pub use calibration::{CalibrationError, CalibrationOffset};
pub use math::{Quaternion, Vector3};
pub use record::{JointRecord, RecordError};
