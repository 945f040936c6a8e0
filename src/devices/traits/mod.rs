//! Device traits
//!
//! Hardware-independent interfaces the tracker node is written against.

pub mod orientation;

pub use orientation::{OrientationAccuracy, OrientationError, OrientationSource};
