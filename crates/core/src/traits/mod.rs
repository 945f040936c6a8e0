//! Platform-agnostic trait abstractions.
//!
//! Trait definitions here carry no feature gates. Platform implementations
//! (Embassy clock, std clock) live in the crates that own those platforms.

pub mod time;

pub use time::{MockTime, TimeSource};
