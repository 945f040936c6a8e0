//! Core infrastructure
//!
//! Logging macros shared by every module; see [`logging`].

pub mod logging;
