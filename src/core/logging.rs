//! Logging abstraction
//!
//! Unified logging macros that work across targets:
//! - Embedded (`pico2_w`): forwarded to defmt over RTT
//! - Host tests: printed with a `[LEVEL]` prefix
//! - Host non-test: compiled out
//!
//! Arguments must implement both `core::fmt::Display` and `defmt::Format`
//! so the same call site builds for every target. Primitive types, `&str`
//! and the crate's error enums do.

/// Dispatch a log record to the active backend
#[doc(hidden)]
#[macro_export]
macro_rules! __tracker_log {
    ($defmt_level:ident, $prefix:literal, $print:ident, $($arg:tt)*) => {{
        #[cfg(feature = "pico2_w")]
        ::defmt::$defmt_level!($($arg)*);

        #[cfg(all(not(feature = "pico2_w"), test))]
        $print!("{} {}", $prefix, format!($($arg)*));

        // Keep arguments used when logging is compiled out
        #[cfg(all(not(feature = "pico2_w"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::__tracker_log!(info, "[INFO]", println, $($arg)*)
    };
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::__tracker_log!(warn, "[WARN]", println, $($arg)*)
    };
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::__tracker_log!(error, "[ERROR]", eprintln, $($arg)*)
    };
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::__tracker_log!(debug, "[DEBUG]", println, $($arg)*)
    };
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        $crate::__tracker_log!(trace, "[TRACE]", println, $($arg)*)
    };
}
