//! In-memory transmission sink for testing

use std::string::{String, ToString};
use std::vec::Vec;

use crate::communication::sink::TransmissionSink;

/// Error returned by a [`MockSink`] set to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSinkError;

/// Sink that keeps every record it is given
#[derive(Debug, Default)]
pub struct MockSink {
    records: Vec<String>,
    fail: bool,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records sent so far, oldest first
    pub fn records(&self) -> &[String] {
        &self.records
    }

    /// Make later sends fail (or succeed again)
    pub fn set_failing(&mut self, fail: bool) {
        self.fail = fail;
    }
}

impl TransmissionSink for MockSink {
    type Error = MockSinkError;

    fn send(&mut self, record: &str) -> Result<(), MockSinkError> {
        if self.fail {
            return Err(MockSinkError);
        }
        self.records.push(record.to_string());
        Ok(())
    }
}
