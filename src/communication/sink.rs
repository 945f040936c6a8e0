//! Transmission sink for encoded joint records
//!
//! The tracker node hands each encoded record to a [`TransmissionSink`]
//! it was constructed with. The sink owns its endpoint; nothing about
//! addresses or sockets is process-wide.

use core::fmt::Debug;

/// Outbound path for joint records
///
/// One call sends one record as one datagram. Delivery is best effort:
/// a failed send is reported to the caller and never retried by the node.
pub trait TransmissionSink {
    /// Transport-specific error
    type Error: Debug;

    /// Send one encoded record
    ///
    /// # Errors
    ///
    /// Returns the transport error if the record could not be handed to
    /// the network.
    fn send(&mut self, record: &str) -> Result<(), Self::Error>;
}

impl<S: TransmissionSink + ?Sized> TransmissionSink for &mut S {
    type Error = S::Error;

    fn send(&mut self, record: &str) -> Result<(), Self::Error> {
        (**self).send(record)
    }
}
