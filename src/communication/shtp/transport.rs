//! SHTP transport layer abstraction

use super::{ShtpChannel, ShtpError, ShtpPacket};

/// Packet-level access to a sensor hub
///
/// Implementations own the physical link and the per-channel sequence
/// numbers. Reads are non-blocking from the caller's point of view: when
/// the hub has nothing queued the read fails with `ShtpError::NoData`.
pub trait ShtpTransport {
    /// Read one packet from the hub
    ///
    /// # Errors
    ///
    /// - `ShtpError::NoData` if the hub has nothing queued
    /// - `ShtpError::Bus` on a physical layer failure
    /// - `ShtpError::InvalidHeader` / `PayloadTooLarge` on framing errors
    fn read_packet<const N: usize>(&mut self, packet: &mut ShtpPacket<N>) -> Result<(), ShtpError>;

    /// Send `payload` on `channel`, stamping the next sequence number
    ///
    /// # Errors
    ///
    /// - `ShtpError::PayloadTooLarge` if the payload exceeds one transfer
    /// - `ShtpError::Bus` on a physical layer failure
    fn write_packet(&mut self, channel: ShtpChannel, payload: &[u8]) -> Result<(), ShtpError>;

    /// Forget sequence state, e.g. after a hub reset
    fn reset(&mut self);
}
