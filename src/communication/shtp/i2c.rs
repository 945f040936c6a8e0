//! SHTP over I2C
//!
//! BNO08x I2C characteristics:
//! - Address 0x4A (SA0 high) or 0x4B (SA0 low)
//! - No register addresses: every read starts at the head of the hub's
//!   output queue, so a packet must be read header and payload in a single
//!   transaction
//! - Writes are header followed by payload in a single transaction

use super::{ShtpChannel, ShtpError, ShtpHeader, ShtpPacket, ShtpTransport, HEADER_SIZE, NUM_CHANNELS};
use crate::platform::traits::I2cInterface;

/// Largest single bus transfer (the boot advertisement is 284 bytes)
const MAX_TRANSFER: usize = 300;

/// SHTP over I2C transport
///
/// # Example
///
/// ```ignore
/// use body_tracker::communication::shtp::ShtpI2c;
///
/// let transport = ShtpI2c::new(i2c, ShtpI2c::<()>::DEFAULT_ADDRESS);
/// ```
pub struct ShtpI2c<I> {
    i2c: I,
    /// Device I2C address (7-bit)
    address: u8,
    /// Next expected sequence number per channel (hub to host)
    rx_sequence: [u8; NUM_CHANNELS],
    /// Next sequence number to send per channel (host to hub)
    tx_sequence: [u8; NUM_CHANNELS],
    /// Packets whose sequence number skipped ahead
    sequence_gaps: u32,
}

impl<I> ShtpI2c<I> {
    /// Default BNO08x I2C address (SA0 = high)
    pub const DEFAULT_ADDRESS: u8 = 0x4A;

    /// Alternate BNO08x I2C address (SA0 = low)
    pub const ALTERNATE_ADDRESS: u8 = 0x4B;

    pub fn new(i2c: I, address: u8) -> Self {
        Self {
            i2c,
            address,
            rx_sequence: [0; NUM_CHANNELS],
            tx_sequence: [0; NUM_CHANNELS],
            sequence_gaps: 0,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Next expected sequence number for a channel
    pub fn expected_sequence(&self, channel: u8) -> Option<u8> {
        self.rx_sequence.get(channel as usize).copied()
    }

    /// Number of received packets whose sequence number skipped ahead
    pub fn sequence_gaps(&self) -> u32 {
        self.sequence_gaps
    }

    pub fn bus(&self) -> &I {
        &self.i2c
    }

    /// Mutable access to the bus (e.g. to change its clock)
    pub fn bus_mut(&mut self) -> &mut I {
        &mut self.i2c
    }

    /// Release the I2C bus
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2cInterface> ShtpTransport for ShtpI2c<I> {
    fn read_packet<const N: usize>(&mut self, packet: &mut ShtpPacket<N>) -> Result<(), ShtpError> {
        let mut buf = [0u8; MAX_TRANSFER];
        let read_len = MAX_TRANSFER.min(HEADER_SIZE + N);

        if let Err(e) = self.i2c.read(self.address, &mut buf[..read_len]) {
            crate::log_debug!("SHTP I2C read failed (addr={}, len={})", self.address, read_len);
            return Err(ShtpError::Bus(e));
        }

        packet.fill_from(&buf[..read_len])?;

        let channel = packet.header.channel as usize;
        if let Some(expected) = self.rx_sequence.get_mut(channel) {
            if packet.header.sequence != *expected {
                self.sequence_gaps = self.sequence_gaps.saturating_add(1);
            }
            *expected = packet.header.sequence.wrapping_add(1);
        }

        Ok(())
    }

    fn write_packet(&mut self, channel: ShtpChannel, payload: &[u8]) -> Result<(), ShtpError> {
        let total_len = HEADER_SIZE + payload.len();
        if total_len > MAX_TRANSFER {
            return Err(ShtpError::PayloadTooLarge);
        }

        let slot = &mut self.tx_sequence[channel as usize];
        let header = ShtpHeader::for_payload(channel, *slot, payload.len());
        *slot = slot.wrapping_add(1);

        let mut buf = [0u8; MAX_TRANSFER];
        buf[..HEADER_SIZE].copy_from_slice(&header.to_bytes());
        buf[HEADER_SIZE..total_len].copy_from_slice(payload);

        self.i2c
            .write(self.address, &buf[..total_len])
            .map_err(ShtpError::Bus)
    }

    fn reset(&mut self) {
        self.rx_sequence = [0; NUM_CHANNELS];
        self.tx_sequence = [0; NUM_CHANNELS];
        self.sequence_gaps = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::error::{I2cError, PlatformError};
    use crate::platform::mock::{I2cTransaction, MockI2c};
    use crate::platform::traits::I2cConfig;

    #[test]
    fn test_shtp_i2c_new() {
        let transport = ShtpI2c::new(MockI2c::new(I2cConfig::default()), 0x4A);
        assert_eq!(transport.address(), 0x4A);
        assert_eq!(transport.expected_sequence(0), Some(0));
        assert_eq!(transport.expected_sequence(5), Some(0));
        assert_eq!(transport.expected_sequence(6), None);
    }

    #[test]
    fn test_write_packet_stamps_sequence() {
        let mut transport = ShtpI2c::new(MockI2c::new(I2cConfig::default()), 0x4A);

        transport.write_packet(ShtpChannel::Control, &[0xF9, 0x00]).unwrap();
        transport.write_packet(ShtpChannel::Control, &[0xF9, 0x00]).unwrap();
        transport.write_packet(ShtpChannel::Command, &[0x01]).unwrap();

        let log = transport.release().transactions();
        assert_eq!(
            log,
            vec![
                I2cTransaction::Write {
                    addr: 0x4A,
                    data: vec![0x06, 0x00, 0x02, 0x00, 0xF9, 0x00]
                },
                I2cTransaction::Write {
                    addr: 0x4A,
                    data: vec![0x06, 0x00, 0x02, 0x01, 0xF9, 0x00]
                },
                I2cTransaction::Write {
                    addr: 0x4A,
                    data: vec![0x05, 0x00, 0x00, 0x00, 0x01]
                },
            ]
        );
    }

    #[test]
    fn test_read_packet_single_transaction() {
        let mut i2c = MockI2c::new(I2cConfig::default());
        i2c.queue_read(&[0x07, 0x00, 0x03, 0x00, 0x08, 0x01, 0x02]);
        let mut transport = ShtpI2c::new(i2c, 0x4A);

        let mut packet = ShtpPacket::<16>::new();
        transport.read_packet(&mut packet).unwrap();

        assert_eq!(packet.channel(), Some(ShtpChannel::InputReport));
        assert_eq!(packet.payload(), &[0x08, 0x01, 0x02]);
        assert_eq!(transport.expected_sequence(3), Some(1));

        let log = transport.release().transactions();
        assert_eq!(log, vec![I2cTransaction::Read { addr: 0x4A, len: 20 }]);
    }

    #[test]
    fn test_read_packet_counts_sequence_gap() {
        let mut i2c = MockI2c::new(I2cConfig::default());
        i2c.queue_read(&[0x05, 0x00, 0x03, 0x00, 0xAA]);
        i2c.queue_read(&[0x05, 0x00, 0x03, 0x04, 0xBB]);
        let mut transport = ShtpI2c::new(i2c, 0x4A);

        let mut packet = ShtpPacket::<16>::new();
        transport.read_packet(&mut packet).unwrap();
        assert_eq!(transport.sequence_gaps(), 0);
        transport.read_packet(&mut packet).unwrap();
        assert_eq!(transport.sequence_gaps(), 1);
        assert_eq!(transport.expected_sequence(3), Some(5));
    }

    #[test]
    fn test_read_packet_idle_bus() {
        // No queued response: the mock returns zeros, an empty header
        let mut transport = ShtpI2c::new(MockI2c::new(I2cConfig::default()), 0x4A);
        let mut packet = ShtpPacket::<16>::new();
        assert_eq!(transport.read_packet(&mut packet), Err(ShtpError::NoData));
    }

    #[test]
    fn test_read_packet_bus_error() {
        let mut i2c = MockI2c::new(I2cConfig::default());
        i2c.fail_next(I2cError::Nack);
        let mut transport = ShtpI2c::new(i2c, 0x4A);

        let mut packet = ShtpPacket::<16>::new();
        assert_eq!(
            transport.read_packet(&mut packet),
            Err(ShtpError::Bus(PlatformError::I2c(I2cError::Nack)))
        );
    }

    #[test]
    fn test_reset_clears_sequences() {
        let mut transport = ShtpI2c::new(MockI2c::new(I2cConfig::default()), 0x4A);
        transport.write_packet(ShtpChannel::Control, &[0x00]).unwrap();
        transport.rx_sequence[3] = 9;

        transport.reset();

        assert_eq!(transport.expected_sequence(3), Some(0));
        assert_eq!(transport.tx_sequence, [0; NUM_CHANNELS]);
    }
}
