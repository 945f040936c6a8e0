//! SHTP (Sensor Hub Transport Protocol)
//!
//! Packet framing used by CEVA/Hillcrest sensor hubs (BNO080, BNO085,
//! BNO086). The module knows nothing about sensor reports; it only moves
//! framed payloads between the host and the hub.
//!
//! # Packet Layout
//!
//! ```text
//! Byte 0-1: Length, little-endian, header included
//!           Bit 15 set = continuation of a previous packet
//! Byte 2:   Channel number (0-5)
//! Byte 3:   Sequence number, independent per channel and direction
//! Byte 4..: Payload
//! ```
//!
//! # Channels
//!
//! - 0: Command
//! - 1: Executable
//! - 2: Control (Set Feature, Product ID)
//! - 3: Input Report (sensor data)
//! - 4: Wake Input Report
//! - 5: Gyro-integrated rotation vector
//!
//! # Usage
//!
//! ```ignore
//! use body_tracker::communication::shtp::{ShtpChannel, ShtpI2c, ShtpPacket, ShtpTransport};
//!
//! let mut transport = ShtpI2c::new(i2c, 0x4A);
//! transport.write_packet(ShtpChannel::Control, &[0xF9, 0x00])?;
//! let mut packet = ShtpPacket::<128>::new();
//! transport.read_packet(&mut packet)?;
//! ```

use core::fmt;

use crate::platform::PlatformError;

mod i2c;
mod transport;

pub use i2c::ShtpI2c;
pub use transport::ShtpTransport;

/// Default payload capacity of a packet buffer
pub const MAX_PAYLOAD_SIZE: usize = 128;

/// SHTP header size in bytes
pub const HEADER_SIZE: usize = 4;

/// Number of SHTP channels
pub const NUM_CHANNELS: usize = 6;

/// Continuation flag in the length field
const CONTINUATION_BIT: u16 = 0x8000;

/// SHTP channel numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
#[repr(u8)]
pub enum ShtpChannel {
    /// Host to hub commands
    Command = 0,
    /// Firmware download
    Executable = 1,
    /// Sensor hub control (Set Feature, Product ID, ...)
    Control = 2,
    /// Sensor reports
    InputReport = 3,
    /// Wake sensor reports
    WakeInputReport = 4,
    /// Gyro-integrated rotation vector
    Gyro = 5,
}

impl ShtpChannel {
    /// Convert from raw channel number
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Command),
            1 => Some(Self::Executable),
            2 => Some(Self::Control),
            3 => Some(Self::InputReport),
            4 => Some(Self::WakeInputReport),
            5 => Some(Self::Gyro),
            _ => None,
        }
    }
}

/// SHTP error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum ShtpError {
    /// Underlying bus transaction failed
    Bus(PlatformError),
    /// Length field shorter than the header
    InvalidHeader,
    /// Payload does not fit the packet buffer
    PayloadTooLarge,
    /// Hub has nothing queued (zero length or idle bus pattern)
    NoData,
}

impl fmt::Display for ShtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShtpError::Bus(e) => write!(f, "SHTP bus error: {}", e),
            ShtpError::InvalidHeader => write!(f, "SHTP header length invalid"),
            ShtpError::PayloadTooLarge => write!(f, "SHTP payload exceeds buffer"),
            ShtpError::NoData => write!(f, "SHTP no data available"),
        }
    }
}

impl From<PlatformError> for ShtpError {
    fn from(e: PlatformError) -> Self {
        ShtpError::Bus(e)
    }
}

/// Decoded SHTP header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShtpHeader {
    /// Raw length field, continuation bit included
    pub length: u16,
    pub channel: u8,
    pub sequence: u8,
}

impl ShtpHeader {
    /// Header for a packet carrying `payload_len` bytes
    pub fn for_payload(channel: ShtpChannel, sequence: u8, payload_len: usize) -> Self {
        Self {
            length: (HEADER_SIZE + payload_len) as u16,
            channel: channel as u8,
            sequence,
        }
    }

    pub fn from_bytes(bytes: [u8; HEADER_SIZE]) -> Self {
        Self {
            length: u16::from_le_bytes([bytes[0], bytes[1]]),
            channel: bytes[2],
            sequence: bytes[3],
        }
    }

    pub fn to_bytes(self) -> [u8; HEADER_SIZE] {
        let [lo, hi] = self.length.to_le_bytes();
        [lo, hi, self.channel, self.sequence]
    }

    /// Total packet length in bytes, header included
    pub fn total_len(&self) -> usize {
        (self.length & !CONTINUATION_BIT) as usize
    }

    pub fn is_continuation(&self) -> bool {
        self.length & CONTINUATION_BIT != 0
    }

    /// Payload length implied by the length field
    ///
    /// # Errors
    ///
    /// Returns `ShtpError::InvalidHeader` if the length is shorter than
    /// the header itself.
    pub fn payload_len(&self) -> Result<usize, ShtpError> {
        self.total_len()
            .checked_sub(HEADER_SIZE)
            .ok_or(ShtpError::InvalidHeader)
    }
}

/// Received SHTP packet
///
/// `N` is the payload capacity. Sensor reports fit in the default 128
/// bytes; the hub's boot advertisement needs about 280.
#[derive(Clone)]
pub struct ShtpPacket<const N: usize = MAX_PAYLOAD_SIZE> {
    pub header: ShtpHeader,
    payload: [u8; N],
    payload_len: usize,
}

impl<const N: usize> Default for ShtpPacket<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ShtpPacket<N> {
    /// Create an empty packet
    pub const fn new() -> Self {
        Self {
            header: ShtpHeader {
                length: 0,
                channel: 0,
                sequence: 0,
            },
            payload: [0u8; N],
            payload_len: 0,
        }
    }

    /// Fill the packet from one raw bus transfer (header + payload)
    ///
    /// # Errors
    ///
    /// - `ShtpError::NoData` for a zero length or an all-ones header
    /// - `ShtpError::InvalidHeader` if the length is below the header size
    /// - `ShtpError::PayloadTooLarge` if the payload exceeds `N`
    pub fn fill_from(&mut self, raw: &[u8]) -> Result<(), ShtpError> {
        if raw.len() < HEADER_SIZE {
            return Err(ShtpError::NoData);
        }
        let header = ShtpHeader::from_bytes([raw[0], raw[1], raw[2], raw[3]]);
        if header.total_len() == 0 || header.length == 0xFFFF {
            return Err(ShtpError::NoData);
        }

        let payload_len = header.payload_len()?;
        if payload_len > N {
            return Err(ShtpError::PayloadTooLarge);
        }

        // A short transfer yields the bytes that actually arrived
        let available = (raw.len() - HEADER_SIZE).min(payload_len);
        self.payload[..available].copy_from_slice(&raw[HEADER_SIZE..HEADER_SIZE + available]);
        self.payload_len = available;
        self.header = header;
        Ok(())
    }

    /// Channel as enum
    pub fn channel(&self) -> Option<ShtpChannel> {
        ShtpChannel::from_u8(self.header.channel)
    }

    /// Received payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.payload_len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_from_u8() {
        assert_eq!(ShtpChannel::from_u8(2), Some(ShtpChannel::Control));
        assert_eq!(ShtpChannel::from_u8(3), Some(ShtpChannel::InputReport));
        assert_eq!(ShtpChannel::from_u8(6), None);
        assert_eq!(ShtpChannel::from_u8(255), None);
    }

    #[test]
    fn test_header_bytes() {
        let header = ShtpHeader::for_payload(ShtpChannel::Control, 3, 2);
        assert_eq!(header.to_bytes(), [0x06, 0x00, 0x02, 0x03]);
        assert_eq!(ShtpHeader::from_bytes([0x06, 0x00, 0x02, 0x03]), header);
    }

    #[test]
    fn test_header_continuation() {
        let header = ShtpHeader::from_bytes([0x18, 0x80, 0x03, 0x07]);
        assert!(header.is_continuation());
        assert_eq!(header.total_len(), 24);
        assert_eq!(header.payload_len(), Ok(20));
    }

    #[test]
    fn test_header_too_short() {
        let header = ShtpHeader::from_bytes([0x02, 0x00, 0x03, 0x07]);
        assert_eq!(header.payload_len(), Err(ShtpError::InvalidHeader));
    }

    #[test]
    fn test_fill_from() {
        let mut packet = ShtpPacket::<16>::new();
        packet
            .fill_from(&[0x07, 0x00, 0x03, 0x09, 0xAA, 0xBB, 0xCC, 0x00, 0x00])
            .unwrap();

        assert_eq!(packet.channel(), Some(ShtpChannel::InputReport));
        assert_eq!(packet.header.sequence, 9);
        // Trailing bytes past the length field are ignored
        assert_eq!(packet.payload(), &[0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_fill_from_no_data() {
        let mut packet = ShtpPacket::<16>::new();
        assert_eq!(
            packet.fill_from(&[0x00, 0x00, 0x00, 0x00]),
            Err(ShtpError::NoData)
        );
        assert_eq!(
            packet.fill_from(&[0xFF, 0xFF, 0xFF, 0xFF]),
            Err(ShtpError::NoData)
        );
        assert_eq!(packet.fill_from(&[0x04]), Err(ShtpError::NoData));
    }

    #[test]
    fn test_fill_from_payload_too_large() {
        let mut packet = ShtpPacket::<16>::new();
        // Length 100 bytes, buffer holds 16
        assert_eq!(
            packet.fill_from(&[0x64, 0x00, 0x03, 0x07]),
            Err(ShtpError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_fill_from_short_transfer() {
        let mut packet = ShtpPacket::<16>::new();
        // Header claims 6 payload bytes, only 2 arrived
        packet
            .fill_from(&[0x0A, 0x00, 0x03, 0x00, 0x01, 0x02])
            .unwrap();
        assert_eq!(packet.payload(), &[0x01, 0x02]);
    }
}
