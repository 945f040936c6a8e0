//! Communication Protocols
//!
//! # Protocols
//!
//! - **SHTP**: Sensor Hub Transport Protocol between the node and its
//!   BNO08x orientation sensor (I2C)
//! - **Transmission sink**: outbound path for encoded joint records
//!   (UDP datagrams on the host simulator, WiFi on the board)

pub mod shtp;
pub mod sink;

pub use sink::TransmissionSink;
