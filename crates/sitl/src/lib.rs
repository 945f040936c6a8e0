//! Host-side simulation of the body tracker node.
//!
//! - [`device`]: simulated BNO08x behind the bus and INT pin traits
//! - [`sink`]: UDP transmission sink
//! - [`clock`]: wall-clock time and delay

pub mod clock;
pub mod device;
pub mod error;
pub mod sink;

pub use clock::{StdDelay, StdTime};
pub use device::{SimulatedBno08x, SimulatedBno08xConfig, SimulatedIntPin};
pub use error::SimulatorError;
pub use sink::UdpSink;
