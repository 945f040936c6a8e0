//! UDP transmission sink: one record per datagram.

use std::net::{SocketAddr, UdpSocket};

use body_tracker::communication::TransmissionSink;
use body_tracker::parameters::ServerEndpoint;

use crate::error::SimulatorError;

/// Sends joint records to a fixed receiver over UDP.
#[derive(Debug)]
pub struct UdpSink {
    socket: UdpSocket,
    target: SocketAddr,
    sent: u64,
}

impl UdpSink {
    /// Bind an ephemeral local port and send to `target`.
    pub fn bind(target: SocketAddr) -> Result<Self, SimulatorError> {
        let local: SocketAddr = if target.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let socket = UdpSocket::bind(local)?;
        Ok(Self {
            socket,
            target,
            sent: 0,
        })
    }

    /// Sink for a configured receiver endpoint.
    pub fn for_endpoint(endpoint: &ServerEndpoint) -> Result<Self, SimulatorError> {
        Self::bind(SocketAddr::from((endpoint.ip, endpoint.port)))
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub fn local_addr(&self) -> Result<SocketAddr, SimulatorError> {
        Ok(self.socket.local_addr()?)
    }

    /// Datagrams sent so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl TransmissionSink for UdpSink {
    type Error = SimulatorError;

    fn send(&mut self, record: &str) -> Result<(), SimulatorError> {
        let len = self.socket.send_to(record.as_bytes(), self.target)?;
        if len != record.len() {
            return Err(SimulatorError::ShortSend {
                len: record.len(),
                target: self.target,
            });
        }
        self.sent += 1;
        Ok(())
    }
}
