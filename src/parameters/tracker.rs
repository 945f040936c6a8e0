//! Tracker node configuration
//!
//! # Example
//!
//! ```ignore
//! use body_tracker::parameters::TrackerConfig;
//!
//! let config = TrackerConfig::from_build_env();
//! let imu = Bno08x::new(i2c, &mut int_pin, delay, config.imu_config());
//! ```

use heapless::String;

use body_tracker_core::calibration::{CalibrationOffset, DEFAULT_MOUNT_EULER_DEG};

use crate::devices::imu::Bno08xConfig;

/// Maximum joint name length
pub const MAX_JOINT_LEN: usize = 16;

/// Maximum suit identifier length
pub const MAX_SUIT_ID_LEN: usize = 16;

/// Maximum SSID length (IEEE 802.11 standard)
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WiFi password length (WPA2 standard)
pub const MAX_PASSWORD_LEN: usize = 63;

/// Default sample period (100 Hz)
pub const DEFAULT_PERIOD_MS: u32 = 10;

/// Default bound on the calibration wait
pub const DEFAULT_CALIBRATION_TIMEOUT_MS: u32 = 5000;

/// Default record receiver
pub const DEFAULT_SERVER_IP: [u8; 4] = [192, 168, 4, 1];
pub const DEFAULT_SERVER_PORT: u16 = 5555;

/// WiFi station credentials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WifiCredentials {
    pub ssid: String<MAX_SSID_LEN>,
    pub password: String<MAX_PASSWORD_LEN>,
}

impl WifiCredentials {
    /// Whether an SSID was configured
    pub fn is_configured(&self) -> bool {
        !self.ssid.is_empty()
    }
}

/// Destination of joint records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerEndpoint {
    pub ip: [u8; 4],
    pub port: u16,
}

impl Default for ServerEndpoint {
    fn default() -> Self {
        Self {
            ip: DEFAULT_SERVER_IP,
            port: DEFAULT_SERVER_PORT,
        }
    }
}

/// Tracker node configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Skeleton joint this tracker is strapped to (e.g. "HIP")
    pub joint: String<MAX_JOINT_LEN>,
    /// Suit the tracker belongs to
    pub suit_id: String<MAX_SUIT_ID_LEN>,
    /// Orientation stream and record period in milliseconds
    pub period_ms: u32,
    /// Orientation sensor I2C address (7-bit)
    pub imu_address: u8,
    /// Orientation sensor bus clock in Hz
    pub bus_frequency: u32,
    /// Bound on the wait for a calibration reference sample
    pub calibration_timeout_ms: u32,
    /// Sensor mount correction as roll/pitch/yaw in degrees
    pub mount_euler_deg: (f32, f32, f32),
    pub server: ServerEndpoint,
    pub wifi: WifiCredentials,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let defaults = Bno08xConfig::default();
        Self {
            joint: fixed("HIP"),
            suit_id: fixed("SUIT_001"),
            period_ms: DEFAULT_PERIOD_MS,
            imu_address: defaults.address,
            bus_frequency: defaults.bus_frequency,
            calibration_timeout_ms: DEFAULT_CALIBRATION_TIMEOUT_MS,
            mount_euler_deg: DEFAULT_MOUNT_EULER_DEG,
            server: ServerEndpoint::default(),
            wifi: WifiCredentials::default(),
        }
    }
}

impl TrackerConfig {
    /// Configuration baked in by `build.rs`
    pub fn from_build_env() -> Self {
        Self::from_values(
            env!("TRACKER_JOINT"),
            env!("TRACKER_SUIT_ID"),
            env!("IMU_PERIOD_MS"),
            env!("SERVER_IP"),
            env!("SERVER_PORT"),
            env!("WIFI_SSID"),
            env!("WIFI_PASSWORD"),
        )
    }

    /// Build a configuration from raw strings, keeping defaults for values
    /// that do not parse or fit
    pub fn from_values(
        joint: &str,
        suit_id: &str,
        period_ms: &str,
        server_ip: &str,
        server_port: &str,
        wifi_ssid: &str,
        wifi_password: &str,
    ) -> Self {
        let defaults = Self::default();

        let joint = non_empty(joint)
            .and_then(|j| String::try_from(j).ok())
            .unwrap_or(defaults.joint);
        let suit_id = non_empty(suit_id)
            .and_then(|s| String::try_from(s).ok())
            .unwrap_or(defaults.suit_id);

        // A zero period would flood the sink
        let period_ms = period_ms
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|p| *p > 0)
            .unwrap_or(defaults.period_ms);

        let server = ServerEndpoint {
            ip: parse_ipv4(server_ip).unwrap_or(defaults.server.ip),
            port: server_port.trim().parse::<u16>().unwrap_or(defaults.server.port),
        };

        let wifi = WifiCredentials {
            ssid: String::try_from(wifi_ssid).unwrap_or_else(|_| String::new()),
            password: String::try_from(wifi_password).unwrap_or_else(|_| String::new()),
        };

        Self {
            joint,
            suit_id,
            period_ms,
            server,
            wifi,
            ..defaults
        }
    }

    /// Orientation sensor settings for this configuration
    pub fn imu_config(&self) -> Bno08xConfig {
        Bno08xConfig {
            address: self.imu_address,
            bus_frequency: self.bus_frequency,
            report_interval_us: self.period_ms.saturating_mul(1000),
            ..Bno08xConfig::default()
        }
    }

    /// Uncalibrated offset holding the configured mount correction
    pub fn mount_offset(&self) -> CalibrationOffset {
        let (roll, pitch, yaw) = self.mount_euler_deg;
        CalibrationOffset::with_mount_euler(roll, pitch, yaw)
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

/// Fixed-capacity copy of a literal known to fit
fn fixed<const N: usize>(s: &str) -> String<N> {
    String::try_from(s).unwrap_or_else(|_| String::new())
}

/// Parse IPv4 address from string (e.g., "192.168.4.1")
fn parse_ipv4(s: &str) -> Option<[u8; 4]> {
    let mut result = [0u8; 4];
    let mut parts = s.trim().split('.');
    for octet in result.iter_mut() {
        *octet = parts.next()?.parse::<u8>().ok()?;
    }
    match parts.next() {
        Some(_) => None,
        None => Some(result),
    }
}
