//! Tracker Configuration
//!
//! Build-time configuration of the tracker node. Values are read from
//! environment variables by `build.rs` and baked into the firmware:
//!
//! | Variable          | Default       | Field                         |
//! |-------------------|---------------|-------------------------------|
//! | `TRACKER_JOINT`   | `HIP`         | `TrackerConfig::joint`        |
//! | `TRACKER_SUIT_ID` | `SUIT_001`    | `TrackerConfig::suit_id`      |
//! | `IMU_PERIOD_MS`   | `10`          | `TrackerConfig::period_ms`    |
//! | `WIFI_SSID`       | (empty)       | `TrackerConfig::wifi.ssid`    |
//! | `WIFI_PASSWORD`   | (empty)       | `TrackerConfig::wifi.password`|
//! | `SERVER_IP`       | `192.168.4.1` | `TrackerConfig::server.ip`    |
//! | `SERVER_PORT`     | `5555`        | `TrackerConfig::server.port`  |
//!
//! Values that fail to parse fall back to the defaults. Nothing below the
//! tracker node reads configuration; the node hands plain values to the
//! orientation source and the calibration offset.

pub mod tracker;

pub use tracker::{ServerEndpoint, TrackerConfig, WifiCredentials};
