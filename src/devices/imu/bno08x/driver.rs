//! BNO08x driver implementing `OrientationSource`

use body_tracker_core::math::Quaternion;
use embedded_hal::delay::DelayNs;

use super::reports::{
    build_product_id_request, build_set_feature_command_for, input_reports, ProductIdResponse,
    ReportId, RotationVectorReport,
};
use crate::communication::shtp::{ShtpChannel, ShtpError, ShtpI2c, ShtpPacket, ShtpTransport};
use crate::devices::traits::{OrientationAccuracy, OrientationError, OrientationSource};
use crate::platform::traits::{DigitalInputPin, I2cInterface, PinMode};

/// Maximum consecutive errors before marking sensor unhealthy
const MAX_CONSECUTIVE_ERRORS: u32 = 3;

/// Receive buffer size; the hub's boot advertisement is the largest packet
const RX_PAYLOAD_SIZE: usize = 284;

/// Packets discarded at most while flushing boot output
const MAX_DRAIN_PACKETS: usize = 8;

/// Packets inspected at most while waiting for the Product ID response
const MAX_RESPONSE_READS: usize = 8;

/// Time the hub needs to answer a control request
const RESPONSE_DELAY_MS: u32 = 10;

/// BNO08x driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bno08xConfig {
    /// Device I2C address (7-bit)
    pub address: u8,
    /// Bus clock in Hz
    pub bus_frequency: u32,
    /// Orientation report interval in microseconds (10_000 = 100 Hz)
    pub report_interval_us: u32,
    /// Wait after power-up before talking to the hub
    pub boot_delay_ms: u32,
    /// Product ID requests sent before declaring the device absent
    pub product_id_attempts: u8,
}

impl Default for Bno08xConfig {
    fn default() -> Self {
        Self {
            address: ShtpI2c::<()>::DEFAULT_ADDRESS,
            bus_frequency: 100_000,
            report_interval_us: 10_000,
            boot_delay_ms: 100,
            product_id_attempts: 3,
        }
    }
}

/// BNO08x fused-orientation source
///
/// Owns the bus and borrows the INT pin: the pin must outlive the driver.
/// Samples are read only while INT is low, so `update()` costs one pin read
/// between samples.
///
/// # Type Parameters
///
/// * `I` - I2C bus
/// * `P` - INT pin
/// * `D` - Delay provider used during `begin()`
pub struct Bno08x<'p, I, P, D>
where
    I: I2cInterface,
    P: DigitalInputPin,
    D: DelayNs,
{
    transport: ShtpI2c<I>,
    int_pin: &'p mut P,
    delay: D,
    config: Bno08xConfig,

    /// Latest raw orientation
    orientation: Quaternion,
    /// Accuracy of the latest sample
    accuracy: OrientationAccuracy,

    /// `begin()` succeeded
    ready: bool,
    /// Health status
    healthy: bool,
    /// Consecutive error count
    error_count: u32,
    /// Samples stored since `begin()`
    sample_count: u32,
    /// Identification from the handshake
    product_id: Option<ProductIdResponse>,
}

impl<'p, I, P, D> Bno08x<'p, I, P, D>
where
    I: I2cInterface,
    P: DigitalInputPin,
    D: DelayNs,
{
    /// Create an uninitialized driver; call [`OrientationSource::begin`] next
    pub fn new(i2c: I, int_pin: &'p mut P, delay: D, config: Bno08xConfig) -> Self {
        Self {
            transport: ShtpI2c::new(i2c, config.address),
            int_pin,
            delay,
            config,
            orientation: Quaternion::IDENTITY,
            accuracy: OrientationAccuracy::UNRELIABLE,
            ready: false,
            healthy: false,
            error_count: 0,
            sample_count: 0,
            product_id: None,
        }
    }

    pub fn config(&self) -> &Bno08xConfig {
        &self.config
    }

    /// Identification received during `begin()`
    pub fn product_id(&self) -> Option<&ProductIdResponse> {
        self.product_id.as_ref()
    }

    /// Consecutive read errors
    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    /// Samples stored since the last successful `begin()`
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn int_pin(&self) -> &P {
        self.int_pin
    }

    pub fn bus(&self) -> &I {
        self.transport.bus()
    }

    /// Release the bus; the pin borrow ends with the driver
    pub fn release(self) -> I {
        self.transport.release()
    }

    /// Discard whatever the hub queued at boot (advertisement, reset notice)
    fn drain(&mut self) {
        let mut packet = ShtpPacket::<RX_PAYLOAD_SIZE>::new();
        for _ in 0..MAX_DRAIN_PACKETS {
            if self.transport.read_packet(&mut packet).is_err() {
                break;
            }
        }
    }

    /// Request the Product ID until the hub answers or attempts run out
    fn identify(&mut self) -> Result<(), OrientationError> {
        let request = build_product_id_request();

        for attempt in 1..=self.config.product_id_attempts {
            if let Err(e) = self.transport.write_packet(ShtpChannel::Control, &request) {
                crate::log_warn!("BNO08x product ID request {} failed: {}", attempt, e);
                self.delay.delay_ms(RESPONSE_DELAY_MS);
                continue;
            }
            self.delay.delay_ms(RESPONSE_DELAY_MS);

            if let Some(response) = self.read_product_id() {
                crate::log_info!(
                    "BNO08x product ID: sw {}.{}.{} part {} build {}",
                    response.sw_version_major,
                    response.sw_version_minor,
                    response.sw_version_patch,
                    response.sw_part_number,
                    response.sw_build_number
                );
                self.product_id = Some(response);
                return Ok(());
            }
        }

        crate::log_error!(
            "BNO08x not responding at address {}",
            self.config.address
        );
        Err(OrientationError::DeviceAbsent)
    }

    /// Look for a Product ID response among the queued packets
    fn read_product_id(&mut self) -> Option<ProductIdResponse> {
        let mut packet = ShtpPacket::<RX_PAYLOAD_SIZE>::new();
        for _ in 0..MAX_RESPONSE_READS {
            if self.transport.read_packet(&mut packet).is_err() {
                return None;
            }
            if packet.channel() == Some(ShtpChannel::Control) {
                if let Some(response) = ProductIdResponse::parse(packet.payload()) {
                    return Some(response);
                }
            }
        }
        None
    }

    /// Start the Game Rotation Vector stream at the configured interval
    fn enable_stream(&mut self) -> Result<(), OrientationError> {
        crate::log_info!(
            "Enabling Game Rotation Vector at {}us interval",
            self.config.report_interval_us
        );

        let command = build_set_feature_command_for(
            ReportId::GameRotationVector as u8,
            self.config.report_interval_us,
        );
        self.transport
            .write_packet(ShtpChannel::Control, &command)
            .map_err(|e| match e {
                ShtpError::Bus(bus) => OrientationError::Bus(bus),
                _ => OrientationError::DeviceAbsent,
            })
    }

    /// Store the newest quaternion of an input packet
    ///
    /// Returns `true` if the packet carried one.
    fn store_latest(&mut self, packet: &ShtpPacket<RX_PAYLOAD_SIZE>) -> bool {
        if packet.channel() != Some(ShtpChannel::InputReport) {
            return false;
        }

        let latest = input_reports(packet.payload())
            .filter_map(|report| RotationVectorReport::parse(report.bytes))
            .last();

        match latest {
            Some(report) => {
                // Q14 rounding leaves the norm slightly off one
                self.orientation = report.to_quaternion().normalized();
                self.accuracy = OrientationAccuracy {
                    status: report.accuracy_status(),
                    radians: report.accuracy_radians(),
                };
                true
            }
            None => false,
        }
    }

    /// Increment error count and update health status
    fn increment_error(&mut self) {
        self.error_count = self.error_count.saturating_add(1);
        if self.error_count >= MAX_CONSECUTIVE_ERRORS {
            if self.healthy {
                crate::log_warn!("BNO08x unhealthy after {} errors", self.error_count);
            }
            self.healthy = false;
        }
    }
}

impl<I, P, D> OrientationSource for Bno08x<'_, I, P, D>
where
    I: I2cInterface,
    P: DigitalInputPin,
    D: DelayNs,
{
    fn begin(&mut self) -> Result<(), OrientationError> {
        self.ready = false;
        self.healthy = false;

        crate::log_info!(
            "BNO08x init: address {}, bus {} Hz",
            self.config.address,
            self.config.bus_frequency
        );

        self.transport
            .bus_mut()
            .set_frequency(self.config.bus_frequency)
            .map_err(OrientationError::Bus)?;

        self.int_pin.init().map_err(OrientationError::Pin)?;
        self.int_pin
            .set_mode(PinMode::InputPullUp)
            .map_err(OrientationError::Pin)?;

        self.transport.reset();
        self.delay.delay_ms(self.config.boot_delay_ms);
        self.drain();

        self.identify()?;
        self.enable_stream()?;

        self.ready = true;
        self.healthy = true;
        self.error_count = 0;
        self.sample_count = 0;

        crate::log_info!(
            "BNO08x ready, INT on {}",
            self.int_pin.describe().as_str()
        );
        Ok(())
    }

    fn update(&mut self) -> bool {
        if !self.ready {
            return false;
        }

        // INT is active low: high means nothing queued
        if self.int_pin.read() {
            return false;
        }

        let mut packet = ShtpPacket::<RX_PAYLOAD_SIZE>::new();
        match self.transport.read_packet(&mut packet) {
            Ok(()) => {
                if self.store_latest(&packet) {
                    self.error_count = 0;
                    self.healthy = true;
                    self.sample_count = self.sample_count.wrapping_add(1);
                    true
                } else {
                    false
                }
            }
            Err(ShtpError::NoData) => false,
            Err(e) => {
                crate::log_debug!("BNO08x read failed: {}", e);
                self.increment_error();
                false
            }
        }
    }

    fn current_orientation(&self) -> Quaternion {
        self.orientation
    }

    fn accuracy(&self) -> OrientationAccuracy {
        self.accuracy
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn is_healthy(&self) -> bool {
        self.ready && self.healthy
    }
}
