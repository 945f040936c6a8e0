//! Simulated BNO08x on the tracker's bus and pin traits.
//!
//! [`SimulatedBno08x`] answers SHTP traffic the way the real hub does for
//! the subset the driver uses: a boot packet, the Product ID request and the
//! Set Feature command for the Game Rotation Vector. Once the stream is
//! enabled it produces one sample per report interval, rotating about a
//! fixed axis at a fixed rate with optional random jitter.
//!
//! [`SimulatedIntPin`] reads low whenever the device has a packet queued,
//! like the hub's active-low INT line.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use body_tracker::communication::shtp::{ShtpChannel, ShtpHeader, HEADER_SIZE, NUM_CHANNELS};
use body_tracker::devices::imu::bno08x::{ControlCommand, ReportId};
use body_tracker::platform::error::{GpioError, I2cError, PlatformError};
use body_tracker::platform::traits::{DigitalInputPin, I2cInterface, PinLabel, PinMode};
use body_tracker::platform::Result;
use body_tracker_core::math::{Quaternion, Vector3};
use body_tracker_core::traits::TimeSource;

/// Product ID reported by the simulated hub.
pub const SIM_SW_PART_NUMBER: u32 = 10_004_563;

/// Configuration for the simulated sensor.
#[derive(Debug, Clone)]
pub struct SimulatedBno08xConfig {
    /// I2C address the device answers on.
    pub address: u8,
    /// Orientation when the stream starts.
    pub initial: Quaternion,
    /// Rotation axis of the simulated motion.
    pub axis: Vector3,
    /// Rotation rate about `axis` in rad/s.
    pub rate_rad_s: f32,
    /// Maximum random rotation added to each sample, in radians.
    pub jitter_rad: f32,
    /// Status accuracy reported with each sample (0..3).
    pub status: u8,
    /// RNG seed for deterministic jitter. None = random.
    pub seed: Option<u64>,
    /// When false the device never acknowledges its address.
    pub present: bool,
}

impl Default for SimulatedBno08xConfig {
    fn default() -> Self {
        Self {
            address: 0x4A,
            initial: Quaternion::IDENTITY,
            axis: Vector3::Z,
            rate_rad_s: 0.5,
            jitter_rad: 0.0,
            status: 3,
            seed: None,
            present: true,
        }
    }
}

/// State shared between the bus side and the INT pin.
struct DeviceState {
    config: SimulatedBno08xConfig,
    /// Packets waiting to be read, oldest first.
    outbox: VecDeque<Vec<u8>>,
    /// Sequence numbers per channel (device to host).
    tx_sequence: [u8; NUM_CHANNELS],
    /// Game Rotation Vector interval once enabled.
    interval_us: Option<u32>,
    stream_start_us: u64,
    next_sample_us: u64,
    report_sequence: u8,
    samples_sent: u32,
    frequency: u32,
    rng: StdRng,
}

impl DeviceState {
    fn new(config: SimulatedBno08xConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut state = Self {
            config,
            outbox: VecDeque::new(),
            tx_sequence: [0; NUM_CHANNELS],
            interval_us: None,
            stream_start_us: 0,
            next_sample_us: 0,
            report_sequence: 0,
            samples_sent: 0,
            frequency: 0,
            rng,
        };
        // Power-on output the host has to flush
        state.enqueue(ShtpChannel::Executable, &[0x01]);
        state
    }

    fn enqueue(&mut self, channel: ShtpChannel, payload: &[u8]) {
        let slot = &mut self.tx_sequence[channel as usize];
        let header = ShtpHeader::for_payload(channel, *slot, payload.len());
        *slot = slot.wrapping_add(1);

        let mut packet = header.to_bytes().to_vec();
        packet.extend_from_slice(payload);
        self.outbox.push_back(packet);
    }

    fn sample_due(&self, now_us: u64) -> bool {
        self.interval_us.is_some() && now_us >= self.next_sample_us
    }

    fn has_output(&self, now_us: u64) -> bool {
        !self.outbox.is_empty() || self.sample_due(now_us)
    }

    fn handle_control(&mut self, payload: &[u8], now_us: u64) {
        let Some(&command) = payload.first() else {
            return;
        };

        if command == ControlCommand::ProductIdRequest as u8 {
            let mut response = [0u8; 16];
            response[0] = ReportId::ProductIdResponse as u8;
            response[2] = 3; // sw major
            response[3] = 2; // sw minor
            response[4..8].copy_from_slice(&SIM_SW_PART_NUMBER.to_le_bytes());
            response[8..12].copy_from_slice(&371u32.to_le_bytes());
            response[12..14].copy_from_slice(&7u16.to_le_bytes());
            self.enqueue(ShtpChannel::Control, &response);
        } else if command == ControlCommand::SetFeature as u8 && payload.len() >= 9 {
            if payload[1] != ReportId::GameRotationVector as u8 {
                return;
            }
            let interval = u32::from_le_bytes([payload[5], payload[6], payload[7], payload[8]]);
            if interval == 0 {
                self.interval_us = None;
                return;
            }
            self.interval_us = Some(interval);
            self.stream_start_us = now_us;
            self.next_sample_us = now_us + u64::from(interval);
        }
    }

    /// Orientation of the simulated segment at `now_us`.
    fn orientation_at(&mut self, now_us: u64) -> Quaternion {
        let elapsed_s = now_us.saturating_sub(self.stream_start_us) as f32 / 1_000_000.0;
        let motion = Quaternion::from_axis_angle(&self.config.axis, self.config.rate_rad_s * elapsed_s);
        let mut q = motion * self.config.initial;

        let jitter = self.config.jitter_rad;
        if jitter > 0.0 {
            let axis = Vector3::new(
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(-1.0..1.0),
            );
            let angle = self.rng.gen_range(-jitter..=jitter);
            q = Quaternion::from_axis_angle(&axis, angle) * q;
        }
        q.normalized()
    }

    /// Queue one batched Game Rotation Vector packet.
    fn emit_sample(&mut self, now_us: u64) {
        let q = self.orientation_at(now_us);
        let q14 = |v: f32| ((v * 16384.0).round().clamp(-16384.0, 16384.0) as i16).to_le_bytes();

        let mut payload = vec![ReportId::BaseTimestamp as u8, 0, 0, 0, 0];
        payload.extend_from_slice(&[
            ReportId::GameRotationVector as u8,
            self.report_sequence,
            self.config.status & 0x03,
            0,
        ]);
        for c in [q.x, q.y, q.z, q.w] {
            payload.extend_from_slice(&q14(c));
        }
        self.report_sequence = self.report_sequence.wrapping_add(1);
        self.samples_sent += 1;
        self.enqueue(ShtpChannel::InputReport, &payload);

        // Drop samples missed while the host was away; only the latest matters
        if let Some(interval) = self.interval_us {
            let interval = u64::from(interval);
            self.next_sample_us += interval;
            if self.next_sample_us <= now_us {
                self.next_sample_us = now_us + interval;
            }
        }
    }
}

/// Simulated BNO08x hub, used as the tracker's I2C bus.
pub struct SimulatedBno08x<T: TimeSource + Clone> {
    state: Rc<RefCell<DeviceState>>,
    time: T,
}

impl<T: TimeSource + Clone> SimulatedBno08x<T> {
    pub fn new(config: SimulatedBno08xConfig, time: T) -> Self {
        Self {
            state: Rc::new(RefCell::new(DeviceState::new(config))),
            time,
        }
    }

    /// INT line of this device.
    pub fn int_pin(&self, pin: u8) -> SimulatedIntPin<T> {
        SimulatedIntPin {
            state: Rc::clone(&self.state),
            time: self.time.clone(),
            pin,
            mode: PinMode::Input,
        }
    }

    /// Game Rotation Vector interval requested by the host, if any.
    pub fn feature_interval_us(&self) -> Option<u32> {
        self.state.borrow().interval_us
    }

    /// Samples produced so far.
    pub fn samples_sent(&self) -> u32 {
        self.state.borrow().samples_sent
    }

    /// Bus clock last requested by the host.
    pub fn frequency(&self) -> u32 {
        self.state.borrow().frequency
    }

    /// Orientation the device would report now, without jitter.
    pub fn true_orientation(&self) -> Quaternion {
        let state = self.state.borrow();
        let elapsed_s =
            self.time.now_us().saturating_sub(state.stream_start_us) as f32 / 1_000_000.0;
        let motion = Quaternion::from_axis_angle(&state.config.axis, state.config.rate_rad_s * elapsed_s);
        (motion * state.config.initial).normalized()
    }

    fn check_address(&self, addr: u8) -> Result<()> {
        let state = self.state.borrow();
        if !state.config.present || addr != state.config.address {
            return Err(PlatformError::I2c(I2cError::Nack));
        }
        Ok(())
    }
}

impl<T: TimeSource + Clone> I2cInterface for SimulatedBno08x<T> {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        self.check_address(addr)?;
        if data.len() < HEADER_SIZE {
            return Ok(());
        }

        let header = ShtpHeader::from_bytes([data[0], data[1], data[2], data[3]]);
        let end = header.total_len().min(data.len());
        let payload = &data[HEADER_SIZE..end.max(HEADER_SIZE)];

        if header.channel == ShtpChannel::Control as u8 {
            let now_us = self.time.now_us();
            self.state.borrow_mut().handle_control(payload, now_us);
        }
        Ok(())
    }

    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        self.check_address(addr)?;
        buffer.fill(0);

        let now_us = self.time.now_us();
        let mut state = self.state.borrow_mut();
        if state.outbox.is_empty() && state.sample_due(now_us) {
            state.emit_sample(now_us);
        }
        if let Some(packet) = state.outbox.pop_front() {
            let n = buffer.len().min(packet.len());
            buffer[..n].copy_from_slice(&packet[..n]);
        }
        Ok(())
    }

    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        self.write(addr, write_data)?;
        self.read(addr, read_buffer)
    }

    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        if frequency == 0 || frequency > 400_000 {
            return Err(PlatformError::InvalidConfig);
        }
        self.state.borrow_mut().frequency = frequency;
        Ok(())
    }
}

/// Active-low INT line of a [`SimulatedBno08x`].
pub struct SimulatedIntPin<T: TimeSource + Clone> {
    state: Rc<RefCell<DeviceState>>,
    time: T,
    pin: u8,
    mode: PinMode,
}

impl<T: TimeSource + Clone> DigitalInputPin for SimulatedIntPin<T> {
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    fn read(&mut self) -> bool {
        !self.state.borrow().has_output(self.time.now_us())
    }

    fn set_mode(&mut self, mode: PinMode) -> Result<()> {
        if mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.mode = mode;
        Ok(())
    }

    fn write(&mut self, _high: bool) -> Result<()> {
        Err(PlatformError::Gpio(GpioError::InvalidMode))
    }

    fn describe(&self) -> PinLabel {
        let mut label = PinLabel::new();
        let _ = std::fmt::Write::write_fmt(
            &mut label,
            format_args!("SIM-INT{} ({:?})", self.pin, self.mode),
        );
        label
    }
}
