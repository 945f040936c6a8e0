//! Tracker Node
//!
//! Ties one orientation source to one transmission sink:
//!
//! ```text
//! OrientationSource --raw--> CalibrationOffset::apply --corrected-->
//!     JointRecord::encode --"<joint>:<x>,<y>,<z>,<w>"--> TransmissionSink
//! ```
//!
//! The node is polled from a single loop. `poll()` never blocks; at most one
//! record is sent per sample period even if the source produces faster.
//!
//! ## Calibration
//!
//! Two ways to capture the reference pose, both bounded by a timeout:
//!
//! - [`TrackerNode::calibrate`] waits in place for the next sample
//! - [`TrackerNode::request_calibration`] returns immediately; a later
//!   `poll()` reports the [`CalibrationOutcome`]
//!
//! ## Usage
//!
//! ```ignore
//! use body_tracker::subsystems::tracker::TrackerNode;
//!
//! let mut node = TrackerNode::new(imu, sink, time, &config);
//! node.begin()?;
//! node.calibrate(&mut delay, config.calibration_timeout_ms)?;
//! loop {
//!     node.poll();
//! }
//! ```

use embedded_hal::delay::DelayNs;
use heapless::String;

use body_tracker_core::calibration::{CalibrationError, CalibrationOffset};
use body_tracker_core::math::Quaternion;
use body_tracker_core::record::JointRecord;
use body_tracker_core::traits::TimeSource;

use crate::communication::TransmissionSink;
use crate::devices::traits::{OrientationError, OrientationSource};
use crate::parameters::tracker::{TrackerConfig, MAX_JOINT_LEN};

/// Pause between sample checks while calibrating
const CALIBRATION_POLL_MS: u32 = 1;

/// Result of a requested calibration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationOutcome {
    /// Offset replaced; carries the raw reference orientation
    Completed(Quaternion),
    /// No sample arrived in time; the previous offset is still active
    TimedOut {
        /// How long the request was pending (milliseconds)
        waited_ms: u64,
    },
}

/// What one `poll()` did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PollReport {
    /// The source produced a new sample
    pub new_sample: bool,
    /// A record was handed to the sink successfully
    pub sent: bool,
    /// A pending calibration request was resolved
    pub calibration: Option<CalibrationOutcome>,
}

/// Node counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackerStats {
    /// New samples seen by `poll()`
    pub samples: u32,
    /// Records accepted by the sink
    pub records_sent: u32,
    /// Records the sink rejected or that could not be encoded
    pub send_failures: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CalibrationState {
    Idle,
    Pending { requested_us: u64, timeout_ms: u32 },
}

/// Body-worn tracker node
///
/// # Type Parameters
///
/// * `S` - Orientation source (e.g. `Bno08x`)
/// * `K` - Transmission sink for encoded records
/// * `T` - Time source used for pacing and calibration deadlines
pub struct TrackerNode<S, K, T>
where
    S: OrientationSource,
    K: TransmissionSink,
    T: TimeSource,
{
    source: S,
    sink: K,
    time: T,
    offset: CalibrationOffset,
    joint: String<MAX_JOINT_LEN>,
    period_us: u64,
    last_sent_us: Option<u64>,
    calibration: CalibrationState,
    stats: TrackerStats,
}

impl<S, K, T> TrackerNode<S, K, T>
where
    S: OrientationSource,
    K: TransmissionSink,
    T: TimeSource,
{
    /// Create a node with the configured joint, period and mount offset
    pub fn new(source: S, sink: K, time: T, config: &TrackerConfig) -> Self {
        Self {
            source,
            sink,
            time,
            offset: config.mount_offset(),
            joint: config.joint.clone(),
            period_us: u64::from(config.period_ms) * 1000,
            last_sent_us: None,
            calibration: CalibrationState::Idle,
            stats: TrackerStats::default(),
        }
    }

    /// Initialize the orientation source
    ///
    /// May be called again after a failure.
    pub fn begin(&mut self) -> Result<(), OrientationError> {
        match self.source.begin() {
            Ok(()) => {
                crate::log_info!("Tracker {} streaming", self.joint.as_str());
                Ok(())
            }
            Err(e) => {
                crate::log_error!("Tracker {} sensor init failed: {}", self.joint.as_str(), e);
                Err(e)
            }
        }
    }

    /// Run one pass of the pipeline
    ///
    /// Polls the source; on a new sample resolves a pending calibration,
    /// then sends the corrected orientation if a period has elapsed since
    /// the last record.
    pub fn poll(&mut self) -> PollReport {
        let mut report = PollReport::default();

        if self.source.update() {
            report.new_sample = true;
            self.stats.samples = self.stats.samples.wrapping_add(1);

            if let CalibrationState::Pending { .. } = self.calibration {
                let reference = self.source.current_orientation();
                self.apply_calibration(reference);
                report.calibration = Some(CalibrationOutcome::Completed(reference));
            }

            let now_us = self.time.now_us();
            let due = match self.last_sent_us {
                Some(last) => now_us.saturating_sub(last) >= self.period_us,
                None => true,
            };
            if due {
                report.sent = self.send_current();
                if report.sent {
                    self.last_sent_us = Some(now_us);
                }
            }
        }

        if let CalibrationState::Pending {
            requested_us,
            timeout_ms,
        } = self.calibration
        {
            let waited_ms = self.time.elapsed_since(requested_us) / 1000;
            if waited_ms >= u64::from(timeout_ms) {
                crate::log_warn!("Calibration timed out after {} ms", waited_ms);
                self.calibration = CalibrationState::Idle;
                report.calibration = Some(CalibrationOutcome::TimedOut { waited_ms });
            }
        }

        report
    }

    /// Calibrate on the next sample, waiting at most `timeout_ms`
    ///
    /// Returns the raw reference orientation. On timeout the previous offset
    /// stays active.
    ///
    /// # Errors
    ///
    /// - `CalibrationError::SourceNotReady` if `begin()` has not succeeded
    /// - `CalibrationError::Timeout` if no sample arrived in time
    pub fn calibrate<D: DelayNs>(
        &mut self,
        delay: &mut D,
        timeout_ms: u32,
    ) -> Result<Quaternion, CalibrationError> {
        if !self.source.is_ready() {
            return Err(CalibrationError::SourceNotReady);
        }

        crate::log_info!("Calibrating {}: hold reference pose", self.joint.as_str());
        let start_us = self.time.now_us();

        loop {
            if self.source.update() {
                let reference = self.source.current_orientation();
                self.apply_calibration(reference);
                return Ok(reference);
            }

            let waited_ms = self.time.elapsed_since(start_us) / 1000;
            if waited_ms >= u64::from(timeout_ms) {
                crate::log_warn!("Calibration timed out after {} ms", waited_ms);
                return Err(CalibrationError::Timeout { waited_ms });
            }
            delay.delay_ms(CALIBRATION_POLL_MS);
        }
    }

    /// Calibrate on the next sample seen by `poll()`
    ///
    /// A request made while one is pending restarts the deadline.
    pub fn request_calibration(&mut self, timeout_ms: u32) {
        crate::log_info!("Calibration requested for {}", self.joint.as_str());
        self.calibration = CalibrationState::Pending {
            requested_us: self.time.now_us(),
            timeout_ms,
        };
    }

    /// Whether a requested calibration is still waiting for a sample
    pub fn calibration_pending(&self) -> bool {
        matches!(self.calibration, CalibrationState::Pending { .. })
    }

    /// Latest raw orientation with the active offset applied
    pub fn corrected_orientation(&self) -> Quaternion {
        self.offset.apply(self.source.current_orientation())
    }

    pub fn offset(&self) -> &CalibrationOffset {
        &self.offset
    }

    pub fn joint(&self) -> &str {
        self.joint.as_str()
    }

    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Consume the node, returning source and sink
    pub fn into_parts(self) -> (S, K) {
        (self.source, self.sink)
    }

    fn apply_calibration(&mut self, reference: Quaternion) {
        self.offset.calibrate(reference);
        self.calibration = CalibrationState::Idle;
        crate::log_info!(
            "Calibrated {}: reference w={} x={} y={} z={}",
            self.joint.as_str(),
            reference.w,
            reference.x,
            reference.y,
            reference.z
        );
    }

    /// Encode and send the corrected orientation
    fn send_current(&mut self) -> bool {
        let corrected = self.corrected_orientation();
        let record = match JointRecord::new(self.joint.as_str(), corrected).encode() {
            Ok(record) => record,
            Err(_) => {
                crate::log_error!("Record for {} does not fit", self.joint.as_str());
                self.stats.send_failures = self.stats.send_failures.wrapping_add(1);
                return false;
            }
        };

        match self.sink.send(record.as_str()) {
            Ok(()) => {
                self.stats.records_sent = self.stats.records_sent.wrapping_add(1);
                true
            }
            Err(_) => {
                crate::log_warn!("Failed to send record for {}", self.joint.as_str());
                self.stats.send_failures = self.stats.send_failures.wrapping_add(1);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use body_tracker_core::math::Vector3;
    use body_tracker_core::traits::MockTime;

    use crate::devices::traits::OrientationAccuracy;
    use crate::platform::mock::{MockDelay, MockSink};

    const TOLERANCE: f32 = 1e-5;

    /// Source yielding one scripted sample per `update()` call
    ///
    /// `None` entries (and an exhausted script) mean "no new sample".
    struct ScriptedSource {
        script: VecDeque<Option<Quaternion>>,
        current: Quaternion,
        ready: bool,
        fail_begin: bool,
        updates: u32,
    }

    impl ScriptedSource {
        fn new(script: &[Option<Quaternion>]) -> Self {
            Self {
                script: script.iter().copied().collect(),
                current: Quaternion::IDENTITY,
                ready: true,
                fail_begin: false,
                updates: 0,
            }
        }

        fn absent() -> Self {
            Self {
                ready: false,
                fail_begin: true,
                ..Self::new(&[])
            }
        }
    }

    impl OrientationSource for ScriptedSource {
        fn begin(&mut self) -> Result<(), OrientationError> {
            if self.fail_begin {
                return Err(OrientationError::DeviceAbsent);
            }
            self.ready = true;
            Ok(())
        }

        fn update(&mut self) -> bool {
            self.updates += 1;
            match self.script.pop_front().flatten() {
                Some(q) if self.ready => {
                    self.current = q;
                    true
                }
                _ => false,
            }
        }

        fn current_orientation(&self) -> Quaternion {
            self.current
        }

        fn accuracy(&self) -> OrientationAccuracy {
            OrientationAccuracy::UNRELIABLE
        }

        fn is_ready(&self) -> bool {
            self.ready
        }
    }

    fn node<'t>(
        source: ScriptedSource,
        time: &'t MockTime,
    ) -> TrackerNode<ScriptedSource, MockSink, &'t MockTime> {
        TrackerNode::new(source, MockSink::new(), time, &TrackerConfig::default())
    }

    #[test]
    fn test_identity_sample_sends_mount_offset() {
        let time = MockTime::new();
        let mut node = node(ScriptedSource::new(&[Some(Quaternion::IDENTITY)]), &time);

        let report = node.poll();

        assert!(report.new_sample);
        assert!(report.sent);
        assert_eq!(node.sink().records(), ["HIP:0.7071,0.0000,0.0000,0.7071"]);
        assert_eq!(node.corrected_orientation(), node.offset().offset());
    }

    #[test]
    fn test_no_sample_sends_nothing() {
        let time = MockTime::new();
        let mut node = node(ScriptedSource::new(&[None, None]), &time);

        assert_eq!(node.poll(), PollReport::default());
        assert_eq!(node.poll(), PollReport::default());
        assert!(node.sink().records().is_empty());
        assert_eq!(node.stats(), TrackerStats::default());
    }

    #[test]
    fn test_records_paced_by_period() {
        let time = MockTime::new();
        let q = Quaternion::from_axis_angle(&Vector3::Z, 0.2);
        let mut node = node(ScriptedSource::new(&[Some(q), Some(q), Some(q)]), &time);

        assert!(node.poll().sent);
        time.advance(4_000);
        let report = node.poll();
        assert!(report.new_sample);
        assert!(!report.sent);
        time.advance(6_000);
        assert!(node.poll().sent);

        assert_eq!(node.stats().samples, 3);
        assert_eq!(node.stats().records_sent, 2);
    }

    #[test]
    fn test_sink_failure_counted() {
        let time = MockTime::new();
        let mut node = node(
            ScriptedSource::new(&[Some(Quaternion::IDENTITY), Some(Quaternion::IDENTITY)]),
            &time,
        );
        node.sink_mut().set_failing(true);

        assert!(!node.poll().sent);
        assert_eq!(node.stats().send_failures, 1);

        // A failed send does not start a new period
        node.sink_mut().set_failing(false);
        assert!(node.poll().sent);
    }

    #[test]
    fn test_begin_failure_propagates() {
        let time = MockTime::new();
        let mut node = node(ScriptedSource::absent(), &time);

        assert_eq!(node.begin(), Err(OrientationError::DeviceAbsent));
        assert!(!node.source().is_ready());
    }

    #[test]
    fn test_calibrate_waits_for_sample() {
        let time = MockTime::new();
        let reference = Quaternion::from_euler_degrees(10.0, 20.0, -30.0);
        let mut node = node(ScriptedSource::new(&[None, None, Some(reference)]), &time);
        let mut delay = MockDelay::new(&time);

        let result = node.calibrate(&mut delay, 5000);

        assert_eq!(result, Ok(reference));
        assert!(node.offset().is_calibrated());
        assert!(node
            .corrected_orientation()
            .approx_eq(&Quaternion::IDENTITY, TOLERANCE));
        assert_eq!(time.now_ms(), 2);
    }

    #[test]
    fn test_calibrate_times_out() {
        let time = MockTime::new();
        let mut node = node(ScriptedSource::new(&[]), &time);
        let mut delay = MockDelay::new(&time);
        let mount = node.offset().offset();

        let result = node.calibrate(&mut delay, 50);

        assert_eq!(result, Err(CalibrationError::Timeout { waited_ms: 50 }));
        assert!(!node.offset().is_calibrated());
        assert_eq!(node.offset().offset(), mount);
        assert_eq!(node.source().updates, 51);
    }

    #[test]
    fn test_calibrate_requires_ready_source() {
        let time = MockTime::new();
        let mut node = node(ScriptedSource::absent(), &time);
        let mut delay = MockDelay::new(&time);

        assert_eq!(
            node.calibrate(&mut delay, 5000),
            Err(CalibrationError::SourceNotReady)
        );
        assert_eq!(time.now_us(), 0);
    }

    #[test]
    fn test_requested_calibration_completes_on_next_sample() {
        let time = MockTime::new();
        let reference = Quaternion::from_axis_angle(&Vector3::Y, 0.8);
        let mut node = node(ScriptedSource::new(&[None, Some(reference)]), &time);

        node.request_calibration(5000);
        assert!(node.calibration_pending());

        assert_eq!(node.poll().calibration, None);
        let report = node.poll();

        assert_eq!(report.calibration, Some(CalibrationOutcome::Completed(reference)));
        assert!(!node.calibration_pending());
        // The calibrating sample itself is sent as the zero pose
        let sent = JointRecord::decode(&node.sink().records()[0]).unwrap();
        assert_eq!(sent.joint, "HIP");
        assert!(sent.orientation.approx_eq(&Quaternion::IDENTITY, 1e-4));
    }

    #[test]
    fn test_requested_calibration_times_out() {
        let time = MockTime::new();
        let mut node = node(ScriptedSource::new(&[]), &time);
        let mount = node.offset().offset();

        node.request_calibration(100);
        time.advance(99_000);
        assert_eq!(node.poll().calibration, None);
        time.advance(1_000);

        assert_eq!(
            node.poll().calibration,
            Some(CalibrationOutcome::TimedOut { waited_ms: 100 })
        );
        assert!(!node.calibration_pending());
        assert_eq!(node.offset().offset(), mount);
    }

    #[test]
    fn test_relative_motion_after_calibration() {
        let time = MockTime::new();
        let reference = Quaternion::from_axis_angle(&Vector3::Z, 1.0);
        let moved = Quaternion::from_axis_angle(&Vector3::Z, 1.5);
        let mut node = node(ScriptedSource::new(&[Some(reference), Some(moved)]), &time);
        let mut delay = MockDelay::new(&time);

        node.calibrate(&mut delay, 5000).unwrap();
        node.poll();

        let expected = Quaternion::from_axis_angle(&Vector3::Z, 0.5);
        assert!(node.corrected_orientation().approx_eq(&expected, TOLERANCE));
    }
}
