//! Simulated BNO08x -> real driver -> tracker node.

use std::net::UdpSocket;
use std::time::Duration;

use body_tracker::devices::imu::Bno08x;
use body_tracker::devices::traits::{OrientationError, OrientationSource};
use body_tracker::parameters::TrackerConfig;
use body_tracker::platform::mock::{MockDelay, MockSink};
use body_tracker::subsystems::tracker::{CalibrationOutcome, TrackerNode};
use body_tracker_core::math::{Quaternion, Vector3};
use body_tracker_core::record::JointRecord;
use body_tracker_core::traits::{MockTime, TimeSource};
use body_tracker_core::CalibrationError;
use body_tracker_sitl::{SimulatedBno08x, SimulatedBno08xConfig, UdpSink};

/// Q14 quantization plus float error
const TOLERANCE: f32 = 2e-3;

fn spinning(rate_rad_s: f32) -> SimulatedBno08xConfig {
    SimulatedBno08xConfig {
        rate_rad_s,
        seed: Some(7),
        ..Default::default()
    }
}

#[test]
fn handshake_configures_stream() {
    let time = MockTime::new();
    let config = TrackerConfig::default();
    let device = SimulatedBno08x::new(spinning(1.0), &time);
    let mut int_pin = device.int_pin(14);

    let mut imu = Bno08x::new(device, &mut int_pin, MockDelay::new(&time), config.imu_config());
    imu.begin().unwrap();

    assert!(imu.is_ready());
    assert_eq!(imu.bus().feature_interval_us(), Some(10_000));
    assert_eq!(imu.bus().frequency(), 100_000);
    let id = imu.product_id().copied().unwrap();
    assert_eq!(id.sw_part_number, body_tracker_sitl::device::SIM_SW_PART_NUMBER);
}

#[test]
fn corrected_orientation_follows_motion_after_calibration() {
    let time = MockTime::new();
    let config = TrackerConfig::default();
    let device = SimulatedBno08x::new(spinning(1.0), &time);
    let mut int_pin = device.int_pin(14);
    let imu = Bno08x::new(device, &mut int_pin, MockDelay::new(&time), config.imu_config());

    let mut node = TrackerNode::new(imu, MockSink::new(), &time, &config);
    node.begin().unwrap();

    let mut delay = MockDelay::new(&time);
    let reference = node.calibrate(&mut delay, config.calibration_timeout_ms).unwrap();
    let calibrated_at_ms = time.now_ms();

    for _ in 0..50 {
        time.advance(10_000);
        let report = node.poll();
        assert!(report.new_sample);
        assert!(report.sent);
    }

    // Z rotation since calibration, at 1 rad/s
    let elapsed_s = (time.now_ms() - calibrated_at_ms) as f32 / 1000.0;
    let expected = Quaternion::from_axis_angle(&Vector3::Z, elapsed_s);
    assert!(node.corrected_orientation().approx_eq(&expected, TOLERANCE));
    assert!(reference.approx_eq(&node.offset().offset().inverse(), 1e-6));

    let records = node.sink().records();
    assert_eq!(records.len(), 50);
    let last = JointRecord::decode(records.last().unwrap()).unwrap();
    assert_eq!(last.joint, "HIP");
    assert!(last.orientation.approx_eq(&expected, TOLERANCE));
}

#[test]
fn requested_calibration_resolves_in_poll() {
    let time = MockTime::new();
    let config = TrackerConfig::default();
    let device = SimulatedBno08x::new(spinning(0.5), &time);
    let mut int_pin = device.int_pin(14);
    let imu = Bno08x::new(device, &mut int_pin, MockDelay::new(&time), config.imu_config());

    let mut node = TrackerNode::new(imu, MockSink::new(), &time, &config);
    node.begin().unwrap();
    node.request_calibration(config.calibration_timeout_ms);

    // Stream not due yet
    assert_eq!(node.poll().calibration, None);

    time.advance(10_000);
    let report = node.poll();
    assert!(matches!(report.calibration, Some(CalibrationOutcome::Completed(_))));
    assert!(node.offset().is_calibrated());
    assert!(node
        .corrected_orientation()
        .approx_eq(&Quaternion::IDENTITY, TOLERANCE));
}

#[test]
fn absent_sensor_is_reported_and_calibration_refused() {
    let time = MockTime::new();
    let config = TrackerConfig::default();
    let device = SimulatedBno08x::new(
        SimulatedBno08xConfig {
            present: false,
            ..Default::default()
        },
        &time,
    );
    let mut int_pin = device.int_pin(14);
    let imu = Bno08x::new(device, &mut int_pin, MockDelay::new(&time), config.imu_config());

    let mut node = TrackerNode::new(imu, MockSink::new(), &time, &config);
    assert_eq!(node.begin(), Err(OrientationError::DeviceAbsent));

    let mut delay = MockDelay::new(&time);
    assert_eq!(
        node.calibrate(&mut delay, 5000),
        Err(CalibrationError::SourceNotReady)
    );
    assert!(!node.poll().new_sample);
}

#[test]
fn seeded_jitter_is_reproducible() {
    let run = || {
        let time = MockTime::new();
        let config = SimulatedBno08xConfig {
            jitter_rad: 0.05,
            seed: Some(42),
            ..Default::default()
        };
        let device = SimulatedBno08x::new(config, &time);
        let mut int_pin = device.int_pin(14);
        let mut imu = Bno08x::new(
            device,
            &mut int_pin,
            MockDelay::new(&time),
            TrackerConfig::default().imu_config(),
        );
        imu.begin().unwrap();

        let mut samples = Vec::new();
        for _ in 0..5 {
            time.advance(10_000);
            assert!(imu.update());
            samples.push(imu.current_orientation());
        }
        samples
    };

    let first = run();
    assert_eq!(first, run());
    assert!(first.iter().any(|q| !q.approx_eq(&Quaternion::IDENTITY, 1e-3)));
}

#[test]
fn udp_sink_delivers_records() {
    let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
    receiver
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();

    let time = MockTime::new();
    let config = TrackerConfig::default();
    let device = SimulatedBno08x::new(spinning(0.0), &time);
    let mut int_pin = device.int_pin(14);
    let imu = Bno08x::new(device, &mut int_pin, MockDelay::new(&time), config.imu_config());
    let sink = UdpSink::bind(receiver.local_addr().unwrap()).unwrap();

    let mut node = TrackerNode::new(imu, sink, &time, &config);
    node.begin().unwrap();
    time.advance(10_000);
    assert!(node.poll().sent);
    assert_eq!(node.sink().sent(), 1);

    let mut buf = [0u8; 128];
    let (len, _) = receiver.recv_from(&mut buf).unwrap();
    let text = std::str::from_utf8(&buf[..len]).unwrap();

    // Not calibrated: identity motion reads as the mount offset
    assert_eq!(text, "HIP:0.7071,0.0000,0.0000,0.7071");
}
