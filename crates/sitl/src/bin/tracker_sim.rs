//! Tracker node on a simulated BNO08x, streaming records over UDP.
//!
//! Runs the real driver and node code against `SimulatedBno08x`, so the
//! output matches what the firmware would send for the same motion.
//!
//! Usage:
//!   cargo run -p body_tracker_sitl --bin tracker_sim -- [OPTIONS]
//!
//! Options:
//!   --target <ADDR:PORT>       Record receiver (default: build-time SERVER_IP:SERVER_PORT)
//!   --joint <NAME>             Joint name (default: build-time TRACKER_JOINT)
//!   --rate <RAD_S>             Simulated rotation rate about Z (default: 0.5)
//!   --jitter <RAD>             Random rotation per sample (default: 0)
//!   --seed <N>                 RNG seed for jitter
//!   --recalibrate-every <S>    Request a calibration every S seconds (default: off)
//!   --duration <S>             Stop after S seconds (default: run until Ctrl+C)

use std::env;
use std::net::SocketAddr;
use std::process;
use std::time::Duration;

use body_tracker::devices::imu::Bno08x;
use body_tracker::parameters::TrackerConfig;
use body_tracker::subsystems::tracker::{CalibrationOutcome, TrackerNode};
use body_tracker_core::traits::TimeSource;
use body_tracker_sitl::{
    SimulatedBno08x, SimulatedBno08xConfig, SimulatorError, StdDelay, StdTime, UdpSink,
};

/// INT line number reported in diagnostics
const SIM_INT_PIN: u8 = 14;

struct Args {
    target: Option<SocketAddr>,
    joint: Option<String>,
    rate: f32,
    jitter: f32,
    seed: Option<u64>,
    recalibrate_every_s: Option<u64>,
    duration_s: Option<u64>,
}

fn parse_args() -> Args {
    let mut args = Args {
        target: None,
        joint: None,
        rate: 0.5,
        jitter: 0.0,
        seed: None,
        recalibrate_every_s: None,
        duration_s: None,
    };

    let raw: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "--target" => {
                i += 1;
                args.target = Some(parse_arg(&raw, i, "target"));
            }
            "--joint" => {
                i += 1;
                args.joint = Some(parse_arg(&raw, i, "joint"));
            }
            "--rate" => {
                i += 1;
                args.rate = parse_arg(&raw, i, "rate");
            }
            "--jitter" => {
                i += 1;
                args.jitter = parse_arg(&raw, i, "jitter");
            }
            "--seed" => {
                i += 1;
                args.seed = Some(parse_arg(&raw, i, "seed"));
            }
            "--recalibrate-every" => {
                i += 1;
                args.recalibrate_every_s = Some(parse_arg(&raw, i, "recalibrate-every"));
            }
            "--duration" => {
                i += 1;
                args.duration_s = Some(parse_arg(&raw, i, "duration"));
            }
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    args
}

fn parse_arg<T: std::str::FromStr>(raw: &[String], i: usize, name: &str) -> T {
    raw.get(i)
        .unwrap_or_else(|| {
            eprintln!("Error: --{name} requires a value");
            process::exit(1);
        })
        .parse()
        .unwrap_or_else(|_| {
            eprintln!("Error: invalid value for --{name}");
            process::exit(1);
        })
}

fn print_usage() {
    eprintln!(
        "Usage: tracker_sim [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --target <ADDR:PORT>     Record receiver (default: build-time SERVER_IP:SERVER_PORT)\n\
         \x20 --joint <NAME>           Joint name (default: build-time TRACKER_JOINT)\n\
         \x20 --rate <RAD_S>           Simulated rotation rate about Z (default: 0.5)\n\
         \x20 --jitter <RAD>           Random rotation per sample (default: 0)\n\
         \x20 --seed <N>               RNG seed for jitter\n\
         \x20 --recalibrate-every <S>  Request a calibration every S seconds\n\
         \x20 --duration <S>           Stop after S seconds\n\
         \x20 -h, --help               Show this help"
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = parse_args();
    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), SimulatorError> {
    let mut config = TrackerConfig::from_build_env();
    if let Some(joint) = &args.joint {
        config.joint = heapless::String::try_from(joint.as_str())
            .map_err(|_| SimulatorError::InvalidArgument(format!("joint name too long: {joint}")))?;
    }

    let sink = match args.target {
        Some(target) => UdpSink::bind(target)?,
        None => UdpSink::for_endpoint(&config.server)?,
    };

    let time = StdTime::new();
    let device = SimulatedBno08x::new(
        SimulatedBno08xConfig {
            address: config.imu_address,
            rate_rad_s: args.rate,
            jitter_rad: args.jitter,
            seed: args.seed,
            ..Default::default()
        },
        time,
    );
    let mut int_pin = device.int_pin(SIM_INT_PIN);
    let imu = Bno08x::new(device, &mut int_pin, StdDelay, config.imu_config());

    println!("=== body_tracker simulator ===");
    println!(
        "Joint: {}, suit: {}, period: {} ms, target: {}",
        config.joint,
        config.suit_id,
        config.period_ms,
        sink.target()
    );

    let mut node = TrackerNode::new(imu, sink, time, &config);
    node.begin()?;
    if let Some(id) = node.source().product_id() {
        println!(
            "Sensor: part {} sw {}.{}.{}",
            id.sw_part_number, id.sw_version_major, id.sw_version_minor, id.sw_version_patch
        );
    }

    let reference = node.calibrate(&mut StdDelay, config.calibration_timeout_ms)?;
    println!(
        "Calibrated: reference w={:.4} x={:.4} y={:.4} z={:.4}",
        reference.w, reference.x, reference.y, reference.z
    );
    println!("Streaming. Press Ctrl+C to stop.\n");

    let mut interval = tokio::time::interval(Duration::from_millis(1));
    let mut last_recalibration_s = 0;
    let mut last_summary_s = 0;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                println!("\nShutdown requested.");
                break;
            }
            _ = interval.tick() => {
                let report = node.poll();
                match report.calibration {
                    Some(CalibrationOutcome::Completed(q)) => println!(
                        "Recalibrated: reference w={:.4} x={:.4} y={:.4} z={:.4}",
                        q.w, q.x, q.y, q.z
                    ),
                    Some(CalibrationOutcome::TimedOut { waited_ms }) => {
                        eprintln!("Recalibration timed out after {waited_ms} ms")
                    }
                    None => {}
                }

                let elapsed_s = time.now_ms() / 1000;
                if let Some(every) = args.recalibrate_every_s {
                    if every > 0 && elapsed_s >= last_recalibration_s + every {
                        last_recalibration_s = elapsed_s;
                        node.request_calibration(config.calibration_timeout_ms);
                    }
                }

                // Summary every 5 seconds
                if elapsed_s >= last_summary_s + 5 {
                    last_summary_s = elapsed_s;
                    let stats = node.stats();
                    let q = node.corrected_orientation();
                    println!(
                        "[{elapsed_s}s] {} samples, {} sent, {} failed, {}:{:.4},{:.4},{:.4},{:.4}",
                        stats.samples,
                        stats.records_sent,
                        stats.send_failures,
                        node.joint(),
                        q.x,
                        q.y,
                        q.z,
                        q.w
                    );
                }

                if args.duration_s.is_some_and(|d| elapsed_s >= d) {
                    break;
                }
            }
        }
    }

    let stats = node.stats();
    println!(
        "Simulation complete. {} samples, {} records sent, {} send failures",
        stats.samples, stats.records_sent, stats.send_failures
    );
    Ok(())
}
