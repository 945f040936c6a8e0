//! Listen for joint records and print them.
//!
//! Plays the receiving side of the tracker: each datagram is one
//! `<joint>:<x>,<y>,<z>,<w>` record. Records are parsed, normalized and
//! printed. Malformed records and unknown joints are reported and dropped.
//!
//! Usage:
//!   cargo run -p body_tracker_sitl --bin record_listen -- [OPTIONS]
//!
//! Options:
//!   --bind <ADDR:PORT>   Listen address (default: 0.0.0.0:<build-time SERVER_PORT>)
//!   --quiet              Only print the per-joint summary on exit

use std::collections::BTreeMap;
use std::env;
use std::net::SocketAddr;
use std::process;

use body_tracker::parameters::TrackerConfig;
use body_tracker_core::record::{JointRecord, RecordError};
use body_tracker_sitl::SimulatorError;

/// Largest datagram accepted
const MAX_DATAGRAM: usize = 512;

struct Args {
    bind: SocketAddr,
    quiet: bool,
}

fn parse_args() -> Args {
    let port = TrackerConfig::from_build_env().server.port;
    let mut args = Args {
        bind: SocketAddr::from(([0, 0, 0, 0], port)),
        quiet: false,
    };

    let raw: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "--bind" => {
                i += 1;
                args.bind = raw
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("Error: --bind requires an ADDR:PORT value");
                        process::exit(1);
                    });
            }
            "--quiet" => args.quiet = true,
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

fn print_usage() {
    eprintln!(
        "Usage: record_listen [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --bind <ADDR:PORT>  Listen address (default: 0.0.0.0:<SERVER_PORT>)\n\
         \x20 --quiet             Only print the per-joint summary on exit\n\
         \x20 -h, --help          Show this help"
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
    let socket = tokio::net::UdpSocket::bind(args.bind).await?;
    println!("Listening for joint records on {}", socket.local_addr()?);

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut malformed: u64 = 0;
    let mut unknown: u64 = 0;
    let mut buf = [0u8; MAX_DATAGRAM];

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                println!("\nShutdown requested.");
                break;
            }
            received = socket.recv_from(&mut buf) => {
                let (len, from) = received?;
                let Ok(text) = std::str::from_utf8(&buf[..len]) else {
                    malformed += 1;
                    eprintln!("{from}: non-UTF-8 datagram ({len} bytes)");
                    continue;
                };

                match JointRecord::decode_known(text) {
                    Ok(record) => {
                        let q = record.orientation.normalized();
                        let count = counts.entry(record.joint.to_string()).or_insert(0);
                        *count += 1;
                        if !args.quiet {
                            println!(
                                "{from} {:<16} w={:+.4} x={:+.4} y={:+.4} z={:+.4}",
                                record.joint, q.w, q.x, q.y, q.z
                            );
                        }
                    }
                    Err(RecordError::UnknownJoint) => {
                        unknown += 1;
                        eprintln!("{from}: dropping unknown joint: {:?}", text.trim());
                    }
                    Err(e) => {
                        malformed += 1;
                        eprintln!("{from}: {e}: {:?}", text.trim());
                    }
                }
            }
        }
    }

    println!("Received:");
    for (joint, count) in &counts {
        println!("  {joint}: {count}");
    }
    if unknown > 0 {
        println!("  unknown joint: {unknown}");
    }
    if malformed > 0 {
        println!("  malformed: {malformed}");
    }
    Ok(())
}
