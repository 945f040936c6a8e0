use std::env;

/// Export an environment variable to the crate, falling back to `default`
fn export(name: &str, default: &str, secret: bool) {
    match env::var(name) {
        Ok(value) => {
            println!("cargo:rustc-env={}={}", name, value);
            if secret {
                println!("cargo:warning=Using {} from environment (hidden)", name);
            } else {
                println!("cargo:warning=Using {} from environment: {}", name, value);
            }
        }
        Err(_) => println!("cargo:rustc-env={}={}", name, default),
    }
    println!("cargo:rerun-if-env-changed={}", name);
}

fn main() {
    // Tracker identity
    export("TRACKER_JOINT", "HIP", false);
    export("TRACKER_SUIT_ID", "SUIT_001", false);

    // Orientation stream period in milliseconds (10 ms = 100 Hz)
    export("IMU_PERIOD_MS", "10", false);

    // WiFi credentials (empty when unset)
    export("WIFI_SSID", "", false);
    export("WIFI_PASSWORD", "", true);

    // Record receiver endpoint
    export("SERVER_IP", "192.168.4.1", false);
    export("SERVER_PORT", "5555", false);
}
