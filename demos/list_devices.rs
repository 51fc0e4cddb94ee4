//! Prints the audio device enumeration table.
//!
//! ```sh
//! cargo run --example list_devices
//! ```

use loopback_audio::list_devices;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let devices = list_devices()?;
    if devices.is_empty() {
        println!("no audio devices found");
        return Ok(());
    }

    println!("{:>3}  {:<40} {:>3} {:>3}  {:>8}  default", "idx", "name", "in", "out", "rate");
    for device in devices {
        let default = match (device.is_default_input, device.is_default_output) {
            (true, true) => "in+out",
            (true, false) => "in",
            (false, true) => "out",
            (false, false) => "",
        };
        println!(
            "{:>3}  {:<40} {:>3} {:>3}  {:>8}  {}",
            device.index,
            device.name,
            device.max_input_channels,
            device.max_output_channels,
            device.default_sample_rate,
            default,
        );
    }
    Ok(())
}
