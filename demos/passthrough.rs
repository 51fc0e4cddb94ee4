//! Interactive microphone-to-speaker pass-through.
//!
//! Prompts for devices and format, then runs until `stop` is typed or
//! Ctrl+C is pressed.
//!
//! ```sh
//! cargo run --example passthrough
//! ```

use std::io::Write;

use loopback_audio::{
    event_callback, list_devices, DeviceSelection, Loopback, LoopbackConfig, LoopbackEvent,
};

fn prompt<T: std::str::FromStr>(label: &str, default: T) -> T
where
    T: std::fmt::Display,
{
    print!("{label} [{default}]: ");
    let _ = std::io::stdout().flush();

    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).is_err() {
        return default;
    }
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return default;
    }
    trimmed.parse().unwrap_or(default)
}

fn select_device(label: &str, default_index: Option<usize>) -> DeviceSelection {
    match default_index {
        Some(index) => DeviceSelection::ByIndex(prompt(label, index)),
        None => DeviceSelection::SystemDefault,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let devices = list_devices()?;
    println!("{:>3}  {:<40} {:>3} {:>3}", "idx", "name", "in", "out");
    for device in &devices {
        println!(
            "{:>3}  {:<40} {:>3} {:>3}",
            device.index, device.name, device.max_input_channels, device.max_output_channels,
        );
    }
    println!();

    let default_input = devices.iter().find(|d| d.is_default_input).map(|d| d.index);
    let default_output = devices.iter().find(|d| d.is_default_output).map(|d| d.index);

    let config = LoopbackConfig {
        input: select_device("input device index", default_input),
        output: select_device("output device index", default_output),
        sample_rate: prompt("sample rate", 44_100u32),
        channels: prompt("channels", 1u16),
        block_size: prompt("block size (frames)", 1024u32),
        ..Default::default()
    };

    let session = Loopback::builder()
        .config(config)
        .on_event(event_callback(|event| match event {
            LoopbackEvent::Occupancy { occupied, capacity } => {
                print!("\rqueue: {:3.0}%  ", 100.0 * occupied as f64 / capacity as f64);
                let _ = std::io::stdout().flush();
            }
            LoopbackEvent::Overflow { dropped, total } => {
                eprintln!("\ninput overflow: dropped {dropped} block(s), {total} total");
            }
            LoopbackEvent::Underflow { missed, total } => {
                eprintln!("\noutput underflow: {missed} silent block(s), {total} total");
            }
        }))
        .console_stop(true)
        .start()?;

    println!("pass-through running; type 'stop' or press Ctrl+C to end");

    // Ctrl+C is a second stop source alongside the console reader.
    let interrupt_stop = session.stop_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt_stop.set();
        }
    });

    // The session handle holds CPAL streams and must stay on this thread;
    // only the blocking wait moves to the blocking pool.
    let wait_stop = session.stop_signal();
    tokio::task::spawn_blocking(move || wait_stop.wait()).await?;

    let stats = session.stats();
    println!(
        "\ncaptured {} blocks, played {} blocks, {} overflow(s), {} underflow(s)",
        stats.blocks_captured, stats.blocks_played, stats.overflows, stats.underflows,
    );

    session.stop()?;
    Ok(())
}
