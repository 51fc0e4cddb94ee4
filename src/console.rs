//! Console stop-word reader.
//!
//! A dedicated thread performs blocking line reads on standard input so the
//! controlling thread (and certainly the audio threads) never touch stdin.
//! The thread is detached rather than joined: a thread blocked in
//! `read_line` has no portable wakeup, and shutdown must not wait on it.
//! It exits on the stop word, on EOF, or after the signal is set elsewhere.

use std::io::BufRead;
use std::thread;

use crate::StopSignal;

/// Returns `true` if a console line is the stop command.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Example
///
/// ```
/// use loopback_audio::is_stop_command;
///
/// assert!(is_stop_command("stop"));
/// assert!(is_stop_command("  STOP \n"));
/// assert!(!is_stop_command("stop now"));
/// ```
pub fn is_stop_command(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("stop")
}

/// Spawns a thread that sets `stop` when a `"stop"` line is read from stdin.
///
/// Returns the join handle for callers that want it; dropping it simply
/// detaches the thread, which is the normal usage.
pub fn spawn_stop_reader(stop: StopSignal) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("loopback-console".to_string())
        .spawn(move || read_until_stop(std::io::stdin().lock(), &stop))
}

fn read_until_stop(mut input: impl BufRead, stop: &StopSignal) {
    let mut line = String::new();
    loop {
        line.clear();
        match input.read_line(&mut line) {
            // EOF: stdin closed, nothing more to watch for.
            Ok(0) => return,
            Ok(_) => {
                if is_stop_command(&line) {
                    tracing::info!("stop command received on console");
                    stop.set();
                    return;
                }
            }
            Err(error) => {
                tracing::debug!(%error, "console read failed, reader exiting");
                return;
            }
        }
        if stop.is_set() {
            return;
        }
    }
}
