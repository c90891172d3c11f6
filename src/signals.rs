//! Interrupt handling.
//!
//! On SIGINT, SIGTERM or SIGHUP the color reset sequence is written straight
//! to file descriptor 1 and the process exits with the signal number.
//! Output still sitting in the standard library's stdout buffer is dropped.
//!
//! The reset is best effort: the main thread keeps running until the exit
//! and may flush one more colored line after the reset has been written,
//! leaving the terminal colored.

use std::io;
use std::process;
use std::thread;

use anyhow::{Context, Result};
use log::debug;
use nix::sys::signal::Signal;
use nix::unistd::write;
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

/// Signals that end the run.
pub const TERMINATING: [i32; 3] = [SIGINT, SIGTERM, SIGHUP];

/// Spawn a listener that writes `reset` and exits on the first terminating
/// signal.
///
/// # Errors
///
/// Returns an error if the handlers cannot be registered or the listener
/// thread cannot be spawned.
pub fn reset_on_interrupt(reset: &'static [u8]) -> Result<()> {
    let mut signals = Signals::new(TERMINATING).context("Failed to register signal handlers")?;

    thread::Builder::new()
        .name("signals".to_string())
        .spawn(move || {
            if let Some(signal) = signals.forever().next() {
                debug!("received {}", describe(signal));
                if !reset.is_empty() {
                    // the main thread may hold the stdout lock, go around it.
                    // a flush it has in flight can still land after this.
                    let _ = write(io::stdout(), reset);
                }
                process::exit(signal);
            }
        })
        .context("Failed to spawn signal listener")?;

    Ok(())
}

fn describe(signal: i32) -> String {
    Signal::try_from(signal).map_or_else(|_| signal.to_string(), |s| s.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        assert_eq!(describe(SIGINT), "SIGINT");
        assert_eq!(describe(SIGTERM), "SIGTERM");
        assert_eq!(describe(-1), "-1");
    }
}
