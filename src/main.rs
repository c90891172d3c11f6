//! pridecat: like cat, but more colorful.
//!
//! Copies files (or standard input) to standard output, coloring every line
//! with the next stripe of the selected pride flags.
//!
//! # Usage
//!
//! ```text
//! pridecat [OPTIONS] [--<flag>...] [FILE...]
//! ```
//!
//! Exit codes:
//! - 0: Success, or `--help` / `--version`
//! - 1: Unknown flag, bad option, or a file that cannot be opened
//! - N: Terminated by signal N, after resetting the color
//!
//! # Environment Variables
//!
//! - `COLORTERM`: `truecolor` or `24bit` enables 24-bit colors.
//! - `PRIDECAT_CATALOGUE`: path of a TOML file with extra flags.
//! - `DEBUG`: When set, enables debug output to stderr.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use log::debug;

use pridecat::cli::{self, Action};
use pridecat::flags::Catalogue;
use pridecat::terminal::TerminalCapability;
use pridecat::{Error, logs, signals};

fn main() -> ExitCode {
    logs::init();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn try_main() -> Result<()> {
    let catalogue = Catalogue::from_environment()?;
    let detected = TerminalCapability::detect();
    debug!("detected {detected:?}");

    match cli::parse_args(env::args_os(), &catalogue, detected)? {
        Action::Help(terminal) => {
            let mut out = io::stdout().lock();
            cli::write_help(&mut out, &catalogue, &terminal)?;
            out.flush()?;
        }
        Action::Cat(config) => {
            signals::reset_on_interrupt(config.terminal.reset_sequence())?;
            pridecat::run(&config, io::stdout().lock())?;
        }
    }
    Ok(())
}

fn report(err: &anyhow::Error) -> ExitCode {
    if let Some(Error::Usage(usage)) = err.downcast_ref::<Error>() {
        // clap formats its own messages, help and version included
        let _ = usage.print();
        return if usage.use_stderr() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    let broken_pipe = err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
    });
    if broken_pipe {
        debug!("output closed early");
        return ExitCode::SUCCESS;
    }

    eprintln!("pridecat: {err:#}");
    ExitCode::FAILURE
}
