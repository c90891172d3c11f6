//! Terminal capability detection and escape sequence emission.
//!
//! This module provides:
//! - Detection of whether standard output is a terminal (`isatty`)
//! - Detection of 24-bit color support from `COLORTERM`
//! - Writing of SGR color and color-reset sequences in either 24-bit or
//!   256-color form, for the text or the background

use std::env;
use std::io::{self, Write};

use nix::unistd::isatty;

use crate::adjust::Adjustment;
use crate::color::Color;

/// Reset sequence for the text color.
pub const RESET_FOREGROUND: &[u8] = b"\x1b[39m";

/// Reset sequence for the background color.
pub const RESET_BACKGROUND: &[u8] = b"\x1b[49m";

/// What the terminal can do and how colors should be written to it.
///
/// Built once from the environment and the command line, then only read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerminalCapability {
    /// Whether any escape sequence is written at all.
    pub color_enabled: bool,
    /// Whether 24-bit sequences are used instead of 256-color indices.
    pub truecolor: bool,
    /// Whether the background is colored instead of the text.
    pub background: bool,
    /// Readability transform applied before every emission.
    pub adjustment: Adjustment,
}

impl TerminalCapability {
    /// Detect capabilities of the current process' standard output.
    ///
    /// Colors are enabled when stdout is a terminal, truecolor when
    /// `COLORTERM` advertises it.
    #[must_use]
    pub fn detect() -> Self {
        let is_tty = isatty(io::stdout()).unwrap_or(false);
        let colorterm = env::var("COLORTERM").ok();
        Self::from_environment(is_tty, colorterm.as_deref())
    }

    /// Build capabilities from an already inspected environment.
    #[must_use]
    pub fn from_environment(is_tty: bool, colorterm: Option<&str>) -> Self {
        let truecolor =
            colorterm.is_some_and(|value| value.contains("truecolor") || value.contains("24bit"));
        Self {
            color_enabled: is_tty,
            truecolor,
            ..Self::default()
        }
    }

    /// Write the sequence selecting `color` for the active target.
    ///
    /// Writes nothing when colors are disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_color<W: Write + ?Sized>(&self, out: &mut W, color: Color) -> io::Result<()> {
        if !self.color_enabled {
            return Ok(());
        }
        write_sgr(out, self.background, self.truecolor, self.adjustment.apply(color))
    }

    /// Write the reset sequence of the active target.
    ///
    /// Writes nothing when colors are disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_reset<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.reset_sequence())
    }

    /// The bytes `write_reset` would emit, possibly empty.
    #[must_use]
    pub fn reset_sequence(&self) -> &'static [u8] {
        match (self.color_enabled, self.background) {
            (false, _) => b"",
            (true, false) => RESET_FOREGROUND,
            (true, true) => RESET_BACKGROUND,
        }
    }

    /// Write a background swatch of `color`, regardless of the active target.
    ///
    /// Used by the help page, which always shows flags as background blocks.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_swatch<W: Write + ?Sized>(&self, out: &mut W, color: Color) -> io::Result<()> {
        if !self.color_enabled {
            return Ok(());
        }
        write_sgr(out, true, self.truecolor, self.adjustment.apply(color))?;
        out.write_all(b" ")
    }
}

/// Write one SGR color sequence.
fn write_sgr<W: Write + ?Sized>(
    out: &mut W,
    background: bool,
    truecolor: bool,
    color: Color,
) -> io::Result<()> {
    let target = if background { 48 } else { 38 };
    if truecolor {
        write!(out, "\x1b[{target};2;{};{};{}m", color.r, color.g, color.b)
    } else {
        write!(out, "\x1b[{target};5;{}m", color.to_ansi256())
    }
}
