//! Line rendering pipeline.
//!
//! Copies input lines to the output, writing the palette color of each line
//! before it, and applies the `cat` style formatting options: line numbers,
//! blank line squeezing and end-of-line markers.
//!
//! The color of line `i` (counting emitted lines from 0 across all sources)
//! is `palette[i mod len]`. It is written ahead of the line: the first one
//! by [`Renderer::start`], every following one right after the newline of
//! the previous line. [`Renderer::finish`] writes the single reset.

use std::io::{self, BufRead, Write};

use crate::palette::Palette;
use crate::terminal::TerminalCapability;

/// Width of the line number field.
const NUMBER_WIDTH: usize = 6;

/// Line numbering mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Numbering {
    /// No line numbers.
    #[default]
    None,
    /// Number every output line.
    All,
    /// Number non-empty lines only, leaving empty lines unnumbered.
    NonBlank,
}

/// Formatting options of the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Line numbering mode.
    pub numbering: Numbering,
    /// Write `$` at the end of every line.
    pub show_ends: bool,
    /// Collapse runs of empty lines into one.
    pub squeeze_blank: bool,
}

/// Counters carried across every source of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderState {
    /// Number of lines emitted so far.
    pub line: usize,
    /// Number of empty lines among them.
    pub blank: usize,
    /// Whether the last emitted line was empty.
    pub prev_blank: bool,
}

/// Streams sources to `out` with per-line colors.
pub struct Renderer<'a, W: Write> {
    out: W,
    terminal: &'a TerminalCapability,
    palette: &'a Palette,
    options: RenderOptions,
    state: RenderState,
}

impl<'a, W: Write> Renderer<'a, W> {
    /// Create a renderer writing to `out`.
    ///
    /// `palette` must not be empty.
    #[must_use]
    pub fn new(
        out: W,
        terminal: &'a TerminalCapability,
        palette: &'a Palette,
        options: RenderOptions,
    ) -> Self {
        Self {
            out,
            terminal,
            palette,
            options,
            state: RenderState::default(),
        }
    }

    /// Write the color of the first line, before anything is read.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn start(&mut self) -> io::Result<()> {
        self.terminal.write_color(&mut self.out, self.palette.color_at(0))
    }

    /// Copy every line of `input` to the output.
    ///
    /// Counters continue from the previous source, so numbering and color
    /// cycling run on across sources.
    ///
    /// # Errors
    ///
    /// Returns an error if reading `input` or writing the output fails.
    pub fn render<R: BufRead>(&mut self, mut input: R) -> io::Result<()> {
        let mut line = Vec::new();
        loop {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                return Ok(());
            }
            if line.last() == Some(&b'\n') {
                line.pop();
            }
            self.emit_line(&line)?;
        }
    }

    /// Write the color reset, flush, and hand back the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or flushing fails.
    pub fn finish(mut self) -> io::Result<W> {
        self.terminal.write_reset(&mut self.out)?;
        self.out.flush()?;
        Ok(self.out)
    }

    /// Counters after the lines rendered so far.
    #[must_use]
    pub fn state(&self) -> RenderState {
        self.state
    }

    fn emit_line(&mut self, text: &[u8]) -> io::Result<()> {
        let blank = text.is_empty();
        if self.options.squeeze_blank && blank && self.state.prev_blank {
            return Ok(());
        }

        self.state.line += 1;
        if blank {
            self.state.blank += 1;
        }
        self.state.prev_blank = blank;

        self.write_number(blank)?;
        self.out.write_all(text)?;
        if self.options.show_ends {
            self.out.write_all(b"$")?;
        }
        self.out.write_all(b"\n")?;

        // color of the next line
        self.terminal
            .write_color(&mut self.out, self.palette.color_at(self.state.line))
    }

    fn write_number(&mut self, blank: bool) -> io::Result<()> {
        let number = match self.options.numbering {
            Numbering::None => return Ok(()),
            Numbering::All => self.state.line,
            Numbering::NonBlank if blank => return Ok(()),
            Numbering::NonBlank => self.state.line - self.state.blank,
        };
        write!(self.out, "{number:>width$}  ", width = NUMBER_WIDTH)
    }
}
