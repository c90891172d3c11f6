//! Concatenate files to standard output, cycling pride flag colors per line.

pub mod adjust;
pub mod cli;
pub mod color;
pub mod error;
pub mod flags;
pub mod logs;
pub mod palette;
pub mod render;
pub mod signals;
pub mod terminal;

use std::fs::File;
use std::io::{self, BufReader, Write};

use anyhow::{Context, Result};
use log::debug;

pub use cli::{Action, RunConfig, Source};
pub use error::Error;

use render::Renderer;

/// Copy every source of `config` to `out`, line by line, in color.
///
/// The first line's color is written before anything is read, and the
/// color is reset once at the end, also when a source fails.
///
/// # Errors
///
/// Returns [`Error::Open`] if a file cannot be opened; output of the
/// sources before it has already been written. Returns an error as well if
/// reading a source or writing to `out` fails.
pub fn run<W: Write>(config: &RunConfig, out: W) -> Result<()> {
    let mut renderer = Renderer::new(out, &config.terminal, &config.palette, config.render);

    let result = renderer
        .start()
        .context("Failed to write output")
        .and_then(|()| render_sources(&mut renderer, &config.sources));
    let finished = renderer.finish().context("Failed to write output");

    result?;
    finished?;
    Ok(())
}

fn render_sources<W: Write>(renderer: &mut Renderer<'_, W>, sources: &[Source]) -> Result<()> {
    for source in sources {
        match source {
            Source::Stdin => {
                debug!("reading stdin");
                renderer
                    .render(io::stdin().lock())
                    .context("Failed to copy stdin")?;
            }
            Source::File(path) => {
                debug!("reading {}", path.display());
                let file = File::open(path).map_err(|source| Error::Open {
                    path: path.clone(),
                    source,
                })?;
                renderer
                    .render(BufReader::new(file))
                    .with_context(|| format!("Failed to copy {}", path.display()))?;
            }
        }
    }
    debug!("rendered {:?}", renderer.state());
    Ok(())
}
