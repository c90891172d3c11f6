//! Command line surface.
//!
//! Static options are declared with clap. Flag selections (`--lgbt`,
//! `--trans`, ...) depend on the catalogue, so they are picked out of the
//! arguments before clap sees them, keeping their order.

use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::debug;

use crate::adjust::Adjustment;
use crate::error::Error;
use crate::flags::{Catalogue, Flag};
use crate::palette::Palette;
use crate::render::{Numbering, RenderOptions};
use crate::terminal::{RESET_BACKGROUND, TerminalCapability};

const EXAMPLES: &str = "\
Examples:
  pridecat f - g          Output f's contents, then stdin, then g's contents.
  pridecat                Copy stdin to stdout, but with rainbows.
  pridecat --trans --bi   Alternate between trans and bisexual pride flags.
  pridecat -n --lesbian   Number lines, colored like the lesbian pride flag.
";

/// Static options of the command line.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Parser)]
#[command(name = "pridecat", version)]
#[command(about = "It's like cat but more colorful :)")]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Change the background color instead of the text color
    #[arg(short, long)]
    pub background: bool,

    /// Force color even when stdout is not a tty
    #[arg(short, long)]
    pub force: bool,

    /// Force truecolor output (even if the terminal doesn't seem to support it)
    #[arg(short, long, overrides_with = "no_truecolor")]
    pub truecolor: bool,

    /// Force disable truecolor output (even if the terminal does seem to support it)
    #[arg(short = 'T', long, overrides_with = "truecolor")]
    pub no_truecolor: bool,

    /// Lighten colors slightly for improved readability on dark backgrounds
    #[arg(short, long, overrides_with = "darken")]
    pub lighten: bool,

    /// Darken colors slightly for improved readability on light backgrounds
    #[arg(short, long, overrides_with = "lighten")]
    pub darken: bool,

    /// Number all output lines
    #[arg(short, long)]
    pub number: bool,

    /// Number non-empty output lines, overrides -n
    #[arg(short = 'N', long)]
    pub number_nonblank: bool,

    /// Display $ at end of each line
    #[arg(short = 'E', long)]
    pub show_ends: bool,

    /// Suppress repeated empty output lines
    #[arg(short, long)]
    pub squeeze_blank: bool,

    /// Display this message
    #[arg(short, long)]
    pub help: bool,

    /// Files to concatenate, `-` is standard input
    #[arg(value_name = "FILE")]
    pub files: Vec<OsString>,
}

/// An input of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Standard input.
    Stdin,
    /// A file path.
    File(PathBuf),
}

/// Everything a run needs, fixed once the command line is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Inputs, in order.
    pub sources: Vec<Source>,
    /// Colors cycled over lines.
    pub palette: Palette,
    /// How colors are written.
    pub terminal: TerminalCapability,
    /// Line formatting.
    pub render: RenderOptions,
}

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print the help page.
    Help(TerminalCapability),
    /// Concatenate the sources.
    Cat(RunConfig),
}

/// Parse the process arguments, program name included.
///
/// `detected` holds the capabilities found in the environment; options
/// override them.
///
/// # Errors
///
/// Returns [`Error::UnknownFlag`] for a `--<name>` that is neither an
/// option nor a catalogue flag, unless help is requested as well, and [`Error::Usage`] for other command line
/// problems (including `--version`, which clap reports as an error).
pub fn parse_args<I, T>(args: I, catalogue: &Catalogue, detected: TerminalCapability) -> Result<Action>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut command = Cli::command();
    command.build();
    let options: Vec<&str> = command
        .get_arguments()
        .filter_map(clap::Arg::get_long)
        .collect();

    let mut clap_args = Vec::new();
    let mut selected: Vec<&Flag> = Vec::new();
    let mut trailing = Vec::new();
    let mut unknown = None;

    let mut args = args.into_iter().map(Into::into);
    clap_args.extend(args.next());
    while let Some(arg) = args.next() {
        if arg == "--" {
            trailing.extend(args.by_ref());
            break;
        }
        let text = arg.to_string_lossy().into_owned();
        let Some(name) = text.strip_prefix("--").filter(|name| !name.is_empty()) else {
            clap_args.push(arg);
            continue;
        };
        let option = name.split_once('=').map_or(name, |(option, _)| option);
        if options.contains(&option) {
            clap_args.push(arg);
            continue;
        }
        let Some(flag) = catalogue.resolve(name) else {
            // reported once clap has seen the rest, so that -h still wins
            unknown.get_or_insert(text);
            continue;
        };
        debug!("selected flag {} via --{name}", flag.name);
        selected.push(flag);
    }

    let parsed = Cli::try_parse_from(clap_args);
    if let Some(token) = unknown {
        return match parsed {
            Ok(cli) if cli.help => Ok(Action::Help(terminal_from(&cli, detected))),
            _ => Err(Error::UnknownFlag(token).into()),
        };
    }
    let cli = parsed.map_err(Error::Usage)?;
    let terminal = terminal_from(&cli, detected);
    if cli.help {
        return Ok(Action::Help(terminal));
    }

    let mut sources: Vec<Source> = cli
        .files
        .iter()
        .map(|file| {
            if file == OsStr::new("-") {
                Source::Stdin
            } else {
                Source::File(PathBuf::from(file))
            }
        })
        .collect();
    sources.extend(trailing.into_iter().map(|file| Source::File(PathBuf::from(file))));
    if sources.is_empty() {
        sources.push(Source::Stdin);
    }

    let palette = Palette::from_selection(&selected, catalogue)?;
    debug!("palette of {} colors, {terminal:?}", palette.len());

    Ok(Action::Cat(RunConfig {
        sources,
        palette,
        terminal,
        render: render_from(&cli),
    }))
}

fn terminal_from(cli: &Cli, detected: TerminalCapability) -> TerminalCapability {
    let adjustment = if cli.lighten {
        Adjustment::Lighten
    } else if cli.darken {
        Adjustment::Darken
    } else {
        Adjustment::None
    };
    TerminalCapability {
        color_enabled: detected.color_enabled || cli.force,
        truecolor: (detected.truecolor || cli.truecolor) && !cli.no_truecolor,
        background: cli.background,
        adjustment,
    }
}

fn render_from(cli: &Cli) -> RenderOptions {
    let numbering = if cli.number_nonblank {
        Numbering::NonBlank
    } else if cli.number {
        Numbering::All
    } else {
        Numbering::None
    };
    RenderOptions {
        numbering,
        show_ends: cli.show_ends,
        squeeze_blank: cli.squeeze_blank,
    }
}

/// Write the help page: usage, options, the flag catalogue and examples.
///
/// Each flag is listed with its aliases and, when colors are enabled, a
/// swatch of its stripes.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_help<W: Write>(
    out: &mut W,
    catalogue: &Catalogue,
    terminal: &TerminalCapability,
) -> io::Result<()> {
    writeln!(out, "pridecat!")?;
    writeln!(out, "{}", Cli::command().render_help())?;

    writeln!(out, "Currently available flags:")?;
    for flag in catalogue.flags() {
        write!(out, "  --{}", flag.name)?;
        for alias in catalogue.aliases_of(&flag.name) {
            write!(out, ",--{alias}")?;
        }
        if terminal.color_enabled {
            out.write_all(b" ")?;
            for &color in &flag.colors {
                terminal.write_swatch(out, color)?;
            }
            out.write_all(RESET_BACKGROUND)?;
        }
        writeln!(out)?;
        writeln!(out, "      {}", flag.description)?;
        writeln!(out)?;
    }

    write!(out, "{EXAMPLES}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn parse(args: &[&str]) -> Result<Action> {
        let catalogue = Catalogue::builtin()?;
        let args = std::iter::once("pridecat").chain(args.iter().copied());
        parse_args(args, &catalogue, TerminalCapability::default())
    }

    fn config(args: &[&str]) -> RunConfig {
        match parse(args).unwrap() {
            Action::Cat(config) => config,
            Action::Help(_) => panic!("unexpected help"),
        }
    }

    fn file(path: &str) -> Source {
        Source::File(PathBuf::from(path))
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.sources, vec![Source::Stdin]);
        assert_eq!(config.palette.len(), 6);
        assert_eq!(config.palette.color_at(0), Color::from_packed(0xE40303));
        assert_eq!(config.terminal, TerminalCapability::default());
        assert_eq!(config.render, RenderOptions::default());
    }

    #[test]
    fn test_sources() {
        let config = config(&["a", "-", "b"]);
        assert_eq!(config.sources, vec![file("a"), Source::Stdin, file("b")]);
    }

    #[test]
    fn test_double_dash_ends_options() {
        let config = config(&["-n", "--", "-", "--trans", "-s"]);
        assert_eq!(config.sources, vec![file("-"), file("--trans"), file("-s")]);
        assert_eq!(config.render.numbering, Numbering::All);
        assert!(!config.render.squeeze_blank);
        assert_eq!(config.palette.len(), 6);
    }

    #[test]
    fn test_flag_selection_order() {
        let config = config(&["--trans", "notes.txt", "--bi", "--trans"]);
        assert_eq!(config.sources, vec![file("notes.txt")]);
        assert_eq!(config.palette.len(), 15);
        assert_eq!(config.palette.color_at(0), Color::from_packed(0x5BCEFA));
        assert_eq!(config.palette.color_at(5), Color::from_packed(0xD60270));
        assert_eq!(config.palette.color_at(10), Color::from_packed(0x5BCEFA));
    }

    #[test]
    fn test_unknown_flag() {
        let err = parse(&["a.txt", "--doesnotexist"]).unwrap_err();
        match err.downcast_ref::<Error>() {
            Some(Error::UnknownFlag(token)) => assert_eq!(token, "--doesnotexist"),
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.to_string(), "Unknown flag '--doesnotexist'");
    }

    #[test]
    fn test_help_wins_over_unknown_flag() {
        assert!(matches!(parse(&["-h", "--bogus"]).unwrap(), Action::Help(_)));
        assert!(matches!(parse(&["--bogus", "--help"]).unwrap(), Action::Help(_)));

        let err = parse(&["--bogus", "--trans", "--worse"]).unwrap_err();
        assert_eq!(err.to_string(), "Unknown flag '--bogus'");
    }

    #[test]
    fn test_unknown_short_option() {
        let err = parse(&["-x"]).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Usage(_))));
    }

    #[test]
    fn test_version_is_reported_through_clap() {
        let err = parse(&["--version"]).unwrap_err();
        match err.downcast_ref::<Error>() {
            Some(Error::Usage(usage)) => assert!(!usage.use_stderr()),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_help() {
        assert!(matches!(parse(&["--help"]).unwrap(), Action::Help(_)));
        assert!(matches!(parse(&["-f", "-h"]).unwrap(), Action::Help(t) if t.color_enabled));
    }

    #[test]
    fn test_terminal_overrides() {
        let forced = config(&["-f", "-b"]);
        assert!(forced.terminal.color_enabled);
        assert!(forced.terminal.background);

        assert!(config(&["-T", "-t"]).terminal.truecolor);
        assert!(!config(&["-t", "-T"]).terminal.truecolor);
        assert!(config(&["--truecolor"]).terminal.truecolor);
    }

    #[test]
    fn test_detected_truecolor_can_be_disabled() -> Result<()> {
        let catalogue = Catalogue::builtin()?;
        let detected = TerminalCapability::from_environment(true, Some("truecolor"));

        let Action::Cat(config) = parse_args(["pridecat"], &catalogue, detected)? else {
            panic!("expected cat");
        };
        assert!(config.terminal.color_enabled && config.terminal.truecolor);

        let Action::Cat(config) = parse_args(["pridecat", "-T"], &catalogue, detected)? else {
            panic!("expected cat");
        };
        assert!(!config.terminal.truecolor);
        Ok(())
    }

    #[test]
    fn test_adjustment_last_wins() {
        assert_eq!(config(&["-l"]).terminal.adjustment, Adjustment::Lighten);
        assert_eq!(config(&["-l", "-d"]).terminal.adjustment, Adjustment::Darken);
        assert_eq!(config(&["--darken", "--lighten"]).terminal.adjustment, Adjustment::Lighten);
    }

    #[test]
    fn test_render_options() {
        let render = config(&["-nEs"]).render;
        assert_eq!(render.numbering, Numbering::All);
        assert!(render.show_ends);
        assert!(render.squeeze_blank);

        assert_eq!(config(&["-n", "-N"]).render.numbering, Numbering::NonBlank);
        assert_eq!(config(&["--number-nonblank"]).render.numbering, Numbering::NonBlank);
    }

    #[test]
    fn test_write_help_plain() -> Result<()> {
        let catalogue = Catalogue::builtin()?;
        let mut out = Vec::new();
        write_help(&mut out, &catalogue, &TerminalCapability::default())?;
        let help = String::from_utf8(out)?;

        assert!(help.starts_with("pridecat!\n"));
        assert!(help.contains("--squeeze-blank"));
        assert!(help.contains("  --nonbinary,--enby,--nb\n"));
        assert!(help.contains("      Classic 6-color rainbow flag popular since 1979\n"));
        assert!(help.contains("Examples:"));
        assert!(!help.contains('\x1b'));
        Ok(())
    }

    #[test]
    fn test_write_help_swatches() -> Result<()> {
        let catalogue = Catalogue::builtin()?;
        let terminal = TerminalCapability {
            color_enabled: true,
            truecolor: true,
            ..TerminalCapability::default()
        };
        let mut out = Vec::new();
        write_help(&mut out, &catalogue, &terminal)?;
        let help = String::from_utf8(out)?;

        assert!(help.contains(
            "  --asexual,--ace \x1b[48;2;0;0;0m \x1b[48;2;163;163;163m \
             \x1b[48;2;255;255;255m \x1b[48;2;128;0;128m \x1b[49m\n"
        ));
        Ok(())
    }
}
