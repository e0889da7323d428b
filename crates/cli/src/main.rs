use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use date2name_core::{
    default_source, run_batch, BatchReport, EntryFilter, RenameMode, RenameOptions, StyleFlags,
    TimeKind, MAX_PATHLENGTH,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = "\
By default the modification time of each file or directory is written as a
YYYY-MM-DD stamp in front of its name. The delimiter after the stamp is an
underscore, or a space when the name already contains one.

An existing stamp keeps its numbers and is converted to the selected style.
Inside date-time stamps, hours, minutes, and seconds are separated by dots
because colons break on several file systems.";

#[derive(Debug, Parser)]
#[command(name = "date2name", version)]
#[command(about = "Adds, converts, or removes date stamps at the start of file and directory names")]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// modify only directory names
    #[arg(short = 'd', long, conflicts_with = "files")]
    directories: bool,
    /// modify only file names
    #[arg(short = 'f', long)]
    files: bool,
    /// use compact datestamp (YYYYMMDD)
    #[arg(short = 'C', long)]
    compact: bool,
    /// use datestamp with year and month (YYYY-MM)
    #[arg(short = 'M', long)]
    month: bool,
    /// use short datestamp (YYMMDD)
    #[arg(short = 'S', long)]
    short: bool,
    /// use datestamp including seconds (YYYY-MM-DDThh.mm.ss)
    #[arg(short = 'w', long)]
    withtime: bool,
    /// remove all known datestamps
    #[arg(short = 'r', long)]
    remove: bool,
    /// take modification time for datestamp [default]
    #[arg(short = 'm', long, conflicts_with = "ctime")]
    mtime: bool,
    /// take creation time for datestamp
    #[arg(short = 'c', long)]
    ctime: bool,
    /// override the string between stamp and name; anything but minus, space, or
    /// underscore will not be recognized by later runs
    #[arg(long, value_name = "DELIMITER_STRING")]
    delimiter: Option<String>,
    /// do not convert existing date/time-stamps, always add a new one
    #[arg(long)]
    nocorrections: bool,
    /// do not output anything but errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,
    /// enable verbose mode
    #[arg(short = 'v', long)]
    verbose: bool,
    /// just simulate what would happen, do not modify files or directories
    #[arg(short = 's', long)]
    dryrun: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Cli {
    fn verbosity(&self) -> Verbosity {
        if self.verbose {
            Verbosity::Verbose
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }

    fn to_options(&self) -> Result<RenameOptions> {
        let style = StyleFlags {
            compact: self.compact,
            short: self.short,
            month: self.month,
            withtime: self.withtime,
        }
        .resolve()?;

        let options = RenameOptions {
            mode: if self.remove {
                RenameMode::RemoveStamp
            } else {
                RenameMode::AddStamp
            },
            style,
            time_kind: if self.ctime {
                TimeKind::Creation
            } else {
                TimeKind::Modification
            },
            delimiter: self.delimiter.clone().filter(|d| !d.is_empty()),
            corrections: !self.nocorrections,
            filter: if self.files {
                EntryFilter::FilesOnly
            } else if self.directories {
                EntryFilter::DirectoriesOnly
            } else {
                EntryFilter::All
            },
            dry_run: self.dryrun,
            max_name_len: MAX_PATHLENGTH,
        };
        options.validate()?;
        Ok(options)
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    let options = match cli.to_options() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(cli.verbosity());

    match cmd_rename(&cli, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_rename(cli: &Cli, options: &RenameOptions) -> Result<()> {
    let source = default_source();
    let report = run_batch(&cli.paths, options, source.as_ref())?;

    match cli.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_summary(&report, options.dry_run),
    }
    Ok(())
}

fn print_summary(report: &BatchReport, dry_run: bool) {
    let stats = &report.stats;
    if dry_run {
        info!(
            "dry run: {} would be renamed, {} unchanged, {} skipped",
            stats.previewed,
            stats.unchanged,
            stats.skipped + stats.broken + stats.failed
        );
    } else {
        info!(
            "renamed {}, unchanged {}, skipped {}, failed {}",
            stats.renamed,
            stats.unchanged,
            stats.skipped + stats.broken,
            stats.failed
        );
    }
}

fn init_logging(verbosity: Verbosity) {
    let level = match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "info",
        Verbosity::Verbose => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match verbosity {
        Verbosity::Verbose => builder.init(),
        Verbosity::Quiet => builder.without_time().init(),
        Verbosity::Normal => builder.without_time().with_level(false).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use date2name_core::StampStyle;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("date2name").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_to_standard_style_and_mtime() {
        let cli = parse(&["report.txt"]).expect("must parse");
        let options = cli.to_options().expect("options");
        assert_eq!(options.style, StampStyle::Standard);
        assert_eq!(options.time_kind, TimeKind::Modification);
        assert_eq!(options.mode, RenameMode::AddStamp);
        assert!(options.corrections);
        assert_eq!(cli.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn maps_flags_to_options() {
        let cli = parse(&["-C", "-c", "-f", "-s", "--nocorrections", "--delimiter", "-", "a", "b"])
            .expect("must parse");
        let options = cli.to_options().expect("options");
        assert_eq!(options.style, StampStyle::Compact);
        assert_eq!(options.time_kind, TimeKind::Creation);
        assert_eq!(options.filter, EntryFilter::FilesOnly);
        assert!(options.dry_run);
        assert!(!options.corrections);
        assert_eq!(options.delimiter.as_deref(), Some("-"));
        assert_eq!(cli.paths.len(), 2);
    }

    #[test]
    fn rejects_conflicting_pairs() {
        for args in [
            ["-d", "-f", "x"],
            ["-c", "-m", "x"],
            ["-v", "-q", "x"],
        ] {
            let err = parse(&args).expect_err("must conflict");
            assert_eq!(err.kind(), ErrorKind::ArgumentConflict, "{args:?}");
        }
    }

    #[test]
    fn rejects_two_exclusive_styles() {
        for args in [["-C", "-M", "x"], ["-C", "-w", "x"], ["-M", "-w", "x"]] {
            let cli = parse(&args).expect("clap accepts the flags");
            assert!(cli.to_options().is_err(), "{args:?}");
        }
    }

    #[test]
    fn empty_delimiter_means_default_rule() {
        let cli = parse(&["--delimiter", "", "x"]).expect("must parse");
        let options = cli.to_options().expect("empty delimiter is not an error");
        assert_eq!(options.delimiter, None);
    }

    #[test]
    fn requires_at_least_one_path() {
        let err = parse(&["-C"]).expect_err("paths are required");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn remove_mode_and_verbosity() {
        let cli = parse(&["--remove", "-v", "x"]).expect("must parse");
        assert_eq!(cli.to_options().expect("options").mode, RenameMode::RemoveStamp);
        assert_eq!(cli.verbosity(), Verbosity::Verbose);
    }

    #[test]
    fn version_flag_is_recognized() {
        let err = parse(&["--version"]).expect_err("version short-circuits");
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }
}
