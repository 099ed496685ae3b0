//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use ranktab_model::ColumnKind;

#[derive(Parser)]
#[command(
    name = "ranktab",
    version,
    about = "Ranking table tool - import, merge, inspect and export LLM ranking tables",
    long_about = "Import, merge, inspect and export LLM ranking tables.\n\n\
                  Tables travel as a self-describing CSV pair (main file with six control\n\
                  rows plus a notes file) or as a JSON state file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// TOML settings file with export and display defaults.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Decode a CSV pair and save it as a JSON state file.
    Import(ImportArgs),

    /// Merge a CSV pair into an existing state file.
    Update(UpdateArgs),

    /// Write a ZIP bundle with both CSV files and a README.
    Export(ExportArgs),

    /// Print the visible table.
    Show(ShowArgs),
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Main CSV file (with control rows).
    #[arg(value_name = "MAIN_CSV")]
    pub main: PathBuf,

    /// Notes CSV file.
    #[arg(long = "notes", value_name = "PATH")]
    pub notes: Option<PathBuf>,

    /// State file to write (default: <MAIN_CSV> with a .json extension).
    #[arg(long = "output", short = 'o', value_name = "STATE_JSON")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct UpdateArgs {
    /// State file to update in place.
    #[arg(value_name = "STATE_JSON")]
    pub state: PathBuf,

    /// Main CSV file to merge.
    #[arg(value_name = "MAIN_CSV")]
    pub main: PathBuf,

    /// Notes CSV file to merge.
    #[arg(long = "notes", value_name = "PATH")]
    pub notes: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Main CSV file or JSON state file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Notes CSV file (CSV input only).
    #[arg(long = "notes", value_name = "PATH")]
    pub notes: Option<PathBuf>,

    /// Bundle path (default: <DIR>/<prefix>-YYYY-MM-DD.zip).
    #[arg(long = "output", short = 'o', value_name = "ZIP")]
    pub output: Option<PathBuf>,

    /// Directory for the default bundle name (default: current directory).
    #[arg(long = "output-dir", value_name = "DIR", conflicts_with = "output")]
    pub output_dir: Option<PathBuf>,

    /// Export only visible entities and columns.
    #[arg(long = "visible-only")]
    pub visible_only: bool,

    /// File name prefix of the bundle (overrides the settings file).
    #[arg(long = "prefix", value_name = "PREFIX")]
    pub prefix: Option<String>,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Main CSV file or JSON state file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Notes CSV file (CSV input only).
    #[arg(long = "notes", value_name = "PATH")]
    pub notes: Option<PathBuf>,

    /// Which columns to print.
    #[arg(long = "kind", value_enum, default_value = "all")]
    pub kind: KindArg,

    /// Print the view as CSV instead of a table.
    #[arg(long = "csv")]
    pub csv: bool,
}

/// Column selection for `show`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Metric,
    Info,
    All,
}

impl KindArg {
    /// Column kinds to print, in print order.
    pub fn kinds(self) -> &'static [ColumnKind] {
        match self {
            Self::Metric => &[ColumnKind::Metric],
            Self::Info => &[ColumnKind::InfoField],
            Self::All => &[ColumnKind::InfoField, ColumnKind::Metric],
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "ranktab",
            "export",
            "table.json",
            "--visible-only",
            "--log-level",
            "debug",
            "--config",
            "ranktab.toml",
        ])
        .unwrap();
        assert!(cli.log_level.is_some());
        assert_eq!(cli.config, Some(PathBuf::from("ranktab.toml")));
        let Command::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert!(args.visible_only);
        assert_eq!(args.input, PathBuf::from("table.json"));
    }

    #[test]
    fn output_conflicts_with_output_dir() {
        let result = Cli::try_parse_from([
            "ranktab", "export", "a.csv", "-o", "a.zip", "--output-dir", "out",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn show_kind_selects_columns() {
        let cli = Cli::try_parse_from(["ranktab", "show", "a.csv", "--kind", "metric"]).unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.kind.kinds(), &[ColumnKind::Metric]);
    }
}
