use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

const EXAMPLE: &str = "Example:\n  \
    mals-merger \"path/to/mod_a|path/to/mod_b\" path/to/mod_final -l mals-merger.log -v true";

#[derive(Debug, Parser)]
#[command(
    name = "mals-merger",
    about = "TotK Mals Merger: merge localized message archives from several mods",
    version,
    after_help = EXAMPLE
)]
pub struct Cli {
    /// Bar (|) separated list of input mod folders, highest to lowest priority
    #[arg(value_name = "INPUTS")]
    pub inputs: String,

    /// Output mod folder for the merged Mals archives
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Also write logs to this file
    #[arg(short, long, value_name = "LOG_FILE")]
    pub log: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(
        short,
        long,
        value_name = "VERBOSE",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Root of the unmodified game dump (the folder containing Mals)
    #[arg(long, value_name = "DIR")]
    pub game_path: Option<PathBuf>,

    /// Game version to build for (inferred from the game dump if unset)
    #[arg(long, value_name = "N")]
    pub game_version: Option<u32>,

    /// Merge every locale into this one (e.g. USen)
    #[arg(long, value_name = "LANG")]
    pub localization: Option<String>,

    /// Export merged changelogs as JSON instead of building archives
    #[arg(long)]
    pub changelogs: bool,

    /// Indent exported changelogs
    #[arg(long, requires = "changelogs")]
    pub pretty: bool,

    /// Raw zstd dictionary for reading and writing archives
    #[arg(long, value_name = "FILE")]
    pub dictionary: Option<PathBuf>,
}

impl Cli {
    /// Input folders in priority order.
    pub fn input_paths(&self) -> Vec<PathBuf> {
        split_inputs(&self.inputs)
    }
}

/// Accept the single-dash `-log` spelling as `--log`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| if arg == "-log" { OsString::from("--log") } else { arg })
        .collect()
}

/// Split a `|`-separated folder list, dropping empty segments.
pub fn split_inputs(arg: &str) -> Vec<PathBuf> {
    arg.split('|')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(PathBuf::from)
        .collect()
}
