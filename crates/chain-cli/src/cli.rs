use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The Polychain Developers",
    version,
    about = "polychain - Build idealized nucleic-acid, peptide and particle-chain models and export them as simulation input files.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the strands described in a design file and write the model files.
    Build(BuildArgs),
    /// Search the strands of a saved snapshot for a sequence pattern.
    Search(SearchArgs),
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the design file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub design: PathBuf,

    /// Output path prefix; `.top`, `.dat` and `.toml` are appended.
    #[arg(short, long, required = true, value_name = "PREFIX")]
    pub output: PathBuf,

    /// Override the helix parameter file from the design file.
    #[arg(long, value_name = "PATH")]
    pub helix_params: Option<PathBuf>,

    /// Override the simulation box edge length from the design file.
    #[arg(short, long, value_name = "FLOAT")]
    pub box_size: Option<f64>,

    /// Also write per-monomer coordinates to `PREFIX.csv`.
    #[arg(long)]
    pub csv: bool,

    /// Skip every complementary strand requested by the design file.
    #[arg(long)]
    pub no_complement: bool,
}

/// Arguments for the `search` subcommand.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Path to a snapshot written by `build`.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub snapshot: PathBuf,

    /// Sequence to look for, e.g. `GATC`.
    #[arg(short, long, required = true, value_name = "SEQUENCE")]
    pub pattern: String,

    /// Only search strands carrying this label.
    #[arg(short = 'l', long, value_name = "LABEL")]
    pub strand: Option<String>,
}
