//! CLI argument definitions and shared statics.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Config path used when `--config` is not given. A missing file at this
/// path means built-in defaults.
pub const DEFAULT_CONFIG: &str = "etc/deposit.toml";

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "deposit", version, about = "Deposition charge integration and overlap simulation")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Log and report as JSON instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG wins when set
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Args, Debug)]
pub struct IntegrateArgs {
    /// Run parameters, e.g. "TARGET=10;MODEL=NP;PARTICLE_DIAMETER=1.3;APERTURE_DIAMETER=7"
    #[arg(long, value_name = "KEY=VALUE;...")]
    pub params: String,

    /// Measurement CSV with headers `time,current`
    #[arg(
        long,
        value_name = "FILE",
        required_unless_present = "archive",
        conflicts_with = "archive"
    )]
    pub data: Option<PathBuf>,

    /// Directory of `<id>.csv` measurements
    #[arg(long, value_name = "DIR", requires = "id")]
    pub archive: Option<PathBuf>,

    /// Measurement id inside --archive
    #[arg(long, value_name = "N", requires = "archive")]
    pub id: Option<u64>,

    /// Reject unrecognised parameter keys instead of ignoring them
    #[arg(long, action = ArgAction::SetTrue)]
    pub strict: bool,

    /// Write the cumulative trace here when PLOT is on
    #[arg(long, value_name = "FILE")]
    pub trace_out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Run seed (overrides simulation.seed)
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Trials per loading level (overrides simulation.trials)
    #[arg(long, value_name = "N")]
    pub trials: Option<usize>,

    /// Resolver sweeps (overrides simulation.sweeps)
    #[arg(long, value_name = "N")]
    pub sweeps: Option<usize>,

    /// Directory for SimCharge.txt, SimLoad.txt, SimChargeStd.txt, comparison.csv
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Also write the last resolved cloud as cloud.csv
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_cloud: bool,

    /// Run trials on the current thread only
    #[arg(long, action = ArgAction::SetTrue)]
    pub sequential: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Integrate a deposition current and predict time to target coverage
    Integrate(IntegrateArgs),
    /// Monte-Carlo overlap simulation over the configured loadings
    Simulate(SimulateArgs),
    /// Load and validate the config
    SelfCheck,
}
