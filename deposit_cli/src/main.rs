use clap::Parser;
use deposit_config::Config;
use deposit_core::DepositError;
use std::path::Path;

mod archive;
mod cli;
mod error_fmt;
mod integrate;
mod logging;
mod simulate;

use cli::{Cli, Commands, DEFAULT_CONFIG, JSON_MODE};
use error_fmt::{exit_code_for_error, format_error_json, humanize};

/// Read and validate the typed config. A missing file at the default path
/// means built-in defaults.
fn load_config(path: &Path) -> Result<Config, DepositError> {
    if path == Path::new(DEFAULT_CONFIG) && !path.exists() {
        return Ok(Config::default());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| DepositError::Io(format!("read config {}: {e}", path.display())))?;
    let cfg = deposit_config::load_toml(&text).map_err(|e| {
        DepositError::InvalidConfiguration(format!("parse {}: {e}", path.display()))
    })?;
    cfg.validate()
        .map_err(|e| DepositError::InvalidConfiguration(format!("{e:#}")))?;
    Ok(cfg)
}

fn run(cli: &Cli) -> eyre::Result<()> {
    let cfg = load_config(&cli.config)?;
    logging::init_tracing(cli.json, &cli.log_level, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "config loaded");

    match &cli.cmd {
        Commands::Integrate(args) => integrate::run_integrate(&cfg, args, cli.json),
        Commands::Simulate(args) => simulate::run_simulate(&cfg, args, cli.json),
        Commands::SelfCheck => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "ok": true, "config": cli.config.display().to_string() })
                );
            } else {
                println!("OK");
            }
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error report hook: {e}");
    }

    if let Err(err) = run(&cli) {
        tracing::error!(error = %err, "command failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}
