//! `deposit integrate`: charge integration and time-to-target.

use deposit_config::{Config, ParseMode, load_measurement_csv, parse_run_config};
use deposit_core::dump::write_trace;
use deposit_core::{
    DepositError, IntegrationReport, IntegratorCfg, Measurement, Prediction, run_integration, trace,
};
use eyre::WrapErr;
use serde_json::json;

use crate::archive::CsvArchive;
use crate::cli::IntegrateArgs;

fn load_measurement(args: &IntegrateArgs) -> eyre::Result<Measurement> {
    if let Some(path) = &args.data {
        let rows = load_measurement_csv(path)
            .map_err(|e| DepositError::InvalidMeasurement(format!("{e:#}")))?;
        return Ok(Measurement::from_rows(&rows)?);
    }
    match (&args.archive, args.id) {
        (Some(dir), Some(id)) => Ok(Measurement::fetch(&mut CsvArchive::new(dir), id)?),
        _ => Err(DepositError::InvalidConfiguration(
            "either --data or --archive with --id is required".into(),
        )
        .into()),
    }
}

fn report_json(report: &IntegrationReport) -> serde_json::Value {
    let prediction = match &report.prediction {
        Prediction::AlreadyExceeded {
            target_pct,
            present_pct,
        } => json!({
            "status": "already_exceeded",
            "target_pct": target_pct,
            "present_pct": present_pct,
        }),
        Prediction::Remaining {
            target_pct,
            target_particles,
            remaining_particles,
            seconds,
            hms,
        } => json!({
            "status": "remaining",
            "target_pct": target_pct,
            "target_particles": target_particles,
            "remaining_particles": remaining_particles,
            "seconds": seconds,
            "hms": hms.to_string(),
        }),
    };
    json!({
        "particles": report.particles,
        "charge_c": report.charge_c,
        "pmol": report.pmol,
        "present_coverage_pct": report.present_coverage_pct,
        "deposition_rate": report.deposition_rate,
        "window": report.window.map(|(a, b)| [a, b]),
        "samples": report.samples,
        "prediction": prediction,
    })
}

pub fn run_integrate(cfg: &Config, args: &IntegrateArgs, json: bool) -> eyre::Result<()> {
    let mode = if args.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };
    let run = parse_run_config(&args.params, mode).map_err(DepositError::from)?;
    for (key, value) in &run.ignored {
        tracing::warn!(%key, %value, "parameter ignored");
    }

    let measurement = load_measurement(args)?;
    let icfg = IntegratorCfg::from(&cfg.integration);
    let report = run_integration(&measurement, &run, &icfg)?;

    if run.plot {
        match &args.trace_out {
            Some(path) => {
                write_trace(path, &trace(&measurement, &run, &icfg))
                    .wrap_err_with(|| format!("write trace {}", path.display()))?;
                tracing::info!(path = %path.display(), "trace written");
            }
            None => tracing::warn!("PLOT requested but no --trace-out given; trace not written"),
        }
    }

    if json {
        println!("{}", report_json(&report));
    } else {
        println!("{report}");
    }
    Ok(())
}
