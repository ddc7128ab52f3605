//! One charge-integration run: integrate, convert to coverage, predict.

use std::fmt;

use deposit_config::RunConfig;
use eyre::WrapErr;

use crate::config::IntegratorCfg;
use crate::coverage::CoverageModel;
use crate::error::Result;
use crate::integrator::integrate;
use crate::measurement::Measurement;
use crate::predictor::{Prediction, predict};
use crate::util::to_pmol;

#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationReport {
    pub particles: f64,
    pub charge_c: f64,
    pub pmol: f64,
    pub present_coverage_pct: f64,
    /// Particles per second, when any sample cleared the noise floor
    pub deposition_rate: Option<f64>,
    pub window: Option<(f64, f64)>,
    pub samples: usize,
    pub prediction: Prediction,
}

/// Run the integrator pipeline on `measurement`.
pub fn run_integration(
    measurement: &Measurement,
    run: &RunConfig,
    cfg: &IntegratorCfg,
) -> Result<IntegrationReport> {
    let model = CoverageModel::from_run(run).wrap_err("coverage model")?;
    let integ = integrate(measurement, run, cfg);
    let present_coverage_pct = model.to_coverage(integ.particles);
    tracing::info!(
        particles = integ.particles,
        coverage_pct = present_coverage_pct,
        samples = integ.samples,
        "current integrated"
    );
    let prediction = predict(&model, &run.targets, integ.particles, integ.deposition_rate)
        .wrap_err("time-to-target estimate")?;
    match &prediction {
        Prediction::AlreadyExceeded {
            target_pct,
            present_pct,
        } => tracing::info!(target_pct, present_pct, "target coverage already exceeded"),
        Prediction::Remaining {
            target_pct,
            seconds,
            ..
        } => tracing::info!(target_pct, seconds, "time to target estimated"),
    }

    Ok(IntegrationReport {
        particles: integ.particles,
        charge_c: integ.charge_c,
        pmol: to_pmol(integ.particles),
        present_coverage_pct,
        deposition_rate: integ.deposition_rate,
        window: run.window,
        samples: integ.samples,
        prediction,
    })
}

impl fmt::Display for IntegrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prediction {
            Prediction::AlreadyExceeded {
                target_pct,
                present_pct,
            } => {
                writeln!(
                    f,
                    "Target coverage ({target_pct} %) already exceeded: {present_pct:.3} %."
                )?;
                write!(f, "Number of clusters: {:.4} pmol.", self.pmol)
            }
            Prediction::Remaining {
                target_pct, hms, ..
            } => {
                writeln!(f, "Total charge deposited: {:.4} pmol.", self.pmol)?;
                writeln!(f, "Present coverage: {:.3} %", self.present_coverage_pct)?;
                write!(f, "Time until {target_pct} % coverage: {hms}")
            }
        }
    }
}
