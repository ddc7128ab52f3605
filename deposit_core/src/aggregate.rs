//! Monte-Carlo trials per loading level and their aggregation.
//!
//! A loading (ng of material) is turned into a particle count and coverage by
//! the [`LoadingModel`]. Each level runs `trials` independent trials; every
//! trial samples its own cloud from its own seed, resolves overlaps, and
//! accounts for the lost surface. The mean ratio scales the theoretical
//! charge into the simulated charge.
//!
//! With the `parallel` feature, all (level, trial) pairs go to the rayon
//! pool at once. Results are grouped back by level in trial order, so the
//! output is identical to the sequential path.

use crate::config::{TrialCfg, sphere_surface};
use crate::contact::build_index;
use crate::error::DepositError;
use crate::loss::account;
use crate::particle::Cloud;
use crate::resolver::resolve;
use crate::rng::{entropy_seed, trial_rng, trial_seed};
use crate::util::{AVOGADRO, GRAMS_PER_NG, mean_std};

/// Loading -> particle count, coverage and theoretical charge.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadingModel {
    pub molar_mass_g_per_mol: f64,
    pub collection_factor: f64,
    pub projected_area_m2: f64,
    pub deposition_area_m2: f64,
    pub charge_density_c_per_m2: f64,
    pub particle_diameter_nm: f64,
}

impl Default for LoadingModel {
    fn default() -> Self {
        Self {
            molar_mass_g_per_mol: 370e3,
            collection_factor: 3.14 * 0.25 * 0.25,
            projected_area_m2: 1.134e-17,
            deposition_area_m2: 3.127e-5,
            charge_density_c_per_m2: 3.4,
            particle_diameter_nm: 3.8,
        }
    }
}

impl LoadingModel {
    /// Particles landing on the sample for `loading_ng` of material.
    pub fn particles(&self, loading_ng: f64) -> f64 {
        loading_ng * GRAMS_PER_NG * AVOGADRO / self.molar_mass_g_per_mol * self.collection_factor
    }

    pub fn coverage_pct(&self, particles: f64) -> f64 {
        particles * self.projected_area_m2 / self.deposition_area_m2 * 100.0
    }

    /// Stripping charge of one fully exposed particle (C).
    pub fn charge_per_particle(&self) -> f64 {
        self.charge_density_c_per_m2 * sphere_surface(self.particle_diameter_nm * 1e-9)
    }

    pub fn theory_charge(&self, particles: f64) -> f64 {
        particles * self.charge_per_particle()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialResult {
    pub ratio: f64,
    pub lost_area: f64,
    pub base_layer: usize,
    pub close_contacts: usize,
    pub sweeps_run: usize,
    pub seed: u64,
}

/// Sample, resolve and measure one cloud.
pub fn run_trial(
    cfg: &TrialCfg,
    coverage_pct: f64,
    seed: u64,
) -> Result<(TrialResult, Cloud), DepositError> {
    let mut rng = trial_rng(seed);
    let mut cloud = Cloud::sample(&mut rng, &cfg.sampler, coverage_pct)?;
    let index = build_index(cfg.resolver.index, &cloud);
    let resolution = resolve(&mut cloud, index.as_ref(), &cfg.resolver);
    let loss = account(&cloud, index.as_ref(), &cfg.loss);
    tracing::debug!(
        seed,
        coverage_pct,
        ratio = loss.ratio,
        lost_area = loss.lost_area,
        sweeps = resolution.sweeps_run,
        "trial done"
    );
    Ok((
        TrialResult {
            ratio: loss.ratio,
            lost_area: loss.lost_area,
            base_layer: loss.base_layer,
            close_contacts: loss.close_contacts,
            sweeps_run: resolution.sweeps_run,
            seed,
        },
        cloud,
    ))
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelResult {
    pub loading_ng: f64,
    pub particles: f64,
    pub coverage_pct: f64,
    pub theory_charge: f64,
    pub mean_ratio: f64,
    pub std_ratio: f64,
    pub sim_charge: f64,
    pub sim_charge_std: f64,
    pub trials: Vec<TrialResult>,
}

impl LevelResult {
    fn from_trials(loading_ng: f64, model: &LoadingModel, trials: Vec<TrialResult>) -> Self {
        let particles = model.particles(loading_ng);
        let theory_charge = model.theory_charge(particles);
        let ratios: Vec<f64> = trials.iter().map(|t| t.ratio).collect();
        let (mean_ratio, std_ratio) = mean_std(&ratios);
        Self {
            loading_ng,
            particles,
            coverage_pct: model.coverage_pct(particles),
            theory_charge,
            mean_ratio,
            std_ratio,
            sim_charge: theory_charge * mean_ratio,
            sim_charge_std: theory_charge * std_ratio,
            trials,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub trial: TrialCfg,
    pub loading: LoadingModel,
    pub loadings_ng: Vec<f64>,
    pub trials: usize,
    /// Run seed; drawn from OS entropy when unset
    pub seed: Option<u64>,
    /// Use the rayon pool when the `parallel` feature is on
    pub parallel: bool,
}

impl Default for SimulationPlan {
    fn default() -> Self {
        Self {
            trial: TrialCfg::default(),
            loading: LoadingModel::default(),
            loadings_ng: vec![565.0, 997.0, 5000.0],
            trials: 5,
            seed: None,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub seed: u64,
    pub levels: Vec<LevelResult>,
    /// Resolved cloud of the last trial of the last level
    pub last_cloud: Option<Cloud>,
}

struct Job {
    level: usize,
    coverage_pct: f64,
    seed: u64,
}

type JobOutput = Result<(TrialResult, Option<Cloud>), DepositError>;

fn run_job(cfg: &TrialCfg, job: &Job, keep_cloud: bool) -> JobOutput {
    let (result, cloud) = run_trial(cfg, job.coverage_pct, job.seed)?;
    Ok((result, keep_cloud.then_some(cloud)))
}

fn run_sequential(cfg: &TrialCfg, jobs: &[Job]) -> Vec<JobOutput> {
    let last = jobs.len().saturating_sub(1);
    jobs.iter()
        .enumerate()
        .map(|(k, job)| run_job(cfg, job, k == last))
        .collect()
}

#[cfg(feature = "parallel")]
fn run_jobs(cfg: &TrialCfg, jobs: &[Job], parallel: bool) -> Vec<JobOutput> {
    use rayon::prelude::*;

    if !parallel {
        return run_sequential(cfg, jobs);
    }
    let last = jobs.len().saturating_sub(1);
    jobs.par_iter()
        .enumerate()
        .map(|(k, job)| run_job(cfg, job, k == last))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn run_jobs(cfg: &TrialCfg, jobs: &[Job], _parallel: bool) -> Vec<JobOutput> {
    run_sequential(cfg, jobs)
}

/// Run every loading level of `plan`.
pub fn run_simulation(plan: &SimulationPlan) -> Result<SimulationOutcome, DepositError> {
    if plan.trials == 0 {
        return Err(DepositError::InvalidConfiguration(
            "at least one trial per level is required".into(),
        ));
    }
    let seed = plan.seed.unwrap_or_else(entropy_seed);
    tracing::info!(
        seed,
        levels = plan.loadings_ng.len(),
        trials = plan.trials,
        particles = plan.trial.sampler.particles,
        sweeps = plan.trial.resolver.sweeps,
        "simulation started"
    );

    let mut jobs = Vec::with_capacity(plan.loadings_ng.len() * plan.trials);
    for (level, &loading) in plan.loadings_ng.iter().enumerate() {
        let coverage_pct = plan.loading.coverage_pct(plan.loading.particles(loading));
        for trial in 0..plan.trials {
            jobs.push(Job {
                level,
                coverage_pct,
                seed: trial_seed(seed, level, trial),
            });
        }
    }

    let outputs = run_jobs(&plan.trial, &jobs, plan.parallel);

    let mut grouped: Vec<Vec<TrialResult>> = vec![Vec::new(); plan.loadings_ng.len()];
    let mut last_cloud = None;
    for (job, output) in jobs.iter().zip(outputs) {
        let (result, cloud) = output?;
        grouped[job.level].push(result);
        if cloud.is_some() {
            last_cloud = cloud;
        }
    }

    let levels: Vec<LevelResult> = plan
        .loadings_ng
        .iter()
        .zip(grouped)
        .map(|(&loading, trials)| LevelResult::from_trials(loading, &plan.loading, trials))
        .collect();
    for l in &levels {
        tracing::info!(
            loading_ng = l.loading_ng,
            coverage_pct = l.coverage_pct,
            mean_ratio = l.mean_ratio,
            std_ratio = l.std_ratio,
            sim_charge = l.sim_charge,
            "level done"
        );
    }

    Ok(SimulationOutcome {
        seed,
        levels,
        last_cloud,
    })
}
