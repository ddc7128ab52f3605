#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas, run-parameter parsing and measurement loading.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//!   Every section has defaults, so an empty file is a valid config that
//!   reproduces the laboratory settings.
//! - `params` parses the `KEY=VALUE;...` run string of the charge integrator.
//! - Measurement CSV loader enforces the `time,current` header and
//!   non-decreasing time.
use serde::Deserialize;

pub mod params;

pub use params::{Model, ParamError, ParseMode, RunConfig, parse_run_config};

/// Measurement CSV schema.
///
/// Expected headers:
/// time,current
///
/// Example:
/// time,current
/// 0.0,-1.2e-11
/// 0.5,-1.3e-11
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct MeasurementRow {
    pub time: f64,
    pub current: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IntegrationCfg {
    /// Samples at or below this net current (A) are ignored for the rate estimate
    pub noise_floor_a: f64,
    /// Number of trailing above-floor samples averaged for the deposition rate
    pub rate_window: usize,
    /// Charge carried per deposited particle (C)
    pub elementary_charge_c: f64,
}

impl Default for IntegrationCfg {
    fn default() -> Self {
        Self {
            noise_floor_a: 1e-13,
            rate_window: 100,
            elementary_charge_c: 1.602e-19,
        }
    }
}

/// Contact-detection backend for the overlap resolver.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// R-tree over the planar positions
    #[default]
    Rtree,
    /// Pairwise scan over every particle
    Brute,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationCfg {
    /// Particle diameter (nm)
    pub particle_diameter_nm: f64,
    /// Particles per simulated cloud
    pub particles: usize,
    /// Independent trials per loading level
    pub trials: usize,
    /// Relaxation sweeps over the cloud
    pub sweeps: usize,
    /// Stop early once a sweep moves no height by more than this
    pub convergence_tol: Option<f64>,
    /// Grid units per nanometre
    pub grid_scale: f64,
    /// 3D distance (grid units) below which two particles stack
    pub contact_radius: f64,
    /// Stacking diameter (grid units). Defaults to diameter * grid_scale.
    pub contact_diameter: Option<f64>,
    /// 3D distance (grid units) used for area-loss accounting.
    /// Defaults to contact_diameter + 5.
    pub loss_radius: Option<f64>,
    /// Diagnostic radius for counting close contacts after resolution
    pub probe_radius: f64,
    /// Area (nm^2) lost per neighbour inside loss_radius
    pub neighbor_penalty: f64,
    /// Area (nm^2) lost by a particle left on the base layer
    pub base_penalty: f64,
    /// Particles below this height count as base layer
    pub base_floor: f64,
    /// Run seed; drawn from entropy and logged when absent
    pub seed: Option<u64>,
    pub index: IndexKind,
}

impl Default for SimulationCfg {
    fn default() -> Self {
        Self {
            particle_diameter_nm: 3.8,
            particles: 2000,
            trials: 5,
            sweeps: 7,
            convergence_tol: None,
            grid_scale: 10.0,
            contact_radius: 35.0,
            contact_diameter: None,
            loss_radius: None,
            probe_radius: 30.0,
            neighbor_penalty: 8.4,
            base_penalty: 12.0,
            base_floor: 5.0,
            seed: None,
            index: IndexKind::Rtree,
        }
    }
}

impl SimulationCfg {
    pub fn effective_contact_diameter(&self) -> f64 {
        self.contact_diameter
            .unwrap_or(self.particle_diameter_nm * self.grid_scale)
    }

    pub fn effective_loss_radius(&self) -> f64 {
        self.loss_radius
            .unwrap_or(self.effective_contact_diameter() + 5.0)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoadingCfg {
    /// Loading levels to simulate (ng)
    pub loadings_ng: Vec<f64>,
    /// Molar mass of one cluster (g/mol)
    pub molar_mass_g_per_mol: f64,
    /// Fraction of the beam collected on the sample
    pub collection_factor: f64,
    /// Projected area of one particle (m^2)
    pub projected_area_m2: f64,
    /// Rastered deposition area (m^2). Small raster: 6.592e-6.
    pub deposition_area_m2: f64,
    /// Stripping charge per unit particle surface (C/m^2)
    pub charge_density_c_per_m2: f64,
}

impl Default for LoadingCfg {
    fn default() -> Self {
        Self {
            loadings_ng: vec![565.0, 997.0, 5000.0],
            molar_mass_g_per_mol: 370e3,
            collection_factor: 3.14 * 0.25 * 0.25,
            projected_area_m2: 1.134e-17,
            deposition_area_m2: 3.127e-5,
            charge_density_c_per_m2: 3.4,
        }
    }
}

/// A measured (loading, stripping charge) point.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct MeasuredPoint {
    pub loading_ng: f64,
    pub charge_c: f64,
}

fn default_measured() -> Vec<MeasuredPoint> {
    const LOADING_NG: [f64; 13] = [
        13.0, 19.0, 48.0, 100.0, 17.0, 51.0, 100.0, 199.0, 197.0, 495.0, 498.0, 1002.0, 5000.0,
    ];
    const CHARGE_C: [f64; 13] = [
        3.5e-6, 6e-6, 1.7e-5, 2.9e-5, 5.4e-6, 1.8e-5, 3.1e-5, 6.8e-5, 5e-5, 1.6e-4, 1.5e-4,
        2.9e-4, 1.1e-3,
    ];
    LOADING_NG
        .iter()
        .zip(CHARGE_C.iter())
        .map(|(&loading_ng, &charge)| MeasuredPoint {
            loading_ng,
            charge_c: charge / 10.0,
        })
        .collect()
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub integration: IntegrationCfg,
    pub simulation: SimulationCfg,
    pub loading: LoadingCfg,
    /// Measured charges compared against the simulation
    pub measured: Vec<MeasuredPoint>,
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            integration: IntegrationCfg::default(),
            simulation: SimulationCfg::default(),
            loading: LoadingCfg::default(),
            measured: default_measured(),
            logging: Logging::default(),
        }
    }
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

pub fn load_measurement_csv(path: &std::path::Path) -> eyre::Result<Vec<MeasurementRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open measurement CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["time", "current"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "measurement CSV must have headers 'time,current', got: {}",
            actual.join(",")
        );
    }

    let mut rows: Vec<MeasurementRow> = Vec::new();
    for (idx, rec) in rdr.deserialize::<MeasurementRow>().enumerate() {
        let row = match rec {
            Ok(row) => row,
            Err(e) => eyre::bail!("invalid CSV row {}: {}", idx + 2, e),
        };
        if !(row.time.is_finite() && row.current.is_finite()) {
            eyre::bail!("non-finite value in CSV row {}", idx + 2);
        }
        if let Some(prev) = rows.last()
            && row.time < prev.time
        {
            eyre::bail!(
                "measurement time must be non-decreasing (row {}: {} < {})",
                idx + 2,
                row.time,
                prev.time
            );
        }
        rows.push(row);
    }
    tracing::debug!(rows = rows.len(), path = %path.display(), "measurement loaded");
    Ok(rows)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Integration
        if !(self.integration.noise_floor_a >= 0.0) {
            eyre::bail!("integration.noise_floor_a must be >= 0");
        }
        if self.integration.rate_window == 0 {
            eyre::bail!("integration.rate_window must be >= 1");
        }
        if !(self.integration.elementary_charge_c > 0.0) {
            eyre::bail!("integration.elementary_charge_c must be > 0");
        }

        // Simulation
        let sim = &self.simulation;
        if !(sim.particle_diameter_nm > 0.0) {
            eyre::bail!("simulation.particle_diameter_nm must be > 0");
        }
        if sim.particles == 0 {
            eyre::bail!("simulation.particles must be >= 1");
        }
        if sim.trials == 0 {
            eyre::bail!("simulation.trials must be >= 1");
        }
        if sim.sweeps > 10_000 {
            eyre::bail!("simulation.sweeps is unreasonably large (>10000)");
        }
        if let Some(tol) = sim.convergence_tol
            && !(tol >= 0.0)
        {
            eyre::bail!("simulation.convergence_tol must be >= 0");
        }
        if !(sim.grid_scale > 0.0) {
            eyre::bail!("simulation.grid_scale must be > 0");
        }
        if !(sim.contact_radius > 0.0) {
            eyre::bail!("simulation.contact_radius must be > 0");
        }
        if !(sim.effective_contact_diameter() > 0.0) {
            eyre::bail!("simulation.contact_diameter must be > 0");
        }
        if !(sim.effective_loss_radius() > 0.0) {
            eyre::bail!("simulation.loss_radius must be > 0");
        }
        if !(sim.probe_radius >= 0.0) {
            eyre::bail!("simulation.probe_radius must be >= 0");
        }
        if !(sim.neighbor_penalty >= 0.0) || !(sim.base_penalty >= 0.0) {
            eyre::bail!("simulation penalties must be >= 0");
        }
        if !sim.base_floor.is_finite() {
            eyre::bail!("simulation.base_floor must be finite");
        }

        // Loading
        let ld = &self.loading;
        if ld.loadings_ng.is_empty() {
            eyre::bail!("loading.loadings_ng must not be empty");
        }
        if ld.loadings_ng.iter().any(|&l| !(l > 0.0)) {
            eyre::bail!("loading.loadings_ng entries must be > 0");
        }
        if !(ld.molar_mass_g_per_mol > 0.0) {
            eyre::bail!("loading.molar_mass_g_per_mol must be > 0");
        }
        if !(ld.collection_factor > 0.0) {
            eyre::bail!("loading.collection_factor must be > 0");
        }
        if !(ld.projected_area_m2 > 0.0) || !(ld.deposition_area_m2 > 0.0) {
            eyre::bail!("loading areas must be > 0");
        }
        if !(ld.charge_density_c_per_m2 > 0.0) {
            eyre::bail!("loading.charge_density_c_per_m2 must be > 0");
        }

        // Measured
        if self
            .measured
            .iter()
            .any(|p| !(p.loading_ng > 0.0) || !p.charge_c.is_finite())
        {
            eyre::bail!("measured points need loading_ng > 0 and a finite charge_c");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
