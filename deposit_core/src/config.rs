//! Runtime configuration types for both pipelines.
//!
//! These are the structs the engine works with. They are separate from the
//! TOML-deserialized config in `deposit_config`; see `conversions` for the
//! mapping.

use std::f64::consts::PI;

pub use deposit_config::IndexKind;

/// Current integration settings.
#[derive(Debug, Clone)]
pub struct IntegratorCfg {
    /// Net currents at or below this (A) do not count toward the rate estimate.
    pub noise_floor_a: f64,
    /// Trailing above-floor samples averaged for the deposition rate.
    pub rate_window: usize,
    /// Charge per deposited particle (C).
    pub elementary_charge_c: f64,
}

impl Default for IntegratorCfg {
    fn default() -> Self {
        Self {
            noise_floor_a: 1e-13,
            rate_window: 100,
            elementary_charge_c: 1.602e-19,
        }
    }
}

/// How a cloud is drawn.
#[derive(Debug, Clone)]
pub struct SamplerCfg {
    /// Particle diameter (nm).
    pub particle_diameter_nm: f64,
    /// Particles per cloud.
    pub particles: usize,
    /// Grid units per nanometre.
    pub grid_scale: f64,
}

impl Default for SamplerCfg {
    fn default() -> Self {
        Self {
            particle_diameter_nm: 3.8,
            particles: 2000,
            grid_scale: 10.0,
        }
    }
}

/// Overlap resolver settings. Lengths are grid units.
#[derive(Debug, Clone)]
pub struct ResolverCfg {
    /// 3D distance below which two particles are in contact.
    pub contact_radius: f64,
    /// Diameter used for the stacking lift.
    pub contact_diameter: f64,
    /// Upper bound on relaxation sweeps.
    pub sweeps: usize,
    /// Stop after a sweep whose largest height change is at most this.
    pub convergence_tol: Option<f64>,
    pub index: IndexKind,
}

impl Default for ResolverCfg {
    fn default() -> Self {
        Self {
            contact_radius: 35.0,
            contact_diameter: 38.0,
            sweeps: 7,
            convergence_tol: None,
            index: IndexKind::Rtree,
        }
    }
}

/// Area-loss accounting settings. Lengths are grid units, areas nm^2.
#[derive(Debug, Clone)]
pub struct LossCfg {
    pub loss_radius: f64,
    /// Diagnostic radius for close-contact counting.
    pub probe_radius: f64,
    pub neighbor_penalty: f64,
    pub base_penalty: f64,
    /// Heights below this mean the particle stayed on the base layer.
    pub base_floor: f64,
    /// Per-particle loss cap: one full particle surface.
    pub footprint_nm2: f64,
}

impl LossCfg {
    /// Laboratory settings for particles of `diameter_nm` on a grid of
    /// `grid_scale` units per nanometre.
    pub fn for_diameter(diameter_nm: f64, grid_scale: f64) -> Self {
        Self {
            loss_radius: diameter_nm * grid_scale + 5.0,
            probe_radius: 30.0,
            neighbor_penalty: 8.4,
            base_penalty: 12.0,
            base_floor: 5.0,
            footprint_nm2: sphere_surface(diameter_nm),
        }
    }
}

impl Default for LossCfg {
    fn default() -> Self {
        Self::for_diameter(3.8, 10.0)
    }
}

/// Everything one Monte-Carlo trial needs.
#[derive(Debug, Clone, Default)]
pub struct TrialCfg {
    pub sampler: SamplerCfg,
    pub resolver: ResolverCfg,
    pub loss: LossCfg,
}

/// Surface area of a sphere of the given diameter.
#[inline]
pub fn sphere_surface(diameter: f64) -> f64 {
    let r = diameter / 2.0;
    4.0 * PI * r * r
}

/// Projected (disc) area of a sphere of the given diameter.
#[inline]
pub fn disc_area(diameter: f64) -> f64 {
    let r = diameter / 2.0;
    PI * r * r
}
