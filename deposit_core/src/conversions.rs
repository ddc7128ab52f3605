//! `From` implementations bridging `deposit_config` types to `deposit_core` types.

use crate::aggregate::{LoadingModel, SimulationPlan};
use crate::config::{IntegratorCfg, LossCfg, ResolverCfg, SamplerCfg, TrialCfg, sphere_surface};

// ── IntegratorCfg ────────────────────────────────────────────────────────────

impl From<&deposit_config::IntegrationCfg> for IntegratorCfg {
    fn from(c: &deposit_config::IntegrationCfg) -> Self {
        Self {
            noise_floor_a: c.noise_floor_a,
            rate_window: c.rate_window,
            elementary_charge_c: c.elementary_charge_c,
        }
    }
}

// ── Simulator settings ───────────────────────────────────────────────────────

impl From<&deposit_config::SimulationCfg> for SamplerCfg {
    fn from(c: &deposit_config::SimulationCfg) -> Self {
        Self {
            particle_diameter_nm: c.particle_diameter_nm,
            particles: c.particles,
            grid_scale: c.grid_scale,
        }
    }
}

impl From<&deposit_config::SimulationCfg> for ResolverCfg {
    fn from(c: &deposit_config::SimulationCfg) -> Self {
        Self {
            contact_radius: c.contact_radius,
            contact_diameter: c.effective_contact_diameter(),
            sweeps: c.sweeps,
            convergence_tol: c.convergence_tol,
            index: c.index,
        }
    }
}

impl From<&deposit_config::SimulationCfg> for LossCfg {
    fn from(c: &deposit_config::SimulationCfg) -> Self {
        Self {
            loss_radius: c.effective_loss_radius(),
            probe_radius: c.probe_radius,
            neighbor_penalty: c.neighbor_penalty,
            base_penalty: c.base_penalty,
            base_floor: c.base_floor,
            footprint_nm2: sphere_surface(c.particle_diameter_nm),
        }
    }
}

impl From<&deposit_config::SimulationCfg> for TrialCfg {
    fn from(c: &deposit_config::SimulationCfg) -> Self {
        Self {
            sampler: c.into(),
            resolver: c.into(),
            loss: c.into(),
        }
    }
}

// ── SimulationPlan ───────────────────────────────────────────────────────────

impl From<&deposit_config::Config> for SimulationPlan {
    fn from(c: &deposit_config::Config) -> Self {
        let l = &c.loading;
        Self {
            trial: (&c.simulation).into(),
            loading: LoadingModel {
                molar_mass_g_per_mol: l.molar_mass_g_per_mol,
                collection_factor: l.collection_factor,
                projected_area_m2: l.projected_area_m2,
                deposition_area_m2: l.deposition_area_m2,
                charge_density_c_per_m2: l.charge_density_c_per_m2,
                particle_diameter_nm: c.simulation.particle_diameter_nm,
            },
            loadings_ng: l.loadings_ng.clone(),
            trials: c.simulation.trials,
            seed: c.simulation.seed,
            parallel: true,
        }
    }
}
