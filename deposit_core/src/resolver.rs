//! Iterative overlap resolution.
//!
//! Every sweep visits particles in index order. The contacts of particle `i`
//! are collected once with the heights at that moment, then each contact `g`
//! is stacked on `i`: its height becomes `height[i] + sqrt(D^2 - p^2)`, where
//! `D` is the contact diameter and `p` the planar distance. Heights only
//! accumulate; no attempt is made to separate particles afterwards.

use crate::config::ResolverCfg;
use crate::contact::ContactIndex;
use crate::particle::Cloud;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub sweeps_run: usize,
    /// Largest absolute height change seen in the final sweep
    pub last_max_change: f64,
    /// Height assignments made across all sweeps
    pub adjustments: u64,
}

/// Lift of a particle stacked on another at planar distance `planar`.
/// Only the real part of the root counts.
#[inline]
pub fn stacking_lift(contact_diameter: f64, planar: f64) -> f64 {
    (contact_diameter * contact_diameter - planar * planar)
        .max(0.0)
        .sqrt()
}

/// One pass over every particle. Returns the largest height change and the
/// number of adjustments.
fn sweep<I: ContactIndex + ?Sized>(
    cloud: &mut Cloud,
    index: &I,
    cfg: &ResolverCfg,
    scratch: &mut Vec<usize>,
) -> (f64, u64) {
    let mut max_change = 0.0_f64;
    let mut adjustments = 0_u64;
    for i in 0..cloud.len() {
        index.contacts(cloud, i, cfg.contact_radius, scratch);
        for &g in scratch.iter() {
            let before = cloud.particles()[g].height;
            let base = cloud.particles()[i].height;
            let lifted = base + stacking_lift(cfg.contact_diameter, cloud.planar_distance(i, g));
            cloud.set_height(g, lifted);
            max_change = max_change.max((lifted - before).abs());
            adjustments += 1;
        }
    }
    (max_change, adjustments)
}

/// Resolve overlaps in `cloud` for at most `cfg.sweeps` sweeps.
pub fn resolve<I: ContactIndex + ?Sized>(
    cloud: &mut Cloud,
    index: &I,
    cfg: &ResolverCfg,
) -> Resolution {
    let mut scratch = Vec::new();
    let mut out = Resolution {
        sweeps_run: 0,
        last_max_change: 0.0,
        adjustments: 0,
    };
    for s in 0..cfg.sweeps {
        let (max_change, adjustments) = sweep(cloud, index, cfg, &mut scratch);
        out.sweeps_run = s + 1;
        out.last_max_change = max_change;
        out.adjustments += adjustments;
        tracing::trace!(sweep = s, max_change, adjustments, "sweep done");
        if let Some(tol) = cfg.convergence_tol
            && max_change <= tol
        {
            tracing::debug!(sweeps = out.sweeps_run, tol, "resolution converged");
            break;
        }
    }
    out
}
