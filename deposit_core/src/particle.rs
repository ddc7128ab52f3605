//! Particle clouds for the overlap simulation.
//!
//! Positions are in grid units (`grid_scale` per nanometre). Heights start at
//! 1 and only the resolver changes them.

use rand::Rng;

use crate::config::{SamplerCfg, disc_area};
use crate::error::DepositError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub height: f64,
}

/// Fixed-size set of particles on a square domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    particles: Vec<Particle>,
    side: f64,
}

/// Side of the square domain (grid units) on which `cfg.particles` discs
/// cover `coverage_pct` percent of the area.
pub fn domain_side(cfg: &SamplerCfg, coverage_pct: f64) -> Result<f64, DepositError> {
    if !(coverage_pct.is_finite() && coverage_pct > 0.0) {
        return Err(DepositError::InvalidConfiguration(format!(
            "coverage must be > 0 %, got {coverage_pct}"
        )));
    }
    let covered = disc_area(cfg.particle_diameter_nm) * cfg.particles as f64;
    let area = covered / (coverage_pct / 100.0);
    Ok(area.sqrt().round() * cfg.grid_scale)
}

impl Cloud {
    /// Cloud with the given planar positions, every height 1.
    pub fn from_positions(positions: &[(f64, f64)], side: f64) -> Self {
        let particles = positions
            .iter()
            .map(|&(x, y)| Particle { x, y, height: 1.0 })
            .collect();
        Self { particles, side }
    }

    /// Uniform random cloud sized for `coverage_pct`. All x coordinates are
    /// drawn before all y coordinates.
    pub fn sample<R: Rng + ?Sized>(
        rng: &mut R,
        cfg: &SamplerCfg,
        coverage_pct: f64,
    ) -> Result<Self, DepositError> {
        let side = domain_side(cfg, coverage_pct)?;
        let n = cfg.particles;
        let xs: Vec<f64> = (0..n).map(|_| rng.r#gen::<f64>() * side).collect();
        let ys: Vec<f64> = (0..n).map(|_| rng.r#gen::<f64>() * side).collect();
        let particles = xs
            .into_iter()
            .zip(ys)
            .map(|(x, y)| Particle { x, y, height: 1.0 })
            .collect();
        Ok(Self { particles, side })
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn side(&self) -> f64 {
        self.side
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn heights(&self) -> Vec<f64> {
        self.particles.iter().map(|p| p.height).collect()
    }

    #[inline]
    pub(crate) fn set_height(&mut self, i: usize, height: f64) {
        self.particles[i].height = height;
    }

    /// In-plane distance between particles `i` and `j`.
    #[inline]
    pub fn planar_distance(&self, i: usize, j: usize) -> f64 {
        let (a, b) = (&self.particles[i], &self.particles[j]);
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Distance between particles `i` and `j` with height as third axis.
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        let (a, b) = (&self.particles[i], &self.particles[j]);
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        let dz = a.height - b.height;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}
