//! Surface-area loss accounting on a resolved cloud.

use crate::config::LossCfg;
use crate::contact::ContactIndex;
use crate::particle::Cloud;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossReport {
    /// Summed capped per-particle loss (nm^2)
    pub lost_area: f64,
    /// `N * footprint` (nm^2)
    pub total_area: f64,
    /// `(total - lost) / total`, within [0, 1]
    pub ratio: f64,
    /// Particles still below the base floor
    pub base_layer: usize,
    /// Unordered pairs closer than the probe radius
    pub close_contacts: usize,
}

/// Loss of a single particle with `neighbours` inside the loss radius.
#[inline]
pub fn particle_loss(cfg: &LossCfg, neighbours: usize, height: f64) -> f64 {
    let mut loss = neighbours as f64 * cfg.neighbor_penalty;
    if height < cfg.base_floor {
        loss += cfg.base_penalty;
    }
    loss.min(cfg.footprint_nm2)
}

pub fn account<I: ContactIndex + ?Sized>(cloud: &Cloud, index: &I, cfg: &LossCfg) -> LossReport {
    let mut lost_area = 0.0;
    let mut base_layer = 0;
    let mut probe_hits = 0;
    for (i, p) in cloud.particles().iter().enumerate() {
        let neighbours = index.count(cloud, i, cfg.loss_radius);
        if p.height < cfg.base_floor {
            base_layer += 1;
        }
        probe_hits += index.count(cloud, i, cfg.probe_radius);
        lost_area += particle_loss(cfg, neighbours, p.height);
    }

    let total_area = cloud.len() as f64 * cfg.footprint_nm2;
    let ratio = if total_area > 0.0 {
        ((total_area - lost_area) / total_area).clamp(0.0, 1.0)
    } else {
        1.0
    };
    LossReport {
        lost_area,
        total_area,
        ratio,
        base_layer,
        close_contacts: probe_hits / 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::BruteForce;

    #[test]
    fn single_particle_on_base() {
        let c = Cloud::from_positions(&[(5.0, 5.0)], 10.0);
        let cfg = LossCfg::default();
        let r = account(&c, &BruteForce, &cfg);
        assert_eq!(r.lost_area, cfg.base_penalty);
        assert_eq!(r.base_layer, 1);
        assert_eq!(r.close_contacts, 0);
    }

    #[test]
    fn single_raised_particle_loses_nothing() {
        let mut c = Cloud::from_positions(&[(5.0, 5.0)], 10.0);
        c.set_height(0, 40.0);
        let r = account(&c, &BruteForce, &LossCfg::default());
        assert_eq!(r.lost_area, 0.0);
        assert_eq!(r.ratio, 1.0);
    }

    #[test]
    fn loss_is_capped_at_footprint() {
        let cfg = LossCfg::default();
        assert_eq!(particle_loss(&cfg, 1000, 1.0), cfg.footprint_nm2);
        assert_eq!(particle_loss(&cfg, 2, 10.0), 2.0 * 8.4);
    }

    #[test]
    fn close_pairs_are_counted_once() {
        let c = Cloud::from_positions(&[(0.0, 0.0), (10.0, 0.0), (500.0, 0.0)], 600.0);
        let r = account(&c, &BruteForce, &LossCfg::default());
        assert_eq!(r.close_contacts, 1);
        assert_eq!(r.base_layer, 3);
    }
}
