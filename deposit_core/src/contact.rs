//! Contact detection between particles.
//!
//! A contact of particle `i` is any other particle whose 3D distance
//! (height included) to `i` is strictly below the query radius. Results are
//! always in ascending index order so the resolver visits contacts the same
//! way whichever backend is used.
//!
//! # Backends
//!
//! - [`BruteForce`] scans every particle: O(N) per query.
//! - [`PlanarTree`] keeps an R-tree (via `rstar`) over the planar positions,
//!   which never move. Planar distance is a lower bound of the 3D distance,
//!   so a planar radius query returns a superset that is then filtered
//!   with the exact 3D test.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::config::IndexKind;
use crate::particle::Cloud;

pub trait ContactIndex {
    /// Fill `out` with the contacts of particle `i` within `radius`.
    fn contacts(&self, cloud: &Cloud, i: usize, radius: f64, out: &mut Vec<usize>);

    /// Number of contacts of particle `i` within `radius`.
    fn count(&self, cloud: &Cloud, i: usize, radius: f64) -> usize {
        let mut out = Vec::new();
        self.contacts(cloud, i, radius, &mut out);
        out.len()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BruteForce;

impl ContactIndex for BruteForce {
    fn contacts(&self, cloud: &Cloud, i: usize, radius: f64, out: &mut Vec<usize>) {
        out.clear();
        out.extend((0..cloud.len()).filter(|&j| j != i && cloud.distance(i, j) < radius));
    }

    fn count(&self, cloud: &Cloud, i: usize, radius: f64) -> usize {
        (0..cloud.len())
            .filter(|&j| j != i && cloud.distance(i, j) < radius)
            .count()
    }
}

// ── R-tree entry ─────────────────────────────────────────────────────────────

/// A planar `[x, y]` point with the particle index it belongs to.
#[derive(Clone)]
struct PlanarEntry {
    point: [f64; 2],
    id: usize,
}

impl RTreeObject for PlanarEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PlanarEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// R-tree over the fixed planar positions of a cloud.
pub struct PlanarTree {
    tree: RTree<PlanarEntry>,
}

impl PlanarTree {
    pub fn build(cloud: &Cloud) -> Self {
        let entries = cloud
            .particles()
            .iter()
            .enumerate()
            .map(|(id, p)| PlanarEntry {
                point: [p.x, p.y],
                id,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }
}

impl ContactIndex for PlanarTree {
    fn contacts(&self, cloud: &Cloud, i: usize, radius: f64, out: &mut Vec<usize>) {
        out.clear();
        if !(radius > 0.0) {
            return;
        }
        let p = cloud.particles()[i];
        // Widen slightly so rounding in the squared radius cannot drop a
        // candidate the exact 3D test would accept.
        let r2 = radius * radius * (1.0 + 1e-9) + f64::EPSILON;
        out.extend(
            self.tree
                .locate_within_distance([p.x, p.y], r2)
                .map(|e| e.id)
                .filter(|&j| j != i && cloud.distance(i, j) < radius),
        );
        out.sort_unstable();
    }
}

/// Build the backend selected by `kind` for `cloud`.
pub fn build_index(kind: IndexKind, cloud: &Cloud) -> Box<dyn ContactIndex + Send + Sync> {
    match kind {
        IndexKind::Brute => Box::new(BruteForce),
        IndexKind::Rtree => Box::new(PlanarTree::build(cloud)),
    }
}
