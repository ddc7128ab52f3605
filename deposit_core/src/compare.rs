//! Simulated versus measured charge.

use deposit_config::MeasuredPoint;

use crate::aggregate::LevelResult;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonRow {
    pub loading_ng: f64,
    pub measured_c: f64,
    /// Simulated charge at this loading, if inside the simulated range
    pub simulated_c: Option<f64>,
    /// `measured / simulated`
    pub ratio: Option<f64>,
}

/// Piecewise-linear interpolation through `points` (any order) at `x`.
/// `None` outside `[min x, max x]` or when `points` is empty.
pub fn interpolate(points: &[(f64, f64)], x: f64) -> Option<f64> {
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| a.0.total_cmp(&b.0));
    let (first, last) = (pts.first()?, pts.last()?);
    if !(first.0 <= x && x <= last.0) {
        return None;
    }
    for w in pts.windows(2) {
        let ((x0, y0), (x1, y1)) = (w[0], w[1]);
        if x <= x1 {
            if x == x1 {
                return Some(y1);
            }
            if x1 == x0 {
                return Some(y0);
            }
            return Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0));
        }
    }
    // Single point, x equal to it
    Some(first.1)
}

pub fn compare(levels: &[LevelResult], measured: &[MeasuredPoint]) -> Vec<ComparisonRow> {
    let curve: Vec<(f64, f64)> = levels.iter().map(|l| (l.loading_ng, l.sim_charge)).collect();
    measured
        .iter()
        .map(|m| {
            let simulated_c = interpolate(&curve, m.loading_ng);
            let ratio = simulated_c.filter(|&s| s != 0.0).map(|s| m.charge_c / s);
            ComparisonRow {
                loading_ng: m.loading_ng,
                measured_c: m.charge_c,
                simulated_c,
                ratio,
            }
        })
        .collect()
}
