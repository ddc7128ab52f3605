//! Current integration: total deposited particles and trailing deposition rate.
//!
//! The net current of a sample is `|current + leak_current|`. The integral is
//! a backward rectangle rule: every sample after the first contributes its
//! net current times the time elapsed since the previous sample.

use deposit_config::RunConfig;

use crate::config::IntegratorCfg;
use crate::measurement::{Measurement, Sample};

/// Result of integrating one measurement window.
#[derive(Debug, Clone, PartialEq)]
pub struct Integration {
    /// Deposited particles (charge / e)
    pub particles: f64,
    /// Deposited charge (C)
    pub charge_c: f64,
    /// Particles per second over the trailing above-floor samples, if any
    pub deposition_rate: Option<f64>,
    /// Samples inside the window
    pub samples: usize,
    /// Samples whose net current exceeds the noise floor
    pub above_floor: usize,
}

/// One row of the cumulative trace used for external plotting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracePoint {
    pub time: f64,
    pub net_current: f64,
    pub cumulative_particles: f64,
}

#[inline]
fn net_current(s: &Sample, leak_current: f64) -> f64 {
    (s.current + leak_current).abs()
}

/// Integrated charge (C) of `samples`. Fewer than two samples give zero.
pub fn integral_charge(samples: &[Sample], leak_current: f64) -> f64 {
    samples
        .windows(2)
        .map(|w| net_current(&w[1], leak_current) * (w[1].time - w[0].time))
        .sum()
}

/// Average of the last `cfg.rate_window` net currents above the noise floor,
/// in particles per second. `None` when no sample clears the floor.
pub fn deposition_rate(samples: &[Sample], leak_current: f64, cfg: &IntegratorCfg) -> Option<f64> {
    let above: Vec<f64> = samples
        .iter()
        .map(|s| net_current(s, leak_current))
        .filter(|&c| c > cfg.noise_floor_a)
        .collect();
    if above.is_empty() {
        return None;
    }
    let tail = &above[above.len().saturating_sub(cfg.rate_window)..];
    let mean = tail.iter().sum::<f64>() / tail.len() as f64;
    Some(mean / cfg.elementary_charge_c)
}

/// Integrate the run window of `measurement`.
pub fn integrate(measurement: &Measurement, run: &RunConfig, cfg: &IntegratorCfg) -> Integration {
    let samples = measurement.select(run.window);
    let charge_c = integral_charge(samples, run.leak_current);
    let above_floor = samples
        .iter()
        .filter(|s| net_current(s, run.leak_current) > cfg.noise_floor_a)
        .count();
    let deposition_rate = deposition_rate(samples, run.leak_current, cfg);

    if run.debug {
        tracing::debug!(
            samples = samples.len(),
            above_floor,
            noise_floor_a = cfg.noise_floor_a,
            t_start = samples.first().map(|s| s.time),
            t_end = samples.last().map(|s| s.time),
            "integration window"
        );
    }

    Integration {
        particles: charge_c / cfg.elementary_charge_c,
        charge_c,
        deposition_rate,
        samples: samples.len(),
        above_floor,
    }
}

/// Cumulative particle count at every sample of the run window.
pub fn trace(measurement: &Measurement, run: &RunConfig, cfg: &IntegratorCfg) -> Vec<TracePoint> {
    let samples = measurement.select(run.window);
    let mut out = Vec::with_capacity(samples.len());
    let mut total = 0.0;
    let mut prev_time: Option<f64> = None;
    for s in samples {
        let net = net_current(s, run.leak_current);
        if let Some(t_prev) = prev_time {
            total += net * (s.time - t_prev) / cfg.elementary_charge_c;
        }
        prev_time = Some(s.time);
        out.push(TracePoint {
            time: s.time,
            net_current: net,
            cumulative_particles: total,
        });
    }
    out
}
