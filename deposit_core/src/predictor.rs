//! Time-to-target prediction.

use crate::coverage::CoverageModel;
use crate::error::DepositError;

/// Whole hours, minutes and seconds, each truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hms {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Hms {
    /// Split `secs` by successive truncating division. Negative or
    /// non-finite input gives zero.
    pub fn from_seconds(secs: f64) -> Self {
        if !(secs.is_finite() && secs > 0.0) {
            return Self {
                hours: 0,
                minutes: 0,
                seconds: 0,
            };
        }
        let hours = (secs / 3600.0).trunc();
        let minutes = ((secs - hours * 3600.0) / 60.0).trunc();
        let seconds = (secs - hours * 3600.0 - minutes * 60.0).trunc();
        Self {
            hours: hours as u64,
            minutes: minutes as u64,
            seconds: seconds as u64,
        }
    }
}

impl std::fmt::Display for Hms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} hr {} min {} sec", self.hours, self.minutes, self.seconds)
    }
}

/// Outcome of the time-to-target estimate.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// The target is still ahead.
    Remaining {
        target_pct: f64,
        target_particles: f64,
        remaining_particles: f64,
        seconds: f64,
        hms: Hms,
    },
    /// The deposited count already meets the selected target.
    AlreadyExceeded { target_pct: f64, present_pct: f64 },
}

/// First target at or above `present_pct`, else the last one.
pub fn select_target(targets: &[f64], present_pct: f64) -> Option<f64> {
    targets
        .iter()
        .copied()
        .find(|&t| t >= present_pct)
        .or_else(|| targets.last().copied())
}

/// Predict time to the next target coverage at the given deposition rate.
pub fn predict(
    model: &CoverageModel,
    targets: &[f64],
    particles: f64,
    rate: Option<f64>,
) -> Result<Prediction, DepositError> {
    let present_pct = model.to_coverage(particles);
    let target_pct = select_target(targets, present_pct).ok_or_else(|| {
        DepositError::InvalidConfiguration("no target coverage configured".into())
    })?;
    let target_particles = model.to_number(target_pct);

    if particles >= target_particles {
        return Ok(Prediction::AlreadyExceeded {
            target_pct,
            present_pct,
        });
    }

    let rate = match rate {
        Some(r) if r > 0.0 => r,
        _ => {
            return Err(DepositError::InsufficientData(
                "no samples above the noise floor to estimate the deposition rate".into(),
            ));
        }
    };
    let remaining_particles = target_particles - particles;
    let seconds = remaining_particles / rate;
    Ok(Prediction::Remaining {
        target_pct,
        target_particles,
        remaining_particles,
        seconds,
        hms: Hms::from_seconds(seconds),
    })
}
