//! Recorded deposition-current time series.

use deposit_config::MeasurementRow;
use deposit_traits::MeasurementSource;

use crate::error::DepositError;

/// One `(time, current)` sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Seconds
    pub time: f64,
    /// Amperes
    pub current: f64,
}

/// Ordered, immutable current measurement. Time never decreases.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    samples: Vec<Sample>,
}

impl Measurement {
    /// Validate and wrap `(time, current)` pairs.
    pub fn new(raw: Vec<(f64, f64)>) -> Result<Self, DepositError> {
        let mut samples = Vec::with_capacity(raw.len());
        for (idx, (time, current)) in raw.into_iter().enumerate() {
            if !(time.is_finite() && current.is_finite()) {
                return Err(DepositError::InvalidMeasurement(format!(
                    "non-finite sample at index {idx}"
                )));
            }
            if let Some(prev) = samples.last().map(|s: &Sample| s.time)
                && time < prev
            {
                return Err(DepositError::InvalidMeasurement(format!(
                    "time decreases at index {idx} ({time} < {prev})"
                )));
            }
            samples.push(Sample { time, current });
        }
        Ok(Self { samples })
    }

    pub fn from_rows(rows: &[MeasurementRow]) -> Result<Self, DepositError> {
        Self::new(rows.iter().map(|r| (r.time, r.current)).collect())
    }

    /// Pull run `id` from an archive.
    pub fn fetch<S: MeasurementSource + ?Sized>(
        source: &mut S,
        id: u64,
    ) -> Result<Self, DepositError> {
        let raw = source.fetch(id).map_err(|e| {
            DepositError::InvalidMeasurement(format!("fetch of measurement {id} failed: {e}"))
        })?;
        tracing::debug!(id, samples = raw.len(), "measurement fetched");
        Self::new(raw)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples with `t0 <= time <= t1`. Time is sorted, so this is a
    /// contiguous slice.
    pub fn window(&self, t0: f64, t1: f64) -> &[Sample] {
        let start = self.samples.partition_point(|s| s.time < t0);
        let end = self.samples.partition_point(|s| s.time <= t1);
        if start >= end {
            return &[];
        }
        &self.samples[start..end]
    }

    /// Either the given window or every sample.
    pub fn select(&self, window: Option<(f64, f64)>) -> &[Sample] {
        match window {
            Some((t0, t1)) => self.window(t0, t1),
            None => &self.samples,
        }
    }
}
