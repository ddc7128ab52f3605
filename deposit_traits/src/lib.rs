//! Collaborator seams shared by the deposit crates.
//!
//! The measurement archive lives outside this workspace; anything that can
//! hand back a two-column `(time, current)` table for a numeric run id can
//! feed the charge integrator.

/// One raw sample as stored by the archive: `(time_s, current_a)`.
pub type RawSample = (f64, f64);

/// Retrieval of recorded deposition-current measurements.
pub trait MeasurementSource {
    /// Fetch the full `(time, current)` table recorded under `id`.
    fn fetch(&mut self, id: u64) -> Result<Vec<RawSample>, Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: MeasurementSource + ?Sized> MeasurementSource for Box<T> {
    fn fetch(&mut self, id: u64) -> Result<Vec<RawSample>, Box<dyn std::error::Error + Send + Sync>> {
        (**self).fetch(id)
    }
}
