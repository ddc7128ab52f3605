//! Directory-backed measurement archive.

use std::path::PathBuf;

use deposit_traits::{MeasurementSource, RawSample};

/// Measurements stored as `<dir>/<id>.csv` with headers `time,current`.
pub struct CsvArchive {
    dir: PathBuf,
}

impl CsvArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl MeasurementSource for CsvArchive {
    fn fetch(&mut self, id: u64) -> Result<Vec<RawSample>, Box<dyn std::error::Error + Send + Sync>> {
        let path = self.dir.join(format!("{id}.csv"));
        let rows = deposit_config::load_measurement_csv(&path).map_err(|e| format!("{e:#}"))?;
        Ok(rows.into_iter().map(|r| (r.time, r.current)).collect())
    }
}
