//! Test and helper mocks for deposit_core

use std::collections::HashMap;

use deposit_traits::{MeasurementSource, RawSample};

/// Archive held in memory, keyed by measurement id.
#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    runs: HashMap<u64, Vec<RawSample>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_run(mut self, id: u64, samples: Vec<RawSample>) -> Self {
        self.runs.insert(id, samples);
        self
    }
}

impl MeasurementSource for InMemorySource {
    fn fetch(&mut self, id: u64) -> Result<Vec<RawSample>, Box<dyn std::error::Error + Send + Sync>> {
        self.runs
            .get(&id)
            .cloned()
            .ok_or_else(|| format!("no measurement with id {id}").into())
    }
}
