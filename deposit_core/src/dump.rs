//! Flat file dumps of pipeline results.
//!
//! - `SimCharge.txt`, `SimLoad.txt`, `SimChargeStd.txt`: one number per line,
//!   `%.18e` notation, no header
//! - `comparison.csv`: measured vs simulated charge per measured point
//! - `cloud.csv`: `x,y,height` of a resolved cloud
//! - integration trace: `time,net_current,cumulative_particles`

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};

use crate::aggregate::SimulationOutcome;
use crate::compare::ComparisonRow;
use crate::error::DepositError;
use crate::integrator::TracePoint;
use crate::particle::Cloud;

pub const SIM_CHARGE_FILE: &str = "SimCharge.txt";
pub const SIM_LOAD_FILE: &str = "SimLoad.txt";
pub const SIM_CHARGE_STD_FILE: &str = "SimChargeStd.txt";
pub const COMPARISON_FILE: &str = "comparison.csv";
pub const CLOUD_FILE: &str = "cloud.csv";

#[inline]
fn sci(v: f64) -> String {
    format!("{v:.18e}")
}

fn opt(v: Option<f64>) -> String {
    v.map(sci).unwrap_or_default()
}

/// Write one value per line.
pub fn write_column(path: &Path, values: &[f64]) -> Result<(), DepositError> {
    let mut w = WriterBuilder::new().has_headers(false).from_path(path)?;
    for &v in values {
        w.write_record([sci(v)])?;
    }
    w.flush()?;
    Ok(())
}

/// Write the three per-level columns into `dir`. Returns the paths written.
pub fn write_simulation(dir: &Path, outcome: &SimulationOutcome) -> Result<Vec<PathBuf>, DepositError> {
    let levels = &outcome.levels;
    let columns: [(&str, Vec<f64>); 3] = [
        (SIM_CHARGE_FILE, levels.iter().map(|l| l.sim_charge).collect()),
        (SIM_LOAD_FILE, levels.iter().map(|l| l.loading_ng).collect()),
        (SIM_CHARGE_STD_FILE, levels.iter().map(|l| l.sim_charge_std).collect()),
    ];
    let mut written = Vec::with_capacity(columns.len());
    for (name, values) in columns {
        let path = dir.join(name);
        write_column(&path, &values)?;
        written.push(path);
    }
    Ok(written)
}

pub fn write_comparison(path: &Path, rows: &[ComparisonRow]) -> Result<(), DepositError> {
    let mut w = Writer::from_path(path)?;
    w.write_record(["loading_ng", "measured_c", "simulated_c", "ratio"])?;
    for r in rows {
        w.write_record([
            r.loading_ng.to_string(),
            sci(r.measured_c),
            opt(r.simulated_c),
            opt(r.ratio),
        ])?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_cloud(path: &Path, cloud: &Cloud) -> Result<(), DepositError> {
    let mut w = Writer::from_path(path)?;
    w.write_record(["x", "y", "height"])?;
    for p in cloud.particles() {
        w.write_record([p.x.to_string(), p.y.to_string(), p.height.to_string()])?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_trace(path: &Path, trace: &[TracePoint]) -> Result<(), DepositError> {
    let mut w: Writer<File> = Writer::from_path(path)?;
    w.write_record(["time", "net_current", "cumulative_particles"])?;
    for t in trace {
        w.write_record([t.time.to_string(), sci(t.net_current), sci(t.cumulative_particles)])?;
    }
    w.flush()?;
    Ok(())
}
