//! Run-parameter string of the charge integrator.
//!
//! A single semicolon-delimited string of `KEY=VALUE` pairs, e.g.
//!
//! ```text
//! TARGET=10.0;MODEL=NP;LEAK_CURRENT=1e-12;PARTICLE_DIAMETER=1.3;APERTURE_DIAMETER=7;TIME=[0,9200]
//! ```
//!
//! Keys are applied in order, so a repeated key overrides the earlier value.

use std::f64::consts::PI;

use thiserror::Error;

/// Coverage ladder (percent) used when no positive `TARGET` is given.
pub const DEFAULT_TARGETS: [f64; 13] = [
    5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 40.0, 50.0, 75.0, 100.0, 150.0, 200.0, 300.0,
];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParamError {
    #[error("malformed parameter segment '{0}' (expected KEY=VALUE)")]
    Malformed(String),
    #[error("{key} has invalid value '{value}': {reason}")]
    BadValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("MODEL must be either \"NP\" or \"SA\", got '{0}'")]
    BadModel(String),
    #[error("par/val pair ({key}/{value}) not recognized")]
    UnknownKey { key: String, value: String },
}

/// Coverage model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    /// Nanoparticles of known diameter
    Np,
    /// Single atoms of known areal density
    Sa,
}

impl Model {
    pub fn as_str(self) -> &'static str {
        match self {
            Model::Np => "NP",
            Model::Sa => "SA",
        }
    }
}

/// How to treat keys the parser does not know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Report and ignore
    #[default]
    Lenient,
    /// Reject with `ParamError::UnknownKey`
    Strict,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub model: Option<Model>,
    /// Single-atom density (cm^-2)
    pub sa_density_cm2: Option<f64>,
    /// Projected area of one particle (m^2)
    pub particle_area_m2: Option<f64>,
    /// Deposition aperture area (m^2)
    pub aperture_area_m2: Option<f64>,
    /// Ascending target coverages (percent)
    pub targets: Vec<f64>,
    /// Inclusive integration window (s)
    pub window: Option<(f64, f64)>,
    /// Baseline correction added to every current sample (A)
    pub leak_current: f64,
    pub debug: bool,
    pub plot: bool,
    /// Pairs that were reported and skipped
    pub ignored: Vec<(String, String)>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model: None,
            sa_density_cm2: None,
            particle_area_m2: None,
            aperture_area_m2: None,
            targets: DEFAULT_TARGETS.to_vec(),
            window: None,
            leak_current: 0.0,
            debug: false,
            plot: false,
            ignored: Vec::new(),
        }
    }
}

/// Interpret a flag value: `T...`, `Y...` or `ON` (any case) mean true.
pub fn parse_bool_string(value: &str) -> bool {
    let upper = value.trim().to_ascii_uppercase();
    upper.starts_with('T') || upper.starts_with('Y') || upper == "ON"
}

fn parse_f64(key: &'static str, value: &str) -> Result<f64, ParamError> {
    let v: f64 = value.parse().map_err(|_| ParamError::BadValue {
        key,
        value: value.to_string(),
        reason: "not a number",
    })?;
    if !v.is_finite() {
        return Err(ParamError::BadValue {
            key,
            value: value.to_string(),
            reason: "not finite",
        });
    }
    Ok(v)
}

fn parse_positive(key: &'static str, value: &str) -> Result<f64, ParamError> {
    let v = parse_f64(key, value)?;
    if v <= 0.0 {
        return Err(ParamError::BadValue {
            key,
            value: value.to_string(),
            reason: "must be > 0",
        });
    }
    Ok(v)
}

fn disc_area(diameter: f64) -> f64 {
    let r = diameter / 2.0;
    PI * r * r
}

fn parse_window(value: &str) -> Result<Option<(f64, f64)>, ParamError> {
    let inner = value.trim().trim_matches(|c| c == '[' || c == ']').trim();
    if inner.is_empty() {
        return Ok(None);
    }
    let bounds = inner
        .split(',')
        .map(|s| parse_f64("TIME", s.trim()))
        .collect::<Result<Vec<f64>, _>>()?;
    match bounds.as_slice() {
        [t0, t1] if t0 <= t1 => Ok(Some((*t0, *t1))),
        [_, _] => Err(ParamError::BadValue {
            key: "TIME",
            value: value.to_string(),
            reason: "start must not exceed end",
        }),
        _ => Err(ParamError::BadValue {
            key: "TIME",
            value: value.to_string(),
            reason: "expected [start,end]",
        }),
    }
}

/// Parse a `KEY=VALUE;...` run string.
pub fn parse_run_config(input: &str, mode: ParseMode) -> Result<RunConfig, ParamError> {
    let mut cfg = RunConfig::default();
    let trimmed = input.trim().trim_matches(';');

    for segment in trimmed.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let mut parts = segment.split('=');
        let (key, value) = match (parts.next(), parts.next(), parts.next()) {
            (Some(k), Some(v), None) => (k.trim(), v.trim()),
            _ => return Err(ParamError::Malformed(segment.to_string())),
        };

        match key {
            "LEAK_CURRENT" => cfg.leak_current = parse_f64("LEAK_CURRENT", value)?,
            "PARTICLE_DIAMETER" => {
                let d_nm = parse_positive("PARTICLE_DIAMETER", value)?;
                cfg.particle_area_m2 = Some(disc_area(d_nm * 1e-9));
            }
            "APERTURE_DIAMETER" => {
                let d_mm = parse_positive("APERTURE_DIAMETER", value)?;
                cfg.aperture_area_m2 = Some(disc_area(d_mm * 1e-3));
            }
            "DEBUG" => cfg.debug = parse_bool_string(value),
            "PLOT" => cfg.plot = parse_bool_string(value),
            "MODEL" => {
                cfg.model = Some(match value {
                    "NP" => Model::Np,
                    "SA" => Model::Sa,
                    other => return Err(ParamError::BadModel(other.to_string())),
                });
            }
            "SA_DENSITY" => cfg.sa_density_cm2 = Some(parse_positive("SA_DENSITY", value)?),
            "TARGET" => {
                let target = parse_f64("TARGET", value)?;
                cfg.targets = if target > 0.0 {
                    vec![target]
                } else {
                    DEFAULT_TARGETS.to_vec()
                };
            }
            "TIME" => cfg.window = parse_window(value)?,
            _ => {
                let (key, value) = (key.to_string(), value.to_string());
                if mode == ParseMode::Strict {
                    return Err(ParamError::UnknownKey { key, value });
                }
                tracing::warn!(%key, %value, "par/val pair not recognized; ignored");
                cfg.ignored.push((key, value));
            }
        }
    }

    Ok(cfg)
}
