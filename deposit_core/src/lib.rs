#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Deposition analysis engine.
//!
//! Two independent pipelines share this crate.
//!
//! ## Charge integrator
//!
//! - **Measurement**: ordered `(time, current)` samples, optionally fetched
//!   through `deposit_traits::MeasurementSource` (`measurement` module)
//! - **Integrator**: windowed charge integral and trailing deposition rate
//! - **Coverage**: particle count <-> percent coverage (NP model)
//! - **Predictor**: time until the next target coverage
//! - **Session**: the whole run as one `IntegrationReport`
//!
//! ## Overlap simulator
//!
//! - **Particle sampler**: uniform clouds sized for a coverage (`particle`)
//! - **Contact index**: brute-force or R-tree neighbour queries (`contact`)
//! - **Resolver**: iterative stacking of touching particles
//! - **Loss**: surface lost to neighbours and the substrate
//! - **Aggregate**: seeded Monte-Carlo trials per loading level
//! - **Compare**: simulated vs measured charge
//!
//! Lengths in the simulator are grid units (`grid_scale` per nanometre);
//! areas are nm^2.

pub mod aggregate;
pub mod compare;
pub mod config;
pub mod contact;
pub mod conversions;
pub mod coverage;
pub mod dump;
pub mod error;
pub mod integrator;
pub mod loss;
pub mod measurement;
pub mod mocks;
pub mod particle;
pub mod predictor;
pub mod resolver;
pub mod rng;
pub mod session;
pub mod util;

pub use aggregate::{
    LevelResult, LoadingModel, SimulationOutcome, SimulationPlan, TrialResult, run_simulation,
    run_trial,
};
pub use compare::{ComparisonRow, compare};
pub use config::{IndexKind, IntegratorCfg, LossCfg, ResolverCfg, SamplerCfg, TrialCfg};
pub use coverage::{CoverageModel, convert_coverage_to_number, convert_number_to_coverage};
pub use error::{DepositError, Report, Result};
pub use integrator::{Integration, TracePoint, integrate, trace};
pub use measurement::{Measurement, Sample};
pub use particle::{Cloud, Particle};
pub use predictor::{Hms, Prediction, predict};
pub use session::{IntegrationReport, run_integration};
