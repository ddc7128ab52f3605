//! Particle count <-> coverage conversion.
//!
//! Coverage is the projected area of all particles as a percentage of the
//! deposition aperture. Only the nanoparticle model is implemented.

use deposit_config::{Model, RunConfig};

use crate::error::DepositError;

/// Nanoparticle coverage geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageModel {
    particle_area_m2: f64,
    aperture_area_m2: f64,
}

impl CoverageModel {
    pub fn new(particle_area_m2: f64, aperture_area_m2: f64) -> Result<Self, DepositError> {
        if !(particle_area_m2 > 0.0 && aperture_area_m2 > 0.0) {
            return Err(DepositError::InvalidConfiguration(
                "particle and aperture areas must be > 0".into(),
            ));
        }
        Ok(Self {
            particle_area_m2,
            aperture_area_m2,
        })
    }

    /// Select the model named by the run parameters.
    pub fn from_run(run: &RunConfig) -> Result<Self, DepositError> {
        match run.model {
            None => Err(DepositError::InvalidConfiguration("MODEL not chosen".into())),
            Some(Model::Sa) => Err(DepositError::UnsupportedModel(Model::Sa.as_str())),
            Some(Model::Np) => {
                let particle = run.particle_area_m2.ok_or_else(|| {
                    DepositError::InvalidConfiguration(
                        "PARTICLE_DIAMETER is required for the NP model".into(),
                    )
                })?;
                let aperture = run.aperture_area_m2.ok_or_else(|| {
                    DepositError::InvalidConfiguration(
                        "APERTURE_DIAMETER is required for the NP model".into(),
                    )
                })?;
                Self::new(particle, aperture)
            }
        }
    }

    /// Coverage in percent for `number` particles.
    #[inline]
    pub fn to_coverage(&self, number: f64) -> f64 {
        number * 100.0 / self.aperture_area_m2 * self.particle_area_m2
    }

    /// Particles needed for `coverage` percent.
    #[inline]
    pub fn to_number(&self, coverage: f64) -> f64 {
        coverage / 100.0 * self.aperture_area_m2 / self.particle_area_m2
    }
}

pub fn convert_number_to_coverage(run: &RunConfig, number: f64) -> Result<f64, DepositError> {
    Ok(CoverageModel::from_run(run)?.to_coverage(number))
}

pub fn convert_coverage_to_number(run: &RunConfig, coverage: f64) -> Result<f64, DepositError> {
    Ok(CoverageModel::from_run(run)?.to_number(coverage))
}
