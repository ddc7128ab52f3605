use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DepositError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("{0} model not implemented yet")]
    UnsupportedModel(&'static str),
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    #[error("invalid measurement: {0}")]
    InvalidMeasurement(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<deposit_config::ParamError> for DepositError {
    fn from(e: deposit_config::ParamError) -> Self {
        DepositError::InvalidConfiguration(e.to_string())
    }
}

impl From<csv::Error> for DepositError {
    fn from(e: csv::Error) -> Self {
        DepositError::Io(e.to_string())
    }
}

impl From<std::io::Error> for DepositError {
    fn from(e: std::io::Error) -> Self {
        DepositError::Io(e.to_string())
    }
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
