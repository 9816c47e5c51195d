use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrossgaError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invariant violation: long period {long_period} must exceed short period {short_period}")]
    InvariantViolation {
        short_period: usize,
        long_period: usize,
    },

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, CrossgaError>;
