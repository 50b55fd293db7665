use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BenchError {
    #[error("Invalid duration for timer '{timer}' at index {index}: {value}")]
    InvalidDuration {
        timer: String,
        index: usize,
        value: f64,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, BenchError>;
