use shared::ParseModeError;
use thiserror::Error;

/// Rejected simulation parameters. Raised at construction, never mid-run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("side length must be a positive even integer, got {side_length}")]
    InvalidSideLength { side_length: i64 },

    #[error("fidelity must lie in 0..=256, got {fidelity}")]
    InvalidFidelity { fidelity: u32 },

    #[error("invalid turn kernel: {0}")]
    InvalidTurnKernel(String),

    #[error("{name} must be a finite non-negative number, got {value}")]
    InvalidRate { name: &'static str, value: f32 },

    #[error("step count must be positive")]
    InvalidStepCount,

    #[error(transparent)]
    InvalidMode(#[from] ParseModeError),
}
