use thiserror::Error;

/// Top-level error type for the FABRIK crates.
#[derive(Debug, Error)]
pub enum FabrikError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid margin_of_error: {0} (must be finite and > 0)")]
    InvalidMarginOfError(f64),

    #[error("max_iterations must be >= 1")]
    InvalidMaxIterations,

    #[error("Arm has no segments")]
    EmptyArm,

    #[error("Invalid length for segment {index}: {length} (must be finite and > 0)")]
    InvalidSegment { index: usize, length: f64 },

    #[error("Invalid viewport {width}x{height} (both sides must be finite and > 0)")]
    InvalidViewport { width: f64, height: f64 },
}

/// Chain construction errors.
///
/// Copy so it can be returned from the setup path without allocation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ChainError {
    #[error("Invalid length for segment {index}: {length} (must be finite and > 0)")]
    InvalidSegment { index: usize, length: f64 },

    #[error("Invalid initial angle for segment {index}: {angle} (must be finite)")]
    InvalidAngle { index: usize, angle: f64 },
}
