// fabrik-core: Config, errors and shared types for the FABRIK arm solver.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ArmConfig, SceneConfig, SegmentConfig, SolverConfig};
pub use error::{ChainError, ConfigError, FabrikError};
pub use types::ArmId;
