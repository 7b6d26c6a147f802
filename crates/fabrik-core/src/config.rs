use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_margin_of_error() -> f64 {
    2.0
}
const fn default_max_iterations() -> u32 {
    100
}
const fn default_base() -> [f64; 2] {
    [500.0, 350.0]
}
fn default_segments() -> Vec<SegmentConfig> {
    vec![
        SegmentConfig::new(150.0, 0.0),
        SegmentConfig::new(120.0, 0.0),
        SegmentConfig::new(100.0, 0.0),
    ]
}

// ---------------------------------------------------------------------------
// SolverConfig
// ---------------------------------------------------------------------------

/// FABRIK solver configuration, fixed when the solver is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Resource)]
pub struct SolverConfig {
    /// Convergence threshold: Euclidean distance between end effector and
    /// target (default: 2.0).
    #[serde(default = "default_margin_of_error")]
    pub margin_of_error: f64,

    /// Hard cap on backward/forward pass pairs per solve (default: 100).
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            margin_of_error: default_margin_of_error(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl SolverConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.margin_of_error.is_finite() || self.margin_of_error <= 0.0 {
            return Err(ConfigError::InvalidMarginOfError(self.margin_of_error));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations);
        }
        Ok(())
    }

    /// Set the margin of error.
    #[must_use]
    pub const fn with_margin_of_error(mut self, margin: f64) -> Self {
        self.margin_of_error = margin;
        self
    }

    /// Set the iteration cap.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

// ---------------------------------------------------------------------------
// ArmConfig
// ---------------------------------------------------------------------------

/// One rigid segment of an arm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentConfig {
    pub length: f64,
    /// Initial orientation in degrees, measured from +x. Only used to lay
    /// out the starting pose.
    #[serde(default)]
    pub angle_deg: f64,
}

impl SegmentConfig {
    pub const fn new(length: f64, angle_deg: f64) -> Self {
        Self { length, angle_deg }
    }

    /// Initial orientation in radians.
    pub fn angle_rad(&self) -> f64 {
        self.angle_deg.to_radians()
    }
}

/// Arm layout: a fixed base and its segments in base-to-tip order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmConfig {
    #[serde(default = "default_base")]
    pub base: [f64; 2],
    #[serde(default = "default_segments")]
    pub segments: Vec<SegmentConfig>,
}

impl Default for ArmConfig {
    /// Three segments (150, 120, 100) anchored at the centre of a 1000x700
    /// viewport.
    fn default() -> Self {
        Self {
            base: default_base(),
            segments: default_segments(),
        }
    }
}

impl ArmConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segments.is_empty() {
            return Err(ConfigError::EmptyArm);
        }
        for (index, segment) in self.segments.iter().enumerate() {
            if !segment.length.is_finite() || segment.length <= 0.0 {
                return Err(ConfigError::InvalidSegment {
                    index,
                    length: segment.length,
                });
            }
        }
        Ok(())
    }

    /// Sum of all segment lengths.
    pub fn total_reach(&self) -> f64 {
        self.segments.iter().map(|s| s.length).sum()
    }
}

// ---------------------------------------------------------------------------
// SceneConfig
// ---------------------------------------------------------------------------

/// Complete configuration file: solver settings plus the arm to solve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub arm: ArmConfig,
}

impl SceneConfig {
    /// Validate both sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.solver.validate()?;
        self.arm.validate()
    }

    /// Parse and validate TOML text.
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
