use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MemGenError, MemGenResult};
use crate::types::{StateLayout, PRESET_STATE_SIZES};

pub const DEFAULT_DT: f64 = 0.001; // 1 kHz update
pub const DEFAULT_SCALE: u32 = 16384; // 2^14, Q14

/// Diagonal magnitudes for the noise/covariance matrices and the control input
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseProfile {
    /// Measurement noise (R diagonal)
    pub measurement_noise: f64,
    /// Process noise (Q diagonal)
    pub process_noise: f64,
    /// Initial covariance (Σ₀ diagonal)
    pub initial_covariance: f64,
    /// Per-axis control input (u elements)
    pub control_input: f64,
}

impl Default for NoiseProfile {
    fn default() -> Self {
        Self {
            measurement_noise: 0.01,
            process_noise: 0.2,
            initial_covariance: 0.01,
            control_input: 0.5,
        }
    }
}

/// Run parameters. Missing JSON fields take the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub dt: f64,
    pub scale: u32,
    pub state_sizes: Vec<usize>,
    pub output_root: PathBuf,
    pub noise: NoiseProfile,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            scale: DEFAULT_SCALE,
            state_sizes: PRESET_STATE_SIZES.to_vec(),
            output_root: PathBuf::from("."),
            noise: NoiseProfile::default(),
        }
    }
}

/// Command-line values layered over a loaded config. `None` and an empty
/// `state_sizes` leave the underlying value alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigOverrides {
    pub dt: Option<f64>,
    pub scale: Option<u32>,
    pub state_sizes: Vec<usize>,
    pub output_root: Option<PathBuf>,
}

impl GeneratorConfig {
    /// Load `path` (or defaults when absent), then apply `overrides` on top
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> MemGenResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        Ok(config)
    }

    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(dt) = overrides.dt {
            self.dt = dt;
        }
        if let Some(scale) = overrides.scale {
            self.scale = scale;
        }
        if !overrides.state_sizes.is_empty() {
            self.state_sizes = overrides.state_sizes.clone();
        }
        if let Some(root) = &overrides.output_root {
            self.output_root = root.clone();
        }
    }

    pub fn from_json_str(json: &str) -> MemGenResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> MemGenResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| MemGenError::io(path, e))?;
        Self::from_json_str(&text)
    }

    /// Check every parameter and return the validated layouts.
    ///
    /// Runs before anything touches the filesystem so a bad entry in
    /// `state_sizes` cannot leave a partial set of directories behind.
    pub fn validate(&self) -> MemGenResult<Vec<StateLayout>> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(MemGenError::InvalidTimeStep(self.dt));
        }
        if self.scale == 0 {
            return Err(MemGenError::InvalidScale(self.scale));
        }
        if self.state_sizes.is_empty() {
            return Err(MemGenError::InvalidConfig(
                "state_sizes must not be empty".to_string(),
            ));
        }

        let noise = &self.noise;
        let magnitudes = [
            ("measurement_noise", noise.measurement_noise),
            ("process_noise", noise.process_noise),
            ("initial_covariance", noise.initial_covariance),
            ("control_input", noise.control_input),
        ];
        for (field, value) in magnitudes {
            if !value.is_finite() {
                return Err(MemGenError::InvalidConfig(format!(
                    "noise.{} must be finite, got {}",
                    field, value
                )));
            }
        }

        self.state_sizes
            .iter()
            .map(|&n| StateLayout::new(n))
            .collect()
    }
}
