//! Fixed-point memory images for a hardware Kalman filter
//!
//! Builds the constant-velocity system matrices (A, B, C, R, Q, Σ₀, μ₀, u, z)
//! for a position/velocity paired state and writes each one as a `.mem`
//! file of 16-bit hex words.

pub mod config;
pub mod error;
pub mod fixed_point;
pub mod generator;
pub mod matrices;
pub mod mem_file;
pub mod types;

pub use config::{ConfigOverrides, GeneratorConfig, NoiseProfile, DEFAULT_DT, DEFAULT_SCALE};
pub use error::{MemGenError, MemGenResult};
pub use fixed_point::{EncodedArtifact, FixedPoint};
pub use generator::{generate, ConfigurationReport, FileReport, GenerationReport};
pub use matrices::{build_artifacts, make_kalman_matrices};
pub use types::{Artifact, ArtifactKind, ArtifactName, StateLayout, PRESET_STATE_SIZES};
