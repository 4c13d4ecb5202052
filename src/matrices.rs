//! Linear-system matrices for a constant-velocity Kalman filter
//!
//! Each axis contributes an independent (position, velocity) block:
//!
//!   A_i = | 1  dt |     B_i = | 0.5·dt² |
//!         | 0   1 |           |   dt    |
//!
//! The blocks sit on the diagonal of the full state in axis order.

use ndarray::Array2;

use crate::config::NoiseProfile;
use crate::error::{MemGenError, MemGenResult};
use crate::types::{Artifact, ArtifactKind, ArtifactName, StateLayout};

/// State transition: identity plus `dt` coupling velocity into position
pub fn transition_matrix(layout: &StateLayout, dt: f64) -> Array2<f64> {
    let n = layout.state_size();
    let mut a = Array2::<f64>::eye(n);
    for axis in 0..layout.axes() {
        a[[layout.position_index(axis), layout.velocity_index(axis)]] = dt;
    }
    a
}

/// Control input: per-axis acceleration discretized over one step
pub fn control_matrix(layout: &StateLayout, dt: f64) -> Array2<f64> {
    let mut b = Array2::<f64>::zeros((layout.state_size(), layout.axes()));
    for axis in 0..layout.axes() {
        b[[layout.position_index(axis), axis]] = 0.5 * dt * dt;
        b[[layout.velocity_index(axis), axis]] = dt;
    }
    b
}

/// Full-state observation
pub fn observation_matrix(layout: &StateLayout) -> Array2<f64> {
    Array2::<f64>::eye(layout.state_size())
}

pub fn scaled_identity(layout: &StateLayout, magnitude: f64) -> Array2<f64> {
    Array2::<f64>::eye(layout.state_size()) * magnitude
}

pub fn initial_state(layout: &StateLayout) -> Array2<f64> {
    Array2::<f64>::zeros((layout.state_size(), 1))
}

pub fn control_vector(layout: &StateLayout, magnitude: f64) -> Array2<f64> {
    Array2::<f64>::from_elem((layout.axes(), 1), magnitude)
}

/// Fixed bring-up measurement `[1, 2, ..., N]`, not a sensor reading
pub fn sample_measurement(layout: &StateLayout) -> Array2<f64> {
    let n = layout.state_size();
    Array2::from_shape_fn((n, 1), |(row, _)| (row + 1) as f64)
}

/// Build all nine artifacts in memory-file order (A, B, C, R, Q, Σ₀, μ₀, u, z).
///
/// B is tagged as a vector bank when it has a single column (one axis), so
/// a 2-state B is padded to `4N` words like the other column vectors.
pub fn build_artifacts(
    layout: &StateLayout,
    dt: f64,
    noise: &NoiseProfile,
) -> MemGenResult<Vec<Artifact>> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(MemGenError::InvalidTimeStep(dt));
    }

    let artifacts = ArtifactName::ALL
        .iter()
        .map(|&name| {
            let values = match name {
                ArtifactName::A => transition_matrix(layout, dt),
                ArtifactName::B => control_matrix(layout, dt),
                ArtifactName::C => observation_matrix(layout),
                ArtifactName::R => scaled_identity(layout, noise.measurement_noise),
                ArtifactName::Q => scaled_identity(layout, noise.process_noise),
                ArtifactName::SigmaPrev => scaled_identity(layout, noise.initial_covariance),
                ArtifactName::MuPrev => initial_state(layout),
                ArtifactName::U => control_vector(layout, noise.control_input),
                ArtifactName::Z => sample_measurement(layout),
            };
            let kind = match name {
                ArtifactName::B if layout.axes() == 1 => ArtifactKind::Vector,
                _ => name.kind(),
            };
            Artifact::with_kind(name, kind, values)
        })
        .collect();

    Ok(artifacts)
}

/// Build artifacts for a raw state size with the default noise profile
pub fn make_kalman_matrices(state_size: usize, dt: f64) -> MemGenResult<Vec<Artifact>> {
    let layout = StateLayout::new(state_size)?;
    build_artifacts(&layout, dt, &NoiseProfile::default())
}
