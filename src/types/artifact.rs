use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::layout::StateLayout;

/// Memory bank shape class. Decides how far an artifact is padded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    Matrix,
    Vector,
}

/// The nine named artifacts, in generation order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArtifactName {
    /// State transition
    A,
    /// Control input
    B,
    /// Observation
    C,
    /// Measurement noise covariance
    R,
    /// Process noise covariance
    Q,
    /// Initial covariance (Σ₀)
    SigmaPrev,
    /// Initial state estimate (μ₀)
    MuPrev,
    /// Control vector
    U,
    /// Sample measurement vector
    Z,
}

impl ArtifactName {
    pub const ALL: [ArtifactName; 9] = [
        ArtifactName::A,
        ArtifactName::B,
        ArtifactName::C,
        ArtifactName::R,
        ArtifactName::Q,
        ArtifactName::SigmaPrev,
        ArtifactName::MuPrev,
        ArtifactName::U,
        ArtifactName::Z,
    ];

    /// Default bank kind. The builder overrides it for B when B is a
    /// single column (one axis).
    pub fn kind(&self) -> ArtifactKind {
        match self {
            ArtifactName::MuPrev | ArtifactName::U | ArtifactName::Z => ArtifactKind::Vector,
            _ => ArtifactKind::Matrix,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactName::A => "A_matrix.mem",
            ArtifactName::B => "B_matrix.mem",
            ArtifactName::C => "C_matrix.mem",
            ArtifactName::R => "R_matrix.mem",
            ArtifactName::Q => "Q_matrix.mem",
            ArtifactName::SigmaPrev => "Sigma_prev.mem",
            ArtifactName::MuPrev => "mu_prev.mem",
            ArtifactName::U => "u_vector.mem",
            ArtifactName::Z => "z_vector.mem",
        }
    }

    /// Short symbol for logs and error messages
    pub fn symbol(&self) -> &'static str {
        match self {
            ArtifactName::A => "A",
            ArtifactName::B => "B",
            ArtifactName::C => "C",
            ArtifactName::R => "R",
            ArtifactName::Q => "Q",
            ArtifactName::SigmaPrev => "Sigma",
            ArtifactName::MuPrev => "mu",
            ArtifactName::U => "u",
            ArtifactName::Z => "z",
        }
    }
}

/// One named matrix or column vector destined for a memory file
#[derive(Clone, Debug)]
pub struct Artifact {
    pub name: ArtifactName,
    pub kind: ArtifactKind,
    pub values: Array2<f64>,
}

impl Artifact {
    pub fn new(name: ArtifactName, values: Array2<f64>) -> Self {
        Self {
            name,
            kind: name.kind(),
            values,
        }
    }

    pub fn with_kind(name: ArtifactName, kind: ArtifactKind, values: Array2<f64>) -> Self {
        Self { name, kind, values }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn element_count(&self) -> usize {
        self.values.len()
    }

    /// Elements in row-major order
    pub fn flatten(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    /// Number of 16-bit words this artifact occupies once padded
    pub fn target_len(&self, layout: &StateLayout) -> usize {
        match self.kind {
            ArtifactKind::Matrix => layout.matrix_words(),
            ArtifactKind::Vector => layout.vector_words(),
        }
    }
}
