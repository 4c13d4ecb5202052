use std::path::PathBuf;

use thiserror::Error;

/// Memory image generator error types
#[derive(Error, Debug)]
pub enum MemGenError {
    #[error("Invalid state size {0}: must be even and positive")]
    InvalidStateSize(usize),

    #[error("Invalid time step {0}: must be finite and positive")]
    InvalidTimeStep(f64),

    #[error("Invalid scale factor {0}: must be positive")]
    InvalidScale(u32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Artifact {artifact} has {elements} elements but target length is {target}")]
    TargetTooSmall {
        artifact: &'static str,
        elements: usize,
        target: usize,
    },

    #[error("Artifact {artifact} element {index} is not finite ({value})")]
    NonFiniteElement {
        artifact: &'static str,
        index: usize,
        value: f64,
    },

    #[error("Malformed token {token:?} on line {line}")]
    MalformedToken { token: String, line: usize },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl MemGenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MemGenError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for generator operations
pub type MemGenResult<T> = Result<T, MemGenError>;
