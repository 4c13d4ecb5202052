//! State layout for position/velocity paired filters
//!
//! The state vector interleaves one (position, velocity) pair per axis:
//! `[p0, v0, p1, v1, ...]`.

use serde::{Deserialize, Serialize};

use crate::error::{MemGenError, MemGenResult};

// ===== Preset Dimensions =====
pub const STATE_DIM_4: usize = 4; // 2 axes
pub const STATE_DIM_6: usize = 6; // 3 axes
pub const STATE_DIM_12: usize = 12; // 6 axes

pub const PRESET_STATE_SIZES: [usize; 3] = [STATE_DIM_4, STATE_DIM_6, STATE_DIM_12];

// Vector artifacts are padded to this many words per state element
pub const VECTOR_WORDS_PER_STATE: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateLayout {
    state_size: usize,
}

impl StateLayout {
    /// Validate and wrap a state size. Zero and odd sizes are rejected.
    pub fn new(state_size: usize) -> MemGenResult<Self> {
        if state_size == 0 || state_size % 2 != 0 {
            return Err(MemGenError::InvalidStateSize(state_size));
        }
        Ok(Self { state_size })
    }

    pub fn state_size(&self) -> usize {
        self.state_size
    }

    /// Number of tracked axes (one position/velocity pair each)
    pub fn axes(&self) -> usize {
        self.state_size / 2
    }

    pub fn position_index(&self, axis: usize) -> usize {
        2 * axis
    }

    pub fn velocity_index(&self, axis: usize) -> usize {
        2 * axis + 1
    }

    /// Padded word count for a square matrix memory bank
    pub fn matrix_words(&self) -> usize {
        self.state_size * self.state_size
    }

    /// Padded word count for a vector memory bank
    pub fn vector_words(&self) -> usize {
        self.state_size * VECTOR_WORDS_PER_STATE
    }

    /// Label used in generation reports, e.g. `4_state`
    pub fn label(&self) -> String {
        format!("{}_state", self.state_size)
    }

    /// Output directory name, e.g. `kalman_matrices_4`
    pub fn dir_name(&self) -> String {
        format!("kalman_matrices_{}", self.state_size)
    }
}
