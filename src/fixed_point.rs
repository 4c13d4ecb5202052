//! 16-bit fixed-point encoding for memory images
//!
//! Values are scaled, rounded half-to-even and masked to the low 16 bits.
//! Negative values therefore land as their two's-complement bit pattern.
//! Anything outside the signed 16-bit range wraps silently; with the default
//! Q14 scale that is any magnitude at or above 2.0 (e.g. `4.0 * 16384`
//! masks to `0x0000`). Callers get the wrapped element indices so the
//! generator can report them.

use crate::error::{MemGenError, MemGenResult};
use crate::types::Artifact;

pub const WORD_MASK: i64 = 0xFFFF;
pub const PAD_TOKEN: &str = "0000";
pub const TOKEN_WIDTH: usize = 4;

/// Fixed-point scale shared by every artifact in a run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedPoint {
    scale: u32,
}

/// Token sequence for one artifact plus its range diagnostics
#[derive(Clone, Debug)]
pub struct EncodedArtifact {
    pub tokens: Vec<String>,
    /// Row-major indices whose scaled value fell outside i16
    pub wrapped: Vec<usize>,
    /// Count of real (non-padding) tokens
    pub data_len: usize,
}

impl FixedPoint {
    pub fn new(scale: u32) -> MemGenResult<Self> {
        if scale == 0 {
            return Err(MemGenError::InvalidScale(scale));
        }
        Ok(Self { scale })
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Scale and round without masking. Magnitudes beyond i64 saturate
    /// (`1e300` becomes `i64::MAX`, masking to `0xFFFF`) and are reported as
    /// wrapped by `encode_artifact`.
    pub fn quantize(&self, x: f64) -> i64 {
        (x * self.scale as f64).round_ties_even() as i64
    }

    /// Scale, round and mask to a 16-bit word
    pub fn encode_word(&self, x: f64) -> u16 {
        (self.quantize(x) & WORD_MASK) as u16
    }

    pub fn encode_token(&self, x: f64) -> String {
        format_token(self.encode_word(x))
    }

    pub fn decode_real(&self, word: u16) -> f64 {
        word as i16 as f64 / self.scale as f64
    }

    /// Encode a flat row-major slice and pad with zero words up to `target`.
    pub fn encode_padded(&self, values: &[f64], target: usize) -> Vec<String> {
        let mut tokens: Vec<String> = values.iter().map(|&x| self.encode_token(x)).collect();
        tokens.resize(target.max(values.len()), PAD_TOKEN.to_string());
        tokens
    }

    pub fn encode_artifact(&self, artifact: &Artifact, target: usize) -> MemGenResult<EncodedArtifact> {
        let flat = artifact.flatten();
        if flat.len() > target {
            return Err(MemGenError::TargetTooSmall {
                artifact: artifact.name.symbol(),
                elements: flat.len(),
                target,
            });
        }

        let mut tokens = Vec::with_capacity(target);
        let mut wrapped = Vec::new();
        for (index, &value) in flat.iter().enumerate() {
            if !value.is_finite() {
                return Err(MemGenError::NonFiniteElement {
                    artifact: artifact.name.symbol(),
                    index,
                    value,
                });
            }
            let q = self.quantize(value);
            if q < i16::MIN as i64 || q > i16::MAX as i64 {
                wrapped.push(index);
            }
            tokens.push(format_token((q & WORD_MASK) as u16));
        }
        tokens.resize(target, PAD_TOKEN.to_string());

        Ok(EncodedArtifact {
            tokens,
            wrapped,
            data_len: flat.len(),
        })
    }
}

pub fn format_token(word: u16) -> String {
    format!("{:04X}", word)
}

/// Parse one 4-digit hex token. `line` is 1-based and only used for errors.
pub fn parse_token(token: &str, line: usize) -> MemGenResult<u16> {
    let malformed = || MemGenError::MalformedToken {
        token: token.to_string(),
        line,
    };
    if token.len() != TOKEN_WIDTH || !token.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(malformed());
    }
    u16::from_str_radix(token, 16).map_err(|_| malformed())
}
