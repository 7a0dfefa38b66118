//! Extraction tunables.

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_MAX_LINE_BYTES, DEFAULT_MAX_LINES_CAP, TailError};

/// Limits applied to a single extraction.
///
/// Deserializes from a partial object: missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TailConfig {
    /// Longest single line accepted, in bytes (excluding the terminator).
    pub max_line_bytes: usize,

    /// Hard upper bound on retained lines; larger requests are clamped.
    pub max_lines_cap: usize,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            max_lines_cap: DEFAULT_MAX_LINES_CAP,
        }
    }
}

impl TailConfig {
    /// Sets the line-length ceiling.
    pub fn with_max_line_bytes(mut self, bytes: usize) -> Self {
        self.max_line_bytes = bytes;
        self
    }

    /// Sets the retained-line cap.
    pub fn with_max_lines_cap(mut self, cap: usize) -> Self {
        self.max_lines_cap = cap;
        self
    }

    /// Rejects limits that would make every extraction fail.
    pub fn validate(&self) -> Result<(), TailError> {
        if self.max_line_bytes == 0 {
            return Err(TailError::InvalidConfig(
                "max_line_bytes must be greater than 0".into(),
            ));
        }
        if self.max_lines_cap == 0 {
            return Err(TailError::InvalidConfig(
                "max_lines_cap must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Resolves a caller's requested line count to a ring buffer capacity.
    ///
    /// Non-positive requests are rejected; requests above the cap are
    /// silently reduced to it.
    pub fn capacity_for(&self, requested: i64) -> Result<usize, TailError> {
        if requested <= 0 {
            return Err(TailError::InvalidCapacity(requested));
        }
        let requested_lines = usize::try_from(requested).unwrap_or(usize::MAX);
        if requested_lines > self.max_lines_cap {
            tracing::debug!(
                requested,
                cap = self.max_lines_cap,
                "clamping requested line count to cap"
            );
            return Ok(self.max_lines_cap);
        }
        Ok(requested_lines)
    }
}
