//! Error types for tail extraction.

/// Errors produced while extracting the tail of a line stream.
#[derive(Debug, thiserror::Error)]
pub enum TailError {
    /// The underlying stream failed before it was exhausted.
    #[error("stream read failed after {lines_read} lines: {source}")]
    StreamRead {
        lines_read: usize,
        #[source]
        source: std::io::Error,
    },

    /// A single line exceeded the configured length ceiling.
    #[error("line {line} exceeds the maximum line length of {limit} bytes")]
    LineTooLong { line: usize, limit: usize },

    #[error("invalid line capacity {0}: must be at least 1")]
    InvalidCapacity(i64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TailError {
    /// Number of lines observed before a read failure, if this is one.
    pub fn lines_read(&self) -> Option<usize> {
        match self {
            Self::StreamRead { lines_read, .. } => Some(*lines_read),
            _ => None,
        }
    }
}
