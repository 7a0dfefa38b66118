//! Tail extraction: drain a scanner into a ring buffer and join the result.

use std::io::{BufRead, BufReader, Read};

use serde::{Deserialize, Serialize};

use crate::body::{Extraction, ReadableBody};
use crate::buffer::RingBuffer;
use crate::config::TailConfig;
use crate::scanner::LineScanner;
use crate::{READ_BUFFER_SIZE, TailError};

/// The last lines of a stream and how many lines the stream held in total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tail {
    /// Retained lines joined with `\n`, no trailing terminator.
    pub text: String,
    /// Every line read from the stream, retained or not.
    pub total_lines: usize,
    /// Lines present in `text`.
    pub retained: usize,
}

impl Tail {
    /// Whether lines were dropped from the head of the stream.
    pub fn is_truncated(&self) -> bool {
        self.total_lines > self.retained
    }

    pub(crate) fn from_ring(ring: RingBuffer<String>) -> Self {
        let total_lines = ring.total_seen();
        let retained = ring.len();
        Self {
            text: ring.linearize().join("\n"),
            total_lines,
            retained,
        }
    }
}

/// Extracts stream tails under a fixed [`TailConfig`].
///
/// Holds no per-call state; one extractor can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct TailExtractor {
    config: TailConfig,
}

impl TailExtractor {
    /// Creates an extractor, validating the configuration up front.
    pub fn new(config: TailConfig) -> Result<Self, TailError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TailConfig {
        &self.config
    }

    /// Returns the last `max_lines` lines of `reader`, consuming it fully.
    pub fn tail<R: Read + ?Sized>(
        &self,
        reader: &mut R,
        max_lines: i64,
    ) -> Result<Tail, TailError> {
        self.tail_buffered(BufReader::with_capacity(READ_BUFFER_SIZE, reader), max_lines)
    }

    /// Like [`tail`](Self::tail) for a reader that is already buffered.
    pub fn tail_buffered<R: BufRead>(
        &self,
        reader: R,
        max_lines: i64,
    ) -> Result<Tail, TailError> {
        let capacity = self.config.capacity_for(max_lines)?;
        let mut ring = RingBuffer::new(capacity)?;
        let mut scanner = LineScanner::new(reader, self.config.max_line_bytes);

        if let Err(e) = drain(&mut scanner, &mut ring) {
            tracing::warn!(
                error = %e,
                lines_read = scanner.lines_read(),
                "tail extraction aborted"
            );
            return Err(e);
        }

        let tail = Tail::from_ring(ring);
        tracing::debug!(
            total_lines = tail.total_lines,
            retained = tail.retained,
            capacity,
            "tail extraction complete"
        );
        Ok(tail)
    }

    /// Tails the body of `carrier`, leaving the rest of it untouched.
    pub fn tail_body<C: ReadableBody + ?Sized>(
        &self,
        carrier: &mut C,
        max_lines: i64,
    ) -> Result<Tail, TailError> {
        self.tail(carrier.body_mut(), max_lines)
    }

    /// Tails the body of `carrier` and hands the carrier back.
    pub fn tail_carrier<C: ReadableBody>(
        &self,
        mut carrier: C,
        max_lines: i64,
    ) -> Result<Extraction<C>, TailError> {
        let tail = self.tail_body(&mut carrier, max_lines)?;
        Ok(Extraction { tail, carrier })
    }
}

fn drain<R: BufRead>(
    scanner: &mut LineScanner<R>,
    ring: &mut RingBuffer<String>,
) -> Result<(), TailError> {
    while let Some(line) = scanner.next_line()? {
        ring.push(line);
    }
    Ok(())
}

/// Returns the last `max_lines` lines of `reader` using default limits.
pub fn tail_lines<R: Read + ?Sized>(reader: &mut R, max_lines: i64) -> Result<Tail, TailError> {
    TailExtractor::default().tail(reader, max_lines)
}

/// Tails the body of `carrier` using default limits.
pub fn tail_body<C: ReadableBody + ?Sized>(
    carrier: &mut C,
    max_lines: i64,
) -> Result<Tail, TailError> {
    TailExtractor::default().tail_body(carrier, max_lines)
}

/// Tails the body of `carrier` using default limits and returns the carrier.
pub fn tail_carrier<C: ReadableBody>(
    carrier: C,
    max_lines: i64,
) -> Result<Extraction<C>, TailError> {
    TailExtractor::default().tail_carrier(carrier, max_lines)
}
