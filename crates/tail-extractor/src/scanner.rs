//! Line scanner: splits a byte stream into LF-delimited lines.
//!
//! A terminator after the final byte does not produce an extra empty line,
//! so `"a\nb\n"` and `"a\nb"` both scan as two lines. A single `\r` before
//! the terminator is dropped; invalid UTF-8 is replaced rather than rejected.

use std::io::{BufRead, ErrorKind};

use crate::TailError;

/// Outcome of feeding one buffered chunk to a [`LineAssembler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// A terminator was found; `consumed` includes it.
    Complete { consumed: usize },
    /// No terminator in the chunk; all of it was buffered.
    Partial { consumed: usize },
}

/// Accumulates bytes for the current line, enforcing the length ceiling.
///
/// Shared by the blocking and async scanners so both count and split lines
/// identically.
#[derive(Debug)]
pub(crate) struct LineAssembler {
    pending: Vec<u8>,
    max_line_bytes: usize,
    lines_read: usize,
}

impl LineAssembler {
    pub(crate) fn new(max_line_bytes: usize) -> Self {
        Self {
            pending: Vec::new(),
            max_line_bytes,
            lines_read: 0,
        }
    }

    /// Buffers bytes from `chunk` up to and including the first terminator.
    pub(crate) fn feed(&mut self, chunk: &[u8]) -> Result<Step, TailError> {
        match chunk.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                self.extend(&chunk[..pos])?;
                Ok(Step::Complete { consumed: pos + 1 })
            }
            None => {
                self.extend(chunk)?;
                Ok(Step::Partial {
                    consumed: chunk.len(),
                })
            }
        }
    }

    /// Emits the buffered line and counts it.
    pub(crate) fn take_line(&mut self) -> String {
        self.lines_read += 1;
        let mut bytes = std::mem::take(&mut self.pending);
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
    }

    /// Flushes an unterminated final line at end of stream.
    pub(crate) fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.take_line())
        }
    }

    pub(crate) fn read_error(&self, source: std::io::Error) -> TailError {
        TailError::StreamRead {
            lines_read: self.lines_read,
            source,
        }
    }

    pub(crate) fn lines_read(&self) -> usize {
        self.lines_read
    }

    fn extend(&mut self, bytes: &[u8]) -> Result<(), TailError> {
        if self.pending.len() + bytes.len() > self.max_line_bytes {
            return Err(TailError::LineTooLong {
                line: self.lines_read + 1,
                limit: self.max_line_bytes,
            });
        }
        self.pending.extend_from_slice(bytes);
        Ok(())
    }
}

/// Lazily yields lines from a buffered reader, consuming it exactly once.
///
/// After the first error the scanner is exhausted and yields nothing more.
pub struct LineScanner<R> {
    reader: R,
    assembler: LineAssembler,
    finished: bool,
}

impl<R: BufRead> LineScanner<R> {
    pub fn new(reader: R, max_line_bytes: usize) -> Self {
        Self {
            reader,
            assembler: LineAssembler::new(max_line_bytes),
            finished: false,
        }
    }

    /// Reads the next line, or `None` once the stream is exhausted.
    pub fn next_line(&mut self) -> Result<Option<String>, TailError> {
        if self.finished {
            return Ok(None);
        }

        loop {
            let available = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Err(self.assembler.read_error(e));
                }
            };

            if available.is_empty() {
                self.finished = true;
                return Ok(self.assembler.finish());
            }

            match self.assembler.feed(available) {
                Ok(Step::Complete { consumed }) => {
                    self.reader.consume(consumed);
                    return Ok(Some(self.assembler.take_line()));
                }
                Ok(Step::Partial { consumed }) => self.reader.consume(consumed),
                Err(e) => {
                    self.finished = true;
                    return Err(e);
                }
            }
        }
    }

    /// Number of lines yielded so far.
    pub fn lines_read(&self) -> usize {
        self.assembler.lines_read()
    }
}

impl<R: BufRead> Iterator for LineScanner<R> {
    type Item = Result<String, TailError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}
