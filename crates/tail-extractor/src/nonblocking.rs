//! Async tail extraction over tokio readers.
//!
//! Same line splitting, counting and error semantics as the blocking path.
//! There is no internal timeout; wrap the future in `tokio::time::timeout`
//! when the upstream may stall.

use std::io::ErrorKind;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader};

use crate::buffer::RingBuffer;
use crate::extract::{Tail, TailExtractor};
use crate::scanner::{LineAssembler, Step};
use crate::{READ_BUFFER_SIZE, TailError};

/// Lazily yields lines from an async buffered reader.
pub struct AsyncLineScanner<R> {
    reader: R,
    assembler: LineAssembler,
    finished: bool,
}

impl<R: AsyncBufRead + Unpin> AsyncLineScanner<R> {
    pub fn new(reader: R, max_line_bytes: usize) -> Self {
        Self {
            reader,
            assembler: LineAssembler::new(max_line_bytes),
            finished: false,
        }
    }

    /// Reads the next line, or `None` once the stream is exhausted.
    pub async fn next_line(&mut self) -> Result<Option<String>, TailError> {
        if self.finished {
            return Ok(None);
        }

        loop {
            let available = match self.reader.fill_buf().await {
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

    pub fn lines_read(&self) -> usize {
        self.assembler.lines_read()
    }
}

impl TailExtractor {
    /// Async counterpart of [`TailExtractor::tail`].
    pub async fn tail_async<R: AsyncRead + Unpin + ?Sized>(
        &self,
        reader: &mut R,
        max_lines: i64,
    ) -> Result<Tail, TailError> {
        self.tail_async_buffered(BufReader::with_capacity(READ_BUFFER_SIZE, reader), max_lines)
            .await
    }

    /// Async counterpart of [`TailExtractor::tail_buffered`].
    pub async fn tail_async_buffered<R: AsyncBufRead + Unpin>(
        &self,
        reader: R,
        max_lines: i64,
    ) -> Result<Tail, TailError> {
        let capacity = self.config().capacity_for(max_lines)?;
        let mut ring = RingBuffer::new(capacity)?;
        let mut scanner = AsyncLineScanner::new(reader, self.config().max_line_bytes);

        loop {
            match scanner.next_line().await {
                Ok(Some(line)) => ring.push(line),
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        lines_read = scanner.lines_read(),
                        "async tail extraction aborted"
                    );
                    return Err(e);
                }
            }
        }

        let tail = Tail::from_ring(ring);
        tracing::debug!(
            total_lines = tail.total_lines,
            retained = tail.retained,
            capacity,
            "async tail extraction complete"
        );
        Ok(tail)
    }
}

/// Returns the last `max_lines` lines of an async reader using default limits.
pub async fn tail_async<R: AsyncRead + Unpin + ?Sized>(
    reader: &mut R,
    max_lines: i64,
) -> Result<Tail, TailError> {
    TailExtractor::default().tail_async(reader, max_lines).await
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use tokio::io::ReadBuf;

    use super::*;
    use crate::TailConfig;

    /// Delivers data in small slices, then optionally fails.
    struct Chunked {
        data: Vec<u8>,
        pos: usize,
        step: usize,
        fail_at_end: bool,
    }

    impl Chunked {
        fn new(data: &str, step: usize) -> Self {
            Self {
                data: data.as_bytes().to_vec(),
                pos: 0,
                step,
                fail_at_end: false,
            }
        }

        fn failing(data: &str, step: usize) -> Self {
            Self {
                fail_at_end: true,
                ..Self::new(data, step)
            }
        }
    }

    impl AsyncRead for Chunked {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            if self.pos == self.data.len() {
                if self.fail_at_end {
                    return Poll::Ready(Err(std::io::Error::new(
                        ErrorKind::UnexpectedEof,
                        "body truncated",
                    )));
                }
                return Poll::Ready(Ok(()));
            }
            let n = self
                .step
                .min(buf.remaining())
                .min(self.data.len() - self.pos);
            let start = self.pos;
            buf.put_slice(&self.data[start..start + n]);
            self.pos += n;
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn keeps_last_lines() {
        let mut reader = "line1\nline2\nline3\nline4\nline5".as_bytes();
        let tail = tail_async(&mut reader, 3).await.unwrap();
        assert_eq!(tail.text, "line3\nline4\nline5");
        assert_eq!(tail.total_lines, 5);
    }

    #[tokio::test]
    async fn empty_stream() {
        let mut reader: &[u8] = b"";
        let tail = tail_async(&mut reader, 10).await.unwrap();
        assert_eq!(tail.text, "");
        assert_eq!(tail.total_lines, 0);
    }

    #[tokio::test]
    async fn matches_blocking_path() {
        let body = "a\r\n\nb\n世界\nlast\n\n\n";
        for step in [1, 3, 64] {
            let mut reader = Chunked::new(body, step);
            let async_tail = tail_async(&mut reader, 4).await.unwrap();
            let blocking_tail = crate::tail_lines(&mut body.as_bytes(), 4).unwrap();
            assert_eq!(async_tail, blocking_tail, "step {step}");
        }
    }

    #[tokio::test]
    async fn non_positive_max_lines_rejected() {
        let mut reader = "x".as_bytes();
        let err = tail_async(&mut reader, 0).await.unwrap_err();
        assert!(matches!(err, TailError::InvalidCapacity(0)));
    }

    #[tokio::test]
    async fn long_line_fails() {
        let extractor = TailExtractor::new(TailConfig::default().with_max_line_bytes(8)).unwrap();
        let mut reader = Chunked::new("short\nthis one is too long\n", 4);
        let err = extractor.tail_async(&mut reader, 5).await.unwrap_err();
        assert!(matches!(err, TailError::LineTooLong { line: 2, limit: 8 }));
    }

    #[tokio::test]
    async fn read_failure_reports_lines_seen() {
        let mut reader = Chunked::failing("one\ntwo\nthr", 5);
        let err = tail_async(&mut reader, 5).await.unwrap_err();
        assert_eq!(err.lines_read(), Some(2));
    }

    #[tokio::test]
    async fn concurrent_extractions_are_independent() {
        let extractor = TailExtractor::default();
        let mut handles = Vec::new();
        for id in 0..8 {
            let extractor = extractor.clone();
            handles.push(tokio::spawn(async move {
                let body: String = (0..100).map(|i| format!("{id}-{i}\n")).collect();
                let mut reader = Chunked::new(&body, 7);
                extractor.tail_async(&mut reader, 2).await.unwrap()
            }));
        }
        for (id, handle) in handles.into_iter().enumerate() {
            let tail = handle.await.unwrap();
            assert_eq!(tail.text, format!("{id}-98\n{id}-99"));
            assert_eq!(tail.total_lines, 100);
        }
    }
}
