//! Bounded-memory tail extraction.
//!
//! Reads a line-oriented stream of any size exactly once and keeps only the
//! last N lines in a fixed-capacity ring buffer, so memory tracks N rather
//! than the size of the stream. The total number of lines read is reported
//! alongside the retained tail.
//!
//! ```no_run
//! let mut log = std::fs::File::open("job.log")?;
//! let tail = logtail_extractor::tail_lines(&mut log, 500)?;
//! println!("last {} of {} lines:\n{}", tail.retained, tail.total_lines, tail.text);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod body;
pub mod buffer;
pub mod config;
pub mod error;
pub mod extract;
pub mod nonblocking;
pub mod scanner;

pub use body::{Extraction, ReadableBody};
pub use buffer::RingBuffer;
pub use config::TailConfig;
pub use error::TailError;
pub use extract::{Tail, TailExtractor, tail_body, tail_carrier, tail_lines};
pub use nonblocking::{AsyncLineScanner, tail_async};
pub use scanner::LineScanner;

/// Default ceiling on a single line: 1 MiB.
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

/// Default upper bound on retained lines, whatever the caller requests.
pub const DEFAULT_MAX_LINES_CAP: usize = 100_000;

/// Read buffer size used when wrapping an unbuffered reader (64 KiB).
pub const READ_BUFFER_SIZE: usize = 64 * 1024;
