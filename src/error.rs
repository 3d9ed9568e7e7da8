//! Error types for compressed stream operations.
//!
//! This module provides the [`Error`] enum, the [`Result<T>`] alias and the
//! [`StreamState`] flag carried by every adapter.
//!
//! # Two ways failures surface
//!
//! Operations that are naturally fallible in Rust (`close`, `finish`,
//! `try_open`, the first failing `read`/`write`) return `Result`. On top of
//! that each adapter remembers its condition in a [`StreamState`], the way a
//! buffered stream keeps its failure bit: once an adapter is
//! [`Failed`](StreamState::Failed) reads produce no bytes and writes accept
//! no bytes, and the cause stays available from the adapter's `error()`.
//!
//! # End of data is not an error
//!
//! A clean end of a compressed stream, a truncated stream and a corrupt
//! stream all read as end of data (`Ok(0)`). Decoding adapters keep the
//! underlying [`Error::Decode`] in a side channel (`fault()`) so callers that
//! care can tell them apart:
//!
//! ```rust
//! use std::io::{Cursor, Read};
//! use zxio::DecodingReader;
//!
//! // gzip magic followed by garbage
//! let data = [0x1F, 0x8B, 0x08, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
//! let mut reader = DecodingReader::new(Cursor::new(&data[..]));
//!
//! let mut out = Vec::new();
//! reader.read_to_end(&mut out).unwrap();
//! assert!(out.is_empty());
//! assert!(reader.fault().is_some());
//! ```

use std::io;
use std::path::PathBuf;

use crate::Format;

/// The error type for compressed stream operations.
///
/// | Category | Variants |
/// |----------|----------|
/// | I/O | [`Io`][Self::Io], [`Open`][Self::Open], [`ShortWrite`][Self::ShortWrite] |
/// | Codec | [`Init`][Self::Init], [`Decode`][Self::Decode], [`Encode`][Self::Encode] |
/// | Usage | [`Closed`][Self::Closed], [`UnsupportedFormat`][Self::UnsupportedFormat] |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The upstream reader or writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A named file could not be opened or created.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        /// The path that was being opened.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The codec engine could not be started.
    #[error("cannot initialize {format} codec: {reason}")]
    Init {
        /// The format whose engine failed to start.
        format: Format,
        /// The engine's description of the failure.
        reason: String,
    },

    /// The compressed input could not be decoded.
    ///
    /// Decoding adapters never return this from `read`; it is recorded as
    /// the adapter's fault while the read itself reports end of data.
    #[error("{format} decode error: {reason}")]
    Decode {
        /// The format being decoded.
        format: Format,
        /// What went wrong.
        reason: String,
    },

    /// The codec engine failed while compressing.
    #[error("{format} encode error: {reason}")]
    Encode {
        /// The format being encoded.
        format: Format,
        /// What went wrong.
        reason: String,
    },

    /// The upstream sink accepted fewer bytes than it was given.
    #[error("short write: upstream accepted {written} of {expected} bytes")]
    ShortWrite {
        /// Number of bytes that had to be written.
        expected: usize,
        /// Number of bytes actually accepted.
        written: usize,
    },

    /// The stream was used after `close`.
    #[error("stream is closed")]
    Closed,

    /// The format is not compiled into this build.
    #[error("unsupported format: {0} (enable the `{0}` feature)")]
    UnsupportedFormat(Format),
}

impl Error {
    /// Returns `true` if this error came from the upstream reader/writer or
    /// the file system.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::Open { .. } | Error::ShortWrite { .. }
        )
    }

    /// Returns `true` if this error came from a codec engine.
    pub fn is_codec_error(&self) -> bool {
        matches!(
            self,
            Error::Init { .. } | Error::Decode { .. } | Error::Encode { .. }
        )
    }

    /// Returns the format associated with this error, if any.
    pub fn format(&self) -> Option<Format> {
        match self {
            Error::Init { format, .. }
            | Error::Decode { format, .. }
            | Error::Encode { format, .. } => Some(*format),
            Error::UnsupportedFormat(format) => Some(*format),
            _ => None,
        }
    }

    pub(crate) fn init(format: Format, reason: impl ToString) -> Self {
        Error::Init {
            format,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn decode(format: Format, reason: impl ToString) -> Self {
        Error::Decode {
            format,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn encode(format: Format, reason: impl ToString) -> Self {
        Error::Encode {
            format,
            reason: reason.to_string(),
        }
    }

    /// The [`io::ErrorKind`] this error maps to when it crosses an
    /// `std::io` trait boundary.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Error::Io(e) => e.kind(),
            Error::Open { source, .. } => source.kind(),
            Error::ShortWrite { .. } => io::ErrorKind::WriteZero,
            Error::Decode { .. } => io::ErrorKind::InvalidData,
            Error::Closed => io::ErrorKind::NotConnected,
            Error::UnsupportedFormat(_) => io::ErrorKind::Unsupported,
            _ => io::ErrorKind::Other,
        }
    }

    /// Builds an equivalent error for the caller while the original stays
    /// recorded on the adapter. I/O sources keep their kind and message.
    pub(crate) fn replicate(&self) -> Self {
        match self {
            Error::Io(e) => Error::Io(io::Error::new(e.kind(), e.to_string())),
            Error::Open { path, source } => Error::Open {
                path: path.clone(),
                source: io::Error::new(source.kind(), source.to_string()),
            },
            Error::Init { format, reason } => Error::init(*format, reason),
            Error::Decode { format, reason } => Error::decode(*format, reason),
            Error::Encode { format, reason } => Error::encode(*format, reason),
            Error::ShortWrite { expected, written } => Error::ShortWrite {
                expected: *expected,
                written: *written,
            },
            Error::Closed => Error::Closed,
            Error::UnsupportedFormat(format) => Error::UnsupportedFormat(*format),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            Error::Open { source, .. } => source,
            other => io::Error::new(other.kind(), other),
        }
    }
}

/// A specialized Result type for compressed stream operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Condition of an adapter or file session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    /// Ready for I/O.
    #[default]
    Good,
    /// The last read reached end of data.
    ///
    /// This covers a clean end of stream as well as truncated or corrupt
    /// compressed input.
    Eof,
    /// A hard failure occurred; no further bytes are produced or accepted.
    Failed,
    /// `close` has been called.
    Closed,
}

impl StreamState {
    /// Returns `true` unless the stream failed.
    ///
    /// A closed stream counts as good when it closed cleanly.
    pub fn is_ok(&self) -> bool {
        !matches!(self, StreamState::Failed)
    }

    /// Returns `true` if the stream is in the failed state.
    pub fn is_failed(&self) -> bool {
        matches!(self, StreamState::Failed)
    }
}
