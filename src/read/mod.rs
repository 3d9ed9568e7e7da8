//! Decoding side: a buffered reader that undoes gzip or xz compression.
//!
//! [`DecodingReader`] wraps any [`Read`] and hands out the logical bytes
//! behind it. The format is sniffed from the stream's magic bytes unless the
//! caller names it.
//!
//! # Example
//!
//! ```rust
//! use std::io::{BufRead, Cursor};
//! use zxio::{DecodingReader, Format};
//!
//! let mut reader = DecodingReader::new(Cursor::new(b"no magic here\n".to_vec()));
//! assert_eq!(reader.format(), Format::Plain);
//!
//! let mut line = String::new();
//! reader.read_line(&mut line).unwrap();
//! assert_eq!(line, "no magic here\n");
//! ```

use std::io::{self, BufRead, Read};

use crate::buffer::Window;
use crate::codec::decode_engine;
use crate::codec::session::DecodeSession;
use crate::config::CodecOptions;
use crate::format::detect::{Lookahead, sniff};
use crate::{DEFAULT_BUFFER_SIZE, Error, Format, Result, StreamState};

/// Where decoded bytes come from.
#[allow(clippy::large_enum_variant)]
enum Source<const N: usize> {
    /// Raw upstream bytes, unchanged.
    Plain(Window<N>),
    Codec(DecodeSession<N>),
    /// Released by `close` or never started.
    Closed,
}

/// A buffered reader that transparently decompresses gzip and xz streams.
///
/// All buffers live inline in the value (`N` bytes for the codec input and
/// `N` for decoded output), so moving a reader mid-stream carries its
/// unread bytes along.
///
/// End of data is reported as `Ok(0)` whether the compressed stream ended
/// cleanly, was truncated or is corrupt. Use [`fault`](Self::fault) to tell
/// these apart.
///
/// The upstream may be owned (`File`, `Cursor<Vec<u8>>`) or borrowed
/// (`&mut R`).
pub struct DecodingReader<R, const N: usize = DEFAULT_BUFFER_SIZE> {
    upstream: Lookahead<R>,
    source: Source<N>,
    format: Format,
    state: StreamState,
    error: Option<Error>,
}

impl<R, const N: usize> std::fmt::Debug for DecodingReader<R, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodingReader")
            .field("format", &self.format)
            .field("state", &self.state)
            .field("buffered", &self.window().map_or(0, Window::len))
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<R: Read> DecodingReader<R> {
    /// Creates a reader whose format is sniffed from the first bytes of
    /// `upstream`.
    ///
    /// Never fails. If sniffing or codec start-up fails the reader is
    /// [`Failed`](StreamState::Failed) and [`error`](Self::error) holds the
    /// cause.
    pub fn new(upstream: R) -> Self {
        Self::with_options(upstream, None, &CodecOptions::default())
    }

    /// Creates a reader for a stream of known format. Nothing is sniffed.
    pub fn with_format(upstream: R, format: Format) -> Self {
        Self::with_options(upstream, Some(format), &CodecOptions::default())
    }
}

impl<R: Read, const N: usize> DecodingReader<R, N> {
    /// Creates a reader with explicit codec options and buffer size.
    ///
    /// ```rust
    /// use std::io::{Cursor, Read};
    /// use zxio::{CodecOptions, DecodingReader};
    ///
    /// let mut reader: DecodingReader<_, 16> =
    ///     DecodingReader::with_options(Cursor::new(b"abc"), None, &CodecOptions::default());
    /// let mut out = String::new();
    /// reader.read_to_string(&mut out).unwrap();
    /// assert_eq!(out, "abc");
    /// ```
    ///
    /// # Arguments
    ///
    /// * `upstream` - The byte source
    /// * `format` - The stream format, or `None` to sniff it
    /// * `options` - Codec options (the xz memory limit applies here)
    pub fn with_options(upstream: R, format: Option<Format>, options: &CodecOptions) -> Self {
        let mut reader = Self {
            upstream: Lookahead::new(upstream),
            source: Source::Closed,
            format: format.unwrap_or_default(),
            state: StreamState::Good,
            error: None,
        };
        if let Err(err) = reader.start(format, options) {
            log::warn!("cannot start {} reader: {}", reader.format, err);
            reader.state = StreamState::Failed;
            reader.error = Some(err);
        }
        reader
    }

    fn start(&mut self, format: Option<Format>, options: &CodecOptions) -> Result<()> {
        let format = match format {
            Some(format) => format,
            None => sniff(&mut self.upstream)?,
        };
        self.format = format;
        self.source = match decode_engine(format, options)? {
            Some(engine) => Source::Codec(DecodeSession::init(engine, &mut self.upstream)?),
            None => Source::Plain(Window::new()),
        };
        Ok(())
    }

    /// Pulls the next batch of bytes into the window.
    ///
    /// Returns the number of bytes now available; zero is end of data.
    fn refill(&mut self) -> io::Result<usize> {
        let result = match &mut self.source {
            Source::Plain(window) => window.fill_from(&mut self.upstream),
            Source::Codec(session) => session.refill(&mut self.upstream),
            Source::Closed => Ok(0),
        };

        match result {
            Ok(0) => {
                self.state = StreamState::Eof;
                Ok(0)
            }
            Ok(n) => {
                self.state = StreamState::Good;
                Ok(n)
            }
            Err(e) => {
                log::warn!("{} reader upstream failed: {}", self.format, e);
                self.state = StreamState::Failed;
                self.error = Some(Error::Io(io::Error::new(e.kind(), e.to_string())));
                Err(e)
            }
        }
    }
}

impl<R, const N: usize> DecodingReader<R, N> {
    fn window(&self) -> Option<&Window<N>> {
        match &self.source {
            Source::Plain(window) => Some(window),
            Source::Codec(session) => Some(session.output()),
            Source::Closed => None,
        }
    }

    fn window_mut(&mut self) -> Option<&mut Window<N>> {
        match &mut self.source {
            Source::Plain(window) => Some(window),
            Source::Codec(session) => Some(session.output_mut()),
            Source::Closed => None,
        }
    }

    /// Returns the format being decoded.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns the reader's condition.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Returns the hard failure that put the reader in the failed state.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Returns the decode error or truncation that ended the stream early.
    ///
    /// `None` for plain streams, for streams that are still being read or
    /// ended cleanly, and after [`close`](Self::close).
    pub fn fault(&self) -> Option<&Error> {
        match &self.source {
            Source::Codec(session) => session.fault(),
            _ => None,
        }
    }

    /// Releases the codec session. Further reads return [`Error::Closed`].
    ///
    /// Closing twice is the same as closing once. A reader that already
    /// failed stays [`Failed`](StreamState::Failed).
    pub fn close(&mut self) {
        if let Source::Codec(session) = &self.source {
            log::debug!("closing {} reader", session.format());
        }
        self.source = Source::Closed;
        if !self.state.is_failed() {
            self.state = StreamState::Closed;
        }
    }

    /// Returns `true` until [`close`](Self::close) is called or start-up
    /// fails.
    pub fn is_open(&self) -> bool {
        !matches!(self.source, Source::Closed)
    }

    /// Returns a reference to the upstream reader.
    pub fn get_ref(&self) -> &R {
        self.upstream.get_ref()
    }

    /// Returns a mutable reference to the upstream reader.
    ///
    /// Reading from it directly corrupts the decoded stream.
    pub fn get_mut(&mut self) -> &mut R {
        self.upstream.get_mut()
    }

    /// Unwraps the upstream reader. Buffered bytes are lost.
    pub fn into_inner(self) -> R {
        self.upstream.into_inner()
    }
}

impl<R: Read, const N: usize> BufRead for DecodingReader<R, N> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self.state {
            StreamState::Closed => return Err(Error::Closed.into()),
            StreamState::Failed => return Ok(&[]),
            StreamState::Good | StreamState::Eof => {}
        }
        if self.window().is_none_or(Window::is_empty) {
            self.refill()?;
        }
        Ok(self.window().map_or(&[][..], |window| window.available()))
    }

    fn consume(&mut self, amt: usize) {
        if let Some(window) = self.window_mut() {
            window.consume(amt);
        }
    }
}

impl<R: Read, const N: usize> Read for DecodingReader<R, N> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}
