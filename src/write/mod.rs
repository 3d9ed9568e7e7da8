//! Encoding side: a buffered writer that compresses to gzip or xz.
//!
//! [`EncodingWriter`] wraps any [`Write`]. Bytes written to it are collected
//! in an inline buffer and compressed into the upstream writer whenever the
//! buffer fills up, on [`flush`](Write::flush) (a sync flush point) and on
//! [`close`](EncodingWriter::close) or [`finish`](EncodingWriter::finish),
//! which write the stream trailer.
//!
//! # Example
//!
//! ```rust
//! use std::io::{Cursor, Read, Write};
//! use zxio::{DecodingReader, EncodingWriter, Format};
//!
//! let mut writer = EncodingWriter::new(Vec::new(), Format::Gzip);
//! writer.write_all(b"Hello, world!\n").unwrap();
//! let compressed = writer.finish().unwrap();
//!
//! let mut text = String::new();
//! DecodingReader::new(Cursor::new(compressed))
//!     .read_to_string(&mut text)
//!     .unwrap();
//! assert_eq!(text, "Hello, world!\n");
//! ```

use std::io::{self, Write};
use std::mem::ManuallyDrop;

use crate::codec::encode_engine;
use crate::codec::session::EncodeSession;
use crate::codec::Flush;
use crate::config::CodecOptions;
use crate::{DEFAULT_BUFFER_SIZE, Error, Format, Result, StreamState};

/// Where written bytes go.
enum Sink<const N: usize> {
    /// Straight to upstream, unchanged.
    Plain,
    Codec(EncodeSession<N>),
    /// Finalized by `close` or never started.
    Closed,
}

/// A buffered writer that transparently compresses to gzip or xz.
///
/// Dropping the writer finalizes the stream; errors at that point can only
/// be logged, so call [`close`](Self::close) or [`finish`](Self::finish) to
/// observe them.
pub struct EncodingWriter<W: Write, const N: usize = DEFAULT_BUFFER_SIZE> {
    upstream: W,
    sink: Sink<N>,
    format: Format,
    state: StreamState,
    error: Option<Error>,
}

impl<W: Write, const N: usize> std::fmt::Debug for EncodingWriter<W, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pending = match &self.sink {
            Sink::Codec(session) => session.pending(),
            _ => 0,
        };
        f.debug_struct("EncodingWriter")
            .field("format", &self.format)
            .field("state", &self.state)
            .field("pending", &pending)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<W: Write> EncodingWriter<W> {
    /// Creates a writer producing `format` into `upstream` at the default
    /// (maximum) compression level.
    ///
    /// Never fails. If the codec cannot be started the writer is
    /// [`Failed`](StreamState::Failed) and [`error`](Self::error) holds the
    /// cause.
    pub fn new(upstream: W, format: Format) -> Self {
        Self::with_options(upstream, format, &CodecOptions::default())
    }
}

impl<W: Write, const N: usize> EncodingWriter<W, N> {
    /// Creates a writer with explicit codec options and buffer size.
    ///
    /// # Arguments
    ///
    /// * `upstream` - The byte sink
    /// * `format` - The format to produce
    /// * `options` - Codec options (the compression level applies here)
    pub fn with_options(upstream: W, format: Format, options: &CodecOptions) -> Self {
        let mut writer = Self {
            upstream,
            sink: Sink::Closed,
            format,
            state: StreamState::Good,
            error: None,
        };
        match encode_engine(format, options) {
            Ok(Some(engine)) => writer.sink = Sink::Codec(EncodeSession::new(engine)),
            Ok(None) => writer.sink = Sink::Plain,
            Err(err) => {
                log::warn!("cannot start {} writer: {}", format, err);
                writer.state = StreamState::Failed;
                writer.error = Some(err);
            }
        }
        writer
    }

    /// Returns the format being produced.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns the writer's condition.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Returns the failure that put the writer in the failed state.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Returns `true` until [`close`](Self::close) is called or start-up
    /// fails.
    pub fn is_open(&self) -> bool {
        !matches!(self.sink, Sink::Closed)
    }

    /// Returns a reference to the upstream writer.
    pub fn get_ref(&self) -> &W {
        &self.upstream
    }

    /// Returns a mutable reference to the upstream writer.
    ///
    /// Writing to it directly corrupts the compressed stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.upstream
    }

    /// Finalizes the stream: compresses buffered bytes, writes the trailer
    /// and flushes upstream. The codec engine is released even on failure.
    ///
    /// Closing a closed writer is a no-op returning `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns the engine or upstream failure; the writer is then
    /// [`Failed`](StreamState::Failed). A writer that had already failed
    /// has no valid trailer: closing it releases the engine and returns the
    /// recorded failure again, every time.
    pub fn close(&mut self) -> Result<()> {
        let sink = std::mem::replace(&mut self.sink, Sink::Closed);
        if self.state.is_failed() {
            drop(sink);
            return Err(self.failure());
        }

        let upstream = &mut self.upstream;
        let result = match sink {
            Sink::Codec(session) => session
                .finish(upstream)
                .and_then(|()| upstream.flush().map_err(Error::from)),
            Sink::Plain => upstream.flush().map_err(Error::from),
            Sink::Closed => return Ok(()),
        };

        match result {
            Ok(()) => {
                self.state = StreamState::Closed;
                Ok(())
            }
            Err(err) => {
                log::warn!("closing {} writer failed: {}", self.format, err);
                self.state = StreamState::Failed;
                self.error = Some(err.replicate());
                Err(err)
            }
        }
    }

    /// Finalizes the stream and returns the upstream writer.
    ///
    /// # Errors
    ///
    /// Same as [`close`](Self::close).
    pub fn finish(mut self) -> Result<W> {
        self.close()?;

        // Closed: `Drop` has nothing left to do, so skip it and move the
        // upstream out.
        let mut this = ManuallyDrop::new(self);
        this.error = None;
        // SAFETY: `this` is never used or dropped after this read, so the
        // upstream is moved out exactly once. The other fields hold no
        // resources: the sink is `Closed` and the error was released above.
        Ok(unsafe { std::ptr::read(&this.upstream) })
    }

    /// The recorded failure, for reporting it again.
    fn failure(&self) -> Error {
        self.error.as_ref().map_or_else(
            || Error::Io(io::Error::other("writer failed")),
            Error::replicate,
        )
    }

    fn fail(&mut self, err: Error) -> io::Error {
        log::warn!("{} writer failed: {}", self.format, err);
        let surfaced = err.replicate().into();
        self.state = StreamState::Failed;
        self.error = Some(err);
        surfaced
    }

    fn check_usable(&self) -> io::Result<bool> {
        match self.state {
            StreamState::Closed => Err(Error::Closed.into()),
            StreamState::Failed => Ok(false),
            StreamState::Good | StreamState::Eof => Ok(true),
        }
    }
}

impl<W: Write, const N: usize> Write for EncodingWriter<W, N> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.check_usable()? || buf.is_empty() {
            return Ok(0);
        }

        let upstream = &mut self.upstream;
        let result = match &mut self.sink {
            Sink::Plain => loop {
                match upstream.write(buf) {
                    Ok(0) => {
                        break Err(Error::ShortWrite {
                            expected: buf.len(),
                            written: 0,
                        });
                    }
                    Ok(n) => break Ok(n),
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => break Err(e.into()),
                }
            },
            Sink::Codec(session) => session.write(upstream, buf),
            Sink::Closed => Err(Error::Closed),
        };
        result.map_err(|err| self.fail(err))
    }

    /// Emits a sync flush point and flushes upstream.
    ///
    /// Everything written so far becomes decodable from the bytes upstream
    /// has received, without ending the stream.
    fn flush(&mut self) -> io::Result<()> {
        if !self.check_usable()? {
            return Err(self.failure().into());
        }

        let upstream = &mut self.upstream;
        let result = match &mut self.sink {
            Sink::Codec(session) => session.overflow(upstream, Flush::Sync),
            _ => Ok(()),
        }
        .and_then(|()| upstream.flush().map_err(Error::from));
        result.map_err(|err| self.fail(err))
    }
}

impl<W: Write, const N: usize> Drop for EncodingWriter<W, N> {
    fn drop(&mut self) {
        if self.is_open() {
            if let Err(err) = self.close() {
                log::warn!("finalizing {} stream on drop failed: {}", self.format, err);
            }
        }
    }
}
