//! Codec sessions: one engine plus its inline buffers.
//!
//! A [`DecodeSession`] turns pulls from an upstream reader into a window of
//! decoded bytes ([`refill`](DecodeSession::refill)). An [`EncodeSession`]
//! collects bytes in an input window and pushes compressed output to an
//! upstream writer when that window fills up or a flush is requested
//! ([`overflow`](EncodeSession::overflow)).
//!
//! Sessions never own their upstream; it is passed to every call. This keeps
//! the session movable together with the adapter that owns both.

use std::io::{self, Read, Write};

use super::{DecodeEngine, EncodeEngine, Flush, StepStatus};
use crate::buffer::Window;
use crate::{Error, Format, Result};

/// Smallest output area handed to an encode engine. zlib needs more than six
/// bytes of room to complete a sync flush without repeating the marker.
const MIN_SCRATCH: usize = 64;

/// Decode side of a codec session.
pub(crate) struct DecodeSession<const N: usize> {
    engine: Box<dyn DecodeEngine>,
    input: Window<N>,
    output: Window<N>,
    finished: bool,
    fault: Option<Error>,
}

impl<const N: usize> std::fmt::Debug for DecodeSession<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeSession")
            .field("format", &self.engine.format())
            .field("input", &self.input)
            .field("output", &self.output)
            .field("finished", &self.finished)
            .field("fault", &self.fault)
            .finish()
    }
}

impl<const N: usize> DecodeSession<N> {
    /// Takes over a started engine and primes it with the first chunk of
    /// upstream data.
    pub(crate) fn init<R: Read + ?Sized>(
        engine: Box<dyn DecodeEngine>,
        upstream: &mut R,
    ) -> io::Result<Self> {
        let mut input = Window::new();
        let primed = input.fill_from(upstream)?;
        log::debug!("{} session primed with {} bytes", engine.format(), primed);

        Ok(Self {
            engine,
            input,
            output: Window::new(),
            finished: false,
            fault: None,
        })
    }

    pub(crate) fn format(&self) -> Format {
        self.engine.format()
    }

    /// Decoded bytes not yet handed to the consumer.
    pub(crate) fn output(&self) -> &Window<N> {
        &self.output
    }

    pub(crate) fn output_mut(&mut self) -> &mut Window<N> {
        &mut self.output
    }

    /// The decode error or truncation that ended the stream early, if any.
    pub(crate) fn fault(&self) -> Option<&Error> {
        self.fault.as_ref()
    }

    /// Decodes until the output window holds bytes or there is no more data.
    ///
    /// Returns the number of decoded bytes now available. Zero means end of
    /// data: the stream ended, was truncated, or is corrupt. The last two
    /// are recorded as the session's [`fault`](Self::fault).
    ///
    /// # Errors
    ///
    /// Only I/O errors from `upstream` are returned.
    pub(crate) fn refill<R: Read + ?Sized>(&mut self, upstream: &mut R) -> io::Result<usize> {
        if self.finished || self.fault.is_some() {
            return Ok(0);
        }

        while self.output.is_empty() {
            let mut exhausted = false;
            if self.input.is_empty() {
                exhausted = self.input.fill_from(upstream)? == 0;
            }

            let step = match self.engine.step(self.input.available(), self.output.storage_mut()) {
                Ok(step) => step,
                Err(err) => {
                    self.record_fault(err);
                    self.output.clear();
                    break;
                }
            };
            self.input.consume(step.consumed);
            self.output.expose(step.produced);

            if step.status == StepStatus::StreamEnd {
                log::debug!("{} stream ended", self.format());
                self.finished = true;
                break;
            }
            if step.produced > 0 {
                break;
            }
            if !step.made_progress() {
                let reason = if exhausted {
                    "unexpected end of compressed stream"
                } else {
                    "decoder made no progress"
                };
                self.record_fault(Error::decode(self.format(), reason));
                break;
            }
        }

        Ok(self.output.len())
    }

    fn record_fault(&mut self, err: Error) {
        log::warn!("{}; reporting end of data", err);
        self.fault = Some(err);
    }
}

/// Encode side of a codec session.
pub(crate) struct EncodeSession<const N: usize> {
    engine: Box<dyn EncodeEngine>,
    input: Window<N>,
}

impl<const N: usize> std::fmt::Debug for EncodeSession<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodeSession")
            .field("format", &self.engine.format())
            .field("input", &self.input)
            .finish()
    }
}

impl<const N: usize> EncodeSession<N> {
    /// Takes over a started engine with an empty input window.
    pub(crate) fn new(engine: Box<dyn EncodeEngine>) -> Self {
        Self {
            engine,
            input: Window::new(),
        }
    }

    pub(crate) fn format(&self) -> Format {
        self.engine.format()
    }

    /// Bytes accepted but not yet handed to the engine.
    pub(crate) fn pending(&self) -> usize {
        self.input.len()
    }

    /// Buffers as much of `buf` as fits, compressing a full window first.
    ///
    /// Returns the number of bytes taken, which is non-zero for a non-empty
    /// `buf`.
    pub(crate) fn write<W: Write + ?Sized>(&mut self, upstream: &mut W, buf: &[u8]) -> Result<usize> {
        if self.input.is_full() {
            self.overflow(upstream, Flush::None)?;
        }
        Ok(self.input.push(buf))
    }

    /// Feeds the input window to the engine and pushes everything it
    /// produces to `upstream`, then empties the window.
    ///
    /// With [`Flush::Sync`] or [`Flush::Finish`] this also drains the
    /// engine until the flush has completed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the engine fails or stalls, and
    /// [`Error::ShortWrite`] or [`Error::Io`] if `upstream` does not accept
    /// the output.
    pub(crate) fn overflow<W: Write + ?Sized>(&mut self, upstream: &mut W, flush: Flush) -> Result<()> {
        let mut inline = [0u8; N];
        let mut floor = [0u8; MIN_SCRATCH];
        let scratch: &mut [u8] = if N >= MIN_SCRATCH { &mut inline } else { &mut floor };
        let mut input = self.input.available();

        loop {
            let step = self.engine.step(input, scratch, flush)?;
            input = &input[step.consumed..];
            if step.produced > 0 {
                push_all(upstream, &scratch[..step.produced])?;
            }

            let done = match flush {
                Flush::None => input.is_empty() && step.produced < scratch.len(),
                Flush::Sync | Flush::Finish => step.status == StepStatus::StreamEnd,
            };
            if done {
                break;
            }
            if !step.made_progress() {
                return Err(Error::encode(self.engine.format(), "encoder made no progress"));
            }
        }

        self.input.clear();
        Ok(())
    }

    /// Compresses what is left, writes the stream trailer and releases the
    /// engine.
    pub(crate) fn finish<W: Write + ?Sized>(mut self, upstream: &mut W) -> Result<()> {
        let format = self.format();
        self.overflow(upstream, Flush::Finish)?;
        log::debug!("{} stream finalized", format);
        Ok(())
    }
}

/// Writes all of `bytes` to `upstream`.
///
/// Partial writes are continued and interrupted writes retried. A write that
/// accepts nothing is a [`Error::ShortWrite`].
pub(crate) fn push_all<W: Write + ?Sized>(upstream: &mut W, bytes: &[u8]) -> Result<()> {
    let expected = bytes.len();
    let mut written = 0;
    while written < expected {
        match upstream.write(&bytes[written..]) {
            Ok(0) => return Err(Error::ShortWrite { expected, written }),
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
