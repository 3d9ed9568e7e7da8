//! Codec engines and the sessions that drive them.
//!
//! An engine is a thin wrapper over an external incremental (de)compressor.
//! It is stepped with an input slice and an output slice and reports how many
//! bytes it consumed and produced; it never touches I/O. The `session`
//! module owns the buffers and runs the refill/overflow loops on top of it.

pub mod gzip;
pub(crate) mod session;

#[cfg(feature = "xz")]
pub mod xz;

use crate::config::CodecOptions;
use crate::{Format, Result};

/// Flush mode for an encode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flush {
    /// Compress normally; the engine may hold data back.
    None,
    /// Emit everything buffered so far at a byte boundary.
    Sync,
    /// Emit everything and write the stream trailer.
    Finish,
}

/// Outcome of an engine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// The step succeeded; more input or output space may be needed.
    Ok,
    /// Decoding: the end of the compressed stream was reached.
    ///
    /// Encoding: the requested [`Flush::Sync`] or [`Flush::Finish`] has
    /// completed and all of its output was produced.
    StreamEnd,
}

/// Byte counts and status reported by one engine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Input bytes consumed.
    pub consumed: usize,
    /// Output bytes produced.
    pub produced: usize,
    /// Step status.
    pub status: StepStatus,
}

impl Step {
    /// Returns `true` if the step consumed or produced anything.
    pub fn made_progress(&self) -> bool {
        self.consumed > 0 || self.produced > 0
    }

    /// Returns `true` if the engine reported [`StepStatus::StreamEnd`].
    pub fn is_stream_end(&self) -> bool {
        self.status == StepStatus::StreamEnd
    }
}

/// An incremental decompressor.
pub trait DecodeEngine: Send {
    /// Returns the format this engine decodes.
    fn format(&self) -> Format;

    /// Decodes from `input` into `output` with sync-flush semantics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`](crate::Error::Decode) if the input is corrupt or the engine
    /// fails.
    fn step(&mut self, input: &[u8], output: &mut [u8]) -> Result<Step>;
}

/// An incremental compressor.
pub trait EncodeEngine: Send {
    /// Returns the format this engine produces.
    fn format(&self) -> Format;

    /// Encodes from `input` into `output` in the given flush mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`](crate::Error::Encode) if the engine fails.
    fn step(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<Step>;
}

/// Starts a decode engine for `format`.
///
/// Returns `Ok(None)` for [`Format::Plain`], which needs no engine.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`](crate::Error::UnsupportedFormat) for xz when the `xz` feature is
/// disabled, or [`Error::Init`](crate::Error::Init) if the engine cannot be started.
#[cfg_attr(not(feature = "xz"), allow(unused_variables))]
pub fn decode_engine(
    format: Format,
    options: &CodecOptions,
) -> Result<Option<Box<dyn DecodeEngine>>> {
    let engine: Box<dyn DecodeEngine> = match format {
        Format::Plain => return Ok(None),
        Format::Gzip => Box::new(gzip::GzipDecoder::new()),
        #[cfg(feature = "xz")]
        Format::Xz => Box::new(xz::XzDecoder::new(options.xz_memlimit)?),
        #[cfg(not(feature = "xz"))]
        Format::Xz => return Err(crate::Error::UnsupportedFormat(format)),
    };
    log::debug!("started {} decoder", format);
    Ok(Some(engine))
}

/// Starts an encode engine for `format`.
///
/// Returns `Ok(None)` for [`Format::Plain`], which needs no engine.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`](crate::Error::UnsupportedFormat) for xz when the `xz` feature is
/// disabled, or [`Error::Init`](crate::Error::Init) if the engine cannot be started.
pub fn encode_engine(
    format: Format,
    options: &CodecOptions,
) -> Result<Option<Box<dyn EncodeEngine>>> {
    let engine: Box<dyn EncodeEngine> = match format {
        Format::Plain => return Ok(None),
        Format::Gzip => Box::new(gzip::GzipEncoder::new(options.level)),
        #[cfg(feature = "xz")]
        Format::Xz => Box::new(xz::XzEncoder::new(options.level)?),
        #[cfg(not(feature = "xz"))]
        Format::Xz => return Err(crate::Error::UnsupportedFormat(format)),
    };
    log::debug!("started {} encoder at level {}", format, options.level);
    Ok(Some(engine))
}
