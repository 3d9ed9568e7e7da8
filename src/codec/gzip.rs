//! gzip engines on top of flate2's low-level zlib stream.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use super::{DecodeEngine, EncodeEngine, Flush, Step, StepStatus};
use crate::{Error, Format, Result};

/// Base-2 logarithm of the deflate window size.
const WINDOW_BITS: u8 = 15;

/// gzip decoder.
///
/// Parses and discards the gzip header, inflates the first member and stops
/// at its trailer. Bytes after the first member are left unconsumed.
pub struct GzipDecoder {
    inner: Decompress,
}

impl std::fmt::Debug for GzipDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GzipDecoder")
            .field("total_in", &self.inner.total_in())
            .field("total_out", &self.inner.total_out())
            .finish_non_exhaustive()
    }
}

impl GzipDecoder {
    /// Creates a new gzip decoder.
    pub fn new() -> Self {
        Self {
            inner: Decompress::new_gzip(WINDOW_BITS),
        }
    }
}

impl Default for GzipDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeEngine for GzipDecoder {
    fn format(&self) -> Format {
        Format::Gzip
    }

    fn step(&mut self, input: &[u8], output: &mut [u8]) -> Result<Step> {
        let (in_before, out_before) = (self.inner.total_in(), self.inner.total_out());
        let status = self
            .inner
            .decompress(input, output, FlushDecompress::Sync)
            .map_err(|e| Error::decode(Format::Gzip, e))?;

        Ok(Step {
            consumed: (self.inner.total_in() - in_before) as usize,
            produced: (self.inner.total_out() - out_before) as usize,
            status: match status {
                Status::StreamEnd => StepStatus::StreamEnd,
                Status::Ok | Status::BufError => StepStatus::Ok,
            },
        })
    }
}

/// gzip encoder.
///
/// Writes a default gzip header (no file name, modification time or
/// comment) followed by a single deflate member.
pub struct GzipEncoder {
    inner: Compress,
}

impl std::fmt::Debug for GzipEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GzipEncoder")
            .field("total_in", &self.inner.total_in())
            .field("total_out", &self.inner.total_out())
            .finish_non_exhaustive()
    }
}

impl GzipEncoder {
    /// Creates a new gzip encoder.
    ///
    /// # Arguments
    ///
    /// * `level` - Compression level (0-9, clamped)
    pub fn new(level: u32) -> Self {
        Self {
            inner: Compress::new_gzip(Compression::new(level.min(9)), WINDOW_BITS),
        }
    }
}

impl EncodeEngine for GzipEncoder {
    fn format(&self) -> Format {
        Format::Gzip
    }

    fn step(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<Step> {
        let mode = match flush {
            Flush::None => FlushCompress::None,
            Flush::Sync => FlushCompress::Sync,
            Flush::Finish => FlushCompress::Finish,
        };

        let (in_before, out_before) = (self.inner.total_in(), self.inner.total_out());
        let status = self
            .inner
            .compress(input, output, mode)
            .map_err(|e| Error::encode(Format::Gzip, e))?;
        let consumed = (self.inner.total_in() - in_before) as usize;
        let produced = (self.inner.total_out() - out_before) as usize;

        // zlib completes a sync flush once it stops filling the output.
        let done = match flush {
            Flush::None => false,
            Flush::Sync => consumed == input.len() && produced < output.len(),
            Flush::Finish => status == Status::StreamEnd,
        };

        Ok(Step {
            consumed,
            produced,
            status: if done {
                StepStatus::StreamEnd
            } else {
                StepStatus::Ok
            },
        })
    }
}
