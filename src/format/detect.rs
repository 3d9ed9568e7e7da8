//! Format sniffing for streams of unknown origin.
//!
//! Sniffing looks at the leading magic bytes of a stream without consuming
//! them: the bytes stay buffered in a [`Lookahead`] and are returned by the
//! next reads, so the codec (or the pass-through path) still sees the whole
//! stream.
//!
//! Files opened by name never get here; their format comes from the file
//! extension (see [`Format::from_path`]).

use std::io::{self, Read};

use super::{Format, GZIP_MAGIC, XZ_MAGIC};

/// Number of bytes a [`Lookahead`] can hold back.
pub const LOOKAHEAD_CAPACITY: usize = XZ_MAGIC.len();

/// A reader that can peek a few bytes ahead of its inner reader.
///
/// Peeked bytes are kept in a small inline buffer and handed out again by
/// [`Read::read`] before any further bytes are pulled from the inner reader.
pub struct Lookahead<R> {
    inner: R,
    pending: [u8; LOOKAHEAD_CAPACITY],
    pos: usize,
    len: usize,
}

impl<R> std::fmt::Debug for Lookahead<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lookahead")
            .field("pending", &self.buffered())
            .finish_non_exhaustive()
    }
}

impl<R> Lookahead<R> {
    /// Wraps `inner` with an empty look-ahead buffer.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: [0; LOOKAHEAD_CAPACITY],
            pos: 0,
            len: 0,
        }
    }

    /// Returns the bytes that were peeked but not read yet.
    pub fn buffered(&self) -> &[u8] {
        &self.pending[self.pos..self.len]
    }

    /// Returns a reference to the inner reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Returns a mutable reference to the inner reader.
    ///
    /// Reading from it directly skips any bytes still in [`buffered`](Self::buffered).
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwraps the inner reader. Bytes still buffered are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Lookahead<R> {
    /// Peeks up to `n` bytes (at most [`LOOKAHEAD_CAPACITY`]).
    ///
    /// Blocks until `n` bytes are buffered or the inner reader reports end of
    /// data. The returned slice is shorter than `n` only in the latter case.
    /// Nothing is consumed.
    pub fn peek(&mut self, n: usize) -> io::Result<&[u8]> {
        let n = n.min(LOOKAHEAD_CAPACITY);

        if self.pos > 0 {
            self.pending.copy_within(self.pos..self.len, 0);
            self.len -= self.pos;
            self.pos = 0;
        }

        while self.len < n {
            match self.inner.read(&mut self.pending[self.len..n]) {
                Ok(0) => break,
                Ok(read) => self.len += read,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(&self.pending[..self.len.min(n)])
    }
}

impl<R: Read> Read for Lookahead<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos < self.len {
            let n = buf.len().min(self.len - self.pos);
            buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
            self.pos += n;
            if self.pos == self.len {
                self.pos = 0;
                self.len = 0;
            }
            return Ok(n);
        }
        self.inner.read(buf)
    }
}

/// Classifies a stream from its leading bytes.
///
/// Returns [`Format::Plain`] when `head` is too short to hold a full magic
/// sequence.
///
/// # Example
///
/// ```rust
/// use zxio::Format;
/// use zxio::format::detect::detect;
///
/// assert_eq!(detect(&[0x1F, 0x8B, 0x08]), Format::Gzip);
/// assert_eq!(detect(&[0x1F]), Format::Plain);
/// assert_eq!(detect(b"hello"), Format::Plain);
/// ```
pub fn detect(head: &[u8]) -> Format {
    if head.starts_with(GZIP_MAGIC) {
        return Format::Gzip;
    }
    if cfg!(feature = "xz") && head.starts_with(XZ_MAGIC) {
        return Format::Xz;
    }
    Format::Plain
}

/// Sniffs the format of `source` without consuming any bytes.
///
/// Only as many bytes as needed are pulled: one for plain data, two when
/// the first byte could start a gzip header and five when it could start
/// an xz header. A source that ends before the magic is complete is plain.
///
/// # Errors
///
/// Returns an error only if the inner reader fails.
pub fn sniff<R: Read>(source: &mut Lookahead<R>) -> io::Result<Format> {
    let wanted = match source.peek(1)?.first() {
        Some(&0x1F) => GZIP_MAGIC.len(),
        Some(&0xFD) if cfg!(feature = "xz") => XZ_MAGIC.len(),
        _ => return Ok(Format::Plain),
    };

    let format = detect(source.peek(wanted)?);
    log::debug!("sniffed {} stream", format);
    Ok(format)
}
