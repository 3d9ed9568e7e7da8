//! Fixed-capacity inline byte buffers.
//!
//! A [`Window`] owns its storage inline and tracks the valid region with
//! indices rather than pointers. Moving an adapter therefore moves the bytes
//! together with their window, and the window stays valid in its new home.

use std::io::{self, Read};

/// Inline byte array with a `pos..end` window of valid bytes.
///
/// Invariant: `pos <= end <= N`.
///
/// Read side: `available()` is the unread part, `consume` advances `pos`.
/// Write side: bytes are appended at `end` until the window is full.
pub(crate) struct Window<const N: usize> {
    data: [u8; N],
    pos: usize,
    end: usize,
}

impl<const N: usize> std::fmt::Debug for Window<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("capacity", &N)
            .field("pos", &self.pos)
            .field("end", &self.end)
            .finish()
    }
}

impl<const N: usize> Window<N> {
    pub(crate) const CAPACITY: usize = {
        assert!(N > 0, "buffer capacity must be non-zero");
        N
    };

    pub(crate) fn new() -> Self {
        let _ = Self::CAPACITY;
        Self {
            data: [0; N],
            pos: 0,
            end: 0,
        }
    }

    /// Unread bytes.
    pub(crate) fn available(&self) -> &[u8] {
        &self.data[self.pos..self.end]
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    pub(crate) fn len(&self) -> usize {
        self.end - self.pos
    }

    pub(crate) fn is_full(&self) -> bool {
        self.end == N
    }

    pub(crate) fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.end);
    }

    pub(crate) fn clear(&mut self) {
        self.pos = 0;
        self.end = 0;
    }

    /// Whole storage, for an engine to produce into. Follow with `expose`.
    pub(crate) fn storage_mut(&mut self) -> &mut [u8; N] {
        &mut self.data
    }

    /// Marks the first `len` bytes of the storage as the unread window.
    pub(crate) fn expose(&mut self, len: usize) {
        debug_assert!(len <= N);
        self.pos = 0;
        self.end = len.min(N);
    }

    /// Replaces the contents with one read from `source`.
    ///
    /// Returns the number of bytes read; zero means the source has no more
    /// data. Interrupted reads are retried.
    pub(crate) fn fill_from<R: Read + ?Sized>(&mut self, source: &mut R) -> io::Result<usize> {
        self.clear();
        let read = loop {
            match source.read(&mut self.data) {
                Ok(read) => break read,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        self.expose(read);
        Ok(read)
    }

    /// Appends as much of `bytes` as fits and returns how much was taken.
    pub(crate) fn push(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(N - self.end);
        self.data[self.end..self.end + n].copy_from_slice(&bytes[..n]);
        self.end += n;
        n
    }
}
