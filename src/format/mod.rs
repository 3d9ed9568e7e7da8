//! Stream format identification.
//!
//! A stream is either gzip, xz or plain bytes. The format of a named file is
//! taken from its extension; the format of an already open stream is sniffed
//! from its magic bytes (see [`detect`]).

pub mod detect;

use std::path::Path;

/// gzip magic bytes (`ID1`, `ID2`).
pub const GZIP_MAGIC: &[u8; 2] = &[0x1F, 0x8B];

/// xz stream header magic bytes: `0xFD '7' 'z' 'X' 'Z'`.
pub const XZ_MAGIC: &[u8; 5] = &[0xFD, 0x37, 0x7A, 0x58, 0x5A];

/// Encoding of the bytes behind an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// gzip (RFC 1952) stream. Only the first member is decoded.
    Gzip,
    /// xz stream.
    Xz,
    /// Uncompressed bytes, passed through unchanged.
    #[default]
    Plain,
}

impl Format {
    /// Selects a format from a file name.
    ///
    /// `.gz` maps to [`Format::Gzip`] and `.xz` to [`Format::Xz`] when the
    /// `xz` feature is enabled. Everything else, including names without an
    /// extension, is [`Format::Plain`]. The comparison is case-sensitive.
    ///
    /// # Example
    ///
    /// ```rust
    /// use zxio::Format;
    ///
    /// assert_eq!(Format::from_path("data.txt.gz"), Format::Gzip);
    /// assert_eq!(Format::from_path("data.txt"), Format::Plain);
    /// assert_eq!(Format::from_path("data.GZ"), Format::Plain);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("gz") => Format::Gzip,
            #[cfg(feature = "xz")]
            Some("xz") => Format::Xz,
            _ => Format::Plain,
        }
    }

    /// Returns the conventional file extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Gzip => "gz",
            Format::Xz => "xz",
            Format::Plain => "",
        }
    }

    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            Format::Gzip => "gzip",
            Format::Xz => "xz",
            Format::Plain => "plain",
        }
    }

    /// Returns `true` if bytes in this format go through a codec.
    pub fn is_compressed(&self) -> bool {
        !matches!(self, Format::Plain)
    }

    /// Returns `true` if this build can encode and decode the format.
    pub fn is_supported(&self) -> bool {
        match self {
            Format::Gzip | Format::Plain => true,
            Format::Xz => cfg!(feature = "xz"),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
