//! Codec configuration.

/// Highest compression level accepted by the engines.
pub const MAX_LEVEL: u32 = 9;

/// Options for starting a codec engine.
///
/// The defaults compress at the maximum level and let the xz decoder use as
/// much memory as the stream asks for.
///
/// # Example
///
/// ```rust
/// use zxio::CodecOptions;
///
/// let opts = CodecOptions::with_level(3).xz_memlimit(64 << 20);
/// assert_eq!(opts.level, 3);
/// assert_eq!(CodecOptions::with_level(42).level, 9);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Compression level (0-9, default 9). Ignored when decoding.
    pub level: u32,
    /// Memory limit in bytes for the xz decoder (default: unlimited).
    pub xz_memlimit: u64,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            level: MAX_LEVEL,
            xz_memlimit: u64::MAX,
        }
    }
}

impl CodecOptions {
    /// Creates options with the given compression level, clamped to 0-9.
    pub fn with_level(level: u32) -> Self {
        Self {
            level: level.min(MAX_LEVEL),
            ..Self::default()
        }
    }

    /// Sets the compression level, clamped to 0-9.
    pub fn level(mut self, level: u32) -> Self {
        self.level = level.min(MAX_LEVEL);
        self
    }

    /// Sets the xz decoder memory limit.
    ///
    /// A stream whose dictionary does not fit is reported as a decode fault.
    pub fn xz_memlimit(mut self, limit: u64) -> Self {
        self.xz_memlimit = limit;
        self
    }
}
