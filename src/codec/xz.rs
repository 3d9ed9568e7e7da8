//! xz engines on top of liblzma (through `xz2`).

use xz2::stream::{Action, Check, Status, Stream};

use super::{DecodeEngine, EncodeEngine, Flush, Step, StepStatus};
use crate::{Error, Format, Result};

/// xz decoder.
///
/// Decodes a single xz stream. Integrity check types the library does not
/// know are accepted without verification.
pub struct XzDecoder {
    inner: Stream,
}

impl std::fmt::Debug for XzDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XzDecoder")
            .field("total_in", &self.inner.total_in())
            .field("total_out", &self.inner.total_out())
            .finish_non_exhaustive()
    }
}

impl XzDecoder {
    /// Creates a new xz decoder.
    ///
    /// # Arguments
    ///
    /// * `memlimit` - Memory usage limit in bytes (`u64::MAX` for none)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Init`] if liblzma cannot allocate the decoder.
    pub fn new(memlimit: u64) -> Result<Self> {
        let inner =
            Stream::new_stream_decoder(memlimit, 0).map_err(|e| Error::init(Format::Xz, e))?;
        Ok(Self { inner })
    }
}

impl DecodeEngine for XzDecoder {
    fn format(&self) -> Format {
        Format::Xz
    }

    fn step(&mut self, input: &[u8], output: &mut [u8]) -> Result<Step> {
        let (in_before, out_before) = (self.inner.total_in(), self.inner.total_out());
        let status = self
            .inner
            .process(input, output, Action::Run)
            .map_err(|e| Error::decode(Format::Xz, e))?;

        Ok(Step {
            consumed: (self.inner.total_in() - in_before) as usize,
            produced: (self.inner.total_out() - out_before) as usize,
            status: match status {
                Status::StreamEnd => StepStatus::StreamEnd,
                Status::Ok | Status::GetCheck | Status::MemNeeded => StepStatus::Ok,
            },
        })
    }
}

/// xz encoder using an easy preset and CRC64 integrity checks.
pub struct XzEncoder {
    inner: Stream,
}

impl std::fmt::Debug for XzEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XzEncoder")
            .field("total_in", &self.inner.total_in())
            .field("total_out", &self.inner.total_out())
            .finish_non_exhaustive()
    }
}

impl XzEncoder {
    /// Creates a new xz encoder.
    ///
    /// # Arguments
    ///
    /// * `level` - Preset level (0-9, clamped)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Init`] if liblzma cannot allocate the encoder.
    pub fn new(level: u32) -> Result<Self> {
        let inner = Stream::new_easy_encoder(level.min(9), Check::Crc64)
            .map_err(|e| Error::init(Format::Xz, e))?;
        Ok(Self { inner })
    }
}

impl EncodeEngine for XzEncoder {
    fn format(&self) -> Format {
        Format::Xz
    }

    fn step(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<Step> {
        let action = match flush {
            Flush::None => Action::Run,
            Flush::Sync => Action::SyncFlush,
            Flush::Finish => Action::Finish,
        };

        let (in_before, out_before) = (self.inner.total_in(), self.inner.total_out());
        let status = self
            .inner
            .process(input, output, action)
            .map_err(|e| Error::encode(Format::Xz, e))?;

        Ok(Step {
            consumed: (self.inner.total_in() - in_before) as usize,
            produced: (self.inner.total_out() - out_before) as usize,
            status: match (flush, status) {
                (Flush::Sync | Flush::Finish, Status::StreamEnd) => StepStatus::StreamEnd,
                _ => StepStatus::Ok,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// "Hello, world!\n" as written by xz(1).
    const HELLO_XZ: [u8; 72] = [
        0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00, 0x00, 0x04, 0xe6, 0xd6, 0xb4, 0x46, 0x02, 0x00, 0x21,
        0x01, 0x16, 0x00, 0x00, 0x00, 0x74, 0x2f, 0xe5, 0xa3, 0x01, 0x00, 0x0d, 0x48, 0x65, 0x6c,
        0x6c, 0x6f, 0x2c, 0x20, 0x77, 0x6f, 0x72, 0x6c, 0x64, 0x21, 0x0a, 0x00, 0x00, 0x00, 0xc3,
        0xad, 0x94, 0xb3, 0x17, 0xf6, 0x0c, 0xca, 0x00, 0x01, 0x26, 0x0e, 0x08, 0x1b, 0xe0, 0x04,
        0x1f, 0xb6, 0xf3, 0x7d, 0x01, 0x00, 0x00, 0x00, 0x00, 0x04, 0x59, 0x5a,
    ];

    fn drain(engine: &mut XzEncoder, data: &[u8], flush: Flush, out: &mut Vec<u8>) {
        let mut buf = [0u8; 128];
        let mut input = data;
        loop {
            let step = engine.step(input, &mut buf, flush).unwrap();
            input = &input[step.consumed..];
            out.extend_from_slice(&buf[..step.produced]);
            if step.is_stream_end() {
                break;
            }
        }
    }

    fn decode_all(data: &[u8]) -> Vec<u8> {
        let mut decoder = XzDecoder::new(u64::MAX).unwrap();
        let mut out = Vec::new();
        let mut buf = [0u8; 128];
        let mut input = data;
        loop {
            let step = decoder.step(input, &mut buf).unwrap();
            input = &input[step.consumed..];
            out.extend_from_slice(&buf[..step.produced]);
            if step.is_stream_end() {
                break;
            }
            assert!(step.made_progress(), "decoder stalled");
        }
        out
    }

    #[test]
    fn test_decode_reference_vector() {
        assert_eq!(decode_all(&HELLO_XZ), b"Hello, world!\n");
    }

    #[test]
    fn test_decode_garbage_after_magic() {
        let mut decoder = XzDecoder::new(u64::MAX).unwrap();
        let mut out = [0u8; 32];
        let mut bad = HELLO_XZ;
        bad[6] = 0xFF; // stream flags
        let err = decoder.step(&bad, &mut out).unwrap_err();
        assert!(matches!(err, Error::Decode { format: Format::Xz, .. }));
    }

    #[test]
    fn test_encode_roundtrip() {
        let data = b"The quick brown fox jumps over the lazy dog. ".repeat(50);
        let mut encoder = XzEncoder::new(6).unwrap();
        let mut compressed = Vec::new();
        drain(&mut encoder, &data, Flush::Finish, &mut compressed);

        assert_eq!(&compressed[..6], &[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00]);
        assert_eq!(decode_all(&compressed), data);
    }

    #[test]
    fn test_sync_then_finish() {
        let mut encoder = XzEncoder::new(1).unwrap();
        let mut compressed = Vec::new();
        drain(&mut encoder, b"first ", Flush::Sync, &mut compressed);
        drain(&mut encoder, b"second", Flush::Finish, &mut compressed);
        assert_eq!(decode_all(&compressed), b"first second");
    }

    #[test]
    fn test_memlimit_too_small_is_decode_fault() {
        let mut encoder = XzEncoder::new(6).unwrap();
        let mut compressed = Vec::new();
        drain(&mut encoder, b"needs a dictionary", Flush::Finish, &mut compressed);

        let mut decoder = XzDecoder::new(1024).unwrap();
        let mut out = [0u8; 64];
        let mut input = &compressed[..];
        let err = loop {
            match decoder.step(input, &mut out) {
                Ok(step) => {
                    assert!(step.made_progress());
                    input = &input[step.consumed..];
                }
                Err(err) => break err,
            }
        };
        assert!(matches!(err, Error::Decode { .. }));
    }
}
