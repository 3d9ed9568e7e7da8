//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::io::{self, Cursor, Read, Write};
use zxio::{CodecOptions, DecodingReader, EncodingWriter, Format};

/// "Hello, world!\n" compressed by gzip(1), with the file name "test.txt".
pub const HELLO_GZ: [u8; 43] = [
    0x1f, 0x8b, 0x08, 0x08, 0x61, 0xb2, 0xf0, 0x62, 0x00, 0x03, 0x74, 0x65, 0x73, 0x74, 0x2e, 0x74,
    0x78, 0x74, 0x00, 0xf3, 0x48, 0xcd, 0xc9, 0xc9, 0xd7, 0x51, 0x28, 0xcf, 0x2f, 0xca, 0x49, 0x51,
    0xe4, 0x02, 0x00, 0x18, 0xa7, 0x55, 0x7b, 0x0e, 0x00, 0x00, 0x00,
];

/// "Hello, world!\n" compressed by xz(1).
pub const HELLO_XZ: [u8; 72] = [
    0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00, 0x00, 0x04, 0xe6, 0xd6, 0xb4, 0x46, 0x02, 0x00, 0x21, 0x01,
    0x16, 0x00, 0x00, 0x00, 0x74, 0x2f, 0xe5, 0xa3, 0x01, 0x00, 0x0d, 0x48, 0x65, 0x6c, 0x6c, 0x6f,
    0x2c, 0x20, 0x77, 0x6f, 0x72, 0x6c, 0x64, 0x21, 0x0a, 0x00, 0x00, 0x00, 0xc3, 0xad, 0x94, 0xb3,
    0x17, 0xf6, 0x0c, 0xca, 0x00, 0x01, 0x26, 0x0e, 0x08, 0x1b, 0xe0, 0x04, 0x1f, 0xb6, 0xf3, 0x7d,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x04, 0x59, 0x5a,
];

pub const HELLO: &str = "Hello, world!\n";

/// Formats every build can encode and decode.
pub fn supported_formats() -> Vec<Format> {
    [Format::Gzip, Format::Xz, Format::Plain]
        .into_iter()
        .filter(Format::is_supported)
        .collect()
}

/// Test data generators.
pub mod data {
    /// Text-like data (compressible).
    pub fn text(len: usize) -> Vec<u8> {
        b"The quick brown fox jumps over the lazy dog. "
            .iter()
            .cycle()
            .take(len)
            .copied()
            .collect()
    }

    /// Random/incompressible data (deterministically seeded for reproducibility).
    pub fn random(len: usize) -> Vec<u8> {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};
        let mut rng = StdRng::seed_from_u64(0xDEAD_BEEF_CAFE_1234);
        let mut data = vec![0u8; len];
        rng.fill(&mut data[..]);
        data
    }
}

/// Options used by the helpers: a low level keeps xz encoders small.
pub fn options() -> CodecOptions {
    CodecOptions::with_level(1)
}

/// Compresses `data` through an [`EncodingWriter`] with `N`-byte buffers.
pub fn encode<const N: usize>(format: Format, data: &[u8]) -> Vec<u8> {
    let mut writer: EncodingWriter<_, N> =
        EncodingWriter::with_options(Vec::new(), format, &options());
    writer.write_all(data).unwrap();
    writer.finish().unwrap()
}

/// Decompresses `data` through a sniffing [`DecodingReader`] with `N`-byte
/// buffers.
pub fn decode<const N: usize>(data: &[u8]) -> Vec<u8> {
    let mut reader: DecodingReader<_, N> =
        DecodingReader::with_options(Cursor::new(data), None, &CodecOptions::default());
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert!(reader.fault().is_none(), "unexpected fault: {:?}", reader.fault());
    out
}

/// Reader handing out at most `chunk` bytes per call.
pub struct Trickle<R> {
    pub inner: R,
    pub chunk: usize,
}

impl<R: Read> Read for Trickle<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.chunk);
        self.inner.read(&mut buf[..n])
    }
}

/// Writer accepting at most `chunk` bytes per call.
pub struct Narrow<W> {
    pub inner: W,
    pub chunk: usize,
}

impl<W: Write> Write for Narrow<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len().min(self.chunk);
        self.inner.write(&buf[..n])
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Writer that fails every call.
pub struct Broken;

impl Write for Broken {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }
}
