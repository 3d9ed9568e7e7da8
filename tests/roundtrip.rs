//! Round-trip integration tests for zxio.
//!
//! This file focuses on:
//! - Reference vectors produced by gzip(1) and xz(1)
//! - Write-then-read round trips over every supported format
//! - Buffer boundary sizes (N-1, N, N+1, k*N)
//! - Upstreams that deliver or accept a few bytes at a time

mod common;

use std::io::{BufRead, Cursor, Read, Write};

use common::{HELLO, HELLO_GZ, HELLO_XZ, Narrow, Trickle, data, decode, encode};
use zxio::{CodecOptions, DecodingReader, EncodingWriter, Format, StreamState};

fn read_lines<R: BufRead>(reader: R) -> Vec<String> {
    reader.lines().map(|l| l.unwrap()).collect()
}

#[test]
fn test_gzip_reference_vector_line_then_eof() {
    let mut reader = DecodingReader::new(Cursor::new(&HELLO_GZ[..]));
    assert_eq!(reader.format(), Format::Gzip);

    let mut line = String::new();
    assert!(reader.read_line(&mut line).unwrap() > 0);
    assert_eq!(line, HELLO);

    line.clear();
    assert_eq!(reader.read_line(&mut line).unwrap(), 0);
    assert_eq!(reader.state(), StreamState::Eof);
}

#[cfg(feature = "xz")]
#[test]
fn test_xz_reference_vector_line_then_eof() {
    let mut reader = DecodingReader::new(Cursor::new(&HELLO_XZ[..]));
    assert_eq!(reader.format(), Format::Xz);
    assert_eq!(read_lines(&mut reader), ["Hello, world!"]);
    assert!(reader.fault().is_none());
}

#[cfg(not(feature = "xz"))]
#[test]
fn test_xz_reference_vector_without_feature_is_plain() {
    let mut reader = DecodingReader::new(Cursor::new(&HELLO_XZ[..]));
    assert_eq!(reader.format(), Format::Plain);
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw).unwrap();
    assert_eq!(raw, HELLO_XZ);
}

#[test]
fn test_reference_vectors_with_tiny_buffers() {
    let mut vectors: Vec<&[u8]> = vec![&HELLO_GZ[..]];
    if cfg!(feature = "xz") {
        vectors.push(&HELLO_XZ[..]);
    }
    for vector in vectors {
        assert_eq!(decode::<1>(vector), HELLO.as_bytes());
        assert_eq!(decode::<2>(vector), HELLO.as_bytes());
        assert_eq!(decode::<7>(vector), HELLO.as_bytes());
    }
}

#[test]
fn test_thousand_lines_through_gzip() {
    let mut compressed = Vec::new();
    {
        let mut writer = EncodingWriter::new(&mut compressed, Format::Gzip);
        for i in 0..1000 {
            writeln!(writer, "Hello, world! - this is line {}", i).unwrap();
        }
        writer.close().unwrap();
    }

    let lines = read_lines(DecodingReader::new(Cursor::new(compressed)));
    assert_eq!(lines.len(), 1000);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(line, &format!("Hello, world! - this is line {}", i));
    }
}

#[test]
fn test_roundtrip_small_sizes() {
    for format in common::supported_formats() {
        for len in [0, 1, 2, 5, 100] {
            let payload = data::text(len);
            let compressed = encode::<256>(format, &payload);
            assert_eq!(decode::<256>(&compressed), payload, "{format} len {len}");
        }
    }
}

#[test]
fn test_roundtrip_buffer_boundaries() {
    const N: usize = 64;
    for format in common::supported_formats() {
        for len in [N - 1, N, N + 1, 2 * N, 7 * N, 7 * N + 3] {
            let payload = data::random(len);
            let compressed = encode::<N>(format, &payload);
            assert_eq!(decode::<N>(&compressed), payload, "{format} len {len}");
        }
    }
}

#[test]
fn test_roundtrip_large_incompressible() {
    let payload = data::random(200_000);
    for format in common::supported_formats() {
        let compressed = encode::<256>(format, &payload);
        assert_eq!(decode::<4096>(&compressed), payload, "{format}");
    }
}

#[test]
fn test_plain_roundtrip_is_identity() {
    let payload = data::text(1000);
    let written = encode::<32>(Format::Plain, &payload);
    assert_eq!(written, payload);
}

#[test]
fn test_trickling_upstream() {
    let payload = data::text(5000);
    for format in common::supported_formats() {
        let compressed = encode::<256>(format, &payload);
        for chunk in [1, 3, 255] {
            let upstream = Trickle {
                inner: Cursor::new(&compressed[..]),
                chunk,
            };
            let mut reader: DecodingReader<_, 16> =
                DecodingReader::with_options(upstream, None, &CodecOptions::default());
            assert_eq!(reader.format(), format);

            let mut out = Vec::new();
            reader.read_to_end(&mut out).unwrap();
            assert_eq!(out, payload, "{format} chunk {chunk}");
        }
    }
}

#[test]
fn test_narrow_downstream() {
    let payload = data::random(3000);
    for format in common::supported_formats() {
        let mut compressed = Vec::new();
        {
            let sink = Narrow {
                inner: &mut compressed,
                chunk: 3,
            };
            let mut writer: EncodingWriter<_, 32> =
                EncodingWriter::with_options(sink, format, &common::options());
            writer.write_all(&payload).unwrap();
            writer.close().unwrap();
        }
        assert_eq!(decode::<256>(&compressed), payload, "{format}");
    }
}

#[test]
fn test_gzip_compression_levels() {
    let payload = data::text(20_000);
    let compress = |level| {
        let mut w: EncodingWriter<_> =
            EncodingWriter::with_options(Vec::new(), Format::Gzip, &CodecOptions::with_level(level));
        w.write_all(&payload).unwrap();
        w.finish().unwrap()
    };

    // Level 0 stores, so it cannot be smaller than the payload.
    let stored = compress(0);
    let best = compress(9);
    assert!(stored.len() > payload.len());
    assert!(best.len() < payload.len() / 10);
    assert_eq!(decode::<256>(&stored), payload);
    assert_eq!(decode::<256>(&best), payload);
}

#[test]
fn test_flush_points_keep_stream_valid() {
    for format in common::supported_formats() {
        let mut writer: EncodingWriter<_> =
            EncodingWriter::with_options(Vec::new(), format, &common::options());
        for part in ["alpha ", "beta ", "gamma"] {
            writer.write_all(part.as_bytes()).unwrap();
            writer.flush().unwrap();
        }
        let compressed = writer.finish().unwrap();
        assert_eq!(decode::<256>(&compressed), b"alpha beta gamma", "{format}");
    }
}

#[test]
fn test_explicit_format_overrides_content() {
    // Declared plain: the gzip bytes come back untouched.
    let mut reader = DecodingReader::with_format(Cursor::new(&HELLO_GZ[..]), Format::Plain);
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw).unwrap();
    assert_eq!(raw, HELLO_GZ);

    // Declared gzip: decoded without sniffing.
    let mut reader = DecodingReader::with_format(Cursor::new(&HELLO_GZ[..]), Format::Gzip);
    let mut text = String::new();
    reader.read_to_string(&mut text).unwrap();
    assert_eq!(text, HELLO);
}
