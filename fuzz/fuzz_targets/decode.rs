//! Fuzz target for DecodingReader with arbitrary byte input.
//!
//! Exercises format sniffing and both decoders with malformed or adversarial
//! streams. Corrupt input must end the stream with a fault, never a panic.
//!
//! Run with: cargo +nightly fuzz run decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::{Cursor, Read};

use zxio::{CodecOptions, DecodingReader};

fuzz_target!(|data: &[u8]| {
    // Cap decoder memory so hostile xz headers cannot exhaust the host.
    let options = CodecOptions::default().xz_memlimit(64 << 20);
    let mut reader: DecodingReader<_, 64> =
        DecodingReader::with_options(Cursor::new(data), None, &options);

    let mut out = Vec::new();
    let _ = reader.by_ref().take(16 << 20).read_to_end(&mut out);
    let _ = reader.fault();
    reader.close();
});
