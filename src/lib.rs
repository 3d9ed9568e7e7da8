//! # zxio
//!
//! Buffered readers and writers that transparently handle gzip and xz.
//!
//! A [`DecodingReader`] sits between a consumer and any byte source. It looks
//! at the first bytes of the source, recognizes gzip (`1F 8B`) or xz
//! (`FD 37 7A 58 5A`) and hands out the decompressed bytes; anything else is
//! passed through unchanged. An [`EncodingWriter`] does the reverse for a
//! format chosen by the caller. [`FileReader`] and [`FileWriter`] open files
//! by name and pick the format from the extension.
//!
//! ## Quick Start
//!
//! ### Reading
//!
//! ```rust,no_run
//! use std::io::BufRead;
//! use zxio::FileReader;
//!
//! // "log.txt.gz", "log.txt.xz" and "log.txt" all read the same way.
//! let reader = FileReader::open("log.txt.gz");
//! for line in reader.lines() {
//!     println!("{}", line?);
//! }
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! ### Writing
//!
//! ```rust
//! use std::io::Write;
//! use zxio::{EncodingWriter, Format, Result};
//!
//! fn compress(text: &str) -> Result<Vec<u8>> {
//!     let mut writer = EncodingWriter::new(Vec::new(), Format::Gzip);
//!     writer.write_all(text.as_bytes())?;
//!     writer.finish()
//! }
//! # assert!(!compress("hello").unwrap().is_empty());
//! ```
//!
//! ### Streams of unknown origin
//!
//! ```rust
//! use std::io::{Cursor, Read};
//! use zxio::{DecodingReader, Format};
//!
//! let gz = [
//!     0x1f, 0x8b, 0x08, 0x08, 0x61, 0xb2, 0xf0, 0x62, 0x00, 0x03, 0x74, 0x65, 0x73, 0x74,
//!     0x2e, 0x74, 0x78, 0x74, 0x00, 0xf3, 0x48, 0xcd, 0xc9, 0xc9, 0xd7, 0x51, 0x28, 0xcf,
//!     0x2f, 0xca, 0x49, 0x51, 0xe4, 0x02, 0x00, 0x18, 0xa7, 0x55, 0x7b, 0x0e, 0x00, 0x00,
//!     0x00,
//! ];
//! let mut reader = DecodingReader::new(Cursor::new(&gz[..]));
//! assert_eq!(reader.format(), Format::Gzip);
//!
//! let mut text = String::new();
//! reader.read_to_string(&mut text).unwrap();
//! assert_eq!(text, "Hello, world!\n");
//! ```
//!
//! ## Buffers
//!
//! Adapters keep their buffers inline; the size is the const parameter `N`
//! (default [`DEFAULT_BUFFER_SIZE`]). Moving an adapter, boxing it or
//! swapping two of them mid-stream keeps every buffered byte.
//!
//! ## Errors
//!
//! Fallible operations return [`Result<T>`]. Adapters also carry a
//! [`StreamState`]; see the [`error`] module for how end of data, decode
//! faults and hard failures are told apart.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `xz` | Yes | xz support through liblzma |
//!
//! gzip is always available. Without `xz`, `.xz` files are treated as plain
//! and sniffing never reports xz.
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade: format
//! detection and session life cycle at `debug`, decode faults and failed
//! finalization at `warn`. No logger is installed by the library.
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

/// Default capacity, in bytes, of each adapter buffer.
pub const DEFAULT_BUFFER_SIZE: usize = 256;

mod buffer;

pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod fs;
pub mod read;
pub mod write;

pub use config::CodecOptions;
pub use error::{Error, Result, StreamState};
pub use format::Format;
pub use fs::{FileReader, FileWriter};
pub use read::DecodingReader;
pub use write::EncodingWriter;
