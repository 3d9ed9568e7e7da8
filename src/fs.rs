//! Named-file sessions.
//!
//! [`FileReader`] and [`FileWriter`] open a file by path and wire it behind a
//! decoding or encoding adapter. The format is chosen from the file
//! extension (see [`Format::from_path`]); file contents are never sniffed.
//!
//! # Example
//!
//! ```rust
//! use std::io::{BufRead, Write};
//! use zxio::{FileReader, FileWriter};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("notes.txt.gz");
//!
//! let mut out = FileWriter::create(&path);
//! writeln!(out, "first line").unwrap();
//! out.close().unwrap();
//!
//! let input = FileReader::open(&path);
//! let lines: Vec<String> = input.lines().map(|l| l.unwrap()).collect();
//! assert_eq!(lines, ["first line"]);
//! ```
//!
//! # Failure handling
//!
//! `open` and `create` never fail outright. A session that could not be set
//! up reports `is_open() == false`, is [`Failed`](StreamState::Failed), and
//! keeps the cause in `error()`; reads produce no bytes and writes accept
//! none. Use [`FileReader::try_open`] or [`FileWriter::try_create`] to get
//! the error as a `Result` instead.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

use crate::{DecodingReader, EncodingWriter, Error, Format, Result, StreamState};

fn open_error(path: &Path, source: io::Error) -> Error {
    Error::Open {
        path: path.to_path_buf(),
        source,
    }
}

/// A file opened for reading, decompressed according to its extension.
pub struct FileReader {
    path: PathBuf,
    format: Format,
    reader: Option<DecodingReader<File>>,
    state: StreamState,
    error: Option<Error>,
}

impl std::fmt::Debug for FileReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileReader")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl FileReader {
    /// Opens `path` for reading.
    ///
    /// Never fails; check [`is_open`](Self::is_open) or
    /// [`error`](Self::error).
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::try_open(path).unwrap_or_else(|err| {
            log::warn!("{}", err);
            Self {
                path: path.to_path_buf(),
                format: Format::from_path(path),
                reader: None,
                state: StreamState::Failed,
                error: Some(err),
            }
        })
    }

    /// Opens `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the file cannot be opened, or the codec
    /// start-up error.
    pub fn try_open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| open_error(path, source))?;
        let format = Format::from_path(path);

        let reader = DecodingReader::with_format(file, format);
        if let Some(err) = reader.error() {
            return Err(err.replicate());
        }

        log::debug!("opened {} for reading as {}", path.display(), format);
        Ok(Self {
            path: path.to_path_buf(),
            format,
            reader: Some(reader),
            state: StreamState::Good,
            error: None,
        })
    }

    /// Returns the path this session was opened with.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the format selected from the file extension.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns `true` while the file is open and readable.
    pub fn is_open(&self) -> bool {
        self.reader.as_ref().is_some_and(DecodingReader::is_open)
    }

    /// Returns the session's condition.
    pub fn state(&self) -> StreamState {
        self.reader.as_ref().map_or(self.state, DecodingReader::state)
    }

    /// Returns the failure that put the session in the failed state.
    pub fn error(&self) -> Option<&Error> {
        match &self.reader {
            Some(reader) => reader.error(),
            None => self.error.as_ref(),
        }
    }

    /// Returns the decode error or truncation that ended the stream early.
    pub fn fault(&self) -> Option<&Error> {
        self.reader.as_ref().and_then(DecodingReader::fault)
    }

    /// Releases the codec session, then the file.
    ///
    /// Closing again leaves the session unchanged.
    pub fn close(&mut self) {
        if let Some(mut reader) = self.reader.take() {
            reader.close();
            self.state = reader.state();
            self.error = reader.error().map(Error::replicate);
            drop(reader.into_inner());
            log::debug!("closed {}", self.path.display());
        }
    }

    fn unavailable(&self) -> io::Result<()> {
        match self.state {
            StreamState::Closed => Err(Error::Closed.into()),
            _ => Ok(()),
        }
    }
}

impl Read for FileReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.reader {
            Some(reader) => reader.read(buf),
            None => self.unavailable().map(|()| 0),
        }
    }
}

impl BufRead for FileReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.reader.is_none() {
            self.unavailable()?;
        }
        match &mut self.reader {
            Some(reader) => reader.fill_buf(),
            None => Ok(&[]),
        }
    }

    fn consume(&mut self, amt: usize) {
        if let Some(reader) = &mut self.reader {
            reader.consume(amt);
        }
    }
}

/// A file opened for writing, compressed according to its extension.
///
/// Dropping the session finalizes the compressed stream before the file is
/// closed.
pub struct FileWriter {
    path: PathBuf,
    format: Format,
    writer: Option<EncodingWriter<File>>,
    state: StreamState,
    error: Option<Error>,
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl FileWriter {
    /// Creates (or truncates) `path` for writing.
    ///
    /// Never fails; check [`is_open`](Self::is_open) or
    /// [`error`](Self::error).
    pub fn create(path: impl AsRef<Path>) -> Self {
        Self::open_with(path, File::options().write(true).create(true).truncate(true))
    }

    /// Opens `path` for writing with explicit open options, for example to
    /// append a new compressed member to an existing file.
    pub fn open_with(path: impl AsRef<Path>, options: &OpenOptions) -> Self {
        let path = path.as_ref();
        Self::try_open_with(path, options).unwrap_or_else(|err| {
            log::warn!("{}", err);
            Self {
                path: path.to_path_buf(),
                format: Format::from_path(path),
                writer: None,
                state: StreamState::Failed,
                error: Some(err),
            }
        })
    }

    /// Creates (or truncates) `path` for writing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the file cannot be created, or the codec
    /// start-up error.
    pub fn try_create(path: impl AsRef<Path>) -> Result<Self> {
        Self::try_open_with(path, File::options().write(true).create(true).truncate(true))
    }

    /// Opens `path` for writing with explicit open options.
    ///
    /// # Errors
    ///
    /// Same as [`try_create`](Self::try_create).
    pub fn try_open_with(path: impl AsRef<Path>, options: &OpenOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = options
            .open(path)
            .map_err(|source| open_error(path, source))?;
        let format = Format::from_path(path);

        let writer = EncodingWriter::new(file, format);
        if let Some(err) = writer.error() {
            return Err(err.replicate());
        }

        log::debug!("opened {} for writing as {}", path.display(), format);
        Ok(Self {
            path: path.to_path_buf(),
            format,
            writer: Some(writer),
            state: StreamState::Good,
            error: None,
        })
    }

    /// Returns the path this session was opened with.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the format selected from the file extension.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns `true` while the file is open and writable.
    pub fn is_open(&self) -> bool {
        self.writer.as_ref().is_some_and(EncodingWriter::is_open)
    }

    /// Returns the session's condition.
    pub fn state(&self) -> StreamState {
        self.writer.as_ref().map_or(self.state, EncodingWriter::state)
    }

    /// Returns the failure that put the session in the failed state.
    pub fn error(&self) -> Option<&Error> {
        match &self.writer {
            Some(writer) => writer.error(),
            None => self.error.as_ref(),
        }
    }

    /// Finalizes the compressed stream, then flushes and closes the file.
    ///
    /// Both steps run even if the first fails; the first failure is
    /// returned. Closing again is a no-op returning `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns the codec or file error; the session is then
    /// [`Failed`](StreamState::Failed).
    pub fn close(&mut self) -> Result<()> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };

        let finalized = writer.close();
        let state = writer.state();
        let result = match writer.finish() {
            Ok(mut file) => finalized.and(file.flush().map_err(Error::from)),
            Err(err) => finalized.and(Err(err)),
        };

        match &result {
            Ok(()) => {
                self.state = state;
                log::debug!("closed {}", self.path.display());
            }
            Err(err) => {
                log::warn!("closing {} failed: {}", self.path.display(), err);
                self.state = StreamState::Failed;
                self.error = Some(err.replicate());
            }
        }
        result
    }

    fn unavailable(&self) -> io::Result<usize> {
        match self.state {
            StreamState::Closed => Err(Error::Closed.into()),
            _ => Ok(0),
        }
    }
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.writer {
            Some(writer) => writer.write(buf),
            None => self.unavailable(),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.writer {
            Some(writer) => writer.flush(),
            None => self.unavailable().map(|_| ()),
        }
    }
}
