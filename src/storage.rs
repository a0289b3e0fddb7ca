//! Persisting rendered documents.
//!
//! A [`DocumentSink`] receives the rendered text together with the target
//! path and charset. [`FileSink`] writes through a temporary file in the
//! target directory and renames it into place, so a failed write never
//! leaves a truncated document behind.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Storage collaborator that persists rendered text.
pub trait DocumentSink {
    /// Encode `content` with `encoding` and store it at `path`.
    fn write(&mut self, path: &Path, content: &str, encoding: &'static Encoding) -> Result<()>;
}

/// Encode text, failing on characters the charset cannot represent.
///
/// UTF-16 is produced directly; `encoding_rs` only decodes it.
pub fn encode(content: &str, encoding: &'static Encoding, path: &Path) -> Result<Vec<u8>> {
    if encoding == UTF_16LE {
        return Ok(content.encode_utf16().flat_map(u16::to_le_bytes).collect());
    }
    if encoding == UTF_16BE {
        return Ok(content.encode_utf16().flat_map(u16::to_be_bytes).collect());
    }

    let encoding_error = || Error::Encoding {
        encoding: encoding.name(),
        path: path.to_path_buf(),
    };
    // The replacement encoding has no encoder of its own.
    if encoding.output_encoding() != encoding {
        return Err(encoding_error());
    }

    let (bytes, _, unmappable) = encoding.encode(content);
    if unmappable {
        return Err(encoding_error());
    }
    Ok(bytes.into_owned())
}

/// Writes documents to the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSink;

impl FileSink {
    fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let mut file = NamedTempFile::new_in(parent)?;
        file.write_all(bytes)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl DocumentSink for FileSink {
    fn write(&mut self, path: &Path, content: &str, encoding: &'static Encoding) -> Result<()> {
        let bytes = encode(content, encoding, path)?;
        Self::write_atomic(path, &bytes).map_err(|source| Error::StorageWrite {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(
            path = %path.display(),
            bytes = bytes.len(),
            encoding = encoding.name(),
            "document written"
        );
        Ok(())
    }
}

/// Keeps written documents in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written to `path`, if any.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&[u8]> {
        self.files.get(path.as_ref()).map(Vec::as_slice)
    }

    /// Paths written so far, in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }
}

impl DocumentSink for MemorySink {
    fn write(&mut self, path: &Path, content: &str, encoding: &'static Encoding) -> Result<()> {
        let bytes = encode(content, encoding, path)?;
        self.files.insert(path.to_path_buf(), bytes);
        Ok(())
    }
}
