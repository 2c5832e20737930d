//! Byte Source Provider Implementation using `std::fs`

use bridge_traits::{
    error::{BridgeError, Result},
    storage::{ByteSource, ByteSourceProvider},
};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Asset filesystem rooted at a directory.
///
/// Resource identifiers are relative paths below the root. Backslash
/// separators are accepted and normalised, so identifiers written for
/// Windows asset tables resolve on every platform. Identifiers that are
/// absolute or climb out of the root are rejected.
pub struct LocalFileSystem {
    root: PathBuf,
}

impl LocalFileSystem {
    /// Create a file system rooted at the current working directory.
    pub fn new() -> Self {
        let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { root }
    }

    /// Create a file system rooted at `root`.
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Root directory identifiers are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an identifier to a path below the root.
    fn resolve(&self, identifier: &str) -> Result<PathBuf> {
        let normalised = identifier.replace('\\', "/");
        let relative = Path::new(&normalised);

        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(BridgeError::OperationFailed(format!(
                "identifier '{}' escapes the asset root",
                identifier
            )));
        }

        Ok(self.root.join(relative))
    }

    /// Convert std::io::Error to BridgeError
    fn map_io_error(identifier: &str, e: std::io::Error) -> BridgeError {
        if e.kind() == std::io::ErrorKind::NotFound {
            BridgeError::NotFound(identifier.to_string())
        } else {
            BridgeError::Io(e)
        }
    }
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSourceProvider for LocalFileSystem {
    fn open(&self, identifier: &str) -> Result<Box<dyn ByteSource>> {
        if identifier.is_empty() {
            return Err(BridgeError::NotFound(String::new()));
        }

        let path = self.resolve(identifier)?;
        let file = File::open(&path).map_err(|e| Self::map_io_error(identifier, e))?;
        let metadata = file
            .metadata()
            .map_err(|e| Self::map_io_error(identifier, e))?;

        if metadata.is_dir() {
            return Err(BridgeError::NotFound(identifier.to_string()));
        }

        debug!(path = ?path, size = metadata.len(), "Opened file for reading");
        Ok(Box::new(FileByteSource {
            reader: Some(BufReader::new(file)),
            len: metadata.len(),
            path,
        }))
    }

    fn exists(&self, identifier: &str) -> bool {
        if identifier.is_empty() {
            return false;
        }

        self.resolve(identifier)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }
}

/// Buffered file handle handed out by [`LocalFileSystem`].
pub struct FileByteSource {
    reader: Option<BufReader<File>>,
    len: u64,
    path: PathBuf,
}

impl ByteSource for FileByteSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.reader.as_mut() {
            Some(reader) => Ok(reader.read(buf)?),
            None => Ok(0),
        }
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        match self.reader.as_mut() {
            Some(reader) => Ok(reader.seek(pos)?),
            None => Err(BridgeError::OperationFailed(format!(
                "seek on closed file {:?}",
                self.path
            ))),
        }
    }

    fn len(&self) -> Option<u64> {
        Some(self.len)
    }

    fn close(&mut self) {
        if self.reader.take().is_some() {
            debug!(path = ?self.path, "Closed file");
        }
    }
}
