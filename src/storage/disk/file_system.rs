//! Filesystem seam for the file handle cache.
//!
//! Paths are opaque strings handed straight to the implementation, so a
//! distributed filesystem client can stand in for the local one.

use bytes::Bytes;
use dashmap::DashMap;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek};
use std::sync::atomic::{AtomicUsize, Ordering};

/// An open, seekable input stream.
pub trait RandomAccessFile: Read + Seek + Send {}

impl<T: Read + Seek + Send> RandomAccessFile for T {}

pub trait FileSystem: Send + Sync {
    fn open(&self, path: &str) -> io::Result<Box<dyn RandomAccessFile>>;
}

/// Files on the local disk, opened read-only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn open(&self, path: &str) -> io::Result<Box<dyn RandomAccessFile>> {
        let file = File::open(path)?;
        Ok(Box::new(file))
    }
}

/// In-memory files keyed by path. Counts every `open` call.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: DashMap<String, Bytes>,
    opens: AtomicUsize,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<String>, contents: impl Into<Bytes>) {
        self.files.insert(path.into(), contents.into());
    }

    pub fn remove(&self, path: &str) {
        self.files.remove(path);
    }

    /// Number of successful and failed `open` calls so far
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl FileSystem for MemoryFileSystem {
    fn open(&self, path: &str) -> io::Result<Box<dyn RandomAccessFile>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let contents = self
            .files
            .get(path)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no such file: {}", path)))?;
        Ok(Box::new(Cursor::new(contents)))
    }
}
