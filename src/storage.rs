//! Storage layer for scan-time reads.
//!
//! This module supplies raw encoded bytes to filter evaluation:
//!
//! - **FileSystem**: Seam that opens seekable streams for opaque path strings
//! - **CachedFileReader**: Keeps one open stream per path for the life of a scan
//!   and decodes big-endian fixed-width fields at arbitrary offsets
//!
//! Block encoding and row materialization live above this layer.

pub mod disk;
pub mod error;

pub use disk::{CachedFileReader, FileReaderConfig, FileSystem, LocalFileSystem, MemoryFileSystem};
pub use error::{StorageError, StorageResult};
