pub mod file_reader;
pub mod file_system;

pub use file_reader::{CachedFileReader, FileReaderConfig};
pub use file_system::{FileSystem, LocalFileSystem, MemoryFileSystem, RandomAccessFile};
