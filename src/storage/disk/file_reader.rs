//! Random-access reads over a cache of open file handles.
//!
//! Filter evaluation during a scan issues many small reads against the same
//! few files, and acquiring a stream on a remote filesystem is expensive. The
//! reader keeps one open handle per path for its whole lifetime and releases
//! them all in `finish` (or on drop). There is no expiry.
//!
//! Fixed-width fields are decoded big-endian.

use crate::storage::disk::file_system::{FileSystem, LocalFileSystem, RandomAccessFile};
use crate::storage::error::{StorageError, StorageResult};
use byteorder::{BigEndian, ReadBytesExt};
use bytes::Bytes;
use dashmap::DashMap;
use log::{debug, info, trace};
use parking_lot::Mutex;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default read-ahead buffer per cached handle (8KB).
pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

/// Default cap on a single byte-range read (64MB).
pub const DEFAULT_MAX_READ_LENGTH: usize = 64 * 1024 * 1024;

/// File reader configuration.
#[derive(Debug, Clone)]
pub struct FileReaderConfig {
    /// Read-ahead buffer size for each cached handle.
    pub buffer_capacity: usize,
    /// Largest byte range a single `read_bytes` call may request.
    pub max_read_length: usize,
}

impl Default for FileReaderConfig {
    fn default() -> Self {
        FileReaderConfig {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_read_length: DEFAULT_MAX_READ_LENGTH,
        }
    }
}

type Stream = BufReader<Box<dyn RandomAccessFile>>;

/// An open stream and the offset the next position-relative read starts at.
struct OpenStream {
    reader: Stream,
    position: u64,
}

impl OpenStream {
    /// Run one decode at `offset`, or at the current position when there is
    /// none. A failed read leaves the cursor where that read began.
    fn read<T, F>(&mut self, offset: Option<u64>, width: usize, read: F) -> io::Result<T>
    where
        F: FnOnce(&mut Stream) -> io::Result<T>,
    {
        let start = match offset {
            Some(offset) => {
                self.reader.seek(SeekFrom::Start(offset))?;
                offset
            }
            None => self.position,
        };
        match read(&mut self.reader) {
            Ok(value) => {
                self.position = start + width as u64;
                Ok(value)
            }
            Err(e) => {
                // the read error wins over a failed rewind
                let _ = self.reader.seek(SeekFrom::Start(start));
                self.position = start;
                Err(e)
            }
        }
    }
}

/// Cache slot for one path.
///
/// Slots go into the map empty. The first caller to lock one opens the
/// stream, so the map's shard locks are never held across an open.
#[derive(Default)]
struct CachedHandle {
    stream: Mutex<Option<OpenStream>>,
    reads: AtomicU64,
}

/// Path-keyed cache of open streams serving typed random-access reads.
///
/// All methods take `&self` and the reader may be shared across threads,
/// although one reader per scan task avoids contention entirely. A path is
/// opened at most once while its slot is cached. An open that hangs only
/// blocks callers reading that same path. A read holds its own reference
/// to the handle, so a concurrent `finish` evicts the entry without closing
/// the stream under that read.
pub struct CachedFileReader {
    file_system: Arc<dyn FileSystem>,
    handles: DashMap<String, Arc<CachedHandle>>,
    config: FileReaderConfig,
}

impl CachedFileReader {
    /// Reader over the local filesystem with default configuration
    pub fn new() -> Self {
        Self::with_config(FileReaderConfig::default())
    }

    pub fn with_config(config: FileReaderConfig) -> Self {
        Self::with_file_system(Arc::new(LocalFileSystem), config)
    }

    pub fn with_file_system(file_system: Arc<dyn FileSystem>, config: FileReaderConfig) -> Self {
        Self {
            file_system,
            handles: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &FileReaderConfig {
        &self.config
    }

    /// Read `length` bytes from the handle's current position.
    ///
    /// A freshly opened handle is positioned at the start of the file. Every
    /// read moves the position to the end of what it read, except a failed
    /// read, which leaves it where that read began.
    pub fn read_bytes(&self, path: &str, length: usize) -> StorageResult<Bytes> {
        self.check_length(path, length)?;
        trace!("read_bytes path={} length={}", path, length);
        self.read_from(path, None, length, |stream| read_exact_vec(stream, length))
            .map(Bytes::from)
    }

    /// Read `length` bytes starting at `offset`.
    pub fn read_bytes_at(&self, path: &str, offset: u64, length: usize) -> StorageResult<Bytes> {
        self.check_length(path, length)?;
        trace!("read_bytes path={} offset={} length={}", path, offset, length);
        self.read_from(path, Some(offset), length, |stream| {
            read_exact_vec(stream, length)
        })
        .map(Bytes::from)
    }

    /// Read a big-endian i32 from the handle's current position.
    ///
    /// On failure the position is left unchanged, so a retry or a narrower
    /// read starts from the same byte.
    pub fn read_int(&self, path: &str) -> StorageResult<i32> {
        self.read_from(path, None, 4, |stream| stream.read_i32::<BigEndian>())
    }

    pub fn read_int_at(&self, path: &str, offset: u64) -> StorageResult<i32> {
        self.read_from(path, Some(offset), 4, |stream| stream.read_i32::<BigEndian>())
    }

    /// Read a big-endian i64 from the handle's current position.
    ///
    /// On failure the position is left unchanged.
    pub fn read_long(&self, path: &str) -> StorageResult<i64> {
        self.read_from(path, None, 8, |stream| stream.read_i64::<BigEndian>())
    }

    pub fn read_long_at(&self, path: &str, offset: u64) -> StorageResult<i64> {
        self.read_from(path, Some(offset), 8, |stream| stream.read_i64::<BigEndian>())
    }

    /// Read big-endian IEEE-754 bits from the handle's current position.
    ///
    /// On failure the position is left unchanged.
    pub fn read_double(&self, path: &str) -> StorageResult<f64> {
        self.read_from(path, None, 8, |stream| stream.read_f64::<BigEndian>())
    }

    pub fn read_double_at(&self, path: &str, offset: u64) -> StorageResult<f64> {
        self.read_from(path, Some(offset), 8, |stream| stream.read_f64::<BigEndian>())
    }

    /// Close every cached handle and empty the cache.
    ///
    /// Idempotent. A later read on the same reader reopens its path.
    pub fn finish(&self) {
        let paths: Vec<String> = self.handles.iter().map(|e| e.key().clone()).collect();
        for path in &paths {
            if let Some((path, handle)) = self.handles.remove(path) {
                debug!(
                    "Closing file handle for {} after {} reads",
                    path,
                    handle.reads.load(Ordering::Relaxed)
                );
            }
        }
        if !paths.is_empty() {
            info!("Released {} cached file handles", paths.len());
        }
    }

    /// Number of cached paths, including any whose open is still in progress
    pub fn cached_handle_count(&self) -> usize {
        self.handles.len()
    }

    pub fn is_cached(&self, path: &str) -> bool {
        self.handles.contains_key(path)
    }

    fn check_length(&self, path: &str, length: usize) -> StorageResult<()> {
        if length > self.config.max_read_length {
            return Err(StorageError::ReadTooLarge {
                path: path.to_string(),
                requested: length,
                limit: self.config.max_read_length,
            });
        }
        Ok(())
    }

    /// Fetch the handle for `path` with its stream open.
    ///
    /// Callers racing on one path serialize on its slot and only the first
    /// opens. A failed open removes the slot, so nothing is left cached.
    fn handle(&self, path: &str) -> StorageResult<Arc<CachedHandle>> {
        loop {
            let handle = self.slot(path);
            {
                let mut stream = handle.stream.lock();
                if stream.is_none() {
                    // evicted by `finish` or a failed open while we waited
                    if !self.holds(path, &handle) {
                        continue;
                    }
                    debug!("Opening file handle for {}", path);
                    match self.file_system.open(path) {
                        Ok(file) => {
                            *stream = Some(OpenStream {
                                reader: BufReader::with_capacity(self.config.buffer_capacity, file),
                                position: 0,
                            });
                        }
                        Err(e) => {
                            self.handles
                                .remove_if(path, |_, current| Arc::ptr_eq(current, &handle));
                            return Err(StorageError::io(path, e));
                        }
                    }
                }
            }
            return Ok(handle);
        }
    }

    /// The cached slot for `path`, inserting an empty one if there is none
    fn slot(&self, path: &str) -> Arc<CachedHandle> {
        if let Some(handle) = self.handles.get(path) {
            return Arc::clone(handle.value());
        }
        Arc::clone(self.handles.entry(path.to_string()).or_default().value())
    }

    fn holds(&self, path: &str, handle: &Arc<CachedHandle>) -> bool {
        self.handles
            .get(path)
            .map_or(false, |current| Arc::ptr_eq(current.value(), handle))
    }

    fn read_from<T, F>(&self, path: &str, offset: Option<u64>, width: usize, read: F) -> StorageResult<T>
    where
        F: FnOnce(&mut Stream) -> io::Result<T>,
    {
        if let Some(offset) = offset {
            trace!("read path={} offset={}", path, offset);
        }
        let handle = self.handle(path)?;
        handle.reads.fetch_add(1, Ordering::Relaxed);
        let mut guard = handle.stream.lock();
        let stream = guard.as_mut().ok_or_else(|| {
            StorageError::io(
                path,
                io::Error::new(io::ErrorKind::NotConnected, "file handle is not open"),
            )
        })?;
        stream
            .read(offset, width, read)
            .map_err(|e| StorageError::io(path, e))
    }
}

impl Default for CachedFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CachedFileReader {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Short reads surface as `UnexpectedEof`, never as a partial buffer.
fn read_exact_vec<R: Read>(reader: &mut R, length: usize) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; length];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}
