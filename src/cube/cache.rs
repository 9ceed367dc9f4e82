//! Memoizing cube reader.
//!
//! Parsing a cube is by far the slowest step of any viewer interaction, so
//! every read goes through a bounded LRU map keyed by file identifier.
//! Failed reads are cached too: the stored [`ReadError`] is handed back on
//! every later lookup until the entry is invalidated or evicted.

use super::handle::CubeHandle;
use super::reader::{CubeOpener, NetcdfOpener};
use crate::error::ReadError;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Default number of cached reads.
pub const DEFAULT_CAPACITY: usize = 128;

/// Outcome of a cube read.
///
/// Successful handles are shared behind an `Arc`, so evicting an entry never
/// invalidates a handle a caller is still holding.
pub type ReadResult = std::result::Result<Arc<CubeHandle>, ReadError>;

/// Statistics for the reader cache.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to parse.
    pub misses: u64,
    /// Entries currently held.
    pub entries: usize,
}

impl CacheStats {
    /// Percentage of lookups answered from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// LRU cache of parsed cubes keyed by file identifier.
#[derive(Debug)]
pub struct ReaderCache {
    entries: LruCache<String, ReadResult>,
    opener: Box<dyn CubeOpener>,
    stats: CacheStats,
}

impl Default for ReaderCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ReaderCache {
    /// Create a cache reading NetCDF files from disk.
    pub fn new(capacity: usize) -> Self {
        Self::with_opener(capacity, Box::new(NetcdfOpener))
    }

    /// Create a cache backed by a custom opener.
    pub fn with_opener(capacity: usize, opener: Box<dyn CubeOpener>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            opener,
            stats: CacheStats::default(),
        }
    }

    /// Read a cube, parsing it only on the first request for `file_id`.
    pub fn read(&mut self, file_id: &str) -> ReadResult {
        if let Some(result) = self.entries.get(file_id) {
            self.stats.hits += 1;
            tracing::debug!("Reader cache hit for {}", file_id);
            return result.clone();
        }

        self.stats.misses += 1;
        tracing::debug!("Reader cache miss for {}", file_id);

        let result = match self.opener.open(file_id) {
            Ok(cube) => {
                tracing::info!("Opened {} ({} layers)", file_id, cube.len());
                Ok(Arc::new(cube))
            },
            Err(e) => {
                tracing::warn!("Failed to open {}: {}", file_id, e);
                Err(ReadError::new(e.to_string()))
            },
        };

        if let Some((evicted, _)) = self.entries.push(file_id.to_string(), result.clone()) {
            if evicted != file_id {
                tracing::debug!("Evicted {} from reader cache", evicted);
            }
        }
        self.stats.entries = self.entries.len();
        result
    }

    /// Formatted timestamp labels in cube order.
    pub fn times(&mut self, file_id: &str) -> std::result::Result<Vec<String>, ReadError> {
        self.read(file_id).map(|cube| cube.time_labels())
    }

    /// Band names in sorted order.
    pub fn bands(&mut self, file_id: &str) -> std::result::Result<Vec<String>, ReadError> {
        self.read(file_id).map(|cube| cube.band_names())
    }

    /// Text description of the cube.
    pub fn summary(&mut self, file_id: &str) -> std::result::Result<String, ReadError> {
        self.read(file_id).map(|cube| cube.summary())
    }

    /// Drop one entry so the next read parses again.
    pub fn invalidate(&mut self, file_id: &str) -> bool {
        let removed = self.entries.pop(file_id).is_some();
        self.stats.entries = self.entries.len();
        removed
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.entries = 0;
    }

    /// Whether `file_id` currently has a cached result.
    pub fn contains(&self, file_id: &str) -> bool {
        self.entries.contains(file_id)
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
