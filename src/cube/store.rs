//! Process-wide cube store.

use super::cache::{ReadResult, ReaderCache};
use super::reader::CubeOpener;
use crate::config::CacheConfig;
use crate::error::Result;
use crate::render::{ColorPalette, RenderCache, RenderKey, SliceImage, ValueRange};
use std::sync::Arc;

/// Reader and renderer caches shared by every session.
///
/// Both caches are keyed by file identity rather than by session, so one
/// store can serve any number of selection states.
#[derive(Debug)]
pub struct CubeStore {
    reader: ReaderCache,
    renderer: RenderCache,
}

impl CubeStore {
    /// Create a store reading NetCDF files from disk.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            reader: ReaderCache::new(config.capacity),
            renderer: RenderCache::new(config.capacity, config.palette),
        }
    }

    /// Create a store backed by a custom opener.
    pub fn with_opener(config: &CacheConfig, opener: Box<dyn CubeOpener>) -> Self {
        Self {
            reader: ReaderCache::with_opener(config.capacity, opener),
            renderer: RenderCache::new(config.capacity, config.palette),
        }
    }

    /// The reader cache.
    pub fn reader(&mut self) -> &mut ReaderCache {
        &mut self.reader
    }

    /// Read a cube through the cache.
    pub fn read(&mut self, file_id: &str) -> ReadResult {
        self.reader.read(file_id)
    }

    /// Render one layer through the cache.
    pub fn render(
        &mut self,
        file_id: &str,
        band: &str,
        time_index: usize,
        value_range: ValueRange,
    ) -> Result<Arc<SliceImage>> {
        let key = RenderKey {
            file_id: file_id.to_string(),
            band: band.to_string(),
            time_index,
            value_range,
        };
        self.renderer.render(&mut self.reader, key)
    }

    /// Forget everything cached for one file.
    pub fn invalidate(&mut self, file_id: &str) {
        self.reader.invalidate(file_id);
        self.renderer.invalidate_file(file_id);
        tracing::info!("Invalidated cached data for {}", file_id);
    }

    /// Palette used by the renderer.
    pub fn palette(&self) -> ColorPalette {
        self.renderer.palette()
    }
}
