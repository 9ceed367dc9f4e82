//! Memoized layer rendering.

use super::{render_plane, ColorPalette, SliceImage, ValueRange};
use crate::cube::ReaderCache;
use crate::error::Result;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Cache key for one rendered layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderKey {
    /// Source file identifier.
    pub file_id: String,
    /// Band name.
    pub band: String,
    /// Time index.
    pub time_index: usize,
    /// Display clipping range.
    pub value_range: ValueRange,
}

/// LRU cache of rendered layers.
///
/// The palette is fixed for the lifetime of the cache, so it is not part of
/// the key.
#[derive(Debug)]
pub struct RenderCache {
    entries: LruCache<RenderKey, Arc<SliceImage>>,
    palette: ColorPalette,
}

impl RenderCache {
    /// Create a render cache.
    pub fn new(capacity: usize, palette: ColorPalette) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            palette,
        }
    }

    /// Palette used for every rendered layer.
    pub fn palette(&self) -> ColorPalette {
        self.palette
    }

    /// Render a layer, reusing an earlier result for an equal key.
    ///
    /// The band and time index are checked against the cube; a failed read
    /// comes back as that read's error.
    pub fn render(&mut self, reader: &mut ReaderCache, key: RenderKey) -> Result<Arc<SliceImage>> {
        if let Some(image) = self.entries.get(&key) {
            return Ok(image.clone());
        }

        let cube = reader.read(&key.file_id)?;
        let plane = cube.layer(&key.band, key.time_index)?;
        let image = Arc::new(render_plane(plane, key.value_range, self.palette));

        tracing::debug!(
            "Rendered {} {}[{}] with range {}",
            key.file_id,
            key.band,
            key.time_index,
            key.value_range
        );
        self.entries.put(key, image.clone());
        Ok(image)
    }

    /// Drop every rendered layer of one file.
    pub fn invalidate_file(&mut self, file_id: &str) {
        let stale: Vec<RenderKey> = self
            .entries
            .iter()
            .filter(|(key, _)| key.file_id == file_id)
            .map(|(key, _)| key.clone())
            .collect();
        for key in stale {
            self.entries.pop(&key);
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no images are cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
