//! Thumbnail decoding, caching, and terminal graphics protocol selection.
//!
//! Supports multiple terminal graphics protocols:
//! - Kitty graphics protocol
//! - Sixel
//! - iTerm2
//! - Unicode half-blocks (fallback)

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::DynamicImage;
use ratatui_image::picker::Picker;
#[cfg(unix)]
use ratatui_image::picker::cap_parser::QueryStdioOptions;

const PICKER_QUERY_TIMEOUT_MS: u64 = 250;

/// Decoded thumbnails retained between renders. Oldest entries are evicted
/// once the cache exceeds its bound.
const THUMB_CACHE_SIZE: usize = 120;

/// Create a picker for terminal thumbnail rendering.
///
/// The picker detects terminal capabilities and chooses the best protocol.
pub fn create_picker(force_half_cell: bool) -> Option<Picker> {
    if force_half_cell {
        crate::perf::log_event(
            "image.create_picker",
            "force_half_cell=true protocol=Halfblocks",
        );
        return Some(Picker::halfblocks());
    }

    // On Windows, skip the stdio capability query; it can leave orphaned
    // reader threads on the console input buffer, locking up some terminals.
    // Fall back to half-block rendering.
    #[cfg(not(unix))]
    {
        crate::perf::log_event("image.create_picker", "windows fallback protocol=Halfblocks");
        return Some(Picker::halfblocks());
    }

    #[cfg(unix)]
    {
        let picker = Picker::from_query_stdio_with_options(query_options()).ok()?;
        crate::perf::log_event(
            "image.create_picker",
            format!(
                "term_program={} term={} protocol={:?}",
                std::env::var("TERM_PROGRAM").unwrap_or_else(|_| "<unset>".to_string()),
                std::env::var("TERM").unwrap_or_else(|_| "<unset>".to_string()),
                picker.protocol_type()
            ),
        );
        Some(picker)
    }
}

#[cfg(unix)]
fn query_options() -> QueryStdioOptions {
    let mut options = QueryStdioOptions::default();
    options.timeout = Duration::from_millis(PICKER_QUERY_TIMEOUT_MS);
    options
}

/// Decode fetched thumbnail bytes into an image.
pub fn decode_thumbnail(bytes: &[u8]) -> Option<DynamicImage> {
    image::load_from_memory(bytes).ok()
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, DynamicImage>,
    order: VecDeque<String>,
}

/// Bounded cache of decoded thumbnails, keyed by URL.
#[derive(Debug, Clone)]
pub struct ThumbCache {
    inner: Arc<Mutex<CacheInner>>,
    max_size: usize,
}

impl Default for ThumbCache {
    fn default() -> Self {
        Self::new(THUMB_CACHE_SIZE)
    }
}

impl ThumbCache {
    /// Create a cache with the given maximum number of entries.
    pub fn new(max_size: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner::default())),
            max_size,
        }
    }

    /// Get a decoded thumbnail from the cache.
    pub fn get(&self, url: &str) -> Option<DynamicImage> {
        let guard = self.inner.lock().ok()?;
        guard.entries.get(url).cloned()
    }

    /// Insert a decoded thumbnail, evicting the oldest past the bound.
    pub fn insert(&self, url: String, image: DynamicImage) {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if guard.entries.contains_key(&url) {
            guard.entries.insert(url, image);
            return;
        }

        guard.order.push_back(url.clone());
        guard.entries.insert(url, image);

        while guard.entries.len() > self.max_size {
            if let Some(oldest) = guard.order.pop_front() {
                guard.entries.remove(&oldest);
            } else {
                break;
            }
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        let guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.entries.contains_key(url)
    }

    /// Drop every cached thumbnail.
    pub fn clear(&self) {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.entries.clear();
        guard.order.clear();
    }

    pub fn len(&self) -> usize {
        let guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
