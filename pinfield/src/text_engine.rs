//! Text Engine - cosmic-text measurement with caching.
//!
//! Shapes glyph strings with cosmic-text and keeps an LRU cache of the
//! resulting bounding boxes, so repainting the same digits does not reshape.

use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use lru::LruCache;

use crate::primitives::Size;
use crate::text_measure::{TextMeasure, TextStyle};

/// Global font system (expensive to create, shared across engine instances).
static FONT_SYSTEM: OnceLock<Mutex<FontSystem>> = OnceLock::new();

fn get_font_system() -> &'static Mutex<FontSystem> {
    FONT_SYSTEM.get_or_init(|| Mutex::new(FontSystem::new()))
}

/// Cache key for measured text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text_hash: u64,
    font_size_bits: u32,
}

impl CacheKey {
    fn new(text: &str, style: &TextStyle) -> Self {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        text.hash(&mut hasher);
        Self {
            text_hash: hasher.finish(),
            font_size_bits: style.font_size.to_bits(),
        }
    }
}

/// Font-backed text measurement.
pub struct TextEngine {
    cache: RefCell<LruCache<CacheKey, Size>>,
}

impl TextEngine {
    /// Create a new text engine with default cache size.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a new text engine with specified cache capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RefCell::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached measurements.
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Shape text without caching (always recomputes).
    pub fn measure_uncached(&self, text: &str, style: &TextStyle) -> Size {
        let line_height = style.line_height();
        let mut font_system = get_font_system()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let metrics = Metrics::new(style.font_size, line_height);
        let mut buffer = Buffer::new(&mut font_system, metrics);
        buffer.set_size(&mut font_system, Some(f32::MAX), Some(f32::MAX));
        buffer.set_text(
            &mut font_system,
            text,
            Attrs::new().family(Family::SansSerif),
            Shaping::Advanced,
        );
        buffer.shape_until_scroll(&mut font_system, false);

        let mut width: f32 = 0.0;
        let mut lines = 0usize;
        for run in buffer.layout_runs() {
            width = width.max(run.line_w);
            lines += 1;
        }

        // No font matched any glyph: fall back to a rough per-char estimate.
        if width == 0.0 && !text.is_empty() {
            tracing::warn!(text, "text engine produced no glyphs, estimating width");
            width = text.chars().count() as f32 * style.font_size * 0.6;
        }

        Size::new(width, lines.max(1) as f32 * line_height)
    }
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEngine")
            .field("cached", &self.cached_len())
            .finish()
    }
}

impl TextMeasure for TextEngine {
    fn measure(&self, text: &str, style: &TextStyle) -> Size {
        let key = CacheKey::new(text, style);
        if let Some(size) = self.cache.borrow_mut().get(&key) {
            return *size;
        }
        let size = self.measure_uncached(text, style);
        self.cache.borrow_mut().put(key, size);
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_distinguishes_font_size() {
        let small = CacheKey::new("1", &TextStyle::new(12.0, Default::default()));
        let large = CacheKey::new("1", &TextStyle::new(24.0, Default::default()));
        assert_ne!(small, large);
        assert_eq!(small, CacheKey::new("1", &TextStyle::new(12.0, Default::default())));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let engine = TextEngine::with_capacity(0);
        assert_eq!(engine.cached_len(), 0);
    }
}
