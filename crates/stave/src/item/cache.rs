//! Lazily recomputed bounding-box cache.

use stave_render::Rect;

/// Cached bounding box with an explicit dirty flag.
///
/// Mutators invalidate the cache; the tree's accessor recomputes it on the
/// next read. `None` is a valid cached value and means "no extent" (an empty
/// container reports an explicitly empty bounding box).
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingBoxCache {
    value: Option<Rect>,
    dirty: bool,
}

impl BoundingBoxCache {
    /// A cache that needs computing before first use.
    pub fn dirty() -> Self {
        Self {
            value: None,
            dirty: true,
        }
    }

    /// Whether the cached value is stale.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The cached value; only meaningful when not dirty.
    #[inline]
    pub fn value(&self) -> Option<Rect> {
        self.value
    }

    /// Mark the cache stale.
    #[inline]
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Store a freshly computed value and mark the cache clean.
    #[inline]
    pub fn store(&mut self, value: Option<Rect>) {
        self.value = value;
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_dirty_and_cleans_on_store() {
        let mut cache = BoundingBoxCache::dirty();
        assert!(cache.is_dirty());

        cache.store(Some(Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert!(!cache.is_dirty());
        assert_eq!(cache.value(), Some(Rect::new(0.0, 0.0, 1.0, 1.0)));

        cache.invalidate();
        assert!(cache.is_dirty());
    }

    #[test]
    fn storing_none_also_cleans() {
        let mut cache = BoundingBoxCache::dirty();
        cache.store(None);
        assert!(!cache.is_dirty());
        assert_eq!(cache.value(), None);
    }
}
