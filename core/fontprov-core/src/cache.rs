//! Keyed storage for decoded font programs (made by FontLab https://www.fontlab.com/)

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::program::FontProgram;
use crate::record::FontKey;

/// Store for programs that have already been decoded.
///
/// Implementations must be safe to share between threads. [`get_or_load`]
/// is what the materializer calls; an implementation that wants at most one
/// decode per key under concurrent access overrides it.
///
/// [`get_or_load`]: FontCache::get_or_load
pub trait FontCache: Send + Sync {
    fn get(&self, key: &FontKey) -> Option<Arc<FontProgram>>;

    fn put(&self, key: FontKey, program: Arc<FontProgram>);

    /// Return the cached program for `key`, or run `load` and cache its result.
    fn get_or_load(
        &self,
        key: &FontKey,
        load: &mut dyn FnMut() -> Option<Arc<FontProgram>>,
    ) -> Option<Arc<FontProgram>> {
        if let Some(cached) = self.get(key) {
            return Some(cached);
        }
        let program = load()?;
        self.put(key.clone(), Arc::clone(&program));
        Some(program)
    }
}

type Slot = Arc<Mutex<Option<Arc<FontProgram>>>>;

/// Unbounded in-memory cache with per-key locking.
///
/// Concurrent requests for one key wait for the first loader; other keys
/// are not blocked. A failed load leaves the slot empty so a later call
/// retries.
#[derive(Default)]
pub struct MemoryFontCache {
    slots: Mutex<HashMap<FontKey, Slot>>,
}

impl MemoryFontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys holding a decoded program.
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        slots
            .iter()
            .filter(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn slot(&self, key: &FontKey) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key.clone()).or_default())
    }
}

impl FontCache for MemoryFontCache {
    fn get(&self, key: &FontKey) -> Option<Arc<FontProgram>> {
        let slot = {
            let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.get(key)?)
        };
        let cached = slot.lock().unwrap_or_else(PoisonError::into_inner);
        cached.clone()
    }

    fn put(&self, key: FontKey, program: Arc<FontProgram>) {
        let slot = self.slot(&key);
        *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(program);
    }

    fn get_or_load(
        &self,
        key: &FontKey,
        load: &mut dyn FnMut() -> Option<Arc<FontProgram>>,
    ) -> Option<Arc<FontProgram>> {
        let slot = self.slot(key);
        let mut cached = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(program) = cached.as_ref() {
            return Some(Arc::clone(program));
        }
        let program = load()?;
        *cached = Some(Arc::clone(&program));
        Some(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FontRecord;
    use crate::type1::Type1Font;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn pfb(name: &str) -> Vec<u8> {
        let body = format!("%!FontType1-1.0: {name}\n/FontName /{name} def\n");
        let mut data = vec![0x80, 1];
        data.extend_from_slice(&(body.len() as u32).to_le_bytes());
        data.extend_from_slice(body.as_bytes());
        data.extend([0x80, 3]);
        data
    }

    fn program(name: &str) -> Arc<FontProgram> {
        let font = Type1Font::from_pfb_bytes(&pfb(name)).expect("pfb");
        Arc::new(FontProgram::Type1(font))
    }

    fn key(name: &str) -> FontKey {
        FontRecord::type1(format!("/fonts/{name}.pfb").into(), name.to_string()).key()
    }

    #[test]
    fn put_then_get_returns_same_instance() {
        let cache = MemoryFontCache::new();
        let stored = program("Alpha");
        cache.put(key("Alpha"), Arc::clone(&stored));

        let fetched = cache.get(&key("Alpha")).expect("cached");
        assert!(Arc::ptr_eq(&stored, &fetched));
        assert!(cache.get(&key("Beta")).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let cache = MemoryFontCache::new();
        assert!(cache.get_or_load(&key("Alpha"), &mut || None).is_none());
        assert!(cache.is_empty());

        let loaded = cache.get_or_load(&key("Alpha"), &mut || Some(program("Alpha")));
        assert!(loaded.is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn concurrent_requests_load_once() {
        let cache = Arc::new(MemoryFontCache::new());
        let loads = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let loads = Arc::clone(&loads);
                thread::spawn(move || {
                    cache.get_or_load(&key("Alpha"), &mut || {
                        loads.fetch_add(1, Ordering::SeqCst);
                        Some(program("Alpha"))
                    })
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("join").expect("program"))
            .collect();

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(results.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn clear_drops_everything() {
        let cache = MemoryFontCache::new();
        cache.put(key("Alpha"), program("Alpha"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
