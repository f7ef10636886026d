//! Page-wide record of URLs already hinted for prefetch

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Append-only set of source URLs whose lightbox variant was already prefetched.
///
/// Clones share the same set, so one cache is created at the composition root
/// and handed to every presenter on the page.
#[derive(Debug, Clone, Default)]
pub struct PrefetchCache {
    requested: Rc<RefCell<HashSet<String>>>,
}

impl PrefetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a URL. Returns true the first time the URL is seen.
    pub fn mark(&self, url: &str) -> bool {
        let mut requested = self.requested.borrow_mut();
        if requested.contains(url) {
            return false;
        }
        requested.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.requested.borrow().contains(url)
    }

    pub fn len(&self) -> usize {
        self.requested.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requested.borrow().is_empty()
    }

    /// Forgets every URL (used between independent page sessions and tests)
    pub fn reset(&self) {
        self.requested.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_is_deduplicated_across_clones() {
        let cache = PrefetchCache::new();
        let shared = cache.clone();

        assert!(cache.mark("a.png"));
        assert!(!shared.mark("a.png"));
        assert!(shared.mark("b.png"));
        assert_eq!(cache.len(), 2);
        assert!(cache.contains("b.png"));
    }

    #[test]
    fn test_reset() {
        let cache = PrefetchCache::new();
        cache.mark("a.png");
        cache.reset();
        assert!(cache.is_empty());
        assert!(cache.mark("a.png"));
    }
}
