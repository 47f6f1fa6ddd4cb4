//! In-memory cache of built books.
//!
//! The remote catalog associates every book with a content hash that changes
//! whenever the book's content does. The [`VersionCache`] maps that hash to
//! the [`Book`] graph last built for it, so an unchanged book never has to be
//! downloaded (or built) twice.
//!
//! The cache is ephemeral: nothing is persisted, and there is no eviction
//! beyond explicit removal.

mod hash;

pub use crate::hash::ContentHash;

use guya_graph::models::Book;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Maps content hashes to previously built books.
///
/// Every operation runs under one mutex around the backing map; there is no
/// separate reader path. This cache is shared by a handful of fetches at
/// most, correctness beats throughput here.
#[derive(Debug, Default)]
pub struct VersionCache {
    books: Mutex<HashMap<ContentHash, Arc<Book>>>,
}

impl VersionCache {
    fn lock(&self) -> MutexGuard<'_, HashMap<ContentHash, Arc<Book>>> {
        self.books.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Associate `book` with `hash`, replacing whatever was there.
    pub fn put(&self, hash: ContentHash, book: Arc<Book>) {
        debug!(%hash, identifier = book.identifier(), "caching book");
        self.lock().insert(hash, book);
    }

    pub fn get(&self, hash: &ContentHash) -> Option<Arc<Book>> {
        self.lock().get(hash).cloned()
    }

    /// Evict the book cached under `hash`.
    pub fn remove_hash(&self, hash: &ContentHash) -> Option<Arc<Book>> {
        self.lock().remove(hash)
    }

    /// Evict the (first) book whose identifier is `identifier`, whatever
    /// hash it was cached under.
    pub fn remove_identifier(&self, identifier: &str) -> Option<Arc<Book>> {
        let mut books = self.lock();
        let hash = books.iter().find(|(_, book)| book.identifier() == identifier).map(|(hash, _)| hash.clone())?;
        debug!(%hash, identifier, "evicting book");
        books.remove(&hash)
    }

    /// Evict this exact book (by identity, not by content).
    pub fn remove_book(&self, book: &Arc<Book>) -> Option<Arc<Book>> {
        let mut books = self.lock();
        let hash = books.iter().find(|(_, cached)| Arc::ptr_eq(cached, book)).map(|(hash, _)| hash.clone())?;
        books.remove(&hash)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guya_graph::{GroupRegistry, JsonObject};
    use serde_json::json;

    fn book(slug: &str) -> Arc<Book> {
        let data = json!({
            "slug": slug, "title": slug, "author": "", "artist": "", "description": "", "cover": "",
            "groups": {}, "chapters": {}
        });
        let data: &JsonObject = data.as_object().unwrap();
        guya_graph::build(&GroupRegistry::default(), data).unwrap()
    }

    #[test]
    fn test_put_and_get() {
        let cache = VersionCache::default();
        let kaguya = book("kaguya");
        cache.put("abc".into(), Arc::clone(&kaguya));
        assert!(Arc::ptr_eq(&cache.get(&"abc".into()).unwrap(), &kaguya));
        assert!(cache.get(&"def".into()).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_put_replaces() {
        let cache = VersionCache::default();
        cache.put("abc".into(), book("first"));
        cache.put("abc".into(), book("second"));
        assert_eq!(cache.get(&"abc".into()).unwrap().identifier(), "second");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_remove_hash() {
        let cache = VersionCache::default();
        cache.put("abc".into(), book("kaguya"));
        assert!(cache.remove_hash(&"abc".into()).is_some());
        assert!(cache.remove_hash(&"abc".into()).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_remove_identifier() {
        let cache = VersionCache::default();
        cache.put("old".into(), book("kaguya"));
        cache.put("other".into(), book("oshi-no-ko"));
        let evicted = cache.remove_identifier("kaguya").unwrap();
        assert_eq!(evicted.identifier(), "kaguya");
        assert!(cache.get(&"old".into()).is_none());
        assert!(cache.get(&"other".into()).is_some());
        assert!(cache.remove_identifier("kaguya").is_none());
    }

    #[test]
    fn test_remove_book_uses_identity() {
        let cache = VersionCache::default();
        let cached = book("kaguya");
        let lookalike = book("kaguya");
        cache.put("abc".into(), Arc::clone(&cached));
        assert!(cache.remove_book(&lookalike).is_none());
        assert!(cache.remove_book(&cached).is_some());
        assert!(cache.is_empty());
    }
}
