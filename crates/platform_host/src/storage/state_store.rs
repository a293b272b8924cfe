//! Durable key/value blob storage contracts and in-process adapters.
//!
//! A blob is one UTF-8 JSON document stored atomically under a single key. The desktop runtime
//! writes its whole session snapshot as one blob so a reload never observes a half-written layout.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Object-safe boxed future used by [`StateStore`] async methods.
pub type StateStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for durable JSON blobs keyed by string.
pub trait StateStore {
    /// Loads the raw blob stored under `key`, if any.
    fn load_blob<'a>(&'a self, key: &'a str)
        -> StateStoreFuture<'a, Result<Option<String>, String>>;

    /// Replaces the blob stored under `key`.
    fn save_blob<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> StateStoreFuture<'a, Result<(), String>>;

    /// Removes the blob stored under `key`. Removing a missing key succeeds.
    fn remove_blob<'a>(&'a self, key: &'a str) -> StateStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Store that never retains anything, for targets without durable storage.
pub struct NoopStateStore;

impl StateStore for NoopStateStore {
    fn load_blob<'a>(
        &'a self,
        _key: &'a str,
    ) -> StateStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_blob<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> StateStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn remove_blob<'a>(&'a self, _key: &'a str) -> StateStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory blob store. Clones share the same backing map.
pub struct MemoryStateStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStateStore {
    /// Creates a store pre-seeded with one raw blob.
    pub fn with_blob(key: impl Into<String>, raw_json: impl Into<String>) -> Self {
        let store = Self::default();
        store
            .inner
            .borrow_mut()
            .insert(key.into(), raw_json.into());
        store
    }

    /// Returns the raw blob under `key` without going through the async contract.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }
}

impl StateStore for MemoryStateStore {
    fn load_blob<'a>(
        &'a self,
        key: &'a str,
    ) -> StateStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.peek(key)) })
    }

    fn save_blob<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> StateStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(key.to_string(), raw_json.to_string());
            Ok(())
        })
    }

    fn remove_blob<'a>(&'a self, key: &'a str) -> StateStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}

/// Loads and deserializes a typed blob through a [`StateStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store read or JSON deserialization fails.
pub async fn load_blob_with<S: StateStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_blob(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes and saves a typed blob through a [`StateStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn save_blob_with<S: StateStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save_blob(key, &raw).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counters {
        next_window_id: u64,
    }

    #[test]
    fn memory_store_replaces_and_removes_blobs() {
        let store = MemoryStateStore::default();
        let store_obj: &dyn StateStore = &store;

        block_on(store_obj.save_blob("session", "{\"a\":1}")).expect("save");
        block_on(store_obj.save_blob("session", "{\"a\":2}")).expect("overwrite");
        assert_eq!(
            block_on(store_obj.load_blob("session")).expect("load"),
            Some("{\"a\":2}".to_string())
        );

        block_on(store_obj.remove_blob("session")).expect("remove");
        assert_eq!(block_on(store_obj.load_blob("session")).expect("load"), None);
        block_on(store_obj.remove_blob("session")).expect("remove missing key");
    }

    #[test]
    fn clones_share_backing_map() {
        let store = MemoryStateStore::with_blob("k", "[]");
        let clone = store.clone();
        block_on(clone.save_blob("k", "[1]")).expect("save");
        assert_eq!(store.peek("k").as_deref(), Some("[1]"));
    }

    #[test]
    fn typed_helpers_round_trip_and_surface_parse_errors() {
        let store = MemoryStateStore::default();
        block_on(save_blob_with(&store, "counters", &Counters { next_window_id: 4 }))
            .expect("save typed");
        let loaded: Option<Counters> =
            block_on(load_blob_with(&store, "counters")).expect("load typed");
        assert_eq!(loaded, Some(Counters { next_window_id: 4 }));

        let broken = MemoryStateStore::with_blob("counters", "{not json");
        let err = block_on(load_blob_with::<_, Counters>(&broken, "counters"))
            .expect_err("malformed blob should fail");
        assert!(!err.is_empty());
    }

    #[test]
    fn noop_store_is_empty_and_successful() {
        let store = NoopStateStore;
        let store_obj: &dyn StateStore = &store;
        assert_eq!(block_on(store_obj.load_blob("k")).expect("load"), None);
        block_on(store_obj.save_blob("k", "{}")).expect("save");
        block_on(store_obj.remove_blob("k")).expect("remove");
    }
}
