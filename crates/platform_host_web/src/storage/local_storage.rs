//! `localStorage`-backed blob store.
//!
//! The browser API is synchronous; the async [`StateStore`] surface resolves immediately. Off the
//! `wasm32` target every call behaves like an empty store so native tests and tooling still link.

use platform_host::{StateStore, StateStoreFuture};

#[derive(Debug, Clone, Copy, Default)]
/// Browser blob store backed by `window.localStorage`.
pub struct WebStateStore;

impl WebStateStore {
    /// Reads the raw blob under `key`.
    pub fn read(self, key: &str) -> Option<String> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = web_sys::window()?.local_storage().ok().flatten()?;
            storage.get_item(key).ok().flatten()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            None
        }
    }

    /// Writes the raw blob under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the quota rejects the write.
    pub fn write(self, key: &str, raw_json: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .set_item(key, raw_json)
                .map_err(|e| format!("localStorage set_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, raw_json);
            Ok(())
        }
    }

    /// Removes the blob under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the removal fails.
    pub fn remove(self, key: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .remove_item(key)
                .map_err(|e| format!("localStorage remove_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| "localStorage unavailable".to_string())
}

impl StateStore for WebStateStore {
    fn load_blob<'a>(
        &'a self,
        key: &'a str,
    ) -> StateStoreFuture<'a, Result<Option<String>, String>> {
        let store = *self;
        Box::pin(async move { Ok(store.read(key)) })
    }

    fn save_blob<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> StateStoreFuture<'a, Result<(), String>> {
        let store = *self;
        Box::pin(async move { store.write(key, raw_json) })
    }

    fn remove_blob<'a>(&'a self, key: &'a str) -> StateStoreFuture<'a, Result<(), String>> {
        let store = *self;
        Box::pin(async move { store.remove(key) })
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn native_fallback_behaves_like_empty_store() {
        let store = WebStateStore;
        block_on(store.save_blob("k", "{}")).expect("save");
        assert_eq!(block_on(store.load_blob("k")).expect("load"), None);
        block_on(store.remove_blob("k")).expect("remove");
    }
}
