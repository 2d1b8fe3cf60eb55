use common::session::{Session, TokenStore, TOKEN_KEY};
use web_sys::Storage;

/// Keeps the bearer token in the browser's local storage so it survives reloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTokenStore;

impl LocalTokenStore {
    fn storage() -> Option<Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl TokenStore for LocalTokenStore {
    fn get(&self) -> Option<String> {
        Self::storage()
            .and_then(|s| s.get_item(TOKEN_KEY).ok().flatten())
            .filter(|token| !token.is_empty())
    }

    fn set(&self, token: &str) {
        if let Some(storage) = Self::storage() {
            storage.set_item(TOKEN_KEY, token).ok();
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            storage.remove_item(TOKEN_KEY).ok();
        }
    }
}

pub fn session() -> Session<LocalTokenStore> {
    Session::new(LocalTokenStore)
}
