//! Bearer token bookkeeping shared by every API call.

use std::cell::RefCell;

/// Storage key of the token in the browser's local storage.
pub const TOKEN_KEY: &str = "access_token";
/// Where a rejected session is sent.
pub const LOGIN_PATH: &str = "/login";

pub trait TokenStore {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<String>>,
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn set(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        self.token.borrow_mut().take();
    }
}

/// What the caller must do after seeing a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Proceed,
    RedirectToLogin,
}

#[derive(Debug, Default)]
pub struct Session<S: TokenStore> {
    store: S,
}

impl<S: TokenStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store_token(&self, token: &str) {
        self.store.set(token);
    }

    pub fn token(&self) -> Option<String> {
        self.store.get().filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Value of the `Authorization` header, if a token is held.
    pub fn authorization(&self) -> Option<String> {
        self.token().map(|t| format!("Bearer {}", t))
    }

    /// A 401 drops the token; the caller then performs a full navigation to [`LOGIN_PATH`].
    pub fn observe_status(&self, status: u16) -> AuthOutcome {
        if status == 401 {
            self.store.clear();
            AuthOutcome::RedirectToLogin
        } else {
            AuthOutcome::Proceed
        }
    }

    pub fn logout(&self) {
        self.store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_token_becomes_bearer_header() {
        let session = Session::new(MemoryTokenStore::default());
        assert_eq!(session.authorization(), None);

        session.store_token("abc");
        assert_eq!(session.authorization().as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn unauthorized_clears_token_and_redirects() {
        let session = Session::new(MemoryTokenStore::default());
        session.store_token("abc");

        assert_eq!(session.observe_status(200), AuthOutcome::Proceed);
        assert!(session.is_authenticated());
        assert_eq!(session.observe_status(401), AuthOutcome::RedirectToLogin);
        assert!(!session.is_authenticated());
        assert_eq!(session.authorization(), None);
    }
}
