//! Session store: tokens and the cached user profile.
//!
//! All reads go straight to storage, so two handles over the same backend
//! always agree. There is no expiry tracking; a token is trusted until the
//! server rejects it.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::rc::Rc;

use super::storage::{KeyValueStorage, MemoryStorage};
use crate::net::types::{Role, TokenGrant, UserProfile};

pub const TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

/// Snapshot of everything the store holds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Shared handle over durable session storage. Cloning shares the backend.
#[derive(Clone)]
pub struct SessionStore {
    storage: Rc<dyn KeyValueStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// A store that forgets everything when dropped.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Rc::new(MemoryStorage::new()))
    }

    /// Store backed by `window.localStorage`.
    #[cfg(feature = "hydrate")]
    #[must_use]
    pub fn browser() -> Self {
        Self::new(Rc::new(super::storage::LocalStorage))
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }

    pub fn set_token(&self, token: &str) {
        self.storage.set(TOKEN_KEY, token);
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.storage.get(REFRESH_TOKEN_KEY)
    }

    pub fn set_refresh_token(&self, token: &str) {
        self.storage.set(REFRESH_TOKEN_KEY, token);
    }

    /// The cached profile. A cache entry that no longer parses reads as
    /// absent.
    pub fn user(&self) -> Option<UserProfile> {
        let raw = self.storage.get(USER_KEY)?;
        match serde_json::from_str::<Option<UserProfile>>(&raw) {
            Ok(user) => user,
            Err(e) => {
                log::warn!("ignoring malformed cached user: {e}");
                None
            }
        }
    }

    pub fn set_user(&self, user: &UserProfile) {
        match serde_json::to_string(user) {
            Ok(raw) => self.storage.set(USER_KEY, &raw),
            Err(e) => log::warn!("user profile not cached: {e}"),
        }
    }

    /// Forget the access token, the cached profile and the refresh token.
    pub fn clear_auth(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
        self.storage.remove(REFRESH_TOKEN_KEY);
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|t| !t.is_empty())
    }

    /// Role of the cached user; `None` when no profile is cached.
    pub fn role(&self) -> Option<Role> {
        self.user().and_then(|u| u.role)
    }

    /// Initials of the cached user, or `"?"` when no profile is cached.
    pub fn user_initials(&self) -> String {
        self.user().map_or_else(|| "?".to_owned(), |u| u.initials())
    }

    pub fn display_name(&self) -> Option<String> {
        self.user().map(|u| u.display_name())
    }

    /// Persist the tokens of a login, register or refresh grant. An absent
    /// refresh token leaves any stored one in place.
    pub(crate) fn store_grant(&self, grant: &TokenGrant) {
        self.set_token(&grant.access_token);
        if let Some(refresh) = &grant.refresh_token {
            self.set_refresh_token(refresh);
        }
    }

    pub fn load(&self) -> Session {
        Session {
            access_token: self.token(),
            refresh_token: self.refresh_token(),
            user: self.user(),
        }
    }

    /// Write `session` back, removing keys for absent fields.
    pub fn save(&self, session: &Session) {
        match &session.access_token {
            Some(token) => self.set_token(token),
            None => self.storage.remove(TOKEN_KEY),
        }
        match &session.refresh_token {
            Some(token) => self.set_refresh_token(token),
            None => self.storage.remove(REFRESH_TOKEN_KEY),
        }
        match &session.user {
            Some(user) => self.set_user(user),
            None => self.storage.remove(USER_KEY),
        }
    }
}
