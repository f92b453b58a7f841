//! Client-held authentication state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `storage` abstracts the durable key-value backend (browser
//! `localStorage`, a JSON file, or memory). `store` layers the session
//! vocabulary (tokens, cached profile) on top of it and is the single object
//! the API client and page helpers share.

pub mod storage;
pub mod store;

pub use storage::{KeyValueStorage, MemoryStorage, StorageError};
pub use store::{REFRESH_TOKEN_KEY, Session, SessionStore, TOKEN_KEY, USER_KEY};
