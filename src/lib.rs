//! # school-portal
//!
//! Client layer for the school management web application: session storage,
//! an authenticated REST client for the backend API, and the page helpers
//! protected pages run on load.
//!
//! The default `native` feature sends requests with `reqwest` and keeps the
//! session in a JSON file; the `hydrate` feature targets the browser with
//! `gloo-net`, `localStorage` and the live DOM, and exports the page entry
//! points through `wasm-bindgen`.

pub mod config;
pub mod net;
pub mod pages;
pub mod session;
pub mod util;

#[cfg(feature = "hydrate")]
mod browser;

#[cfg(test)]
mod test_helpers;

pub use config::ClientConfig;
pub use net::{ApiClient, ApiError, RequestOptions};
pub use pages::Portal;
pub use session::{Session, SessionStore};
