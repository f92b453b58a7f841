//! Networking modules for the school backend's REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` owns request construction and the named auth operations,
//! `resources` adds the student, teacher, timetable, result and user-account
//! operations on the same client. `transport` abstracts how bytes reach the
//! server. `types` and `records` define the wire schema, `error` the failure
//! taxonomy.

pub mod api;
pub mod error;
pub mod records;
pub mod resources;
pub mod transport;
pub mod types;

pub use api::{ApiClient, RequestOptions};
pub use http::Method;
pub use error::ApiError;
pub use transport::{ApiRequest, HttpTransport, RawResponse};
