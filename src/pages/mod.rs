//! Page-entry flows run by protected pages.

pub mod lifecycle;

pub use lifecycle::Portal;
