//! View helpers shared by page code.
//!
//! SYSTEM CONTEXT
//! ==============
//! `surface` and `timer` isolate the browser (DOM, navigation, timeouts)
//! behind small traits; `alert` and `format` build the visible helpers on
//! top of them.

pub mod alert;
pub mod format;
pub mod surface;
pub mod timer;

pub use alert::{AlertKind, Alerts, show_loading};
pub use format::{format_date, format_time};
pub use surface::{Navigator, NodeId, PageSurface};
pub use timer::{ManualTimers, TimerGuard, TimerHost};
