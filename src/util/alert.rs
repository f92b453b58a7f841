//! Dismissing page alerts.
//!
//! DESIGN
//! ======
//! [`Alerts`] owns the removal timer of every alert it shows. Each alert is
//! removed when its timer fires; [`Alerts::clear`] (also run on drop) cancels
//! the timers still pending and removes their nodes, so an unmounted page
//! never leaves a stray callback behind.
//!
//! Fired entries are pruned lazily on the next call rather than from inside
//! the timer callback, because a browser timer must not be dropped while it
//! is running.

#[cfg(test)]
#[path = "alert_test.rs"]
mod alert_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use super::surface::{NodeId, PageSurface};
use super::timer::{TimerGuard, TimerHost};

/// Visual style of an alert; rendered as the `alert-{kind}` class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AlertKind {
    #[default]
    Success,
    Error,
    Warning,
    Info,
    Custom(String),
}

impl AlertKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Custom(kind) => kind,
        }
    }

    /// Full class attribute for the alert node.
    #[must_use]
    pub fn class_name(&self) -> String {
        format!("alert alert-{}", self.as_str())
    }
}

impl From<&str> for AlertKind {
    fn from(raw: &str) -> Self {
        match raw {
            "success" => Self::Success,
            "error" => Self::Error,
            "warning" => Self::Warning,
            "info" => Self::Info,
            other => Self::Custom(other.to_owned()),
        }
    }
}

struct ActiveAlert {
    node: NodeId,
    fired: Rc<Cell<bool>>,
    _removal: TimerGuard,
}

pub struct Alerts {
    surface: Rc<dyn PageSurface>,
    timers: Rc<dyn TimerHost>,
    timeout: Duration,
    active: RefCell<Vec<ActiveAlert>>,
}

impl Alerts {
    pub fn new(surface: Rc<dyn PageSurface>, timers: Rc<dyn TimerHost>, timeout: Duration) -> Self {
        Self { surface, timers, timeout, active: RefCell::new(Vec::new()) }
    }

    /// Show `message` at the top of the content area and schedule its
    /// removal. Returns `None` if the page has nowhere to put it.
    pub fn show_alert(&self, message: &str, kind: &AlertKind) -> Option<NodeId> {
        self.prune();

        let Some(node) = self.surface.insert_alert(&kind.class_name(), message) else {
            log::warn!("no container for alert: {message}");
            return None;
        };

        let fired = Rc::new(Cell::new(false));
        let surface = Rc::clone(&self.surface);
        let fired_flag = Rc::clone(&fired);
        let removal = self.timers.schedule(
            self.timeout,
            Box::new(move || {
                fired_flag.set(true);
                surface.remove_node(node);
            }),
        );

        self.active.borrow_mut().push(ActiveAlert { node, fired, _removal: removal });
        Some(node)
    }

    /// Alerts still on the page.
    pub fn active_count(&self) -> usize {
        self.active.borrow().iter().filter(|a| !a.fired.get()).count()
    }

    /// Remove every alert still showing and cancel its timer.
    pub fn clear(&self) {
        let drained: Vec<ActiveAlert> = self.active.borrow_mut().drain(..).collect();
        for alert in drained {
            if !alert.fired.get() {
                self.surface.remove_node(alert.node);
            }
        }
    }

    fn prune(&self) {
        self.active.borrow_mut().retain(|a| !a.fired.get());
    }
}

impl Drop for Alerts {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Markup placed in an element while its content loads.
pub const SPINNER_HTML: &str = r#"<div class="spinner"></div>"#;

/// Replace `#element_id`'s content with the loading spinner. Returns `false`
/// if the element does not exist.
pub fn show_loading(surface: &dyn PageSurface, element_id: &str) -> bool {
    surface.set_inner_html(element_id, SPINNER_HTML)
}
