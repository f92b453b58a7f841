//! One-shot timers whose guard cancels them on drop.
//!
//! Browser builds schedule with `gloo-timers`. [`ManualTimers`] is a virtual
//! clock advanced explicitly; it backs the tests and any host without an
//! event loop of its own.

#[cfg(test)]
#[path = "timer_test.rs"]
mod timer_test;

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

pub trait TimerHost {
    /// Run `callback` once after `delay` unless the returned guard is dropped
    /// first.
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerGuard;
}

/// Owns a pending timer. Dropping the guard cancels the timer; dropping it
/// after the timer fired does nothing.
#[must_use = "dropping the guard cancels the timer"]
pub struct TimerGuard {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TimerGuard {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// Cancel now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for TimerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerGuard").field("armed", &self.cancel.is_some()).finish()
    }
}

// =============================================================================
// MANUAL
// =============================================================================

type Pending = BTreeMap<(Duration, u64), Box<dyn FnOnce()>>;

#[derive(Default)]
struct ManualClock {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    pending: RefCell<Pending>,
}

/// Virtual clock. Timers fire only inside [`ManualTimers::advance`], in due
/// order, ties broken by scheduling order.
#[derive(Clone, Default)]
pub struct ManualTimers {
    clock: Rc<ManualClock>,
}

impl ManualTimers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now.get()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.clock.pending.borrow().len()
    }

    /// Move the clock forward by `by`, firing every timer that falls due.
    /// Callbacks may schedule or cancel other timers.
    pub fn advance(&self, by: Duration) {
        let target = self.clock.now.get() + by;
        loop {
            let due = {
                let mut pending = self.clock.pending.borrow_mut();
                let next_due = pending.first_key_value().map(|(&(at, _), _)| at);
                match next_due {
                    Some(at) if at <= target => pending.pop_first(),
                    _ => None,
                }
            };
            let Some(((at, _), callback)) = due else {
                break;
            };
            self.clock.now.set(at);
            callback();
        }
        self.clock.now.set(target);
    }
}

impl TimerHost for ManualTimers {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerGuard {
        let id = self.clock.next_id.get();
        self.clock.next_id.set(id + 1);
        let key = (self.clock.now.get() + delay, id);
        self.clock.pending.borrow_mut().insert(key, callback);

        let clock = Rc::downgrade(&self.clock);
        TimerGuard::new(move || {
            if let Some(clock) = clock.upgrade() {
                let removed = clock.pending.borrow_mut().remove(&key);
                drop(removed);
            }
        })
    }
}

// =============================================================================
// BROWSER
// =============================================================================

#[cfg(feature = "hydrate")]
#[derive(Debug, Default, Clone, Copy)]
pub struct GlooTimers;

#[cfg(feature = "hydrate")]
impl TimerHost for GlooTimers {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerGuard {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timeout = gloo_timers::callback::Timeout::new(millis, callback);
        TimerGuard::new(move || drop(timeout))
    }
}
