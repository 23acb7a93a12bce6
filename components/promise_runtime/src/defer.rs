//! Deferred execution helper.
//!
//! Schedules an action onto a later turn of the calling thread's current
//! [`EventLoop`]. Every "after one tick" behavior of the promise runtime goes
//! through here, so callers always get a chance to attach handlers before
//! the first event fires.

use crate::event_loop::EventLoop;
use std::time::Duration;

/// Runs `action` on a later turn of the current event loop.
///
/// Prefers the immediate queue; falls back to the timer queue when the
/// loop's configuration says so.
///
/// # Examples
///
/// ```
/// use promise_runtime::{delayed, EventLoop};
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let ran = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&ran);
/// delayed(move || flag.store(true, Ordering::SeqCst));
///
/// assert!(!ran.load(Ordering::SeqCst));
/// EventLoop::current().run_until_done();
/// assert!(ran.load(Ordering::SeqCst));
/// ```
pub fn delayed<F>(action: F)
where
    F: FnOnce() + Send + 'static,
{
    EventLoop::current().defer(action);
}

/// Runs `action` on the current event loop once `delay` has elapsed.
pub fn delayed_by<F>(action: F, delay: Duration)
where
    F: FnOnce() + Send + 'static,
{
    EventLoop::current().defer_by(action, delay);
}
