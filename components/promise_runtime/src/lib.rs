//! Cooperative promises for a single-threaded host.
//!
//! This crate provides a deferred-computation primitive and the small event
//! loop it runs on:
//! - [`Promise`] - one-shot completion cell with chained continuations and
//!   progress notifications
//! - [`when()`] - fan-in of a fixed set of promises
//! - [`Thenable`] - the capability foreign promise-like sources implement to
//!   take part in a chain
//! - [`EventLoop`] - immediate and timer queues backing deferred execution
//!
//! # Overview
//!
//! Dispatch is synchronous: resolving a promise runs its handlers inside the
//! `resolve` call. Anything documented as happening "on a later turn"
//! (`Promise::resolved`, `Promise::rejected`, `Promise::deferred`, empty
//! `when`) is scheduled through [`delayed`] onto the current thread's
//! [`EventLoop`] and happens when that loop runs.
//!
//! # Examples
//!
//! ## Chaining
//!
//! ```
//! use core_types::PromiseError;
//! use promise_runtime::{EventLoop, Promise};
//!
//! let text: Promise<String> = Promise::resolved("# Notes".to_string());
//! let length = text
//!     .then(|s| Ok(s.len()))
//!     .then(|n| if n > 0 { Ok(n) } else { Err(PromiseError::thrown("empty")) });
//!
//! EventLoop::current().run_until_done();
//! assert_eq!(length.outcome(), Some(Ok(7)));
//! ```
//!
//! ## Aggregation
//!
//! ```
//! use promise_runtime::{when, EventLoop, Promise};
//!
//! let first: Promise<u8> = Promise::resolved(1);
//! let all = when(vec![first, Promise::resolved(2)]);
//! EventLoop::current().run_until_done();
//! assert_eq!(all.outcome(), Some(Ok(vec![1, 2])));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod combinators;
pub mod config;
pub mod defer;
pub mod event_loop;
mod listener;
pub mod promise;
pub mod task_queue;
pub mod thenable;
pub mod when;

// Re-export main types at crate root
pub use combinators::{guarded, maybe, wrap, MaybePromise};
pub use config::SchedulerConfig;
pub use defer::{delayed, delayed_by};
pub use event_loop::EventLoop;
pub use listener::Handlers;
pub use promise::{Completer, Promise, PromiseState};
pub use task_queue::{Task, TaskQueue, TimerQueue};
pub use thenable::{Next, Thenable};
pub use when::when;
