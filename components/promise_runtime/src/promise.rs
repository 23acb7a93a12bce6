//! The promise: a one-shot completion cell with chained continuations.
//!
//! A promise starts pending, may report any number of progress events, and
//! completes exactly once by resolving or rejecting. Completion notifies every
//! registered listener in registration order and then releases them.
//!
//! Handlers run synchronously inside whichever call triggers them. The cell's
//! lock is never held while user code runs, so a handler may freely call back
//! into the promise it is registered on.

use crate::defer::delayed;
use crate::listener::{Handlers, Listener, Reaction, Relay};
use crate::thenable::{Next, Thenable};
use core_types::{Progress, PromiseError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::trace;

/// The observable state of a promise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseState {
    /// Not completed yet; progress may still be reported.
    Pending,
    /// Completed with a value.
    Resolved,
    /// Completed with an error.
    Rejected,
}

#[derive(Clone)]
enum Outcome<T, E> {
    Resolved(T),
    Rejected(E),
}

enum State<T, E> {
    Pending,
    Completed(Outcome<T, E>),
}

struct Inner<T, E> {
    state: State<T, E>,
    listeners: Vec<Box<dyn Listener<T, E>>>,
    // Set while a progress pass holds the listeners outside the cell.
    dispatching: bool,
    queued: VecDeque<Progress>,
}

impl<T, E> Inner<T, E> {
    fn is_completed(&self) -> bool {
        matches!(self.state, State::Completed(_))
    }

    fn observed_state(&self) -> PromiseState {
        match &self.state {
            State::Pending => PromiseState::Pending,
            State::Completed(Outcome::Resolved(_)) => PromiseState::Resolved,
            State::Completed(Outcome::Rejected(_)) => PromiseState::Rejected,
        }
    }
}

/// A promise for a value of type `T` that may fail with `E`.
///
/// `Promise` is a handle; clones refer to the same cell. The terminal outcome
/// is kept after completion, and a listener registered after that point is
/// served the outcome immediately, inside the registering call.
///
/// # Examples
///
/// ```
/// use promise_runtime::{Promise, PromiseState};
///
/// let promise: Promise<i32> = Promise::new();
/// let plus_one = promise.then(|v| Ok(v + 1));
///
/// promise.resolve(41);
/// promise.resolve(100); // ignored
///
/// assert_eq!(promise.state(), PromiseState::Resolved);
/// assert_eq!(plus_one.outcome(), Some(Ok(42)));
/// ```
pub struct Promise<T, E = PromiseError> {
    inner: Arc<Mutex<Inner<T, E>>>,
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Completion callback handed to a continuation-style producer.
///
/// See [`Promise::from_callback`].
pub struct Completer<T, E = PromiseError> {
    promise: Promise<T, E>,
}

impl<T, E> Clone for Completer<T, E> {
    fn clone(&self) -> Self {
        Self {
            promise: self.promise.clone(),
        }
    }
}

impl<T, E> Completer<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Completes the promise: `Err` rejects it, `Ok` resolves it.
    ///
    /// Only the first completion has any effect.
    pub fn complete(&self, result: Result<T, E>) {
        match result {
            Ok(value) => self.promise.resolve(value),
            Err(error) => self.promise.reject(error),
        }
    }

    /// Reports progress on the promise.
    pub fn progress(&self, progress: impl Into<Progress>) {
        self.promise.progress(progress);
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates a pending promise, to be completed by the caller.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: State::Pending,
                listeners: Vec::new(),
                dispatching: false,
                queued: VecDeque::new(),
            })),
        }
    }

    /// Creates a promise that follows `source`.
    ///
    /// The new promise receives the resolution, rejection and progress of
    /// `source`.
    pub fn from_thenable<S>(source: S) -> Self
    where
        S: Thenable<T, E>,
    {
        let promise = Self::new();
        source.subscribe(promise.clone());
        promise
    }

    /// Creates a promise completed by a continuation-style producer.
    ///
    /// `producer` is called synchronously, before this function returns, with
    /// a [`Completer`] it may keep and call later.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::PromiseError;
    /// use promise_runtime::Promise;
    ///
    /// let loaded: Promise<String> = Promise::from_callback(|done| {
    ///     done.complete(Ok("# Title".to_string()));
    /// });
    /// assert_eq!(loaded.outcome(), Some(Ok("# Title".to_string())));
    ///
    /// let failed: Promise<String> = Promise::from_callback(|done| {
    ///     done.complete(Err(PromiseError::rejected("no such file")));
    /// });
    /// assert!(matches!(failed.outcome(), Some(Err(_))));
    /// ```
    pub fn from_callback<F>(producer: F) -> Self
    where
        F: FnOnce(Completer<T, E>),
    {
        let promise = Self::new();
        producer(Completer {
            promise: promise.clone(),
        });
        promise
    }

    /// Resolves the promise. A no-op once the promise has completed.
    pub fn resolve(&self, value: T) {
        self.settle(Outcome::Resolved(value));
    }

    /// Rejects the promise. A no-op once the promise has completed.
    pub fn reject(&self, error: E) {
        self.settle(Outcome::Rejected(error));
    }

    /// Reports progress to the current listeners.
    ///
    /// Progress never completes the promise and is ignored once it has
    /// completed. Listeners without a progress handler do not see it.
    ///
    /// Progress reported from inside a progress handler is delivered to every
    /// listener once the current pass ends. A completion made from inside a
    /// progress handler ends the pass, and the terminal event then goes to all
    /// listeners in registration order.
    pub fn progress(&self, progress: impl Into<Progress>) {
        let mut progress = progress.into();
        let mut listeners = {
            let mut inner = self.inner.lock();
            if inner.is_completed() {
                return;
            }
            if inner.dispatching {
                inner.queued.push_back(progress);
                return;
            }
            inner.dispatching = true;
            std::mem::take(&mut inner.listeners)
        };

        let outcome = loop {
            for listener in listeners.iter_mut() {
                if self.is_completed() {
                    break;
                }
                listener.progress(&progress);
            }

            // Listeners registered during the pass go after the ones taken out.
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            listeners.append(&mut inner.listeners);
            if let State::Completed(outcome) = &inner.state {
                inner.dispatching = false;
                inner.queued.clear();
                break outcome.clone();
            }
            match inner.queued.pop_front() {
                Some(next) => progress = next,
                None => {
                    inner.listeners = listeners;
                    inner.dispatching = false;
                    return;
                }
            }
        };

        trace!(listeners = listeners.len(), "promise completed during progress");
        for listener in listeners {
            deliver(listener, outcome.clone());
        }
    }

    /// Registers handlers and returns the continuation they feed.
    ///
    /// If this promise has already completed, the matching handler runs
    /// before this call returns.
    pub fn then_with<U>(&self, handlers: Handlers<T, U, E>) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
    {
        let continuation = Promise::new();
        self.register(Box::new(Reaction::new(continuation.clone(), handlers)));
        continuation
    }

    /// Maps the resolved value; an `Err` rejects the continuation.
    ///
    /// Rejections pass through untouched.
    pub fn then<U, F>(&self, on_resolve: F) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Result<U, E> + Send + 'static,
    {
        self.then_with(Handlers::on_resolve(move |value| {
            on_resolve(value).map(Next::Value)
        }))
    }

    /// Chains another promise: the continuation adopts the promise returned
    /// by `on_resolve`.
    pub fn and_then<U, F>(&self, on_resolve: F) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Promise<U, E> + Send + 'static,
    {
        self.then_with(Handlers::on_resolve(move |value| {
            Ok(Next::from(on_resolve(value)))
        }))
    }

    /// Handles a rejection; resolved values pass through untouched.
    pub fn catch<F>(&self, on_reject: F) -> Promise<T, E>
    where
        F: FnOnce(E) -> Result<T, E> + Send + 'static,
    {
        self.then_with(
            Handlers::passthrough().or_reject(move |error| on_reject(error).map(Next::Value)),
        )
    }

    /// Observes progress; resolution and rejection pass through untouched.
    pub fn on_progress<F>(&self, mut on_progress: F) -> Promise<T, E>
    where
        F: FnMut(Progress) + Send + 'static,
    {
        self.then_with(Handlers::passthrough().with_progress(move |progress| {
            on_progress(progress);
            Ok(())
        }))
    }

    /// Routes this promise's resolution or rejection into `target` and
    /// returns `target`.
    ///
    /// Progress is not forwarded.
    pub fn pipe(&self, target: Promise<T, E>) -> Promise<T, E> {
        self.register(Box::new(Reaction::new(
            target.clone(),
            Handlers::passthrough(),
        )));
        target
    }

    /// Like [`Promise::pipe`], for a foreign source: the returned promise
    /// follows both `source` and this promise, whichever completes first.
    pub fn pipe_thenable<S>(&self, source: S) -> Promise<T, E>
    where
        S: Thenable<T, E>,
    {
        self.pipe(Promise::from_thenable(source))
    }

    /// Runs `action` once this promise completes, either way.
    ///
    /// Returns this promise, not a continuation: whatever `action` does has
    /// no effect on what later handlers observe.
    pub fn always<F>(&self, action: F) -> Promise<T, E>
    where
        F: FnOnce() + Send + 'static,
    {
        let on_resolve = Arc::new(Mutex::new(Some(action)));
        let on_reject = Arc::clone(&on_resolve);
        let _ = self.then_with(
            Handlers::<T, (), E>::on_resolve(move |_| {
                run_once(&on_resolve);
                Ok(Next::Value(()))
            })
            .or_reject(move |_| {
                run_once(&on_reject);
                Ok(Next::Value(()))
            }),
        );
        self.clone()
    }

    /// The current state.
    pub fn state(&self) -> PromiseState {
        self.inner.lock().observed_state()
    }

    /// The terminal outcome, or `None` while pending.
    pub fn outcome(&self) -> Option<Result<T, E>> {
        match &self.inner.lock().state {
            State::Pending => None,
            State::Completed(Outcome::Resolved(value)) => Some(Ok(value.clone())),
            State::Completed(Outcome::Rejected(error)) => Some(Err(error.clone())),
        }
    }

    /// Returns true until the promise resolves or rejects.
    pub fn is_pending(&self) -> bool {
        !self.is_completed()
    }

    /// Returns true once the promise has resolved or rejected.
    pub fn is_completed(&self) -> bool {
        self.inner.lock().is_completed()
    }

    /// Number of listeners waiting for completion.
    ///
    /// Listeners out for a progress pass are not counted.
    pub fn listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }

    /// A promise that resolves with `value` on a later turn of the event loop.
    pub fn resolved(value: T) -> Self {
        let promise = Self::new();
        let target = promise.clone();
        delayed(move || target.resolve(value));
        promise
    }

    /// A promise that rejects with `error` on a later turn of the event loop.
    pub fn rejected(error: E) -> Self {
        let promise = Self::new();
        let target = promise.clone();
        delayed(move || target.reject(error));
        promise
    }

    /// Runs `action` on a later turn and follows what it returns.
    pub fn deferred<F>(action: F) -> Self
    where
        F: FnOnce() -> Result<Next<T, E>, E> + Send + 'static,
    {
        Promise::<(), E>::resolved(()).then_with(Handlers::on_resolve(move |()| action()))
    }

    fn settle(&self, outcome: Outcome<T, E>) {
        let listeners = {
            let mut inner = self.inner.lock();
            if inner.is_completed() {
                return;
            }
            inner.state = State::Completed(outcome.clone());
            if inner.dispatching {
                // The progress pass delivers the outcome to the whole list.
                return;
            }
            std::mem::take(&mut inner.listeners)
        };
        trace!(listeners = listeners.len(), "promise completed");
        for listener in listeners {
            deliver(listener, outcome.clone());
        }
    }

    fn register(&self, listener: Box<dyn Listener<T, E>>) {
        let outcome = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            match &inner.state {
                State::Pending => {
                    inner.listeners.push(listener);
                    return;
                }
                State::Completed(outcome) => outcome.clone(),
            }
        };
        trace!("listener registered after completion; replaying outcome");
        deliver(listener, outcome);
    }
}

impl<T, E> Default for Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Thenable<T, E> for Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn subscribe(&self, sink: Promise<T, E>) {
        self.register(Box::new(Relay::new(sink)));
    }
}

impl<T, E> std::fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Promise")
            .field("state", &inner.observed_state())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

fn deliver<T, E>(listener: Box<dyn Listener<T, E>>, outcome: Outcome<T, E>) {
    match outcome {
        Outcome::Resolved(value) => listener.resolve(value),
        Outcome::Rejected(error) => listener.reject(error),
    }
}

fn run_once<F: FnOnce()>(slot: &Mutex<Option<F>>) {
    let action = slot.lock().take();
    if let Some(action) = action {
        action();
    }
}
