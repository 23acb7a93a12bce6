//! Listener records registered on a promise.
//!
//! A listener owns the continuation promise returned by `then` together with
//! the optional handler for each event kind. Events for which no handler
//! exists pass through to the continuation unchanged, except progress, which
//! is dropped.

use crate::promise::Promise;
use crate::thenable::Next;
use core_types::Progress;
use tracing::debug;

type ResolveFn<T, U, E> = Box<dyn FnOnce(T) -> Result<Next<U, E>, E> + Send>;
type RejectFn<U, E> = Box<dyn FnOnce(E) -> Result<Next<U, E>, E> + Send>;
type ProgressFn<E> = Box<dyn FnMut(Progress) -> Result<(), E> + Send>;

/// Receives the events of one promise.
pub(crate) trait Listener<T, E>: Send {
    fn resolve(self: Box<Self>, value: T);
    fn reject(self: Box<Self>, error: E);
    fn progress(&mut self, progress: &Progress);
}

enum OnResolve<T, U, E> {
    /// No handler: the value moves to the continuation as is.
    Forward(fn(T) -> U),
    Call(ResolveFn<T, U, E>),
}

/// The handlers of one `then` registration.
///
/// A handler returning `Err` rejects the continuation with that error, the
/// way a thrown exception would. A progress handler's `Err` is dropped:
/// progress is advisory and never rejects anything.
///
/// # Examples
///
/// ```
/// use core_types::PromiseError;
/// use promise_runtime::{Handlers, Next, Promise};
///
/// let source: Promise<i32> = Promise::new();
/// let doubled = source.then_with(
///     Handlers::on_resolve(|v: i32| Ok(Next::Value(v * 2)))
///         .or_reject(|_err: PromiseError| Ok(Next::Value(0))),
/// );
///
/// source.resolve(21);
/// assert_eq!(doubled.outcome(), Some(Ok(42)));
/// ```
pub struct Handlers<T, U, E> {
    on_resolve: OnResolve<T, U, E>,
    on_reject: Option<RejectFn<U, E>>,
    on_progress: Option<ProgressFn<E>>,
}

impl<T, U, E> Handlers<T, U, E>
where
    T: 'static,
    U: 'static,
    E: 'static,
{
    /// Handlers with a resolve callback and nothing else.
    pub fn on_resolve<F>(f: F) -> Self
    where
        F: FnOnce(T) -> Result<Next<U, E>, E> + Send + 'static,
    {
        Self {
            on_resolve: OnResolve::Call(Box::new(f)),
            on_reject: None,
            on_progress: None,
        }
    }

    /// Adds a reject callback.
    pub fn or_reject<F>(mut self, f: F) -> Self
    where
        F: FnOnce(E) -> Result<Next<U, E>, E> + Send + 'static,
    {
        self.on_reject = Some(Box::new(f));
        self
    }

    /// Adds a progress callback.
    pub fn with_progress<F>(mut self, f: F) -> Self
    where
        F: FnMut(Progress) -> Result<(), E> + Send + 'static,
    {
        self.on_progress = Some(Box::new(f));
        self
    }
}

impl<T, E> Handlers<T, T, E>
where
    T: 'static,
    E: 'static,
{
    /// Handlers without a resolve callback: the value passes through.
    pub fn passthrough() -> Self {
        Self {
            on_resolve: OnResolve::Forward(std::convert::identity),
            on_reject: None,
            on_progress: None,
        }
    }
}

impl<T, E> Default for Handlers<T, T, E>
where
    T: 'static,
    E: 'static,
{
    fn default() -> Self {
        Self::passthrough()
    }
}

/// A `then` registration: handlers plus the continuation they feed.
pub(crate) struct Reaction<T, U, E> {
    continuation: Promise<U, E>,
    handlers: Handlers<T, U, E>,
}

impl<T, U, E> Reaction<T, U, E> {
    pub(crate) fn new(continuation: Promise<U, E>, handlers: Handlers<T, U, E>) -> Self {
        Self {
            continuation,
            handlers,
        }
    }
}

impl<T, U, E> Listener<T, E> for Reaction<T, U, E>
where
    T: Send + 'static,
    U: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn resolve(self: Box<Self>, value: T) {
        let Reaction {
            continuation,
            handlers,
        } = *self;
        match handlers.on_resolve {
            OnResolve::Forward(forward) => continuation.resolve(forward(value)),
            OnResolve::Call(callback) => continue_with(&continuation, callback(value)),
        }
    }

    fn reject(self: Box<Self>, error: E) {
        let Reaction {
            continuation,
            handlers,
        } = *self;
        match handlers.on_reject {
            Some(callback) => continue_with(&continuation, callback(error)),
            None => continuation.reject(error),
        }
    }

    fn progress(&mut self, progress: &Progress) {
        if let Some(callback) = self.handlers.on_progress.as_mut() {
            if callback(progress.clone()).is_err() {
                debug!(
                    fraction = progress.fraction(),
                    "progress handler failed; error dropped"
                );
            }
        }
    }
}

/// Forwards every event, progress included, into a sink promise.
pub(crate) struct Relay<T, E> {
    sink: Promise<T, E>,
}

impl<T, E> Relay<T, E> {
    pub(crate) fn new(sink: Promise<T, E>) -> Self {
        Self { sink }
    }
}

impl<T, E> Listener<T, E> for Relay<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn resolve(self: Box<Self>, value: T) {
        self.sink.resolve(value);
    }

    fn reject(self: Box<Self>, error: E) {
        self.sink.reject(error);
    }

    fn progress(&mut self, progress: &Progress) {
        self.sink.progress(progress.clone());
    }
}

fn continue_with<U, E>(continuation: &Promise<U, E>, result: Result<Next<U, E>, E>)
where
    U: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    match result {
        Ok(Next::Value(value)) => continuation.resolve(value),
        Ok(Next::Adopt(source)) => source.subscribe(continuation.clone()),
        Err(error) => continuation.reject(error),
    }
}
