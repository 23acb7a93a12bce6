//! Helpers bridging plain values and promises.

use crate::promise::Promise;
use core_types::PromiseError;

/// Either a value that is already available or a promise for one.
#[derive(Debug, Clone)]
pub enum MaybePromise<T, E = PromiseError> {
    /// The value is at hand.
    Ready(T),
    /// The value will arrive through a promise.
    Pending(Promise<T, E>),
}

impl<T, E> MaybePromise<T, E> {
    /// Returns true for the promise variant.
    pub fn is_pending(&self) -> bool {
        matches!(self, MaybePromise::Pending(_))
    }
}

impl<T, E> From<Promise<T, E>> for MaybePromise<T, E> {
    fn from(promise: Promise<T, E>) -> Self {
        MaybePromise::Pending(promise)
    }
}

/// Turns a maybe-promise into a promise.
///
/// A promise is returned unchanged; a plain value becomes
/// [`Promise::resolved`], completing on a later turn.
pub fn wrap<T, E>(value: MaybePromise<T, E>) -> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    match value {
        MaybePromise::Ready(value) => Promise::resolved(value),
        MaybePromise::Pending(promise) => promise,
    }
}

/// Applies `action` now or later, depending on what `value` is.
///
/// A promise gets `action` chained onto it; a plain value is handed to
/// `action` right away and its error, if any, is returned directly.
///
/// # Examples
///
/// ```
/// use core_types::PromiseError;
/// use promise_runtime::{maybe, MaybePromise, Promise};
///
/// let now = maybe(MaybePromise::<i32, PromiseError>::Ready(2), |v| Ok(v * 10)).unwrap();
/// assert!(matches!(now, MaybePromise::Ready(20)));
///
/// let source: Promise<i32> = Promise::new();
/// let later = maybe(MaybePromise::from(source.clone()), |v| Ok(v * 10)).unwrap();
/// source.resolve(3);
/// match later {
///     MaybePromise::Pending(p) => assert_eq!(p.outcome(), Some(Ok(30))),
///     MaybePromise::Ready(_) => unreachable!(),
/// }
/// ```
pub fn maybe<T, U, E, F>(value: MaybePromise<T, E>, action: F) -> Result<MaybePromise<U, E>, E>
where
    T: Clone + Send + 'static,
    U: Clone + Send + 'static,
    E: Clone + Send + 'static,
    F: FnOnce(T) -> Result<U, E> + Send + 'static,
{
    match value {
        MaybePromise::Pending(promise) => Ok(MaybePromise::Pending(promise.then(action))),
        MaybePromise::Ready(value) => action(value).map(MaybePromise::Ready),
    }
}

/// Runs an optional asynchronous step before `after`.
///
/// When `pred` holds, `action` runs first and `after` is chained onto its
/// resolution; otherwise `after` runs directly.
pub fn guarded<A, U, E, F, G>(pred: bool, action: F, after: G) -> Promise<U, E>
where
    A: Clone + Send + 'static,
    U: Clone + Send + 'static,
    E: Clone + Send + 'static,
    F: FnOnce() -> Promise<A, E>,
    G: FnOnce() -> Promise<U, E> + Send + 'static,
{
    if pred {
        action().and_then(move |_| after())
    } else {
        after()
    }
}
