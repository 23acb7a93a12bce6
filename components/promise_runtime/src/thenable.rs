//! Interoperability with foreign promise-like sources.
//!
//! Anything that can report a resolution, a rejection and progress can take
//! part in a promise chain by implementing [`Thenable`].

use crate::promise::Promise;

/// A source of promise events.
///
/// Implementors forward every event they eventually produce into `sink`:
/// a success into [`Promise::resolve`], a failure into [`Promise::reject`]
/// and any progress into [`Promise::progress`]. The sink ignores everything
/// after the first resolve or reject, so implementors do not need to guard
/// against double completion themselves.
///
/// # Examples
///
/// ```
/// use promise_runtime::{Promise, Thenable};
///
/// /// A source that already knows its answer.
/// struct Ready(i32);
///
/// impl Thenable<i32> for Ready {
///     fn subscribe(&self, sink: Promise<i32>) {
///         sink.resolve(self.0);
///     }
/// }
///
/// let promise = Promise::from_thenable(Ready(7));
/// assert_eq!(promise.outcome(), Some(Ok(7)));
/// ```
pub trait Thenable<T, E = core_types::PromiseError>: Send {
    /// Routes this source's events into `sink`.
    fn subscribe(&self, sink: Promise<T, E>);
}

/// What a resolve or reject handler produces for its continuation.
pub enum Next<T, E = core_types::PromiseError> {
    /// Resolve the continuation with this value
    Value(T),
    /// Adopt the eventual outcome and progress of this source
    Adopt(Box<dyn Thenable<T, E>>),
}

impl<T, E> Next<T, E> {
    /// Resolve the continuation with `value`.
    pub fn value(value: T) -> Self {
        Next::Value(value)
    }

    /// Adopt the events of `source`.
    pub fn adopt<S>(source: S) -> Self
    where
        S: Thenable<T, E> + 'static,
    {
        Next::Adopt(Box::new(source))
    }
}

impl<T, E> From<Promise<T, E>> for Next<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn from(promise: Promise<T, E>) -> Self {
        Next::Adopt(Box::new(promise))
    }
}

impl<T, E> std::fmt::Debug for Next<T, E>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Next::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Next::Adopt(_) => write!(f, "Adopt(..)"),
        }
    }
}
