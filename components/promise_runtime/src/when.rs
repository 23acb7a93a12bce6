//! Fan-in over a fixed set of promises.

use crate::defer::delayed;
use crate::listener::Handlers;
use crate::promise::Promise;
use crate::thenable::Next;
use core_types::Progress;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

struct Aggregate<T, E> {
    total: usize,
    count: usize,
    results: Vec<Option<T>>,
    error: Option<E>,
}

enum Report<T, E> {
    Progress(Progress),
    Resolve(Vec<T>),
    Reject(E),
}

/// Combines `promises` into one promise for all of their values.
///
/// The result resolves with the values in input order once every input has
/// resolved. If any input rejects, the result rejects with the first error,
/// but only after every input has completed. Until then, each completion
/// reports `completed / total` as progress.
///
/// An empty input resolves with an empty vector on a later turn of the
/// event loop, never synchronously.
///
/// # Examples
///
/// ```
/// use promise_runtime::{when, Promise};
///
/// let a: Promise<&str> = Promise::new();
/// let b: Promise<&str> = Promise::new();
/// let both = when([a.clone(), b.clone()]);
///
/// b.resolve("b");
/// a.resolve("a");
/// assert_eq!(both.outcome(), Some(Ok(vec!["a", "b"])));
/// ```
pub fn when<T, E, I>(promises: I) -> Promise<Vec<T>, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<T, E>>,
{
    let promises: Vec<Promise<T, E>> = promises.into_iter().collect();
    let total = promises.len();
    let combined = Promise::new();

    if total == 0 {
        let target = combined.clone();
        delayed(move || target.resolve(Vec::new()));
        return combined;
    }

    let aggregate = Arc::new(Mutex::new(Aggregate {
        total,
        count: 0,
        results: (0..total).map(|_| None).collect(),
        error: None,
    }));

    for (index, promise) in promises.iter().enumerate() {
        let (on_value, value_target) = (Arc::clone(&aggregate), combined.clone());
        let (on_error, error_target) = (Arc::clone(&aggregate), combined.clone());
        let _ = promise.then_with(
            Handlers::<T, (), E>::on_resolve(move |value| {
                record(&on_value, &value_target, index, Ok(value));
                Ok(Next::Value(()))
            })
            .or_reject(move |error| {
                record(&on_error, &error_target, index, Err(error));
                Ok(Next::Value(()))
            }),
        );
    }

    combined
}

fn record<T, E>(
    aggregate: &Mutex<Aggregate<T, E>>,
    combined: &Promise<Vec<T>, E>,
    index: usize,
    result: Result<T, E>,
) where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let report = {
        let mut agg = aggregate.lock();
        agg.count += 1;
        match result {
            Ok(value) => agg.results[index] = Some(value),
            Err(error) => {
                if agg.error.is_none() {
                    agg.error = Some(error);
                }
            }
        }

        if agg.count < agg.total {
            Report::Progress(Progress::ratio(agg.count, agg.total))
        } else if let Some(error) = agg.error.take() {
            Report::Reject(error)
        } else {
            Report::Resolve(agg.results.drain(..).flatten().collect())
        }
    };

    match report {
        Report::Progress(progress) => combined.progress(progress),
        Report::Resolve(values) => {
            debug!(count = values.len(), "all inputs resolved");
            combined.resolve(values);
        }
        Report::Reject(error) => {
            debug!("all inputs completed with at least one rejection");
            combined.reject(error);
        }
    }
}

/// Combines promises given as separate arguments; see [`when()`].
///
/// # Examples
///
/// ```
/// use promise_runtime::{when, Promise};
///
/// let a: Promise<i32> = Promise::new();
/// let b: Promise<i32> = Promise::new();
/// let both = when![a.clone(), b.clone()];
/// a.resolve(1);
/// b.resolve(2);
/// assert_eq!(both.outcome(), Some(Ok(vec![1, 2])));
/// ```
#[macro_export]
macro_rules! when {
    ($($promise:expr),* $(,)?) => {
        $crate::when(::std::vec![$($promise),*])
    };
}
