//! Unit tests for the static constructors and helpers

use core_types::PromiseError;
use promise_runtime::{guarded, maybe, wrap, EventLoop, MaybePromise, Next, Promise};
use std::sync::{Arc, Mutex};

#[test]
fn resolved_waits_one_turn() {
    let promise: Promise<i32> = Promise::resolved(5);
    let seen = Arc::new(Mutex::new(None));
    let s = Arc::clone(&seen);
    let _ = promise.then(move |v| {
        *s.lock().unwrap() = Some(v);
        Ok(())
    });

    assert_eq!(*seen.lock().unwrap(), None);
    EventLoop::current().run_until_done();
    assert_eq!(*seen.lock().unwrap(), Some(5));
}

#[test]
fn rejected_waits_one_turn() {
    let promise: Promise<i32> = Promise::rejected(PromiseError::rejected("later"));
    assert!(promise.is_pending());

    EventLoop::current().run_until_done();
    assert_eq!(promise.outcome(), Some(Err(PromiseError::rejected("later"))));
}

#[test]
fn deferred_runs_action_on_later_turn() {
    let ran = Arc::new(Mutex::new(false));
    let r = Arc::clone(&ran);
    let promise: Promise<&'static str> = Promise::deferred(move || {
        *r.lock().unwrap() = true;
        Ok(Next::Value("did it"))
    });

    assert!(!*ran.lock().unwrap());
    EventLoop::current().run_until_done();
    assert!(*ran.lock().unwrap());
    assert_eq!(promise.outcome(), Some(Ok("did it")));
}

#[test]
fn deferred_adopts_returned_promise() {
    let inner: Promise<i32> = Promise::new();
    let i = inner.clone();
    let promise = Promise::deferred(move || Ok(Next::from(i)));

    EventLoop::current().run_until_done();
    assert!(promise.is_pending());

    inner.resolve(12);
    assert_eq!(promise.outcome(), Some(Ok(12)));
}

#[test]
fn deferred_error_rejects() {
    let promise: Promise<i32> = Promise::deferred(|| Err(PromiseError::thrown("failed")));
    EventLoop::current().run_until_done();
    assert_eq!(promise.outcome(), Some(Err(PromiseError::thrown("failed"))));
}

#[test]
fn wrap_promise_is_identity() {
    let promise: Promise<i32> = Promise::new();
    let wrapped = wrap(MaybePromise::Pending(promise.clone()));
    promise.resolve(1);
    assert_eq!(wrapped.outcome(), Some(Ok(1)));
}

#[test]
fn wrap_value_resolves_later() {
    let wrapped: Promise<String> = wrap(MaybePromise::Ready("text".to_string()));
    assert!(wrapped.is_pending());
    EventLoop::current().run_until_done();
    assert_eq!(wrapped.outcome(), Some(Ok("text".to_string())));
}

#[test]
fn maybe_value_runs_synchronously() {
    let calls = Arc::new(Mutex::new(0));
    let c = Arc::clone(&calls);
    let result = maybe(MaybePromise::<i32, PromiseError>::Ready(4), move |v| {
        *c.lock().unwrap() += 1;
        Ok(v + 1)
    })
    .unwrap();

    assert_eq!(*calls.lock().unwrap(), 1);
    assert!(matches!(result, MaybePromise::Ready(5)));
}

#[test]
fn maybe_promise_chains() {
    let source: Promise<i32> = Promise::new();
    let result = maybe(MaybePromise::from(source.clone()), |v| Ok(v + 1)).unwrap();
    assert!(result.is_pending());

    source.resolve(4);
    let MaybePromise::Pending(chained) = result else {
        panic!("expected a promise");
    };
    assert_eq!(chained.outcome(), Some(Ok(5)));
}

#[test]
fn guarded_true_runs_action_then_after() {
    let order = Arc::new(Mutex::new(vec![]));
    let o1 = Arc::clone(&order);
    let o2 = Arc::clone(&order);
    let step: Promise<()> = Promise::new();
    let s = step.clone();

    let result = guarded(
        true,
        move || {
            o1.lock().unwrap().push("action");
            s
        },
        move || {
            o2.lock().unwrap().push("after");
            Promise::resolved(3)
        },
    );

    assert_eq!(*order.lock().unwrap(), vec!["action"]);
    step.resolve(());
    assert_eq!(*order.lock().unwrap(), vec!["action", "after"]);

    EventLoop::current().run_until_done();
    assert_eq!(result.outcome(), Some(Ok(3)));
}

#[test]
fn guarded_false_skips_action() {
    let order = Arc::new(Mutex::new(vec![]));
    let o1 = Arc::clone(&order);
    let o2 = Arc::clone(&order);

    let result: Promise<i32> = guarded(
        false,
        move || {
            o1.lock().unwrap().push("action");
            Promise::<(), PromiseError>::new()
        },
        move || {
            o2.lock().unwrap().push("after");
            Promise::resolved(9)
        },
    );

    EventLoop::current().run_until_done();
    assert_eq!(*order.lock().unwrap(), vec!["after"]);
    assert_eq!(result.outcome(), Some(Ok(9)));
}

#[test]
fn guarded_action_failure_skips_after() {
    let ran_after = Arc::new(Mutex::new(false));
    let r = Arc::clone(&ran_after);
    let result: Promise<i32> = guarded(
        true,
        || Promise::<(), PromiseError>::rejected(PromiseError::rejected("save failed")),
        move || {
            *r.lock().unwrap() = true;
            Promise::resolved(1)
        },
    );

    EventLoop::current().run_until_done();
    assert!(!*ran_after.lock().unwrap());
    assert_eq!(result.outcome(), Some(Err(PromiseError::rejected("save failed"))));
}
