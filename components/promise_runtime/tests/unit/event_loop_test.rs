//! Unit tests for EventLoop and deferred execution

use promise_runtime::config::MAX_DELAY_MS;
use promise_runtime::{delayed, delayed_by, EventLoop, SchedulerConfig, Task};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn recorder() -> Arc<Mutex<Vec<u32>>> {
    Arc::new(Mutex::new(vec![]))
}

fn record(log: &Arc<Mutex<Vec<u32>>>, n: u32) -> impl FnOnce() + Send + 'static {
    let log = Arc::clone(log);
    move || log.lock().unwrap().push(n)
}

#[test]
fn new_event_loop_is_idle() {
    let event_loop = EventLoop::new();
    assert!(event_loop.is_idle());
    assert_eq!(event_loop.pending(), 0);
}

#[test]
fn enqueue_task_adds_to_task_queue() {
    let event_loop = EventLoop::new();
    event_loop.enqueue_task(Task::new(|| {}));
    assert!(!event_loop.is_task_queue_empty());
    assert!(event_loop.is_timer_queue_empty());
}

#[test]
fn task_queue_fifo_order() {
    let event_loop = EventLoop::new();
    let log = recorder();
    event_loop.enqueue_task(Task::new(record(&log, 1)));
    event_loop.enqueue_task(Task::new(record(&log, 2)));

    assert_eq!(event_loop.run_until_done(), 2);
    assert_eq!(*log.lock().unwrap(), vec![1, 2]);
}

#[test]
fn process_one_cycle_runs_single_task() {
    let event_loop = EventLoop::new();
    let log = recorder();
    event_loop.enqueue_task(Task::new(record(&log, 1)));
    event_loop.enqueue_task(Task::new(record(&log, 2)));

    assert!(event_loop.process_one_cycle());
    assert_eq!(*log.lock().unwrap(), vec![1]);
    assert_eq!(event_loop.pending(), 1);
}

#[test]
fn process_one_cycle_on_idle_loop() {
    let event_loop = EventLoop::new();
    assert!(!event_loop.process_one_cycle());
}

#[test]
fn delayed_uses_current_loop() {
    let log = recorder();
    delayed(record(&log, 7));
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(EventLoop::current().pending(), 1);

    EventLoop::current().run_until_done();
    assert_eq!(*log.lock().unwrap(), vec![7]);
}

#[test]
fn delayed_by_respects_delay() {
    let log = recorder();
    let start = Instant::now();
    delayed_by(record(&log, 1), Duration::from_millis(20));

    EventLoop::current().run_until_done();
    assert!(start.elapsed() >= Duration::from_millis(20));
    assert_eq!(*log.lock().unwrap(), vec![1]);
}

#[test]
fn delayed_by_zero_behaves_like_delayed() {
    let log = recorder();
    delayed_by(record(&log, 1), Duration::ZERO);
    assert!(!EventLoop::current().is_task_queue_empty());
    EventLoop::current().run_until_done();
}

#[test]
fn huge_delay_is_clamped_instead_of_overflowing() {
    let event_loop = EventLoop::new();
    let previous = event_loop.make_current();

    delayed_by(|| {}, Duration::MAX);
    assert_eq!(event_loop.pending(), 1);
    assert!(!event_loop.is_timer_queue_empty());
    assert!(!event_loop.process_one_cycle());

    previous.unwrap_or_default().make_current();
}

#[test]
fn huge_default_delay_is_clamped() {
    let config = SchedulerConfig::default()
        .with_prefer_immediate(false)
        .with_default_delay(Duration::MAX);
    assert_eq!(config.default_delay_ms, MAX_DELAY_MS);
    assert!(config.validate().is_ok());

    let event_loop = EventLoop::with_config(config);
    event_loop.defer(|| {});
    assert_eq!(event_loop.pending(), 1);
}

#[test]
fn timer_only_host_still_runs_in_order() {
    let event_loop = EventLoop::with_config(SchedulerConfig::default().with_prefer_immediate(false));
    let previous = event_loop.make_current();
    let log = recorder();

    delayed(record(&log, 1));
    delayed(record(&log, 2));
    delayed(record(&log, 3));
    assert!(event_loop.is_task_queue_empty());

    assert_eq!(event_loop.run_until_done(), 3);
    assert_eq!(*log.lock().unwrap(), vec![1, 2, 3]);

    previous.unwrap_or_default().make_current();
}

#[test]
fn default_delay_applies_to_timer_host() {
    let config = SchedulerConfig::default()
        .with_prefer_immediate(false)
        .with_default_delay(Duration::from_millis(10));
    let event_loop = EventLoop::with_config(config);
    let start = Instant::now();
    event_loop.defer(|| {});

    event_loop.run_until_done();
    assert!(start.elapsed() >= Duration::from_millis(10));
}

#[test]
fn handle_can_schedule_from_another_thread() {
    let event_loop = EventLoop::new();
    let log = recorder();

    let remote = event_loop.clone();
    let task = record(&log, 42);
    std::thread::spawn(move || remote.defer(task)).join().unwrap();

    assert_eq!(event_loop.run_until_done(), 1);
    assert_eq!(*log.lock().unwrap(), vec![42]);
}

#[test]
fn config_loaded_from_json() {
    let config =
        SchedulerConfig::from_json(r#"{ "prefer_immediate": true, "default_delay_ms": 5 }"#)
            .unwrap();
    assert_eq!(config.default_delay(), Duration::from_millis(5));
    let event_loop = EventLoop::with_config(config.clone());
    assert_eq!(event_loop.config(), &config);
}

#[test]
fn config_rejects_malformed_json() {
    assert!(SchedulerConfig::from_json("prefer_immediate = true").is_err());
}
