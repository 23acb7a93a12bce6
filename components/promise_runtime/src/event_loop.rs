//! Event loop implementation.
//!
//! This module provides the host task queue that deferred execution runs on.
//! Each thread has a current loop, created on first use; promises created on
//! that thread defer their work onto it.

use crate::config::{SchedulerConfig, MAX_DELAY_MS};
use crate::task_queue::{Task, TaskQueue, TimerQueue};
use parking_lot::Mutex;
use std::cell::RefCell;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

thread_local! {
    static CURRENT: RefCell<Option<EventLoop>> = const { RefCell::new(None) };
}

#[derive(Debug, Default)]
struct Queues {
    tasks: TaskQueue,
    timers: TimerQueue,
}

enum Step {
    Run(Task),
    Wait(Instant),
    Idle,
}

/// A cooperative event loop.
///
/// Each turn of the loop runs one ready task: tasks in the immediate queue
/// first, then timers whose deadline has passed. Tasks run with the queues
/// unlocked, so a task may schedule more work.
///
/// `EventLoop` is a handle: clones share the same queues, and a handle may
/// be sent to another thread to schedule work back onto this loop.
///
/// # Examples
///
/// ```
/// use promise_runtime::{EventLoop, Task};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let event_loop = EventLoop::new();
/// let counter = Arc::new(AtomicUsize::new(0));
///
/// let c = Arc::clone(&counter);
/// event_loop.enqueue_task(Task::new(move || {
///     c.fetch_add(1, Ordering::SeqCst);
/// }));
///
/// assert_eq!(event_loop.run_until_done(), 1);
/// assert_eq!(counter.load(Ordering::SeqCst), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventLoop {
    queues: Arc<Mutex<Queues>>,
    config: Arc<SchedulerConfig>,
}

impl EventLoop {
    /// Creates a new EventLoop with empty queues and the default configuration.
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Creates a new EventLoop with the given configuration.
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            queues: Arc::new(Mutex::new(Queues::default())),
            config: Arc::new(config),
        }
    }

    /// Returns the current thread's event loop, creating it on first use.
    pub fn current() -> EventLoop {
        CURRENT.with(|current| {
            current
                .borrow_mut()
                .get_or_insert_with(EventLoop::new)
                .clone()
        })
    }

    /// Makes this loop the current thread's event loop.
    ///
    /// # Returns
    ///
    /// The previously installed loop, if any.
    pub fn make_current(&self) -> Option<EventLoop> {
        CURRENT.with(|current| current.borrow_mut().replace(self.clone()))
    }

    /// The configuration this loop was created with.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Adds a task to the immediate queue.
    pub fn enqueue_task(&self, task: Task) {
        self.queues.lock().tasks.enqueue(task);
    }

    /// Adds a task to the timer queue, ready once `delay` has elapsed.
    ///
    /// Delays longer than [`MAX_DELAY_MS`] are clamped to it.
    pub fn enqueue_timer(&self, task: Task, delay: Duration) {
        let delay = delay.min(Duration::from_millis(MAX_DELAY_MS));
        let now = Instant::now();
        let deadline = now.checked_add(delay).unwrap_or(now);
        self.queues.lock().timers.schedule(task, deadline);
    }

    /// Schedules `action` for a later turn.
    ///
    /// Uses the immediate queue when the configuration prefers it and no
    /// default delay is set; otherwise uses the timer queue with the default
    /// delay.
    pub fn defer<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = self.config.default_delay();
        if self.config.prefer_immediate && delay.is_zero() {
            trace!("deferring onto the immediate queue");
            self.enqueue_task(Task::new(action));
        } else {
            trace!(delay_ms = delay.as_millis() as u64, "deferring onto the timer queue");
            self.enqueue_timer(Task::new(action), delay);
        }
    }

    /// Schedules `action` to run once `delay` has elapsed.
    ///
    /// A zero delay behaves like [`EventLoop::defer`].
    pub fn defer_by<F>(&self, action: F, delay: Duration)
    where
        F: FnOnce() + Send + 'static,
    {
        if delay.is_zero() {
            self.defer(action);
        } else {
            trace!(delay_ms = delay.as_millis() as u64, "deferring onto the timer queue");
            self.enqueue_timer(Task::new(action), delay);
        }
    }

    /// Returns true if the immediate queue is empty.
    pub fn is_task_queue_empty(&self) -> bool {
        self.queues.lock().tasks.is_empty()
    }

    /// Returns true if no timers are pending.
    pub fn is_timer_queue_empty(&self) -> bool {
        self.queues.lock().timers.is_empty()
    }

    /// Returns true if there is no scheduled work at all.
    pub fn is_idle(&self) -> bool {
        let queues = self.queues.lock();
        queues.tasks.is_empty() && queues.timers.is_empty()
    }

    /// Returns the number of scheduled tasks, immediate and timed.
    pub fn pending(&self) -> usize {
        let queues = self.queues.lock();
        queues.tasks.len() + queues.timers.len()
    }

    /// Processes one turn: runs a single ready task, if there is one.
    ///
    /// Never sleeps; a timer whose deadline has not passed is left queued.
    ///
    /// # Returns
    ///
    /// `true` if a task ran.
    pub fn process_one_cycle(&self) -> bool {
        match self.next_step() {
            Step::Run(task) => {
                task.run();
                true
            }
            Step::Wait(_) | Step::Idle => false,
        }
    }

    /// Runs the event loop until both queues are empty.
    ///
    /// When only future timers remain, the calling thread sleeps until the
    /// earliest deadline.
    ///
    /// # Returns
    ///
    /// The number of tasks executed.
    pub fn run_until_done(&self) -> usize {
        let mut executed = 0;
        loop {
            match self.next_step() {
                Step::Run(task) => {
                    task.run();
                    executed += 1;
                }
                Step::Wait(deadline) => {
                    let now = Instant::now();
                    if deadline > now {
                        std::thread::sleep(deadline - now);
                    }
                }
                Step::Idle => break,
            }
        }
        trace!(executed, "event loop drained");
        executed
    }

    fn next_step(&self) -> Step {
        let mut queues = self.queues.lock();
        if let Some(task) = queues.tasks.dequeue() {
            return Step::Run(task);
        }
        if let Some(task) = queues.timers.pop_due(Instant::now()) {
            return Step::Run(task);
        }
        match queues.timers.next_deadline() {
            Some(deadline) => Step::Wait(deadline),
            None => Step::Idle,
        }
    }
}
