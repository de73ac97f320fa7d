//! Time and tick scheduling seams.
//!
//! The engine never reads the system clock or sleeps on its own. It asks a
//! [`Clock`] for the time and arms a repeating task on a [`Scheduler`]; the
//! host decides how the task actually fires.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Milliseconds since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock. Clones share the same reading, so a test can keep one
/// copy and move the other into the game.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<f64>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now_ms.set(self.now_ms.get() + delta_ms);
    }

    pub fn set(&self, now_ms: f64) {
        self.now_ms.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }
}

/// Identifies one armed repeating task. Never reused by a scheduler.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Repeating-task primitive used by the lifecycle controller.
pub trait Scheduler {
    /// Arms a task that fires every `interval`.
    fn schedule(&mut self, interval: Duration) -> TimerHandle;

    /// Disarms `handle`. Unknown or already cancelled handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Debug, Clone, Copy)]
struct ArmedTask {
    handle: TimerHandle,
    interval: Duration,
    next_due: Instant,
}

/// Scheduler polled from the host's frame loop.
///
/// Holds one task at a time; arming a new one replaces the old.
#[derive(Debug, Default)]
pub struct IntervalScheduler {
    next_id: u64,
    task: Option<ArmedTask>,
}

impl IntervalScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a task whose first fire is one `interval` after `now`.
    pub fn schedule_at(&mut self, interval: Duration, now: Instant) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.task = Some(ArmedTask {
            handle,
            interval,
            next_due: now + interval,
        });
        handle
    }

    /// Returns the armed handle when its deadline has passed and moves the
    /// deadline on by one interval. A loop that fell more than one interval
    /// behind fires once and restarts the cadence from `now`.
    pub fn poll_due(&mut self, now: Instant) -> Option<TimerHandle> {
        let task = self.task.as_mut()?;
        if now < task.next_due {
            return None;
        }

        task.next_due += task.interval;
        if task.next_due <= now {
            task.next_due = now + task.interval;
        }
        Some(task.handle)
    }

    /// Time left until the armed task is due, if one is armed.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.task
            .map(|task| task.next_due.saturating_duration_since(now))
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.task.is_some()
    }
}

impl Scheduler for IntervalScheduler {
    fn schedule(&mut self, interval: Duration) -> TimerHandle {
        self.schedule_at(interval, Instant::now())
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.task.is_some_and(|task| task.handle == handle) {
            self.task = None;
        }
    }
}

/// One call recorded by [`ManualScheduler`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SchedulerEvent {
    Armed(TimerHandle, Duration),
    Cancelled(TimerHandle),
}

/// Scheduler that never fires on its own. Tests read what was armed and fire
/// it by hand through the controller.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    armed: Vec<(TimerHandle, Duration)>,
    events: Vec<SchedulerEvent>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently armed task that is still live.
    #[must_use]
    pub fn armed(&self) -> Option<(TimerHandle, Duration)> {
        self.armed.last().copied()
    }

    /// Number of tasks armed and not cancelled.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.armed.len()
    }

    #[must_use]
    pub fn events(&self) -> &[SchedulerEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, interval: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.armed.push((handle, interval));
        self.events.push(SchedulerEvent::Armed(handle, interval));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.armed.retain(|(armed, _)| *armed != handle);
        self.events.push(SchedulerEvent::Cancelled(handle));
    }
}
