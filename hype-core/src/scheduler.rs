//! Tick-indexed task scheduler.
//!
//! A registry of named, cancellable, delayed or repeating callbacks. Every
//! subsystem that needs deferred work — countdown effects, auto-save,
//! inactivity eviction, batched summons — registers a task here instead of
//! owning its own timing mechanism.
//!
//! Tasks are identified by a string id. Registering an id that already
//! exists atomically replaces the previous registration, so re-arming a
//! per-user timer is a single `add` call. Firing order within a tick is
//! ascending due-tick, FIFO on ties.
//!
//! The scheduler is generic over a context type `C` threaded into every
//! callback, so tasks can mutate shared session state without globals.
//! Callbacks also receive the scheduler itself, which lets composite
//! effects register follow-up tasks and lets a callback re-register its
//! own id.

use std::collections::{BTreeMap, HashMap};
use tracing::{debug, error};

use crate::error::Result;

/// Callback invoked when a task fires.
///
/// Errors are logged by the scheduler and never abort the remaining due
/// tasks of the same tick. Callbacks must not block; long-running effects
/// are expressed by scheduling follow-up tasks.
pub type TaskCallback<C> = Box<dyn FnMut(&mut TaskScheduler<C>, &mut C) -> Result<()>>;

struct TaskEntry<C> {
    due_tick: u64,
    /// Registration sequence number — FIFO tie-break and generation marker.
    seq: u64,
    repeating: bool,
    interval_ticks: u64,
    /// Taken out while the callback runs; `None` marks an in-flight
    /// repeating task whose re-armed slot is awaiting its callback back.
    callback: Option<TaskCallback<C>>,
}

/// Tick-indexed registry of named, cancellable tasks.
pub struct TaskScheduler<C> {
    tasks: HashMap<String, TaskEntry<C>>,
    /// Firing order index: `(due_tick, seq) -> id`, kept in sync with `tasks`.
    queue: BTreeMap<(u64, u64), String>,
    next_seq: u64,
    /// Last tick passed to [`TaskScheduler::tick`]; delays are relative to it.
    now: u64,
}

impl<C> Default for TaskScheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TaskScheduler<C> {
    /// Create an empty scheduler at tick zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            queue: BTreeMap::new(),
            next_seq: 0,
            now: 0,
        }
    }

    /// Register a one-shot task firing `delay_ticks` after the current tick.
    ///
    /// An existing task with the same id is cancelled first — no duplicate
    /// firing, no leaked timer.
    pub fn add(&mut self, id: impl Into<String>, delay_ticks: u64, callback: TaskCallback<C>) {
        self.insert(id.into(), delay_ticks, false, callback);
    }

    /// Register a repeating task firing every `interval_ticks`, first at
    /// `now + interval_ticks`. Same replacement semantics as [`Self::add`].
    ///
    /// A zero interval is clamped to one tick so a repeating task can never
    /// fire twice within the same tick.
    pub fn add_repeating(
        &mut self,
        id: impl Into<String>,
        interval_ticks: u64,
        callback: TaskCallback<C>,
    ) {
        self.insert(id.into(), interval_ticks.max(1), true, callback);
    }

    fn insert(&mut self, id: String, delay_ticks: u64, repeating: bool, callback: TaskCallback<C>) {
        self.clear(&id);
        let seq = self.next_seq;
        self.next_seq += 1;
        let due_tick = self.now.saturating_add(delay_ticks);
        self.queue.insert((due_tick, seq), id.clone());
        debug!(task = %id, due_tick, repeating, "task registered");
        self.tasks.insert(
            id,
            TaskEntry {
                due_tick,
                seq,
                repeating,
                interval_ticks: delay_ticks,
                callback: Some(callback),
            },
        );
    }

    /// Cancel a task. Unknown ids are a no-op, not an error.
    ///
    /// Cancellation is synchronous: a task cleared before its due tick
    /// never fires.
    pub fn clear(&mut self, id: &str) {
        if let Some(entry) = self.tasks.remove(id) {
            self.queue.remove(&(entry.due_tick, entry.seq));
            debug!(task = %id, "task cancelled");
        }
    }

    /// Whether a task with this id is currently registered.
    #[must_use]
    pub fn has_task(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    /// Number of registered tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no tasks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Mint a task id that cannot collide with any other minted id.
    ///
    /// Used by composite effects (batched summons, staggered waves) that
    /// need a private timer per invocation rather than a stable name.
    pub fn unique_task_id(&mut self, prefix: &str) -> String {
        let seq = self.next_seq;
        self.next_seq += 1;
        format!("{prefix}#{seq}")
    }

    /// Advance the scheduler to `current_tick`, firing every task whose due
    /// tick has been reached, in ascending due-tick order with FIFO ties.
    ///
    /// A non-repeating task is removed *before* its callback runs, so a
    /// callback re-registering the same id starts fresh. A repeating task
    /// is re-armed to `current_tick + interval` *before* its callback runs,
    /// so a callback-issued [`Self::clear`] reliably stops future firings
    /// even when the callback then fails.
    ///
    /// Callback errors are logged and do not prevent the remaining due
    /// tasks of this tick from firing.
    pub fn tick(&mut self, current_tick: u64, ctx: &mut C) {
        self.now = current_tick;
        while self
            .queue
            .first_key_value()
            .is_some_and(|(&(due, _), _)| due <= current_tick)
        {
            let Some((_, id)) = self.queue.pop_first() else {
                break;
            };
            let Some(mut entry) = self.tasks.remove(&id) else {
                continue;
            };
            let callback = entry.callback.take();

            let rearmed_seq = if entry.repeating {
                let seq = self.next_seq;
                self.next_seq += 1;
                entry.due_tick = current_tick.saturating_add(entry.interval_ticks);
                entry.seq = seq;
                self.queue.insert((entry.due_tick, seq), id.clone());
                self.tasks.insert(id.clone(), entry);
                Some(seq)
            } else {
                None
            };

            let Some(mut callback) = callback else {
                continue;
            };
            if let Err(err) = callback(self, ctx) {
                error!(task = %id, %err, "task callback failed");
            }

            // Hand the callback back to the re-armed slot, unless the
            // callback itself cleared or replaced the task in the meantime.
            if let Some(seq) = rearmed_seq
                && let Some(slot) = self.tasks.get_mut(&id)
                && slot.seq == seq
                && slot.callback.is_none()
            {
                slot.callback = Some(callback);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HypeError;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Shared firing log the test callbacks append to.
    type Log = Rc<RefCell<Vec<String>>>;

    fn log_task(log: &Log, label: &str) -> TaskCallback<()> {
        let log = Rc::clone(log);
        let label = label.to_string();
        Box::new(move |_, _| {
            log.borrow_mut().push(label.clone());
            Ok(())
        })
    }

    #[test]
    fn fires_at_due_tick_and_not_before() {
        let log: Log = Log::default();
        let mut sched = TaskScheduler::new();
        sched.add("a", 5, log_task(&log, "a"));

        sched.tick(4, &mut ());
        assert!(log.borrow().is_empty());
        assert!(sched.has_task("a"));

        sched.tick(5, &mut ());
        assert_eq!(*log.borrow(), vec!["a"]);
        assert!(!sched.has_task("a"));

        // never fires again
        sched.tick(50, &mut ());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn fires_in_due_order_with_fifo_ties() {
        let log: Log = Log::default();
        let mut sched = TaskScheduler::new();
        sched.add("late", 9, log_task(&log, "late"));
        sched.add("tie1", 3, log_task(&log, "tie1"));
        sched.add("tie2", 3, log_task(&log, "tie2"));
        sched.add("early", 1, log_task(&log, "early"));

        sched.tick(10, &mut ());
        assert_eq!(*log.borrow(), vec!["early", "tie1", "tie2", "late"]);
    }

    #[test]
    fn re_registering_an_id_cancels_the_previous_timer() {
        let log: Log = Log::default();
        let mut sched = TaskScheduler::new();
        sched.add("x", 5, log_task(&log, "cb1"));
        sched.add("x", 3, log_task(&log, "cb2"));

        sched.tick(3, &mut ());
        sched.tick(5, &mut ());
        assert_eq!(*log.borrow(), vec!["cb2"]);
    }

    #[test]
    fn clear_before_due_prevents_firing() {
        let log: Log = Log::default();
        let mut sched = TaskScheduler::new();
        sched.add("x", 2, log_task(&log, "x"));
        sched.clear("x");
        sched.clear("no-such-task"); // no-op, not an error
        sched.tick(10, &mut ());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn repeating_task_fires_every_interval() {
        let log: Log = Log::default();
        let mut sched = TaskScheduler::new();
        sched.add_repeating("r", 10, log_task(&log, "r"));

        for tick in 1..=35 {
            sched.tick(tick, &mut ());
        }
        assert_eq!(log.borrow().len(), 3); // ticks 10, 20, 30
        assert!(sched.has_task("r"));
    }

    #[test]
    fn repeating_callback_can_cancel_itself() {
        let log: Log = Log::default();
        let mut sched = TaskScheduler::new();
        let inner = Rc::clone(&log);
        sched.add_repeating(
            "r",
            5,
            Box::new(move |sched, _| {
                inner.borrow_mut().push("r".into());
                if inner.borrow().len() == 2 {
                    sched.clear("r");
                }
                Ok(())
            }),
        );

        for tick in 1..=50 {
            sched.tick(tick, &mut ());
        }
        assert_eq!(log.borrow().len(), 2);
        assert!(!sched.has_task("r"));
    }

    #[test]
    fn repeating_callback_error_still_rearms() {
        let log: Log = Log::default();
        let mut sched = TaskScheduler::new();
        let inner = Rc::clone(&log);
        sched.add_repeating(
            "flaky",
            5,
            Box::new(move |_, _| {
                inner.borrow_mut().push("fired".into());
                Err(HypeError::Backend("boom".into()))
            }),
        );

        for tick in 1..=15 {
            sched.tick(tick, &mut ());
        }
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn callback_can_re_register_its_own_id() {
        let log: Log = Log::default();
        let mut sched = TaskScheduler::new();
        let inner = Rc::clone(&log);
        sched.add(
            "chain",
            2,
            Box::new(move |sched, _| {
                inner.borrow_mut().push("first".into());
                let inner2 = Rc::clone(&inner);
                sched.add(
                    "chain",
                    2,
                    Box::new(move |_, _| {
                        inner2.borrow_mut().push("second".into());
                        Ok(())
                    }),
                );
                Ok(())
            }),
        );

        sched.tick(2, &mut ());
        assert!(sched.has_task("chain"));
        sched.tick(4, &mut ());
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn failing_task_does_not_block_same_tick_siblings() {
        let log: Log = Log::default();
        let mut sched = TaskScheduler::new();
        sched.add(
            "bad",
            1,
            Box::new(|_, _| Err(HypeError::Backend("collaborator down".into()))),
        );
        sched.add("good", 1, log_task(&log, "good"));

        sched.tick(1, &mut ());
        assert_eq!(*log.borrow(), vec!["good"]);
    }

    #[test]
    fn tasks_scheduled_during_tick_fire_relative_to_current_tick() {
        let log: Log = Log::default();
        let mut sched = TaskScheduler::new();
        let inner = Rc::clone(&log);
        sched.add(
            "outer",
            3,
            Box::new(move |sched, _| {
                let inner2 = Rc::clone(&inner);
                sched.add(
                    "inner",
                    4,
                    Box::new(move |_, _| {
                        inner2.borrow_mut().push("inner".into());
                        Ok(())
                    }),
                );
                Ok(())
            }),
        );

        sched.tick(3, &mut ());
        sched.tick(6, &mut ());
        assert!(log.borrow().is_empty());
        sched.tick(7, &mut ()); // 3 + 4
        assert_eq!(*log.borrow(), vec!["inner"]);
    }

    #[test]
    fn unique_task_ids_never_collide() {
        let mut sched: TaskScheduler<()> = TaskScheduler::new();
        let a = sched.unique_task_id("wave");
        let b = sched.unique_task_id("wave");
        assert_ne!(a, b);
    }
}
