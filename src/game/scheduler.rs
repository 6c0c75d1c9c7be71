use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use log::trace;

pub type Task = Box<dyn FnOnce()>;

/// Shared flag checked right before a scheduled task runs. A scheduler may
/// also attach a hook that detaches the task from its event loop on cancel.
#[derive(Clone, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
    on_cancel: Rc<RefCell<Option<Task>>>,
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
        let hook = self.on_cancel.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Runs `hook` on the first `cancel`. Replaces any earlier hook.
    pub fn on_cancel(&self, hook: Task) {
        *self.on_cancel.borrow_mut() = Some(hook);
    }

/// Wraps `task` so it becomes a no-op once this token is cancelled.
    pub fn guard(&self, task: Task) -> Task {
        let token = self.clone();
        Box::new(move || {
            if token.is_cancelled() {
                trace!(target: "scheduler", "Skipping cancelled task");
                return;
            }
            task();
        })
    }
}

/// Single-threaded deferred execution. Tasks always run on the thread that
/// owns the scheduler, never re-entrantly from inside `defer`/`schedule`.
pub trait Scheduler {
    /// Runs `task` on the next tick.
    fn defer(&self, task: Task) -> CancellationToken;

    fn schedule(&self, delay: Duration, task: Task) -> CancellationToken;
}

struct PendingTask {
    due: Duration,
    seq: u64,
    token: CancellationToken,
    task: Task,
}

#[derive(Default)]
struct ManualSchedulerState {
    now: Duration,
    next_seq: u64,
    pending: Vec<PendingTask>,
}

/// Scheduler driven by an explicit virtual clock, for tests and for hosts
/// that pump their own loop.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualSchedulerState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    pub fn pending_count(&self) -> usize {
        self.state
            .borrow()
            .pending
            .iter()
            .filter(|pending| !pending.token.is_cancelled())
            .count()
    }

    /// Runs every task that is due right now, including tasks those tasks defer.
    pub fn run_until_idle(&self) -> usize {
        self.advance(Duration::ZERO)
    }

    /// Moves the clock forward, running due tasks in (due time, insertion)
    /// order. Returns how many tasks actually ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = 0;
        while let Some(pending) = self.take_next_due(target) {
            if pending.token.is_cancelled() {
                continue;
            }
            (pending.task)();
            ran += 1;
        }
        self.state.borrow_mut().now = target;
        ran
    }

    fn take_next_due(&self, target: Duration) -> Option<PendingTask> {
        let mut state = self.state.borrow_mut();
        let index = state
            .pending
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= target)
            .min_by_key(|(_, pending)| (pending.due, pending.seq))
            .map(|(index, _)| index)?;
        let pending = state.pending.remove(index);
        state.now = state.now.max(pending.due);
        Some(pending)
    }

    fn push(&self, delay: Duration, task: Task) -> CancellationToken {
        let token = CancellationToken::new();
        let mut state = self.state.borrow_mut();
        let seq = state.next_seq;
        state.next_seq += 1;
        let due = state.now + delay;
        state.pending.push(PendingTask {
            due,
            seq,
            token: token.clone(),
            task,
        });
        token
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, task: Task) -> CancellationToken {
        self.push(Duration::ZERO, task)
    }

    fn schedule(&self, delay: Duration, task: Task) -> CancellationToken {
        self.push(delay, task)
    }
}
