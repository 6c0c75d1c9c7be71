use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use glib::{idle_add_local_once, timeout_add_local_once, SourceId};

use crate::game::{CancellationToken, Scheduler, Task};

/// Runs tasks on the GTK main loop.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlibScheduler;

impl GlibScheduler {
    /// Wires `token` so cancelling removes the main-loop source. The source
    /// id is dropped once the task has fired, since glib detaches it itself.
    fn attach(
        token: CancellationToken,
        task: Task,
        add_source: impl FnOnce(Task) -> SourceId,
    ) -> CancellationToken {
        let source_id: Rc<Cell<Option<SourceId>>> = Rc::new(Cell::new(None));
        let guarded = token.guard(task);
        let id = add_source(Box::new({
            let source_id = source_id.clone();
            move || {
                source_id.take();
                guarded();
            }
        }));
        source_id.set(Some(id));
        token.on_cancel(Box::new(move || {
            if let Some(id) = source_id.take() {
                id.remove();
            }
        }));
        token
    }
}

impl Scheduler for GlibScheduler {
    fn defer(&self, task: Task) -> CancellationToken {
        Self::attach(CancellationToken::new(), task, idle_add_local_once)
    }

    fn schedule(&self, delay: Duration, task: Task) -> CancellationToken {
        Self::attach(CancellationToken::new(), task, |task| {
            timeout_add_local_once(delay, task)
        })
    }
}
