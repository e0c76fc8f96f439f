use glib::{ControlFlow, SourceId};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

pub type Tick = Box<dyn FnMut() -> ControlFlow>;

/// Source of repeating timers for the game engine.
pub trait Scheduler {
    /// Call `tick` every `period` until it returns `ControlFlow::Break` or the
    /// returned handle is cancelled.
    fn schedule_repeating(&self, period: Duration, tick: Tick) -> TimerHandle;
}

/// Owning handle of a repeating timer. Cancelling (or dropping) it stops the
/// timer before any further tick is dispatched, including when called from
/// within the timer's own tick.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TimerHandle {
    pub fn new<F: FnOnce() + 'static>(cancel: F) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Timers on the default glib main context.
#[derive(Debug, Default)]
pub struct GlibScheduler;

impl Scheduler for GlibScheduler {
    fn schedule_repeating(&self, period: Duration, mut tick: Tick) -> TimerHandle {
        // empty once the source is gone, so it is never removed twice
        let source_id: Rc<Cell<Option<SourceId>>> = Rc::new(Cell::new(None));

        let id = glib::timeout_add_local(period, {
            let source_id = Rc::clone(&source_id);
            move || {
                let flow = tick();
                match (flow, source_id.take()) {
                    (ControlFlow::Continue, Some(id)) => {
                        source_id.set(Some(id));
                        ControlFlow::Continue
                    }
                    // either finished, or cancelled during the tick
                    _ => ControlFlow::Break,
                }
            }
        });
        source_id.set(Some(id));

        TimerHandle::new(move || {
            if let Some(id) = source_id.take() {
                id.remove();
            }
        })
    }
}

#[cfg(test)]
pub use manual::ManualScheduler;
