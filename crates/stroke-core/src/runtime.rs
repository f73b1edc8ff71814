use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crate::collections::map::HashMap;
use crate::frame_clock::FrameClock;
use crate::platform::RuntimeScheduler;
use crate::{FrameCallbackId, TimerId};

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    needs_frame: Cell<bool>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<u64>,
    timers: RefCell<HashMap<TimerId, TimerEntry>>,
    next_timer_id: Cell<u64>,
    pending_tasks: RefCell<VecDeque<Box<dyn FnOnce() + 'static>>>,
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            scheduler,
            needs_frame: Cell::new(false),
            frame_callbacks: RefCell::new(VecDeque::new()),
            next_frame_callback_id: Cell::new(1),
            timers: RefCell::new(HashMap::default()),
            next_timer_id: Cell::new(1),
            pending_tasks: RefCell::new(VecDeque::new()),
        }
    }

    fn schedule(&self) {
        self.needs_frame.set(true);
        self.scheduler.schedule_frame();
    }

    fn enqueue_task(&self, task: Box<dyn FnOnce() + 'static>) {
        self.pending_tasks.borrow_mut().push_back(task);
        self.schedule();
    }

    fn drain_tasks(&self) {
        let mut tasks: Vec<Box<dyn FnOnce() + 'static>> = {
            let mut pending = self.pending_tasks.borrow_mut();
            pending.drain(..).collect()
        };
        for task in tasks.drain(..) {
            task();
        }
    }

    fn has_tasks(&self) -> bool {
        !self.pending_tasks.borrow().is_empty()
    }

    fn register_frame_callback(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        self.schedule();
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
        drop(callbacks);
        self.settle_needs_frame();
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }

    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        let mut pending: Vec<Box<dyn FnOnce(u64) + 'static>> = Vec::new();
        {
            let mut callbacks = self.frame_callbacks.borrow_mut();
            pending.reserve(callbacks.len());
            while let Some(mut entry) = callbacks.pop_front() {
                if let Some(callback) = entry.callback.take() {
                    pending.push(callback);
                }
            }
        }
        for callback in pending {
            callback(frame_time_nanos);
        }
        self.settle_needs_frame();
    }

    fn register_timer(&self, fire_at_nanos: u64, callback: Box<dyn FnOnce(u64) + 'static>) -> TimerId {
        let id = self.next_timer_id.get();
        self.next_timer_id.set(id + 1);
        self.timers.borrow_mut().insert(
            id,
            TimerEntry {
                fire_at_nanos,
                callback,
            },
        );
        // A timer does not request a frame by itself; hosts poll
        // `next_timer_fire_at` to wake in time for the deadline.
        id
    }

    fn cancel_timer(&self, id: TimerId) {
        self.timers.borrow_mut().remove(&id);
    }

    fn has_timers(&self) -> bool {
        !self.timers.borrow().is_empty()
    }

    fn next_timer_fire_at(&self) -> Option<u64> {
        self.timers
            .borrow()
            .values()
            .map(|entry| entry.fire_at_nanos)
            .min()
    }

    fn drain_due_timers(&self, frame_time_nanos: u64) {
        let mut due: Vec<(TimerId, TimerEntry)> = {
            let mut timers = self.timers.borrow_mut();
            let ids: Vec<TimerId> = timers
                .iter()
                .filter(|(_, entry)| entry.fire_at_nanos <= frame_time_nanos)
                .map(|(id, _)| *id)
                .collect();
            ids.into_iter()
                .filter_map(|id| timers.remove(&id).map(|entry| (id, entry)))
                .collect()
        };
        due.sort_by_key(|(id, entry)| (entry.fire_at_nanos, *id));
        for (_, entry) in due {
            (entry.callback)(frame_time_nanos);
        }
        self.settle_needs_frame();
    }

    fn settle_needs_frame(&self) {
        // Outstanding future timers do not hold the frame flag; hosts wake
        // for them via `next_timer_fire_at`.
        if !self.has_frame_callbacks() && !self.has_tasks() {
            self.needs_frame.set(false);
        }
    }
}

#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(scheduler)),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle(Rc::downgrade(&self.inner))
    }

    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.handle())
    }
}

#[derive(Default)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}

#[cfg(test)]
#[derive(Default)]
pub struct TestScheduler;

#[cfg(test)]
impl RuntimeScheduler for TestScheduler {
    fn schedule_frame(&self) {}
}

#[cfg(test)]
pub struct TestRuntime {
    runtime: Runtime,
}

#[cfg(test)]
impl TestRuntime {
    pub fn new() -> Self {
        Self {
            runtime: Runtime::new(Arc::new(TestScheduler)),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }
}

#[derive(Clone)]
pub struct RuntimeHandle(Weak<RuntimeInner>);

impl RuntimeHandle {
    pub fn schedule(&self) {
        if let Some(inner) = self.0.upgrade() {
            inner.schedule();
        }
    }

    pub fn spawn_task(&self, task: Box<dyn FnOnce() + 'static>) {
        if let Some(inner) = self.0.upgrade() {
            inner.enqueue_task(task);
        } else {
            task();
        }
    }

    pub fn drain_tasks(&self) {
        if let Some(inner) = self.0.upgrade() {
            inner.drain_tasks();
        }
    }

    pub fn has_pending_tasks(&self) -> bool {
        self.0
            .upgrade()
            .map(|inner| inner.has_tasks())
            .unwrap_or(false)
    }

    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.0
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.0.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.0
            .upgrade()
            .map(|inner| inner.has_frame_callbacks())
            .unwrap_or(false)
    }

    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        if let Some(inner) = self.0.upgrade() {
            inner.drain_frame_callbacks(frame_time_nanos);
        }
    }

    /// Registers a one-shot timer on the frame timeline.
    ///
    /// `fire_at_nanos` is an absolute timestamp on the same timeline as the
    /// frame times handed to `drain_frame_callbacks`; the callback runs the
    /// first time `drain_due_timers` is pumped at or past it.
    pub fn register_timer(
        &self,
        fire_at_nanos: u64,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<crate::timer::TimerRegistration> {
        self.0.upgrade().map(|inner| {
            let id = inner.register_timer(fire_at_nanos, Box::new(callback));
            crate::timer::TimerRegistration::new(self.clone(), id)
        })
    }

    pub fn cancel_timer(&self, id: TimerId) {
        if let Some(inner) = self.0.upgrade() {
            inner.cancel_timer(id);
        }
    }

    pub fn has_timers(&self) -> bool {
        self.0
            .upgrade()
            .map(|inner| inner.has_timers())
            .unwrap_or(false)
    }

    pub fn next_timer_fire_at(&self) -> Option<u64> {
        self.0.upgrade().and_then(|inner| inner.next_timer_fire_at())
    }

    pub fn drain_due_timers(&self, frame_time_nanos: u64) {
        if let Some(inner) = self.0.upgrade() {
            inner.drain_due_timers(frame_time_nanos);
        }
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }
}

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

struct TimerEntry {
    fire_at_nanos: u64,
    callback: Box<dyn FnOnce(u64) + 'static>,
}
