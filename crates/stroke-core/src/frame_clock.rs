use crate::runtime::RuntimeHandle;
use crate::FrameCallbackId;

/// Hands out one-shot frame callbacks on the runtime's frame timeline.
#[derive(Clone)]
pub struct FrameClock {
    runtime: RuntimeHandle,
}

impl FrameClock {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        let mut callback_opt = Some(callback);
        let runtime = self.runtime.clone();
        match runtime.register_frame_callback(move |time| {
            if let Some(callback) = callback_opt.take() {
                callback(time);
            }
        }) {
            Some(id) => FrameCallbackRegistration::new(runtime, id),
            None => FrameCallbackRegistration::inactive(runtime),
        }
    }

    pub fn with_frame_millis(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        self.with_frame_nanos(move |nanos| {
            let millis = nanos / 1_000_000;
            callback(millis);
        })
    }
}

/// Cancels the underlying frame callback when dropped.
pub struct FrameCallbackRegistration {
    runtime: RuntimeHandle,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    fn new(runtime: RuntimeHandle, id: FrameCallbackId) -> Self {
        Self {
            runtime,
            id: Some(id),
        }
    }

    fn inactive(runtime: RuntimeHandle) -> Self {
        Self { runtime, id: None }
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_frame_callback(id);
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_frame_callback(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::runtime::TestRuntime;

    #[test]
    fn frame_millis_truncates_nanos() {
        let runtime = TestRuntime::new();
        let clock = runtime.handle().frame_clock();
        let seen = Rc::new(RefCell::new(None));

        let registration = {
            let seen = seen.clone();
            clock.with_frame_millis(move |millis| {
                *seen.borrow_mut() = Some(millis);
            })
        };
        runtime.handle().drain_frame_callbacks(1_500_000_000);
        drop(registration);

        assert_eq!(*seen.borrow(), Some(1_500));
    }

    #[test]
    fn dropping_a_registration_cancels_the_callback() {
        let runtime = TestRuntime::new();
        let clock = runtime.handle().frame_clock();
        let fired = Rc::new(RefCell::new(false));

        {
            let fired = fired.clone();
            let _registration = clock.with_frame_nanos(move |_| {
                *fired.borrow_mut() = true;
            });
            // Dropped here.
        }
        runtime.handle().drain_frame_callbacks(0);

        assert!(!*fired.borrow());
        assert!(!runtime.handle().has_frame_callbacks());
    }
}
