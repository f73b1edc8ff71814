use crate::runtime::RuntimeHandle;
use crate::TimerId;

/// Handle to a scheduled one-shot timer.
///
/// Dropping the registration cancels the timer, so holders of a pending
/// continuation can revoke it simply by replacing the handle. Use [`leak`]
/// for fire-and-forget timers.
///
/// [`leak`]: TimerRegistration::leak
pub struct TimerRegistration {
    runtime: RuntimeHandle,
    id: Option<TimerId>,
}

impl TimerRegistration {
    pub(crate) fn new(runtime: RuntimeHandle, id: TimerId) -> Self {
        Self {
            runtime,
            id: Some(id),
        }
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_timer(id);
        }
    }

    /// Detaches the handle, leaving the timer scheduled.
    pub fn leak(mut self) {
        self.id.take();
    }
}

impl Drop for TimerRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_timer(id);
        }
    }
}
