//! Platform abstraction traits for the runtime services.
//!
//! These traits let the runtime delegate scheduling and clock
//! responsibilities to the host platform, so the animation logic does not
//! depend on any particular windowing system or on wall-clock time.

/// Schedules work for the runtime.
///
/// Implementations are responsible for waking whatever loop drives frames.
/// They must be safe to use from multiple threads because window systems
/// deliver wake requests from their own threads.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Provides timing information for the runtime.
pub trait Clock: Send + Sync {
    /// Instant type produced by this clock implementation.
    type Instant: Copy + Send + Sync;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Returns the number of milliseconds elapsed since `since`.
    fn elapsed_millis(&self, since: Self::Instant) -> u64;
}
