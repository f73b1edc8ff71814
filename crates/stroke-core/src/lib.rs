#![doc = r"Runtime services for the hello-stroke animation workspace."]

pub mod collections;
pub mod frame_clock;
pub mod platform;
pub mod runtime;
pub mod state;
pub mod timer;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use platform::{Clock, RuntimeScheduler};
pub use runtime::{DefaultScheduler, Runtime, RuntimeHandle};
pub use state::{MutableState, State};
pub use timer::TimerRegistration;

#[cfg(test)]
pub use runtime::{TestRuntime, TestScheduler};

pub type FrameCallbackId = u64;
pub type TimerId = u64;
