//! The draw-cycle sequencer.
//!
//! One cycle runs Idle → DrawingForward → Holding → DrawingBackward → Idle:
//! the stroke reveal tweens forward, a delayed timer holds the fully drawn
//! stroke on screen, then the reveal tweens back and the sequencer returns
//! to rest. Triggers while a cycle is running are rejected.
//!
//! Every scheduled continuation (tween completion, hold expiry) captures the
//! generation it was issued under and is dropped if a newer cycle has taken
//! over by the time it fires. The hold timer is additionally cancellable, so
//! a newly accepted trigger revokes a leftover timer instead of waiting for
//! the guard to reject it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use stroke_core::{RuntimeHandle, State, TimerRegistration};

use crate::animation::{Animatable, AnimationSpec, Easing};

/// Direction the reveal is moving in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Externally observable position in the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    DrawingForward,
    Holding,
    DrawingBackward,
}

/// Immutable cycle configuration, built once from compile-time constants.
///
/// Duration and delay are tuning knobs with no canonical value; the defaults
/// below match the demo app.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencerConfig {
    pub duration: Duration,
    pub post_draw_delay: Duration,
    pub start_value: f32,
    pub end_value: f32,
    pub easing: Easing,
}

impl SequencerConfig {
    pub fn new(duration: Duration, post_draw_delay: Duration) -> Self {
        Self {
            duration,
            post_draw_delay,
            start_value: 0.0,
            end_value: 1.0,
            easing: Easing::EaseInOut,
        }
    }

    fn tween(&self) -> AnimationSpec {
        AnimationSpec::tween(self.duration.as_millis() as u64, self.easing)
    }

    fn delay_nanos(&self) -> u64 {
        self.post_draw_delay.as_nanos() as u64
    }
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self::new(Duration::from_millis(5_500), Duration::from_millis(2_300))
    }
}

struct Cycle {
    direction: Direction,
    running: bool,
    generation: u64,
    phase: Phase,
    hold_timer: Option<TimerRegistration>,
}

struct SequencerShared {
    config: SequencerConfig,
    runtime: RuntimeHandle,
    progress: Animatable<f32>,
    cycle: RefCell<Cycle>,
}

/// Drives the forward-hold-backward draw cycle over an [`Animatable`].
///
/// Dropping the sequencer cancels any in-flight tween and hold timer.
pub struct DrawSequencer {
    shared: Rc<SequencerShared>,
}

impl DrawSequencer {
    pub fn new(config: SequencerConfig, runtime: RuntimeHandle) -> Self {
        let progress = Animatable::new(config.start_value, runtime.clone());
        Self {
            shared: Rc::new(SequencerShared {
                config,
                runtime,
                progress,
                cycle: RefCell::new(Cycle {
                    direction: Direction::Forward,
                    running: false,
                    generation: 0,
                    phase: Phase::Idle,
                    hold_timer: None,
                }),
            }),
        }
    }

    /// Starts a new cycle. A no-op while a cycle is already running.
    pub fn trigger(&self) {
        Self::start_cycle(&self.shared);
    }

    /// Read-only view of the reveal progress in [start_value, end_value].
    pub fn progress(&self) -> State<f32> {
        self.shared.progress.state()
    }

    pub fn progress_value(&self) -> f32 {
        self.shared.progress.value()
    }

    pub fn phase(&self) -> Phase {
        self.shared.cycle.borrow().phase
    }

    pub fn direction(&self) -> Direction {
        self.shared.cycle.borrow().direction
    }

    pub fn is_running(&self) -> bool {
        self.shared.cycle.borrow().running
    }

    pub fn generation(&self) -> u64 {
        self.shared.cycle.borrow().generation
    }

    pub fn config(&self) -> SequencerConfig {
        self.shared.config
    }

    fn start_cycle(shared: &Rc<SequencerShared>) {
        let generation = {
            let mut cycle = shared.cycle.borrow_mut();
            if cycle.running {
                log::debug!(
                    "trigger ignored: cycle {} still running",
                    cycle.generation
                );
                return;
            }
            cycle.generation += 1;
            cycle.running = true;
            cycle.direction = Direction::Forward;
            cycle.phase = Phase::DrawingForward;
            if let Some(timer) = cycle.hold_timer.take() {
                timer.cancel();
            }
            cycle.generation
        };
        log::debug!("cycle {generation}: drawing forward");
        shared.progress.snap_to(shared.config.start_value);
        let weak = Rc::downgrade(shared);
        shared.progress.animate_to(
            shared.config.end_value,
            shared.config.tween(),
            move |frame_time| Self::forward_completed(&weak, generation, frame_time),
        );
    }

    fn forward_completed(weak: &Weak<SequencerShared>, generation: u64, frame_time_nanos: u64) {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let mut cycle = shared.cycle.borrow_mut();
        if cycle.generation != generation {
            log::debug!("cycle {generation}: stale forward completion dropped");
            return;
        }
        cycle.phase = Phase::Holding;
        let fire_at = frame_time_nanos.saturating_add(shared.config.delay_nanos());
        let timer_weak = weak.clone();
        cycle.hold_timer = shared.runtime.register_timer(fire_at, move |time| {
            Self::hold_elapsed(&timer_weak, generation, time);
        });
        log::debug!("cycle {generation}: holding until {fire_at}");
    }

    fn hold_elapsed(weak: &Weak<SequencerShared>, generation: u64, _frame_time_nanos: u64) {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        {
            let mut cycle = shared.cycle.borrow_mut();
            if cycle.generation != generation || !cycle.running {
                // Leave `hold_timer` alone: a stale expiry must not revoke a
                // newer cycle's registration.
                log::debug!("cycle {generation}: stale hold expiry dropped");
                return;
            }
            // This expiry is the stored registration; the handle is spent.
            cycle.hold_timer = None;
            cycle.direction = Direction::Backward;
            cycle.phase = Phase::DrawingBackward;
        }
        log::debug!("cycle {generation}: drawing backward");
        let completion_weak = weak.clone();
        shared.progress.animate_to(
            shared.config.start_value,
            shared.config.tween(),
            move |_| Self::backward_completed(&completion_weak, generation),
        );
    }

    fn backward_completed(weak: &Weak<SequencerShared>, generation: u64) {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let mut cycle = shared.cycle.borrow_mut();
        if cycle.generation != generation
            || cycle.direction != Direction::Backward
            || !cycle.running
        {
            log::debug!("cycle {generation}: stale backward completion dropped");
            return;
        }
        cycle.direction = Direction::Forward;
        cycle.running = false;
        cycle.phase = Phase::Idle;
        log::debug!("cycle {generation}: idle");
    }
}

impl Clone for DrawSequencer {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::sync::Arc;

    use stroke_core::{DefaultScheduler, Runtime, RuntimeHandle};

    use super::*;

    const SECOND: u64 = 1_000_000_000;

    fn fixture() -> (Runtime, RuntimeHandle, DrawSequencer) {
        let runtime = Runtime::new(Arc::new(DefaultScheduler));
        let handle = runtime.handle();
        let config = SequencerConfig::new(Duration::from_secs(2), Duration::from_secs(1));
        let sequencer = DrawSequencer::new(config, handle.clone());
        (runtime, handle, sequencer)
    }

    fn pump(handle: &RuntimeHandle, frame_time_nanos: u64) {
        handle.drain_tasks();
        handle.drain_due_timers(frame_time_nanos);
        handle.drain_frame_callbacks(frame_time_nanos);
    }

    #[test]
    fn trigger_starts_a_forward_cycle() {
        let (_runtime, _handle, sequencer) = fixture();
        assert_eq!(sequencer.phase(), Phase::Idle);

        sequencer.trigger();

        assert!(sequencer.is_running());
        assert_eq!(sequencer.direction(), Direction::Forward);
        assert_eq!(sequencer.phase(), Phase::DrawingForward);
        assert_eq!(sequencer.generation(), 1);
    }

    #[test]
    fn trigger_while_running_is_idempotent() {
        let (_runtime, handle, sequencer) = fixture();
        sequencer.trigger();
        pump(&handle, 0);
        pump(&handle, SECOND / 2);
        let progress_before = sequencer.progress_value();

        sequencer.trigger();

        assert_eq!(sequencer.generation(), 1);
        assert_eq!(sequencer.progress_value(), progress_before);
        assert_eq!(sequencer.phase(), Phase::DrawingForward);

        // The first cycle proceeds unaffected.
        pump(&handle, 2 * SECOND);
        assert_eq!(sequencer.progress_value(), 1.0);
        assert_eq!(sequencer.phase(), Phase::Holding);
    }

    #[test]
    fn full_cycle_returns_to_idle() {
        let (_runtime, handle, sequencer) = fixture();
        sequencer.trigger();

        // duration 2s, delay 1s, duration 2s.
        let mut t = 0;
        while t <= 5 * SECOND {
            pump(&handle, t);
            t += SECOND / 10;
        }

        assert_eq!(sequencer.progress_value(), 0.0);
        assert!(!sequencer.is_running());
        assert_eq!(sequencer.direction(), Direction::Forward);
        assert_eq!(sequencer.phase(), Phase::Idle);
        assert_eq!(sequencer.generation(), 1);
    }

    #[test]
    fn timeline_matches_duration_then_delay_then_duration() {
        let (_runtime, handle, sequencer) = fixture();
        sequencer.trigger();

        pump(&handle, 0);
        pump(&handle, 2 * SECOND);
        assert_eq!(sequencer.progress_value(), 1.0);
        assert_eq!(sequencer.direction(), Direction::Forward);
        assert!(sequencer.is_running());
        assert_eq!(sequencer.phase(), Phase::Holding);

        // Before the delay expires nothing moves.
        pump(&handle, 2 * SECOND + SECOND / 2);
        assert_eq!(sequencer.phase(), Phase::Holding);
        assert_eq!(sequencer.progress_value(), 1.0);

        // Delay expiry flips to backward; the return tween takes `duration`.
        pump(&handle, 3 * SECOND);
        assert_eq!(sequencer.phase(), Phase::DrawingBackward);
        assert_eq!(sequencer.direction(), Direction::Backward);
        pump(&handle, 5 * SECOND);

        assert_eq!(sequencer.progress_value(), 0.0);
        assert!(!sequencer.is_running());
    }

    #[test]
    fn progress_is_monotone_within_each_drawing_phase() {
        let (_runtime, handle, sequencer) = fixture();
        sequencer.trigger();

        let mut last = sequencer.progress_value();
        let mut t = 0;
        while sequencer.phase() == Phase::DrawingForward {
            pump(&handle, t);
            let now = sequencer.progress_value();
            assert!(now >= last, "forward progress regressed at t={t}");
            last = now;
            t += 130_000_000;
        }

        while sequencer.phase() == Phase::Holding {
            pump(&handle, t);
            t += 130_000_000;
        }

        let mut last = sequencer.progress_value();
        while sequencer.phase() == Phase::DrawingBackward {
            pump(&handle, t);
            let now = sequencer.progress_value();
            assert!(now <= last, "backward progress increased at t={t}");
            last = now;
            t += 130_000_000;
        }

        assert_eq!(sequencer.phase(), Phase::Idle);
    }

    #[test]
    fn a_second_cycle_can_start_after_idle() {
        let (_runtime, handle, sequencer) = fixture();
        sequencer.trigger();
        let mut t = 0;
        while t <= 5 * SECOND {
            pump(&handle, t);
            t += SECOND / 4;
        }
        assert_eq!(sequencer.phase(), Phase::Idle);

        sequencer.trigger();
        assert_eq!(sequencer.generation(), 2);
        assert_eq!(sequencer.phase(), Phase::DrawingForward);
    }

    #[test]
    fn stale_forward_completion_mutates_nothing() {
        let (_runtime, handle, sequencer) = fixture();
        sequencer.trigger();
        let mut t = 0;
        while t <= 5 * SECOND {
            pump(&handle, t);
            t += SECOND / 4;
        }
        sequencer.trigger();
        pump(&handle, 6 * SECOND);
        assert_eq!(sequencer.generation(), 2);
        assert_eq!(sequencer.phase(), Phase::DrawingForward);

        // A leftover continuation from cycle 1 fires late.
        DrawSequencer::forward_completed(&Rc::downgrade(&sequencer.shared), 1, 7 * SECOND);

        assert_eq!(sequencer.phase(), Phase::DrawingForward);
        assert!(!handle.has_timers(), "stale completion must not schedule a hold");
        assert!(sequencer.is_running());
    }

    #[test]
    fn stale_hold_expiry_mutates_nothing() {
        let (_runtime, handle, sequencer) = fixture();
        sequencer.trigger();
        pump(&handle, 0);
        pump(&handle, SECOND / 2);

        // An expiry from a cycle that never existed under this generation.
        DrawSequencer::hold_elapsed(&Rc::downgrade(&sequencer.shared), 7, SECOND);

        assert_eq!(sequencer.phase(), Phase::DrawingForward);
        assert_eq!(sequencer.direction(), Direction::Forward);
    }

    #[test]
    fn accepted_trigger_cancels_a_leftover_hold_timer() {
        let (_runtime, handle, sequencer) = fixture();
        sequencer.trigger();
        pump(&handle, 0);
        pump(&handle, 2 * SECOND);
        assert_eq!(sequencer.phase(), Phase::Holding);
        assert!(handle.has_timers());

        // Force the idle flag while the timer is still scheduled, the window
        // a torn-down-and-restarted host would observe.
        {
            let mut cycle = sequencer.shared.cycle.borrow_mut();
            cycle.running = false;
            cycle.phase = Phase::Idle;
        }

        sequencer.trigger();
        assert!(!handle.has_timers(), "new trigger must revoke the old timer");

        // The revoked timer's deadline passes without flipping direction.
        pump(&handle, 3 * SECOND);
        assert_eq!(sequencer.direction(), Direction::Forward);
        assert_eq!(sequencer.phase(), Phase::DrawingForward);
    }

    #[test]
    fn dropping_the_sequencer_revokes_scheduled_work() {
        let (_runtime, handle, sequencer) = fixture();
        sequencer.trigger();
        pump(&handle, 0);
        pump(&handle, 2 * SECOND);
        assert!(handle.has_timers());

        drop(sequencer);

        assert!(!handle.has_timers());
        // Whatever late drains happen, nothing panics and nothing fires.
        pump(&handle, 10 * SECOND);
    }
}
