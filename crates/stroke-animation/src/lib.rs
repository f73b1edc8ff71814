//! Animation support for hello-stroke.
//!
//! `animation` holds the generic tween machinery (easing curves, specs,
//! [`Animatable`]); `sequencer` holds the draw-cycle state machine that
//! drives the stroke reveal.

pub mod animation;
pub mod sequencer;

pub use animation::{Animatable, AnimationSpec, Easing, Lerp};
pub use sequencer::{Direction, DrawSequencer, Phase, SequencerConfig};

pub mod prelude {
    pub use crate::animation::{Animatable, AnimationSpec, Easing, Lerp};
    pub use crate::sequencer::{Direction, DrawSequencer, Phase, SequencerConfig};
}
