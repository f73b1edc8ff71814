//! Screenshot harness for the draw cycle.
//!
//! Drives an [`AppShell`] on a synthetic frame timeline and saves PNG
//! captures at 0%, 25%, 50%, 75%, and 100% of the forward ("Going") and
//! backward ("Return") drawing phases into phase-named directories. Because
//! the timeline is synthetic the samples land exactly on the intended
//! animation fractions; nothing here sleeps.
//!
//! Filesystem or encoding failures surface as [`CaptureError`] — harness
//! failures, never part of the animation core's contract.

use std::fs;
use std::path::{Path, PathBuf};

use stroke_app_shell::AppShell;
use stroke_render_pixels::{draw_scene, PixelsRenderer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture directory error: {0}")]
    Io(#[from] std::io::Error),
    #[error("png encode error: {0}")]
    Encode(#[from] image::ImageError),
}

/// One drawing phase of the cycle, mapped to its capture directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    Going,
    Return,
}

impl AnimationPhase {
    pub const ALL: [AnimationPhase; 2] = [AnimationPhase::Going, AnimationPhase::Return];

    pub fn directory_name(&self) -> &'static str {
        match self {
            AnimationPhase::Going => "Going",
            AnimationPhase::Return => "Return",
        }
    }

    pub fn directory(&self, base: &Path) -> PathBuf {
        base.join(self.directory_name())
    }
}

/// A sampling point within a drawing phase.
#[derive(Debug, Clone, Copy)]
pub struct CaptureStep {
    pub step: usize,
    pub name: &'static str,
    pub fraction: f64,
}

pub const CAPTURE_STEPS: [CaptureStep; 5] = [
    CaptureStep {
        step: 0,
        name: "Start",
        fraction: 0.0,
    },
    CaptureStep {
        step: 1,
        name: "Quarter",
        fraction: 0.25,
    },
    CaptureStep {
        step: 2,
        name: "Midpoint",
        fraction: 0.5,
    },
    CaptureStep {
        step: 3,
        name: "ThreeQuarter",
        fraction: 0.75,
    },
    CaptureStep {
        step: 4,
        name: "End",
        fraction: 1.0,
    },
];

/// Where and at what size captures are taken.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl CaptureConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            width: 1280,
            height: 720,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Runs one full cycle against `shell` and captures both drawing phases.
///
/// Existing phase directories under the output directory are removed and
/// recreated first. Returns the paths of all written captures in order.
pub fn capture_cycle(
    shell: &mut AppShell<PixelsRenderer>,
    config: &CaptureConfig,
) -> Result<Vec<PathBuf>, CaptureError> {
    prepare_directories(&config.output_dir)?;

    shell.set_viewport(config.width as f32, config.height as f32);
    shell.set_buffer_size(config.width, config.height);

    let sequencer = shell.sequencer();
    let duration_nanos = sequencer.config().duration.as_nanos() as u64;
    let delay_nanos = sequencer.config().post_draw_delay.as_nanos() as u64;

    let mut frame = vec![0u8; config.width as usize * config.height as usize * 4];
    let mut written = Vec::with_capacity(CAPTURE_STEPS.len() * AnimationPhase::ALL.len());

    sequencer.trigger();

    let forward_base = 0u64;
    for step in CAPTURE_STEPS {
        let frame_time = forward_base + scaled(duration_nanos, step.fraction);
        shell.pump(frame_time);
        written.push(save_capture(
            shell,
            config,
            &mut frame,
            AnimationPhase::Going,
            &step,
        )?);
    }

    // The forward tween completed at `duration`; the hold timer fires
    // `delay` later and flips the cycle backward on that same pump.
    let backward_base = forward_base + duration_nanos + delay_nanos;
    for step in CAPTURE_STEPS {
        let frame_time = backward_base + scaled(duration_nanos, step.fraction);
        shell.pump(frame_time);
        written.push(save_capture(
            shell,
            config,
            &mut frame,
            AnimationPhase::Return,
            &step,
        )?);
    }

    // Settle back to idle.
    shell.pump(backward_base + duration_nanos + 1);

    Ok(written)
}

fn scaled(duration_nanos: u64, fraction: f64) -> u64 {
    (duration_nanos as f64 * fraction).round() as u64
}

fn prepare_directories(base: &Path) -> Result<(), CaptureError> {
    for phase in AnimationPhase::ALL {
        let dir = phase.directory(base);
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(&dir)?;
    }
    Ok(())
}

fn save_capture(
    shell: &AppShell<PixelsRenderer>,
    config: &CaptureConfig,
    frame: &mut [u8],
    phase: AnimationPhase,
    step: &CaptureStep,
) -> Result<PathBuf, CaptureError> {
    draw_scene(frame, config.width, config.height, shell.scene());
    let file_name = format!("{}_{}_{}.png", step.step, phase.directory_name(), step.name);
    let path = phase.directory(&config.output_dir).join(file_name);
    image::save_buffer(
        &path,
        frame,
        config.width,
        config.height,
        image::ColorType::Rgba8,
    )?;
    log::info!("captured {}", path.display());
    Ok(path)
}
