//! Application shell.
//!
//! [`AppShell`] owns the runtime, the draw sequencer, and a renderer, and
//! pumps them together: each frame it drains queued tasks, due timers, and
//! frame callbacks, then lets the content closure rebuild the scene from the
//! current reveal state. Hosts with a real event loop call [`AppShell::update`],
//! which stamps frames from a start [`Instant`]; tests and headless capture
//! call [`AppShell::pump`] with synthetic timestamps instead, so no code in
//! this crate ever sleeps.

use std::time::Instant;

use stroke_animation::{DrawSequencer, Phase, SequencerConfig};
use stroke_core::{Clock, RuntimeHandle};
use stroke_graphics::Size;
use stroke_render_common::{HitTestTarget, PointerEventKind, RenderScene, Renderer};
use stroke_runtime_std::StdRuntime;

/// Snapshot of the reveal state handed to the content closure.
#[derive(Debug, Clone, Copy)]
pub struct SceneFrame {
    /// Current trim fraction in [start_value, end_value].
    pub progress: f32,
    pub phase: Phase,
    pub viewport: Size,
}

pub struct AppShell<R: Renderer> {
    runtime: StdRuntime,
    sequencer: DrawSequencer,
    renderer: R,
    content: Box<dyn FnMut(&SceneFrame, &mut R::Scene)>,
    cursor: (f32, f32),
    viewport: (f32, f32),
    buffer_size: (u32, u32),
    start_time: Instant,
}

impl<R: Renderer> AppShell<R> {
    /// Builds a shell around `renderer`.
    ///
    /// `content` receives the freshly created sequencer (clone it into the
    /// closure it returns, e.g. for tap regions) and produces the closure
    /// that rebuilds the scene every frame.
    pub fn new<F, C>(renderer: R, config: SequencerConfig, content: F) -> Self
    where
        F: FnOnce(DrawSequencer) -> C,
        C: FnMut(&SceneFrame, &mut R::Scene) + 'static,
    {
        let runtime = StdRuntime::new();
        let sequencer = DrawSequencer::new(config, runtime.runtime_handle());
        let content = Box::new(content(sequencer.clone()));
        let mut shell = Self {
            runtime,
            sequencer,
            renderer,
            content,
            cursor: (0.0, 0.0),
            viewport: (800.0, 600.0),
            buffer_size: (800, 600),
            start_time: Instant::now(),
        };
        shell.rebuild_scene();
        shell
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        log::debug!("viewport resized to {width}x{height}");
        self.viewport = (width, height);
        self.rebuild_scene();
    }

    pub fn set_buffer_size(&mut self, width: u32, height: u32) {
        self.buffer_size = (width, height);
    }

    pub fn buffer_size(&self) -> (u32, u32) {
        self.buffer_size
    }

    pub fn scene(&self) -> &R::Scene {
        self.renderer.scene()
    }

    pub fn renderer(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn sequencer(&self) -> DrawSequencer {
        self.sequencer.clone()
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.runtime_handle()
    }

    pub fn set_frame_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        self.runtime.set_frame_waker(waker);
    }

    /// Instant frame timestamps are measured from in [`AppShell::update`].
    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    /// Earliest outstanding timer deadline on the frame timeline, if any.
    pub fn next_timer_fire_at(&self) -> Option<u64> {
        self.runtime.runtime_handle().next_timer_fire_at()
    }

    pub fn should_render(&self) -> bool {
        self.runtime.take_frame_request()
            || self.runtime.runtime_handle().has_frame_callbacks()
            || self.runtime.runtime_handle().has_pending_tasks()
    }

    /// Pumps the runtime using wall-clock time since construction.
    ///
    /// Millisecond resolution is plenty for frame stamping; everything finer
    /// grained stays on the synthetic [`AppShell::pump`] path.
    pub fn update(&mut self) {
        let frame_time = self.runtime.clock().elapsed_millis(self.start_time) * 1_000_000;
        self.pump(frame_time);
    }

    /// Pumps the runtime at an explicit frame timestamp.
    pub fn pump(&mut self, frame_time_nanos: u64) {
        let handle = self.runtime.runtime_handle();
        handle.drain_tasks();
        handle.drain_due_timers(frame_time_nanos);
        handle.drain_frame_callbacks(frame_time_nanos);
        self.rebuild_scene();
    }

    pub fn set_cursor(&mut self, x: f32, y: f32) {
        self.cursor = (x, y);
        if let Some(hit) = self.renderer.scene().hit_test(x, y) {
            hit.dispatch(PointerEventKind::Move, x, y);
        }
    }

    pub fn pointer_pressed(&mut self) {
        if let Some(hit) = self.renderer.scene().hit_test(self.cursor.0, self.cursor.1) {
            hit.dispatch(PointerEventKind::Down, self.cursor.0, self.cursor.1);
        }
    }

    pub fn pointer_released(&mut self) {
        if let Some(hit) = self.renderer.scene().hit_test(self.cursor.0, self.cursor.1) {
            hit.dispatch(PointerEventKind::Up, self.cursor.0, self.cursor.1);
        }
    }

    fn rebuild_scene(&mut self) {
        let frame = SceneFrame {
            progress: self.sequencer.progress_value(),
            phase: self.sequencer.phase(),
            viewport: Size::new(self.viewport.0, self.viewport.1),
        };
        self.renderer.scene_mut().clear();
        (self.content)(&frame, self.renderer.scene_mut());
    }
}
