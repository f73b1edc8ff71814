use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use stroke_animation::{DrawSequencer, Phase, SequencerConfig};
use stroke_app_shell::{AppShell, SceneFrame};
use stroke_graphics::{Brush, Color, PathMeasure, Point, Rect, Size, StrokeStyle};
use stroke_render_pixels::{draw_scene, PixelsRenderer, Scene};

use pixels::{Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseButton, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder};
use winit::window::WindowBuilder;

mod hello_path;

use hello_path::{hello_path, DESIGN_SIZE};

const INITIAL_WIDTH: u32 = 960;
const INITIAL_HEIGHT: u32 = 540;

// Design constants.
const LINE_WIDTH: f32 = 3.0;
const GRADIENT_COLORS: [Color; 3] = [
    Color(1.0, 0.176, 0.333, 1.0), // pink
    Color(0.686, 0.322, 0.871, 1.0), // purple
    Color(0.196, 0.678, 0.902, 1.0), // cyan
];
const HINT_COLOR: Color = Color(1.0, 1.0, 1.0, 0.22);

// Animation constants.
const DURATION: Duration = Duration::from_millis(5_500);
const POST_DRAW_DELAY: Duration = Duration::from_millis(2_300);
const START_TRIM: f32 = 0.0;
const END_TRIM: f32 = 1.0;

fn main() {
    env_logger::init();

    println!("=== Hello Stroke ===");
    println!("Click the window: the stroke draws itself, holds, then un-draws.");
    println!("Set HELLO_AUTOSTART=1 to start a cycle on launch.");
    println!("Press 'D' to dump the sequencer state.");
    println!();

    let event_loop = EventLoopBuilder::new().build();
    let frame_proxy = event_loop.create_proxy();
    let window = WindowBuilder::new()
        .with_title("Hello Stroke")
        .with_inner_size(LogicalSize::new(
            INITIAL_WIDTH as f64,
            INITIAL_HEIGHT as f64,
        ))
        .build(&event_loop)
        .expect("window");
    let size = window.inner_size();
    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(size.width, size.height, surface_texture).expect("pixels");

    let config = SequencerConfig {
        start_value: START_TRIM,
        end_value: END_TRIM,
        ..SequencerConfig::new(DURATION, POST_DRAW_DELAY)
    };
    let mut app = AppShell::new(PixelsRenderer::new(), config, hello_content);
    app.set_frame_waker({
        let proxy = frame_proxy.clone();
        move || {
            let _ = proxy.send_event(());
        }
    });
    app.set_viewport(size.width as f32, size.height as f32);
    app.set_buffer_size(size.width, size.height);

    // The on-appear variant: start one cycle without waiting for a tap.
    if std::env::var_os("HELLO_AUTOSTART").is_some() {
        let sequencer = app.sequencer();
        app.runtime_handle()
            .spawn_task(Box::new(move || sequencer.trigger()));
    }

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(new_size) => {
                    if new_size.width == 0 || new_size.height == 0 {
                        return;
                    }
                    if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                        log::error!("failed to resize surface: {err}");
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                    if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                        log::error!("failed to resize buffer: {err}");
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                    app.set_buffer_size(new_size.width, new_size.height);
                    app.set_viewport(new_size.width as f32, new_size.height as f32);
                    window.request_redraw();
                }
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    if let Err(err) =
                        pixels.resize_surface(new_inner_size.width, new_inner_size.height)
                    {
                        log::error!("failed to resize surface: {err}");
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                    if let Err(err) =
                        pixels.resize_buffer(new_inner_size.width, new_inner_size.height)
                    {
                        log::error!("failed to resize buffer: {err}");
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                    app.set_buffer_size(new_inner_size.width, new_inner_size.height);
                    app.set_viewport(new_inner_size.width as f32, new_inner_size.height as f32);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    // Scene coordinates are physical pixels, so no scale
                    // factor mapping is needed for hit testing.
                    app.set_cursor(position.x as f32, position.y as f32);
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => match state {
                    ElementState::Pressed => app.pointer_pressed(),
                    ElementState::Released => app.pointer_released(),
                },
                WindowEvent::KeyboardInput { input, .. } => {
                    if let Some(keycode) = input.virtual_keycode {
                        if input.state == ElementState::Pressed && keycode == VirtualKeyCode::D {
                            let sequencer = app.sequencer();
                            println!(
                                "sequencer: phase={:?} progress={:.3} generation={}",
                                sequencer.phase(),
                                sequencer.progress_value(),
                                sequencer.generation()
                            );
                        }
                    }
                }
                _ => {}
            },
            Event::MainEventsCleared | Event::RedrawEventsCleared | Event::UserEvent(()) => {
                if app.should_render() {
                    window.request_redraw();
                    *control_flow = ControlFlow::Poll;
                } else if let Some(fire_at) = app.next_timer_fire_at() {
                    // Sleep until the hold timer is due instead of polling.
                    let deadline = app.start_time() + Duration::from_nanos(fire_at);
                    if Instant::now() >= deadline {
                        window.request_redraw();
                        *control_flow = ControlFlow::Poll;
                    } else {
                        *control_flow = ControlFlow::WaitUntil(deadline);
                    }
                }
            }
            Event::RedrawRequested(_) => {
                app.update();

                let (buffer_width, buffer_height) = app.buffer_size();
                draw_scene(pixels.frame_mut(), buffer_width, buffer_height, app.scene());
                if let Err(err) = pixels.render() {
                    log::error!("pixels render failed: {err}");
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => {}
        }
    });
}

/// Builds the per-frame scene: the trimmed glyph stroke, the idle hint chip,
/// and a full-viewport tap region that triggers the sequencer.
fn hello_content(sequencer: DrawSequencer) -> impl FnMut(&SceneFrame, &mut Scene) {
    let measure = PathMeasure::new(&hello_path());
    let glyph_bounds = measure.bounds();
    let brush = Brush::linear_gradient(&GRADIENT_COLORS);

    move |frame, scene| {
        let fit = fitting_rect(frame.viewport);
        let scale = fit.width / DESIGN_SIZE.width;

        let revealed = measure.trimmed(START_TRIM, frame.progress);
        if !revealed.is_empty() {
            let contours = revealed
                .iter()
                .map(|contour| {
                    contour
                        .iter()
                        .map(|p| Point::new(fit.x + p.x * scale, fit.y + p.y * scale))
                        .collect()
                })
                .collect();
            // The gradient spans the full glyph regardless of how much of
            // the stroke is currently revealed.
            let span = (
                fit.x + glyph_bounds.x * scale,
                fit.x + glyph_bounds.right() * scale,
            );
            scene.push_stroke(
                contours,
                brush.clone(),
                StrokeStyle::round(LINE_WIDTH * scale),
                span,
            );
        }

        if frame.phase == Phase::Idle {
            let chip_width = 120.0 * scale;
            let chip_height = 5.0 * scale;
            scene.push_rect(
                Rect::new(
                    fit.x + (fit.width - chip_width) / 2.0,
                    fit.y + 160.0 * scale,
                    chip_width,
                    chip_height,
                ),
                HINT_COLOR,
            );
        }

        let tap = sequencer.clone();
        scene.push_hit(
            Rect::new(0.0, 0.0, frame.viewport.width, frame.viewport.height),
            Rc::new(RefCell::new(move || tap.trigger())),
        );
    }
}

/// Largest 16:9 rect that fits the viewport, centered.
fn fitting_rect(viewport: Size) -> Rect {
    let target = DESIGN_SIZE.width / DESIGN_SIZE.height;
    let height_based_on_width = viewport.width / target;
    let (width, height) = if height_based_on_width <= viewport.height {
        (viewport.width, height_based_on_width)
    } else {
        (viewport.height * target, viewport.height)
    };
    Rect::new(
        (viewport.width - width) / 2.0,
        (viewport.height - height) / 2.0,
        width,
        height,
    )
}
