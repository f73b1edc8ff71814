use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use stroke_animation::SequencerConfig;
use stroke_app_shell::{AppShell, SceneFrame};
use stroke_capture::{capture_cycle, AnimationPhase, CaptureConfig, CAPTURE_STEPS};
use stroke_graphics::{Brush, Color, Path, PathMeasure, Rect, StrokeStyle};
use stroke_render_pixels::{PixelsRenderer, Scene};

fn capture_shell() -> AppShell<PixelsRenderer> {
    let config = SequencerConfig::new(Duration::from_secs(2), Duration::from_secs(1));
    AppShell::new(PixelsRenderer::new(), config, |sequencer| {
        let mut path = Path::new();
        path.move_to(40.0, 60.0).line_to(200.0, 60.0).line_to(200.0, 100.0);
        let measure = PathMeasure::new(&path);
        move |frame: &SceneFrame, scene: &mut Scene| {
            let revealed = measure.trimmed(0.0, frame.progress);
            if !revealed.is_empty() {
                scene.push_stroke(
                    revealed,
                    Brush::linear_gradient(&[
                        Color::rgb(1.0, 0.2, 0.4),
                        Color::rgb(0.2, 0.7, 0.9),
                    ]),
                    StrokeStyle::round(3.0),
                    (40.0, 200.0),
                );
            }
            let tap = sequencer.clone();
            scene.push_hit(
                Rect::new(0.0, 0.0, frame.viewport.width, frame.viewport.height),
                Rc::new(RefCell::new(move || tap.trigger())),
            );
        }
    })
}

#[test]
fn one_cycle_produces_five_captures_per_phase() {
    let output = tempfile::tempdir().expect("temp dir");
    let mut shell = capture_shell();
    let config = CaptureConfig::new(output.path()).with_size(240, 160);

    let written = capture_cycle(&mut shell, &config).expect("capture succeeds");

    assert_eq!(written.len(), 10);
    for phase in AnimationPhase::ALL {
        let dir = phase.directory(output.path());
        for step in CAPTURE_STEPS {
            let expected = dir.join(format!(
                "{}_{}_{}.png",
                step.step,
                phase.directory_name(),
                step.name
            ));
            assert!(expected.is_file(), "missing {}", expected.display());
        }
    }

    // The harness leaves the sequencer back at rest.
    assert!(!shell.sequencer().is_running());
    assert_eq!(shell.sequencer().progress_value(), 0.0);
}

#[test]
fn captures_decode_as_rgba_images_of_the_configured_size() {
    let output = tempfile::tempdir().expect("temp dir");
    let mut shell = capture_shell();
    let config = CaptureConfig::new(output.path()).with_size(120, 90);

    let written = capture_cycle(&mut shell, &config).expect("capture succeeds");

    use image::GenericImageView;
    let decoded = image::open(&written[0]).expect("decodable png");
    assert_eq!(decoded.dimensions(), (120, 90));
}

#[test]
fn rerunning_replaces_previous_phase_directories() {
    let output = tempfile::tempdir().expect("temp dir");
    let mut shell = capture_shell();
    let config = CaptureConfig::new(output.path()).with_size(120, 90);

    capture_cycle(&mut shell, &config).expect("first run");
    let stray = AnimationPhase::Going
        .directory(output.path())
        .join("stale.png");
    std::fs::write(&stray, b"junk").expect("write stray file");

    capture_cycle(&mut shell, &config).expect("second run");

    assert!(!stray.exists(), "stale capture should have been cleaned up");
}
