mod common;

use flow_diorama::viewport::{Resize, ViewportController};

use crate::common::test_utils::{RecordingCanvas, test_camera};

#[test]
fn should_apply_exact_aspect_ratio() {
    let mut camera = test_camera(800, 600);
    let mut canvas = RecordingCanvas::new();
    let mut viewport = ViewportController::new();

    let outcome = viewport.on_resize(&mut camera, &mut canvas, 1920, 1080);

    assert_eq!(
        outcome,
        Resize::Applied {
            width: 1920,
            height: 1080,
            aspect: 1920.0 / 1080.0,
        }
    );
    assert_eq!(camera.aspect(), 1920.0 / 1080.0);
    assert_eq!(canvas.sizes, [(1920, 1080)]);
    assert_eq!(viewport.size(), Some((1920, 1080)));
}

#[test]
fn should_skip_zero_height() {
    let mut camera = test_camera(800, 600);
    let mut canvas = RecordingCanvas::new();
    let mut viewport = ViewportController::new();

    assert_eq!(
        viewport.on_resize(&mut camera, &mut canvas, 1024, 0),
        Resize::Skipped
    );
    assert_eq!(camera.aspect(), 800.0 / 600.0);
    assert!(camera.aspect().is_finite());
    assert!(canvas.sizes.is_empty());
    assert_eq!(viewport.size(), None);
}

#[test]
fn should_skip_zero_width() {
    let mut camera = test_camera(800, 600);
    let mut canvas = RecordingCanvas::new();
    let mut viewport = ViewportController::new();

    assert_eq!(
        viewport.on_resize(&mut camera, &mut canvas, 0, 768),
        Resize::Skipped
    );
    assert_eq!(camera.aspect(), 800.0 / 600.0);
    assert!(canvas.sizes.is_empty());
}

#[test]
fn should_keep_last_size_after_minimising() {
    let mut camera = test_camera(800, 600);
    let mut canvas = RecordingCanvas::new();
    let mut viewport = ViewportController::new();

    viewport.on_resize(&mut camera, &mut canvas, 1280, 720);
    viewport.on_resize(&mut camera, &mut canvas, 0, 0);

    assert_eq!(camera.aspect(), 1280.0 / 720.0);
    assert_eq!(viewport.size(), Some((1280, 720)));
    assert_eq!(canvas.sizes, [(1280, 720)]);
}

#[test]
fn should_follow_every_resize() {
    let mut camera = test_camera(800, 600);
    let mut canvas = RecordingCanvas::new();
    let mut viewport = ViewportController::new();

    for (width, height) in [(640, 480), (1080, 1920), (3, 1)] {
        viewport.on_resize(&mut camera, &mut canvas, width, height);
        assert_eq!(camera.aspect(), width as f32 / height as f32);
    }
    assert_eq!(canvas.sizes.len(), 3);
}
