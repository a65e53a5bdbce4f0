mod common;

use std::f32::consts::TAU;

use approx::assert_relative_eq;
use cgmath::Rad;
use flow_diorama::{
    assembly::Axis,
    data_structures::scene_graph::{ObjectId, Scene},
    render_loop::{LoopState, RenderLoop, Spin, StopHandle, Tick, wrap_angle},
};

use crate::common::test_utils::{RecordingCanvas, single_box_scene, test_camera};

fn box_id(scene: &Scene) -> ObjectId {
    scene.find("box").unwrap()
}

fn rotation_y(scene: &Scene) -> f32 {
    scene.object(box_id(scene)).unwrap().transform.rotation.y.0
}

#[test]
fn should_render_nothing_before_start() {
    let mut scene = single_box_scene();
    let camera = test_camera(800, 600);
    let mut canvas = RecordingCanvas::new();
    let spin = Spin::new(box_id(&scene), Axis::Y, 0.01);
    let mut render_loop = RenderLoop::new(vec![spin]);

    assert_eq!(render_loop.state(), LoopState::Idle);
    assert_eq!(
        render_loop.tick(&mut scene, &camera, &mut canvas),
        Ok(Tick::Idle)
    );
    assert_eq!(canvas.render_count(), 0);
    assert_eq!(rotation_y(&scene), 0.0);
}

#[test]
fn should_start_only_once() {
    let mut render_loop = RenderLoop::new(Vec::new());
    assert!(render_loop.start());
    assert!(!render_loop.start());
    assert_eq!(render_loop.state(), LoopState::Running);
}

#[test]
fn should_render_exactly_once_per_tick() {
    let mut scene = single_box_scene();
    let camera = test_camera(800, 600);
    let mut canvas = RecordingCanvas::new();
    let mut render_loop = RenderLoop::new(vec![Spin::new(box_id(&scene), Axis::Y, 0.01)]);
    render_loop.start();

    for _ in 0..10 {
        assert_eq!(
            render_loop.tick(&mut scene, &camera, &mut canvas),
            Ok(Tick::Rendered)
        );
    }
    assert_eq!(canvas.render_count(), 10);
    assert_eq!(render_loop.frames(), 10);
}

#[test]
fn should_mutate_before_rendering() {
    let mut scene = single_box_scene();
    let camera = test_camera(800, 600);
    let mut canvas = RecordingCanvas::new();
    let mut render_loop = RenderLoop::new(vec![Spin::new(box_id(&scene), Axis::Y, 0.01)]);
    render_loop.start();

    render_loop.tick(&mut scene, &camera, &mut canvas).unwrap();
    render_loop.tick(&mut scene, &camera, &mut canvas).unwrap();

    assert_relative_eq!(rotation_y(&canvas.frames[0]), 0.01);
    assert_relative_eq!(rotation_y(&canvas.frames[1]), 0.02);
}

#[test]
fn should_only_rotate_the_spin_axis() {
    let mut scene = single_box_scene();
    let spin = Spin::new(box_id(&scene), Axis::X, 0.5);
    assert!(spin.apply(&mut scene));

    let rotation = scene.object(box_id(&scene)).unwrap().transform.rotation;
    assert_eq!(rotation.x, Rad(0.5));
    assert_eq!(rotation.y, Rad(0.0));
    assert_eq!(rotation.z, Rad(0.0));
}

#[test]
fn should_keep_angle_in_range_over_many_ticks() {
    let mut scene = single_box_scene();
    let camera = test_camera(800, 600);
    let mut canvas = RecordingCanvas::new();
    let mut render_loop = RenderLoop::new(vec![Spin::new(box_id(&scene), Axis::Y, 0.01)]);
    render_loop.start();

    // 0.01 * 700 passes 2π once
    for _ in 0..700 {
        render_loop.tick(&mut scene, &camera, &mut canvas).unwrap();
        let angle = rotation_y(&scene);
        assert!((0.0..TAU).contains(&angle), "angle {angle} escaped [0, 2π)");
    }
    assert_relative_eq!(rotation_y(&scene), 7.0 - TAU, epsilon = 1e-3);
}

#[test]
fn should_stop_without_rendering() {
    let mut scene = single_box_scene();
    let camera = test_camera(800, 600);
    let mut canvas = RecordingCanvas::new();
    let stop = StopHandle::new();
    let mut render_loop =
        RenderLoop::with_stop_handle(vec![Spin::new(box_id(&scene), Axis::Y, 0.01)], stop.clone());
    render_loop.start();
    render_loop.tick(&mut scene, &camera, &mut canvas).unwrap();

    stop.stop();
    let angle = rotation_y(&scene);
    assert_eq!(
        render_loop.tick(&mut scene, &camera, &mut canvas),
        Ok(Tick::Stopped)
    );
    assert_eq!(render_loop.state(), LoopState::Stopped);
    assert_eq!(canvas.render_count(), 1);
    assert_eq!(rotation_y(&scene), angle);

    // Stopped is terminal
    assert!(!render_loop.start());
    assert_eq!(
        render_loop.tick(&mut scene, &camera, &mut canvas),
        Ok(Tick::Stopped)
    );
}

#[test]
fn should_stop_before_first_tick() {
    let mut scene = single_box_scene();
    let camera = test_camera(800, 600);
    let mut canvas = RecordingCanvas::new();
    let mut render_loop = RenderLoop::new(Vec::new());
    render_loop.start();
    render_loop.stop();

    assert!(render_loop.stop_handle().is_stopped());
    assert_eq!(
        render_loop.tick(&mut scene, &camera, &mut canvas),
        Ok(Tick::Stopped)
    );
    assert_eq!(canvas.render_count(), 0);
}

#[test]
fn should_report_render_error_after_mutation() {
    let mut scene = single_box_scene();
    let camera = test_camera(800, 600);
    let mut canvas = RecordingCanvas::failing();
    let mut render_loop = RenderLoop::new(vec![Spin::new(box_id(&scene), Axis::Y, 0.01)]);
    render_loop.start();

    assert_eq!(
        render_loop.tick(&mut scene, &camera, &mut canvas),
        Err("surface lost".to_string())
    );
    assert_relative_eq!(rotation_y(&scene), 0.01);
    assert_eq!(render_loop.state(), LoopState::Running);
}

#[test]
fn should_ignore_spins_on_missing_objects() {
    let mut scene = single_box_scene();
    let camera = test_camera(800, 600);
    let mut canvas = RecordingCanvas::new();
    let mut other = Scene::new();
    other.add_object(scene.object(box_id(&scene)).unwrap().clone());
    let far = other.add_object(scene.object(box_id(&scene)).unwrap().clone());

    let spin = Spin::new(far, Axis::Y, 0.01);
    assert!(!spin.apply(&mut scene));

    let mut render_loop = RenderLoop::new(vec![spin]);
    render_loop.start();
    assert_eq!(
        render_loop.tick(&mut scene, &camera, &mut canvas),
        Ok(Tick::Rendered)
    );
    assert_eq!(rotation_y(&scene), 0.0);
}

#[test]
fn should_wrap_angles() {
    assert_eq!(wrap_angle(0.0), 0.0);
    assert_relative_eq!(wrap_angle(TAU + 0.25), 0.25, epsilon = 1e-6);
    assert_relative_eq!(wrap_angle(-0.25), TAU - 0.25, epsilon = 1e-6);
    assert_eq!(wrap_angle(TAU), 0.0);
    assert_eq!(wrap_angle(-1e-9), 0.0);
}
