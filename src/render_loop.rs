//! Frame-driven render loop.
//!
//! [`RenderLoop`] is passive: something else (the window's redraw requests)
//! calls [`RenderLoop::tick`] once per displayed frame. A tick applies the
//! registered [`Spin`]s and asks the [`Canvas`] for exactly one render.
//!
//! ```text
//!  Idle --start()--> Running --stop requested, next tick--> Stopped
//! ```
//!
//! Stopping goes through a [`StopHandle`], which can be cloned and handed to
//! whatever owns the viewer's lifetime.

use std::{
    f32::consts::TAU,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use cgmath::Rad;

use crate::{
    assembly::Axis,
    camera::Camera,
    data_structures::scene_graph::{ObjectId, Scene},
};

/// The drawable surface the loop and the viewport controller talk to.
pub trait Canvas {
    type Error;

    fn set_size(&mut self, width: u32, height: u32);

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), Self::Error>;
}

/// Keeps an angle inside `[0, 2π)`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Per-tick rotation of one object around one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spin {
    pub target: ObjectId,
    pub axis: Axis,
    pub delta: f32,
}

impl Spin {
    pub fn new(target: ObjectId, axis: Axis, delta: f32) -> Self {
        Self {
            target,
            axis,
            delta,
        }
    }

    /// Returns `false` if the target is not an object of `scene`.
    pub fn apply(&self, scene: &mut Scene) -> bool {
        let Some(object) = scene.object_mut(self.target) else {
            return false;
        };
        let rotation = &mut object.transform.rotation;
        let angle = match self.axis {
            Axis::X => &mut rotation.x,
            Axis::Y => &mut rotation.y,
            Axis::Z => &mut rotation.z,
        };
        *angle = Rad(wrap_angle(angle.0 + self.delta));
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

/// What a call to [`RenderLoop::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Not started yet, nothing was rendered.
    Idle,
    /// Mutations applied and one frame rendered.
    Rendered,
    /// The loop is stopped; the caller should tear the view down.
    Stopped,
}

#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    spins: Vec<Spin>,
    stop: StopHandle,
    frames: u64,
}

impl RenderLoop {
    pub fn new(spins: Vec<Spin>) -> Self {
        Self::with_stop_handle(spins, StopHandle::new())
    }

    pub fn with_stop_handle(spins: Vec<Spin>, stop: StopHandle) -> Self {
        Self {
            state: LoopState::Idle,
            spins,
            stop,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn spins(&self) -> &[Spin] {
        &self.spins
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// `Idle → Running`. Returns `false` if the loop was not idle.
    pub fn start(&mut self) -> bool {
        if self.state != LoopState::Idle {
            return false;
        }
        log::info!("Render loop started with {} animated object(s)", self.spins.len());
        self.state = LoopState::Running;
        true
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    /// One frame: animate, then render once.
    ///
    /// A canvas error is handed back after the mutations were applied, the
    /// loop itself keeps running.
    pub fn tick<C: Canvas>(
        &mut self,
        scene: &mut Scene,
        camera: &Camera,
        canvas: &mut C,
    ) -> Result<Tick, C::Error> {
        if self.stop.is_stopped() && self.state != LoopState::Stopped {
            log::info!("Render loop stopped after {} frames", self.frames);
            self.state = LoopState::Stopped;
        }
        match self.state {
            LoopState::Idle => Ok(Tick::Idle),
            LoopState::Stopped => Ok(Tick::Stopped),
            LoopState::Running => {
                for spin in &self.spins {
                    if !spin.apply(scene) {
                        log::warn!("Animated object {:?} is not part of the scene", spin.target);
                    }
                }
                self.frames += 1;
                canvas.render(scene, camera)?;
                Ok(Tick::Rendered)
            }
        }
    }
}
