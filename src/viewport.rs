//! Keeps the camera and the output surface in step with the window size.

use crate::{camera::Camera, render_loop::Canvas};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Resize {
    Applied { width: u32, height: u32, aspect: f32 },
    /// A zero-sized dimension, nothing changed.
    Skipped,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewportController {
    size: Option<(u32, u32)>,
}

impl ViewportController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last applied size.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    /// Sets the aspect ratio to `width / height` and resizes the canvas.
    ///
    /// Zero-sized windows (minimised, or a collapsed canvas) are ignored so the
    /// projection never sees a zero or infinite aspect ratio.
    pub fn on_resize<C: Canvas>(
        &mut self,
        camera: &mut Camera,
        canvas: &mut C,
        width: u32,
        height: u32,
    ) -> Resize {
        if !camera.projection.resize(width, height) {
            log::debug!("Ignoring resize to {width}x{height}");
            return Resize::Skipped;
        }
        canvas.set_size(width, height);
        self.size = Some((width, height));
        Resize::Applied {
            width,
            height,
            aspect: camera.aspect(),
        }
    }
}
