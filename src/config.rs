//! Viewer configuration.
//!
//! The defaults reproduce the café scene: a 75° camera at (10, 6, 12)
//! looking at the table, a cup spinning by 0.01 rad per frame.

use crate::error::SceneError;

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub title: String,
    /// Initial window size; the first resize event replaces it.
    pub width: u32,
    pub height: u32,
    pub clear_colour: wgpu::Color,
    /// Directory textures are resolved against.
    pub asset_root: String,
    pub fov_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    pub camera_position: [f32; 3],
    pub camera_target: [f32; 3],
    /// Rotation added to the animated object every tick, in radians.
    pub spin_delta: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "flow-diorama".to_string(),
            width: 1280,
            height: 720,
            clear_colour: wgpu::Color::BLACK,
            asset_root: "assets".to_string(),
            fov_degrees: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            camera_position: [10.0, 6.0, 12.0],
            camera_target: [0.0, 2.0, 0.0],
            spin_delta: 0.01,
        }
    }
}

impl ViewerConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_clear_colour(mut self, clear_colour: wgpu::Color) -> Self {
        self.clear_colour = clear_colour;
        self
    }

    pub fn with_asset_root(mut self, asset_root: impl Into<String>) -> Self {
        self.asset_root = asset_root.into();
        self
    }

    pub fn with_camera(mut self, position: [f32; 3], target: [f32; 3]) -> Self {
        self.camera_position = position;
        self.camera_target = target;
        self
    }

    pub fn with_spin_delta(mut self, spin_delta: f32) -> Self {
        self.spin_delta = spin_delta;
        self
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(SceneError::Configuration(format!(
                "field of view must be in (0, 180) degrees, got {}",
                self.fov_degrees
            )));
        }
        if !(self.znear > 0.0 && self.znear < self.zfar) {
            return Err(SceneError::Configuration(format!(
                "clip planes must satisfy 0 < znear < zfar, got {} and {}",
                self.znear, self.zfar
            )));
        }
        if !self.spin_delta.is_finite() {
            return Err(SceneError::Configuration(format!(
                "spin delta must be finite, got {}",
                self.spin_delta
            )));
        }
        if self.camera_position == self.camera_target {
            return Err(SceneError::Configuration(
                "camera position and target must differ".to_string(),
            ));
        }
        Ok(())
    }
}
