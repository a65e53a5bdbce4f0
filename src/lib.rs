//! flow-diorama
//!
//! A retained-scene viewer on wgpu. A scene is assembled once from primitive
//! geometries, shared materials and world transforms, then drawn every frame
//! by a small render loop that can be started and stopped. The bundled scene
//! is a café interior with a spinning cup.
//!
//! High-level modules
//! - `data_structures`: geometry, materials, transforms and the scene itself
//! - `assembly`: replication, composite fixtures and the café layout
//! - `render_loop`: the `Idle → Running → Stopped` frame driver
//! - `viewport`: resize handling with the zero-size guard
//! - `camera`: look-at camera, projection and its uniform
//! - `config`: viewer configuration
//! - `context`: window surface, device, queue and shared uniforms
//! - `pipelines`: the scene pipeline and its shader inputs
//! - `resources`: texture loading and mesh upload
//! - `render`: GPU upload of a scene and per-frame drawing
//! - `flow`: the winit application shell
//!

pub mod assembly;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod render_loop;
pub mod resources;
pub mod viewport;

pub use assembly::{build_diorama, build_scene};
pub use config::ViewerConfig;
pub use error::SceneError;
pub use flow::{run, run_until};
pub use render_loop::{Canvas, RenderLoop, StopHandle};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), wasm_bindgen::JsValue> {
    run(ViewerConfig::default()).map_err(|e| wasm_bindgen::JsValue::from_str(&e.to_string()))
}
