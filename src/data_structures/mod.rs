//! Scene data: everything that exists before (and without) a GPU.
//!
//! - `geometry` holds the primitive descriptors and their tessellation
//! - `material` holds named surface appearances and the registry sharing them
//! - `instance` holds transforms and their GPU instance layout
//! - `model` holds vertex layouts, CPU meshes and GPU meshes
//! - `scene_graph` holds the retained scene of placed objects and lights
//! - `texture` wraps GPU textures

pub mod geometry;
pub mod instance;
pub mod material;
pub mod model;
pub mod scene_graph;
pub mod texture;
