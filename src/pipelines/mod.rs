//! Render pipeline construction and the uniforms the scene shader reads.

pub mod basic;
pub mod light;
