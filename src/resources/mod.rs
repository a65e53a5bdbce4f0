//! Loading external data and turning scene data into GPU resources.
//!
//! - `texture`: asset byte loading (disk or HTTP) and texture decoding
//! - `mesh`: upload of tessellated primitives

pub mod mesh;
pub mod texture;
