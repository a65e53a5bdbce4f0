//! Error taxonomy for scene construction.
//!
//! GPU and windowing plumbing keeps using `anyhow`; everything that can go
//! wrong while describing the scene itself is a [`SceneError`].

use thiserror::Error;

/// Errors raised while defining materials, geometry and viewer configuration.
///
/// The type is `Clone` so that a failed part definition can travel with a
/// fixture through replication and still be reported once per placed copy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Unknown shading model, unregistered material or a bad viewer setting.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Non-positive, non-finite or too coarse dimensions for a primitive.
    #[error("invalid {shape} geometry: {reason}")]
    InvalidGeometry { shape: &'static str, reason: String },

    /// A texture could not be fetched or decoded.
    ///
    /// Recovered locally by falling back to the material's flat colour.
    #[error("failed to load texture {path}: {reason}")]
    ResourceLoad { path: String, reason: String },
}

impl SceneError {
    pub(crate) fn geometry(shape: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            shape,
            reason: reason.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_invalid_geometry(&self) -> bool {
        matches!(self, Self::InvalidGeometry { .. })
    }
}
