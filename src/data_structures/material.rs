//! Named surface appearances shared across placed objects.
//!
//! A [`Material`] binds a [`ShadingModel`], an optional texture reference and a
//! few colour parameters. Materials are immutable and handed out as
//! `Arc<Material>`, so every object using "wood" points at the same value.
//!
//! Texture state lives next to the materials in the [`MaterialRegistry`]: a
//! textured material starts out [`TextureStatus::Pending`] and renders with its
//! flat colour until the loader reports back through
//! [`MaterialRegistry::resolve_texture`].

use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};

use crate::error::SceneError;

/// Linear RGB colour.
pub type Colour = [f32; 3];

/// Converts a `0xRRGGBB` literal into a colour.
pub fn rgb(hex: u32) -> Colour {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

pub const WHITE: Colour = [1.0, 1.0, 1.0];
pub const BLACK: Colour = [0.0, 0.0, 0.0];

/// How a surface responds to light.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShadingModel {
    /// Lambertian, no highlights.
    Diffuse,
    /// Lambert plus Blinn-Phong highlights driven by `shininess`.
    Specular,
    /// Diffuse surface that can also emit its own light.
    Emissive,
}

impl ShadingModel {
    /// Index passed to the shader.
    pub fn index(&self) -> u32 {
        match self {
            ShadingModel::Diffuse => 0,
            ShadingModel::Specular => 1,
            ShadingModel::Emissive => 2,
        }
    }
}

impl FromStr for ShadingModel {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diffuse" | "lambert" => Ok(ShadingModel::Diffuse),
            "specular" | "phong" => Ok(ShadingModel::Specular),
            "emissive" | "standard" => Ok(ShadingModel::Emissive),
            other => Err(SceneError::Configuration(format!(
                "unknown shading model '{other}', expected diffuse, specular or emissive"
            ))),
        }
    }
}

impl fmt::Display for ShadingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShadingModel::Diffuse => "diffuse",
            ShadingModel::Specular => "specular",
            ShadingModel::Emissive => "emissive",
        };
        f.write_str(name)
    }
}

/// Asset-relative path of an image, e.g. `textures/wood.jpg`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureRef(pub String);

impl TextureRef {
    pub fn path(&self) -> &str {
        &self.0
    }
}

/// Optional knobs for [`MaterialRegistry::define_material`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialParams {
    pub colour: Colour,
    pub emissive: Colour,
    pub shininess: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            colour: WHITE,
            emissive: BLACK,
            shininess: 30.0,
        }
    }
}

impl MaterialParams {
    pub fn colour(mut self, colour: Colour) -> Self {
        self.colour = colour;
        self
    }

    pub fn emissive(mut self, emissive: Colour) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub shading: ShadingModel,
    pub texture: Option<TextureRef>,
    pub colour: Colour,
    pub emissive: Colour,
    pub shininess: f32,
}

impl Material {
    pub fn shading_model(&self) -> ShadingModel {
        self.shading
    }

    /// Emission only applies to the emissive model.
    pub fn effective_emissive(&self) -> Colour {
        match self.shading {
            ShadingModel::Emissive => self.emissive,
            _ => BLACK,
        }
    }
}

/// Where a material's texture is in its asynchronous life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureStatus {
    /// No texture requested; the flat colour is final.
    Untextured,
    /// Load in flight; the flat colour is a placeholder.
    Pending,
    Ready,
    /// Load failed; the flat colour stays.
    Fallback,
}

/// A texture the loader should fetch for `material`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureRequest {
    pub material: String,
    pub path: String,
}

/// Insertion-ordered set of named materials.
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    materials: Vec<Arc<Material>>,
    status: Vec<TextureStatus>,
    by_name: HashMap<String, usize>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a material.
    ///
    /// `shading_model` is parsed with [`ShadingModel::from_str`], an unknown
    /// name fails with [`SceneError::Configuration`] and leaves the registry
    /// untouched.
    pub fn define_material(
        &mut self,
        name: &str,
        shading_model: &str,
        texture: Option<&str>,
        params: MaterialParams,
    ) -> Result<Arc<Material>, SceneError> {
        let shading = shading_model.parse::<ShadingModel>()?;
        if !params.shininess.is_finite() || params.shininess < 0.0 {
            return Err(SceneError::Configuration(format!(
                "material '{name}' has invalid shininess {}",
                params.shininess
            )));
        }
        let material = Arc::new(Material {
            name: name.to_string(),
            shading,
            texture: texture.map(|path| TextureRef(path.to_string())),
            colour: params.colour,
            emissive: params.emissive,
            shininess: params.shininess,
        });
        let status = if material.texture.is_some() {
            TextureStatus::Pending
        } else {
            TextureStatus::Untextured
        };
        match self.by_name.get(name) {
            Some(&idx) => {
                self.materials[idx] = material.clone();
                self.status[idx] = status;
            }
            None => {
                self.by_name.insert(name.to_string(), self.materials.len());
                self.materials.push(material.clone());
                self.status.push(status);
            }
        }
        Ok(material)
    }

    pub fn get(&self, name: &str) -> Result<Arc<Material>, SceneError> {
        self.by_name
            .get(name)
            .map(|&idx| self.materials[idx].clone())
            .ok_or_else(|| SceneError::Configuration(format!("material '{name}' is not registered")))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Material>> {
        self.materials.iter()
    }

    pub fn texture_status(&self, name: &str) -> Option<TextureStatus> {
        self.by_name.get(name).map(|&idx| self.status[idx])
    }

    /// Loads that still have to be started.
    pub fn texture_requests(&self) -> Vec<TextureRequest> {
        self.materials
            .iter()
            .zip(&self.status)
            .filter(|(_, status)| **status == TextureStatus::Pending)
            .filter_map(|(material, _)| {
                material.texture.as_ref().map(|texture| TextureRequest {
                    material: material.name.clone(),
                    path: texture.path().to_string(),
                })
            })
            .collect()
    }

    /// Records the outcome of a texture load.
    ///
    /// Failures are logged and swallowed: the material keeps rendering with
    /// its flat colour. Returns the new status, or `None` for an unknown name.
    pub fn resolve_texture(
        &mut self,
        name: &str,
        outcome: Result<(), SceneError>,
    ) -> Option<TextureStatus> {
        let idx = *self.by_name.get(name)?;
        let status = match outcome {
            Ok(()) => TextureStatus::Ready,
            Err(e) => {
                log::warn!("Material '{name}' falls back to its flat colour: {e}");
                TextureStatus::Fallback
            }
        };
        self.status[idx] = status;
        Some(status)
    }
}
