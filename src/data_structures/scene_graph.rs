//! Retained scene: placed objects and light sources.
//!
//! The scene is a flat, insertion-ordered list. Every [`PlacedObject`] carries
//! an absolute world-space [`Transform`]; grouping (see `assembly::Fixture`)
//! only survives as a label. Objects are addressed by [`ObjectId`], which stays
//! valid for the lifetime of the scene since nothing is ever removed.

use std::sync::Arc;

use cgmath::Vector3;

use crate::data_structures::{
    geometry::Geometry,
    instance::Transform,
    material::{Colour, Material},
};

/// Stable handle to a placed object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) usize);

impl ObjectId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Geometry + shared material + placement.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedObject {
    pub name: String,
    pub geometry: Geometry,
    pub material: Arc<Material>,
    pub transform: Transform,
    /// Fixture this object was placed from, if any.
    pub group: Option<String>,
}

impl PlacedObject {
    pub fn new(
        name: impl Into<String>,
        geometry: Geometry,
        material: Arc<Material>,
        transform: Transform,
    ) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            transform,
            group: None,
        }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    Ambient,
    Point,
    Directional,
}

/// A light. Not a placed object: it has no geometry and no material.
#[derive(Clone, Debug, PartialEq)]
pub struct LightSource {
    pub kind: LightKind,
    pub colour: Colour,
    pub intensity: f32,
    /// World position for point lights, the "from" point for directional ones.
    pub position: Option<Vector3<f32>>,
    /// Range of a point light, `None` for no falloff.
    pub distance: Option<f32>,
}

impl LightSource {
    pub fn ambient(colour: Colour, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            colour,
            intensity,
            position: None,
            distance: None,
        }
    }

    pub fn point(colour: Colour, intensity: f32, distance: f32, position: Vector3<f32>) -> Self {
        Self {
            kind: LightKind::Point,
            colour,
            intensity,
            position: Some(position),
            distance: Some(distance),
        }
    }

    /// Shines from `position` towards the origin.
    pub fn directional(colour: Colour, intensity: f32, position: Vector3<f32>) -> Self {
        Self {
            kind: LightKind::Directional,
            colour,
            intensity,
            position: Some(position),
            distance: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneEntry {
    Object(PlacedObject),
    Light(LightSource),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    entries: Vec<SceneEntry>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, object: PlacedObject) -> ObjectId {
        self.entries.push(SceneEntry::Object(object));
        ObjectId(self.entries.len() - 1)
    }

    pub fn add_light(&mut self, light: LightSource) {
        self.entries.push(SceneEntry::Light(light));
    }

    pub fn entries(&self) -> &[SceneEntry] {
        &self.entries
    }

    pub fn object(&self, id: ObjectId) -> Option<&PlacedObject> {
        match self.entries.get(id.0) {
            Some(SceneEntry::Object(object)) => Some(object),
            _ => None,
        }
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut PlacedObject> {
        match self.entries.get_mut(id.0) {
            Some(SceneEntry::Object(object)) => Some(object),
            _ => None,
        }
    }

    /// First object with the given name.
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &PlacedObject)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| match entry {
                SceneEntry::Object(object) => Some((ObjectId(idx), object)),
                SceneEntry::Light(_) => None,
            })
    }

    pub fn lights(&self) -> impl Iterator<Item = &LightSource> {
        self.entries.iter().filter_map(|entry| match entry {
            SceneEntry::Light(light) => Some(light),
            SceneEntry::Object(_) => None,
        })
    }

    pub fn object_count(&self) -> usize {
        self.objects().count()
    }

    pub fn light_count(&self) -> usize {
        self.lights().count()
    }

    /// Objects that belong to the fixture `group`.
    pub fn group(&self, group: &str) -> Vec<ObjectId> {
        self.objects()
            .filter(|(_, object)| object.group.as_deref() == Some(group))
            .map(|(id, _)| id)
            .collect()
    }
}
