#![allow(dead_code)]

use std::sync::Arc;

use flow_diorama::{
    camera::Camera,
    config::ViewerConfig,
    data_structures::{
        geometry::Geometry,
        instance::Transform,
        material::{Material, MaterialParams, MaterialRegistry},
        model::MeshData,
        scene_graph::{PlacedObject, Scene},
    },
    render_loop::Canvas,
};

/// A canvas that remembers what it was asked to do.
///
/// Every render stores a snapshot of the scene so tests can inspect the
/// state that would have been drawn.
#[derive(Debug, Default)]
pub(crate) struct RecordingCanvas {
    pub(crate) sizes: Vec<(u32, u32)>,
    pub(crate) frames: Vec<Scene>,
    pub(crate) fail_renders: bool,
}

impl RecordingCanvas {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail_renders: true,
            ..Self::default()
        }
    }

    pub(crate) fn render_count(&self) -> usize {
        self.frames.len()
    }
}

impl Canvas for RecordingCanvas {
    type Error = String;

    fn set_size(&mut self, width: u32, height: u32) {
        self.sizes.push((width, height));
    }

    fn render(&mut self, scene: &Scene, _camera: &Camera) -> Result<(), Self::Error> {
        self.frames.push(scene.clone());
        if self.fail_renders {
            Err("surface lost".to_string())
        } else {
            Ok(())
        }
    }
}

pub(crate) fn test_camera(width: u32, height: u32) -> Camera {
    Camera::from_config(&ViewerConfig::default().with_size(width, height))
}

/// Registry with one untextured material per shading model.
pub(crate) fn plain_registry() -> MaterialRegistry {
    let mut registry = MaterialRegistry::new();
    for (name, shading) in [("matte", "diffuse"), ("shiny", "specular"), ("glow", "emissive")] {
        registry
            .define_material(name, shading, None, MaterialParams::default())
            .expect("built-in shading model must be accepted");
    }
    registry
}

pub(crate) fn material(registry: &MaterialRegistry, name: &str) -> Arc<Material> {
    registry.get(name).expect("material is registered")
}

/// A scene holding a single unit box at the origin.
pub(crate) fn single_box_scene() -> Scene {
    let registry = plain_registry();
    let mut scene = Scene::new();
    scene.add_object(PlacedObject::new(
        "box",
        Geometry::cuboid(1.0, 1.0, 1.0).expect("valid box"),
        material(&registry, "matte"),
        Transform::new(),
    ));
    scene
}

/// Every index points at a vertex and every normal has unit length.
pub(crate) fn assert_well_formed(mesh: &MeshData) {
    assert!(!mesh.indices.is_empty(), "mesh has no triangles");
    assert_eq!(mesh.indices.len() % 3, 0, "index count is not a multiple of 3");
    let vertex_count = mesh.vertices.len() as u32;
    for index in &mesh.indices {
        assert!(*index < vertex_count, "index {index} out of range {vertex_count}");
    }
    for vertex in &mesh.vertices {
        let [x, y, z] = vertex.normal;
        let length = (x * x + y * y + z * z).sqrt();
        approx::assert_relative_eq!(length, 1.0, epsilon = 1e-4);
    }
}
