//! Scene assembly: composing primitives, materials and transforms.
//!
//! Two layout helpers cover the repetitive parts of a room:
//!
//! - [`Fixture`] groups parts around a single anchor. Each part stores an
//!   offset relative to the anchor, so moving the anchor moves the whole
//!   fixture.
//! - [`replicate`] / [`replicate_grid`] place independent copies of anything
//!   [`Placeable`] along one or two axes.
//!
//! The [`Assembler`] resolves materials against a [`MaterialRegistry`] and
//! places every object in isolation: a bad definition is logged, recorded as
//! an [`AssemblyFailure`] and skipped while the rest of the scene is built.
//! [`build_diorama`] encodes the café layout.

use std::f32::consts::PI;

use cgmath::Vector3;

use crate::{
    camera::Camera,
    config::ViewerConfig,
    data_structures::{
        geometry::{DEFAULT_RADIAL_SEGMENTS, Geometry},
        instance::Transform,
        material::{MaterialParams, MaterialRegistry, WHITE, rgb},
        scene_graph::{LightSource, ObjectId, PlacedObject, Scene},
    },
    error::SceneError,
    render_loop::Spin,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(&self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::unit_x(),
            Axis::Y => Vector3::unit_y(),
            Axis::Z => Vector3::unit_z(),
        }
    }
}

/// Something with a single anchor that can be copied to another place.
pub trait Placeable: Sized {
    fn name(&self) -> &str;

    fn anchor(&self) -> Transform;

    /// An independent copy anchored at `anchor`.
    fn moved_to(&self, anchor: Transform) -> Self;

    fn renamed(self, name: String) -> Self;
}

impl Placeable for PlacedObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn anchor(&self) -> Transform {
        self.transform
    }

    fn moved_to(&self, anchor: Transform) -> Self {
        Self {
            transform: anchor,
            ..self.clone()
        }
    }

    fn renamed(mut self, name: String) -> Self {
        self.name = name;
        self
    }
}

/// One piece of a fixture, positioned relative to the fixture's anchor.
///
/// The geometry is kept as a `Result` so that a bad dimension only removes
/// this part once the fixture is placed.
#[derive(Clone, Debug)]
pub struct Part {
    pub name: String,
    pub geometry: Result<Geometry, SceneError>,
    pub material: String,
    pub offset: Transform,
}

#[derive(Clone, Debug)]
pub struct Fixture {
    pub name: String,
    pub anchor: Transform,
    pub parts: Vec<Part>,
}

impl Fixture {
    pub fn new(name: impl Into<String>, anchor: Transform) -> Self {
        Self {
            name: name.into(),
            anchor,
            parts: Vec::new(),
        }
    }

    pub fn part(
        mut self,
        name: impl Into<String>,
        geometry: Result<Geometry, SceneError>,
        material: &str,
        offset: Transform,
    ) -> Self {
        self.parts.push(Part {
            name: name.into(),
            geometry,
            material: material.to_string(),
            offset,
        });
        self
    }

    /// Adds the same part once per offset, numbering the copies.
    pub fn parts_at(
        mut self,
        name: &str,
        geometry: Result<Geometry, SceneError>,
        material: &str,
        offsets: impl IntoIterator<Item = Transform>,
    ) -> Self {
        for (i, offset) in offsets.into_iter().enumerate() {
            self = self.part(format!("{name}{i}"), geometry.clone(), material, offset);
        }
        self
    }

    /// World transform of every part for the current anchor.
    pub fn part_transforms(&self) -> impl Iterator<Item = (&Part, Transform)> {
        self.parts
            .iter()
            .map(|part| (part, &self.anchor * &part.offset))
    }
}

impl Placeable for Fixture {
    fn name(&self) -> &str {
        &self.name
    }

    fn anchor(&self) -> Transform {
        self.anchor
    }

    fn moved_to(&self, anchor: Transform) -> Self {
        Self {
            anchor,
            ..self.clone()
        }
    }

    fn renamed(mut self, name: String) -> Self {
        self.name = name;
        self
    }
}

/// Four leg offsets mirrored over X and Z: (-x,-z), (x,-z), (-x,z), (x,z).
pub fn symmetric_legs(half_x: f32, half_z: f32, y: f32) -> [Transform; 4] {
    [
        Transform::at(-half_x, y, -half_z),
        Transform::at(half_x, y, -half_z),
        Transform::at(-half_x, y, half_z),
        Transform::at(half_x, y, half_z),
    ]
}

/// `count` copies of `base`, copy `i` shifted by `axis * spacing * i`.
///
/// Copy names get an `[i]` suffix. Zero copies is an empty list.
pub fn replicate<T: Placeable>(base: &T, count: usize, axis: Axis, spacing: f32) -> Vec<T> {
    let anchor = base.anchor();
    (0..count)
        .map(|i| {
            let shifted = anchor.translated(axis.unit() * (spacing * i as f32));
            base.moved_to(shifted)
                .renamed(format!("{}[{i}]", base.name()))
        })
        .collect()
}

/// Row-major grid of copies: `outer` along the first axis, `inner` along the second.
pub fn replicate_grid<T: Placeable>(
    base: &T,
    outer: (usize, Axis, f32),
    inner: (usize, Axis, f32),
) -> Vec<T> {
    let (rows, row_axis, row_spacing) = outer;
    let (cols, col_axis, col_spacing) = inner;
    let anchor = base.anchor();
    let mut copies = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let offset = row_axis.unit() * (row_spacing * r as f32)
                + col_axis.unit() * (col_spacing * c as f32);
            copies.push(
                base.moved_to(anchor.translated(offset))
                    .renamed(format!("{}[{r},{c}]", base.name())),
            );
        }
    }
    copies
}

/// A placed object that could not be built.
#[derive(Clone, Debug, PartialEq)]
pub struct AssemblyFailure {
    pub object: String,
    pub error: SceneError,
}

pub struct Assembler<'r> {
    registry: &'r MaterialRegistry,
    scene: Scene,
    failures: Vec<AssemblyFailure>,
}

impl<'r> Assembler<'r> {
    pub fn new(registry: &'r MaterialRegistry) -> Self {
        Self {
            registry,
            scene: Scene::new(),
            failures: Vec::new(),
        }
    }

    fn fail(&mut self, object: String, error: SceneError) {
        log::error!("Skipping '{object}': {error}");
        self.failures.push(AssemblyFailure { object, error });
    }

    /// Places a single object. Returns `None` if its geometry or material is
    /// invalid; the failure is recorded and assembly carries on.
    pub fn place(
        &mut self,
        name: &str,
        geometry: Result<Geometry, SceneError>,
        material: &str,
        transform: Transform,
    ) -> Option<ObjectId> {
        self.place_in_group(name, geometry, material, transform, None)
    }

    fn place_in_group(
        &mut self,
        name: &str,
        geometry: Result<Geometry, SceneError>,
        material: &str,
        transform: Transform,
        group: Option<&str>,
    ) -> Option<ObjectId> {
        let built = geometry.and_then(|geometry| {
            let material = self.registry.get(material)?;
            Ok(PlacedObject {
                name: name.to_string(),
                geometry,
                material,
                transform,
                group: group.map(str::to_string),
            })
        });
        match built {
            Ok(object) => Some(self.scene.add_object(object)),
            Err(e) => {
                self.fail(name.to_string(), e);
                None
            }
        }
    }

    /// Places an already resolved object, re-checking that its material is
    /// registered.
    pub fn place_object(&mut self, object: PlacedObject) -> Option<ObjectId> {
        if self.registry.contains(&object.material.name) {
            Some(self.scene.add_object(object))
        } else {
            let error = SceneError::Configuration(format!(
                "material '{}' is not registered",
                object.material.name
            ));
            self.fail(object.name, error);
            None
        }
    }

    /// Places every part of `fixture` at its world transform. Parts are named
    /// `<fixture>/<part>` and grouped under the fixture's name.
    pub fn place_fixture(&mut self, fixture: &Fixture) -> Vec<ObjectId> {
        fixture
            .part_transforms()
            .filter_map(|(part, transform)| {
                self.place_in_group(
                    &format!("{}/{}", fixture.name, part.name),
                    part.geometry.clone(),
                    &part.material,
                    transform,
                    Some(&fixture.name),
                )
            })
            .collect()
    }

    pub fn place_fixtures<'f>(
        &mut self,
        fixtures: impl IntoIterator<Item = &'f Fixture>,
    ) -> Vec<ObjectId> {
        fixtures
            .into_iter()
            .flat_map(|fixture| self.place_fixture(fixture))
            .collect()
    }

    pub fn light(&mut self, light: LightSource) {
        self.scene.add_light(light);
    }

    pub fn failures(&self) -> &[AssemblyFailure] {
        &self.failures
    }

    pub fn finish(self) -> (Scene, Vec<AssemblyFailure>) {
        (self.scene, self.failures)
    }
}

/// Registers wood, metal, marble and bulb.
///
/// A definition that fails is logged; objects referring to it will then be
/// skipped by the assembler.
pub fn default_materials() -> MaterialRegistry {
    let mut registry = MaterialRegistry::new();
    let definitions = [
        ("wood", "emissive", Some("textures/wood.jpg"), MaterialParams::default()),
        (
            "metal",
            "specular",
            Some("textures/metal.jpg"),
            MaterialParams::default().shininess(100.0),
        ),
        ("marble", "diffuse", Some("textures/marble.jpg"), MaterialParams::default()),
        (
            "bulb",
            "emissive",
            None,
            MaterialParams::default()
                .colour(rgb(0xffffaa))
                .emissive(rgb(0xffff55)),
        ),
    ];
    for (name, shading, texture, params) in definitions {
        if let Err(e) = registry.define_material(name, shading, texture, params) {
            log::error!("Material '{name}' could not be defined: {e}");
        }
    }
    registry
}

/// Everything the viewer needs, built once at startup.
#[derive(Debug)]
pub struct Diorama {
    pub scene: Scene,
    pub registry: MaterialRegistry,
    pub camera: Camera,
    pub spins: Vec<Spin>,
    pub failures: Vec<AssemblyFailure>,
}

/// Builds the café scene with the default materials.
pub fn build_scene() -> Scene {
    build_diorama(&ViewerConfig::default()).scene
}

pub fn build_diorama(config: &ViewerConfig) -> Diorama {
    let registry = default_materials();
    let mut assembler = Assembler::new(&registry);

    // Room shell
    assembler.place(
        "floor",
        Geometry::plane(20.0, 20.0),
        "wood",
        Transform::new().rotated(-PI / 2.0, 0.0, 0.0),
    );
    assembler.place(
        "back_wall",
        Geometry::plane(20.0, 10.0),
        "marble",
        Transform::at(0.0, 5.0, -10.0),
    );
    assembler.place(
        "side_wall",
        Geometry::plane(20.0, 10.0),
        "marble",
        Transform::at(-10.0, 5.0, 0.0).rotated(0.0, PI / 2.0, 0.0),
    );

    // Table with the cup on top
    let table = Fixture::new("table", Transform::at(0.0, 2.0, 0.0))
        .part("top", Geometry::cuboid(5.0, 0.3, 3.0), "wood", Transform::new())
        .parts_at(
            "leg",
            Geometry::cylinder(0.1, 0.1, 2.0, DEFAULT_RADIAL_SEGMENTS),
            "metal",
            symmetric_legs(2.0, 1.3, -1.0),
        );
    assembler.place_fixture(&table);
    let cup = assembler.place(
        "cup",
        Geometry::cylinder(0.5, 0.5, 1.2, 32),
        "marble",
        Transform::at(0.0, 2.8, 0.0),
    );

    // Bar counter and stools
    assembler.place(
        "counter",
        Geometry::cuboid(8.0, 2.5, 2.0),
        "wood",
        Transform::at(-6.0, 1.25, 5.0),
    );
    let stool = Fixture::new("stool", Transform::at(-6.0, 2.6, 3.0))
        .part("seat", Geometry::cylinder(0.7, 0.7, 0.2, 32), "marble", Transform::new())
        .parts_at(
            "leg",
            Geometry::cylinder(0.1, 0.1, 2.6, DEFAULT_RADIAL_SEGMENTS),
            "metal",
            symmetric_legs(0.4, 0.4, -1.3),
        );
    assembler.place_fixtures(&replicate(&stool, 3, Axis::Z, 2.0));

    // Shelf with jars
    assembler.place(
        "shelf",
        Geometry::cuboid(6.0, 0.3, 1.0),
        "wood",
        Transform::at(-5.0, 4.0, -5.0),
    );
    let jar = Fixture::new("jar", Transform::at(-5.0, 4.5, -5.8)).part(
        "body",
        Geometry::cylinder(0.3, 0.3, 0.8, 16),
        "metal",
        Transform::new(),
    );
    assembler.place_fixtures(&replicate(&jar, 5, Axis::Z, 0.4));

    // Hanging lamp
    let lamp = Fixture::new("lamp", Transform::at(0.0, 9.0, 0.0))
        .part(
            "shade",
            Geometry::cone(1.0, 2.0, 32),
            "metal",
            Transform::new().rotated(PI, 0.0, 0.0),
        )
        .part(
            "bulb",
            Geometry::sphere(0.3, 16, 16),
            "bulb",
            Transform::at(0.0, -1.0, 0.0),
        );
    assembler.place_fixture(&lamp);

    // Lighting
    assembler.light(LightSource::point(
        rgb(0xffeeaa),
        1.2,
        10.0,
        Vector3::new(0.0, 8.0, 0.0),
    ));
    assembler.light(LightSource::ambient(WHITE, 0.3));
    assembler.light(LightSource::point(
        rgb(0xffaa55),
        1.0,
        20.0,
        Vector3::new(0.0, 8.0, 0.0),
    ));
    assembler.light(LightSource::directional(
        WHITE,
        0.8,
        Vector3::new(5.0, 10.0, 5.0),
    ));

    let (scene, failures) = assembler.finish();
    if !failures.is_empty() {
        log::warn!("{} object(s) could not be assembled", failures.len());
    }
    log::info!(
        "Assembled {} objects and {} lights",
        scene.object_count(),
        scene.light_count()
    );

    let spins = cup
        .map(|target| Spin::new(target, Axis::Y, config.spin_delta))
        .into_iter()
        .collect();

    Diorama {
        scene,
        registry,
        camera: Camera::from_config(config),
        spins,
        failures,
    }
}
