mod common;

use std::sync::Arc;

use approx::assert_relative_eq;
use cgmath::Vector3;
use flow_diorama::{
    assembly::{
        Assembler, Axis, Fixture, Placeable, build_diorama, build_scene, replicate,
        replicate_grid, symmetric_legs,
    },
    config::ViewerConfig,
    data_structures::{
        geometry::Geometry,
        instance::Transform,
        scene_graph::{LightKind, PlacedObject},
    },
};

use crate::common::test_utils::{material, plain_registry};

fn stool(anchor: Transform) -> Fixture {
    Fixture::new("stool", anchor)
        .part(
            "seat",
            Geometry::cylinder(0.7, 0.7, 0.2, 32),
            "matte",
            Transform::new(),
        )
        .parts_at(
            "leg",
            Geometry::cylinder(0.1, 0.1, 2.6, 32),
            "shiny",
            symmetric_legs(0.4, 0.4, -1.3),
        )
}

#[test]
fn should_produce_no_copies_for_zero_count() {
    let base = stool(Transform::at(1.0, 2.0, 3.0));
    assert!(replicate(&base, 0, Axis::X, 2.0).is_empty());
}

#[test]
fn should_keep_single_copy_at_original_anchor() {
    let base = stool(Transform::at(1.0, 2.0, 3.0));
    let copies = replicate(&base, 1, Axis::Z, 2.0);
    assert_eq!(copies.len(), 1);
    assert_eq!(copies[0].anchor(), base.anchor());
    assert_eq!(copies[0].name, "stool[0]");
}

#[test]
fn should_space_copies_along_axis() {
    let base = stool(Transform::at(-6.0, 2.6, 3.0));
    let copies = replicate(&base, 3, Axis::Z, 2.0);
    let anchors: Vec<Vector3<f32>> = copies.iter().map(|c| c.anchor().position).collect();
    assert_eq!(
        anchors,
        vec![
            Vector3::new(-6.0, 2.6, 3.0),
            Vector3::new(-6.0, 2.6, 5.0),
            Vector3::new(-6.0, 2.6, 7.0),
        ]
    );
    // Copies differ only by their anchor
    for copy in &copies {
        assert_eq!(copy.parts.len(), base.parts.len());
    }
}

#[test]
fn should_replicate_plain_objects() {
    let registry = plain_registry();
    let jar = PlacedObject::new(
        "jar",
        Geometry::cylinder(0.3, 0.3, 0.8, 16).unwrap(),
        material(&registry, "shiny"),
        Transform::at(-5.0, 4.5, -5.8),
    );
    let copies = replicate(&jar, 5, Axis::Z, 0.4);
    assert_eq!(copies.len(), 5);
    assert_relative_eq!(copies[4].transform.position.z, -5.8 + 1.6, epsilon = 1e-5);
    assert!(copies.iter().all(|c| Arc::ptr_eq(&c.material, &jar.material)));
    assert_eq!(copies[2].name, "jar[2]");
}

#[test]
fn should_lay_out_grid_row_major() {
    let base = stool(Transform::new());
    let copies = replicate_grid(&base, (2, Axis::X, 3.0), (3, Axis::Z, 1.0));
    assert_eq!(copies.len(), 6);
    assert_eq!(copies[0].name, "stool[0,0]");
    assert_eq!(copies[5].name, "stool[1,2]");
    assert_eq!(copies[4].anchor().position, Vector3::new(3.0, 0.0, 1.0));
}

#[test]
fn should_move_every_part_with_the_anchor() {
    let before = stool(Transform::at(0.0, 2.6, 0.0));
    let after = before.moved_to(Transform::at(4.0, 2.6, -1.0));
    for ((_, old), (_, new)) in before.part_transforms().zip(after.part_transforms()) {
        let shift = new.position - old.position;
        assert_relative_eq!(shift.x, 4.0, epsilon = 1e-5);
        assert_relative_eq!(shift.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(shift.z, -1.0, epsilon = 1e-5);
    }
}

#[test]
fn should_place_fixture_parts_in_world_space() {
    let registry = plain_registry();
    let mut assembler = Assembler::new(&registry);
    let ids = assembler.place_fixture(&stool(Transform::at(-6.0, 2.6, 3.0)));
    let (scene, failures) = assembler.finish();

    assert!(failures.is_empty());
    assert_eq!(ids.len(), 5);
    assert_eq!(scene.group("stool"), ids);

    let leg = scene.object(scene.find("stool/leg3").unwrap()).unwrap();
    assert_relative_eq!(leg.transform.position.x, -5.6, epsilon = 1e-5);
    assert_relative_eq!(leg.transform.position.y, 1.3, epsilon = 1e-5);
    assert_relative_eq!(leg.transform.position.z, 3.4, epsilon = 1e-5);
}

#[test]
fn should_skip_failing_part_and_keep_the_rest() {
    let registry = plain_registry();
    let mut assembler = Assembler::new(&registry);
    let broken = Fixture::new("table", Transform::at(0.0, 2.0, 0.0))
        .part("top", Geometry::cuboid(5.0, -0.3, 3.0), "matte", Transform::new())
        .part(
            "leg",
            Geometry::cylinder(0.1, 0.1, 2.0, 32),
            "shiny",
            Transform::at(2.0, -1.0, 1.3),
        )
        .part(
            "lamp",
            Geometry::sphere(0.3, 16, 16),
            "velvet",
            Transform::new(),
        );
    let placed = assembler.place_fixture(&broken);
    let cup = assembler.place(
        "cup",
        Geometry::cylinder(0.5, 0.5, 1.2, 32),
        "matte",
        Transform::at(0.0, 2.8, 0.0),
    );
    let (scene, failures) = assembler.finish();

    assert_eq!(placed.len(), 1);
    assert!(cup.is_some());
    assert_eq!(scene.object_count(), 2);

    let failed: Vec<&str> = failures.iter().map(|f| f.object.as_str()).collect();
    assert_eq!(failed, ["table/top", "table/lamp"]);
    assert!(failures[0].error.is_invalid_geometry());
    assert!(failures[1].error.is_configuration());
}

#[test]
fn should_reject_objects_with_unregistered_material() {
    let registry = plain_registry();
    let mut other = plain_registry();
    let foreign = other
        .define_material("velvet", "diffuse", None, Default::default())
        .unwrap();

    let mut assembler = Assembler::new(&registry);
    let id = assembler.place_object(PlacedObject::new(
        "cushion",
        Geometry::cuboid(1.0, 0.2, 1.0).unwrap(),
        foreign,
        Transform::new(),
    ));
    assert!(id.is_none());
    assert_eq!(assembler.failures().len(), 1);
}

#[test]
fn should_assemble_the_cafe() {
    let scene = build_scene();
    assert_eq!(scene.object_count(), 33);
    assert_eq!(scene.light_count(), 4);

    let kinds: Vec<LightKind> = scene.lights().map(|light| light.kind).collect();
    assert_eq!(
        kinds,
        [
            LightKind::Point,
            LightKind::Ambient,
            LightKind::Point,
            LightKind::Directional,
        ]
    );

    for name in ["floor", "table/top", "cup", "stool[2]/seat", "jar[4]/body", "lamp/bulb"] {
        assert!(scene.find(name).is_some(), "{name} is missing");
    }
    assert_eq!(scene.group("table").len(), 5);
    assert_eq!(scene.group("stool[1]").len(), 5);
}

#[test]
fn should_build_the_same_scene_every_time() {
    assert_eq!(build_scene(), build_scene());
}

#[test]
fn should_share_materials_between_objects() {
    let scene = build_scene();
    let wood: Vec<_> = scene
        .objects()
        .filter(|(_, object)| object.material.name == "wood")
        .map(|(_, object)| object.material.clone())
        .collect();
    // floor, table top, counter, shelf
    assert_eq!(wood.len(), 4);
    assert!(wood.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[test]
fn should_animate_the_cup() {
    let config = ViewerConfig::default().with_spin_delta(0.05);
    let diorama = build_diorama(&config);
    assert!(diorama.failures.is_empty());
    assert_eq!(diorama.spins.len(), 1);

    let spin = diorama.spins[0];
    assert_eq!(diorama.scene.object(spin.target).unwrap().name, "cup");
    assert_eq!(spin.axis, Axis::Y);
    assert_eq!(spin.delta, 0.05);
}
