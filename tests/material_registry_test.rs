mod common;

use std::sync::Arc;

use flow_diorama::{
    assembly::default_materials,
    data_structures::material::{
        MaterialParams, MaterialRegistry, ShadingModel, TextureRequest, TextureStatus, rgb,
    },
    error::SceneError,
};

#[test]
fn should_define_each_shading_model() {
    let mut registry = MaterialRegistry::new();
    let cases = [
        ("a", "diffuse", ShadingModel::Diffuse),
        ("b", "specular", ShadingModel::Specular),
        ("c", "emissive", ShadingModel::Emissive),
        ("d", "Lambert", ShadingModel::Diffuse),
        ("e", "PHONG", ShadingModel::Specular),
        ("f", "standard", ShadingModel::Emissive),
    ];
    for (name, shading, expected) in cases {
        let material = registry
            .define_material(name, shading, None, MaterialParams::default())
            .unwrap();
        assert_eq!(material.shading_model(), expected);
        assert_eq!(registry.get(name).unwrap().shading_model(), expected);
    }
    assert_eq!(registry.len(), cases.len());
}

#[test]
fn should_reject_unknown_shading_model() {
    let mut registry = MaterialRegistry::new();
    let err = registry
        .define_material("toon", "cel", None, MaterialParams::default())
        .unwrap_err();
    assert!(err.is_configuration());
    assert!(!registry.contains("toon"));
    assert!(registry.is_empty());
}

#[test]
fn should_fail_lookup_of_unregistered_material() {
    let registry = MaterialRegistry::new();
    assert!(matches!(
        registry.get("velvet"),
        Err(SceneError::Configuration(_))
    ));
}

#[test]
fn should_replace_redefined_material() {
    let mut registry = MaterialRegistry::new();
    let first = registry
        .define_material("wood", "diffuse", None, MaterialParams::default())
        .unwrap();
    let second = registry
        .define_material("wood", "specular", None, MaterialParams::default())
        .unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("wood").unwrap().shading_model(), ShadingModel::Specular);
}

#[test]
fn should_share_one_material_between_lookups() {
    let registry = default_materials();
    let a = registry.get("metal").unwrap();
    let b = registry.get("metal").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn should_register_default_materials() {
    let registry = default_materials();
    let names: Vec<&str> = registry.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["wood", "metal", "marble", "bulb"]);

    let metal = registry.get("metal").unwrap();
    assert_eq!(metal.shading_model(), ShadingModel::Specular);
    assert_eq!(metal.shininess, 100.0);

    let bulb = registry.get("bulb").unwrap();
    assert!(bulb.texture.is_none());
    assert_eq!(bulb.colour, rgb(0xffffaa));
    assert_eq!(bulb.effective_emissive(), rgb(0xffff55));
}

#[test]
fn should_only_emit_light_for_emissive_materials() {
    let mut registry = MaterialRegistry::new();
    let params = MaterialParams::default().emissive([1.0, 0.0, 0.0]);
    let diffuse = registry
        .define_material("d", "diffuse", None, params)
        .unwrap();
    let emissive = registry.define_material("e", "emissive", None, params).unwrap();
    assert_eq!(diffuse.effective_emissive(), [0.0, 0.0, 0.0]);
    assert_eq!(emissive.effective_emissive(), [1.0, 0.0, 0.0]);
}

#[test]
fn should_list_pending_texture_loads() {
    let registry = default_materials();
    assert_eq!(
        registry.texture_requests(),
        vec![
            TextureRequest {
                material: "wood".to_string(),
                path: "textures/wood.jpg".to_string(),
            },
            TextureRequest {
                material: "metal".to_string(),
                path: "textures/metal.jpg".to_string(),
            },
            TextureRequest {
                material: "marble".to_string(),
                path: "textures/marble.jpg".to_string(),
            },
        ]
    );
    assert_eq!(registry.texture_status("wood"), Some(TextureStatus::Pending));
    assert_eq!(registry.texture_status("bulb"), Some(TextureStatus::Untextured));
}

#[test]
fn should_track_texture_outcomes() {
    let mut registry = default_materials();
    assert_eq!(
        registry.resolve_texture("wood", Ok(())),
        Some(TextureStatus::Ready)
    );
    let failure = SceneError::ResourceLoad {
        path: "textures/metal.jpg".to_string(),
        reason: "not found".to_string(),
    };
    assert_eq!(
        registry.resolve_texture("metal", Err(failure)),
        Some(TextureStatus::Fallback)
    );
    assert_eq!(registry.resolve_texture("velvet", Ok(())), None);

    // Only marble is still waiting
    let pending: Vec<String> = registry
        .texture_requests()
        .into_iter()
        .map(|request| request.material)
        .collect();
    assert_eq!(pending, ["marble"]);

    // A failed texture never makes the material unusable
    assert!(registry.get("metal").is_ok());
}

#[test]
fn should_reject_negative_shininess() {
    let mut registry = MaterialRegistry::new();
    let err = registry
        .define_material("bad", "specular", None, MaterialParams::default().shininess(-1.0))
        .unwrap_err();
    assert!(err.is_configuration());
}
