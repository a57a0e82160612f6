use super::*;

const SCENE: &str = r#"{
    "name": "shot.blend",
    "frame_start": 1,
    "frame_end": 5,
    "objects": [
        {
            "name": "Cube",
            "data": { "kind": "mesh", "name": "CubeMesh" },
            "material_slots": ["steel"]
        },
        {
            "name": "Sun",
            "data": { "kind": "lamp", "type": "SUN", "color": [1.0, 0.0, 0.0] }
        },
        { "name": "Helper", "data": { "kind": "metaball" } }
    ],
    "materials": [
        {
            "name": "steel",
            "texture_slots": [
                { "texture": "noise", "map": { "diffuse": 0.5 } }
            ]
        }
    ],
    "textures": [
        { "name": "noise", "type": "TexNoiseMax", "size": 2.0 },
        { "name": "clouds", "type": "CLOUDS" }
    ],
    "groups": { "props": ["Cube", "Missing"] }
}"#;

#[test]
fn json_scene_fills_defaults() {
    let scene = Scene::from_json_str(SCENE).unwrap();
    assert_eq!(scene.frame_step, 1);
    assert_eq!(scene.render.output_size(), (1920, 1080));

    let sun = scene.object("Sun").unwrap();
    let ObjectData::Lamp(lamp) = &sun.data else {
        panic!("expected lamp");
    };
    assert_eq!(lamp.kind, LampKind::Sun);
    assert_eq!(lamp.color, Color(1.0, 0.0, 0.0));
    assert!(lamp.vray.enabled);
    assert!(matches!(
        scene.object("Helper").unwrap().data,
        ObjectData::Other
    ));
}

#[test]
fn unknown_texture_types_deserialize_as_unsupported() {
    let scene = Scene::from_json_str(SCENE).unwrap();
    assert!(matches!(
        scene.texture("clouds").unwrap().kind,
        TextureKind::Unsupported
    ));
    let TextureKind::TexNoiseMax(noise) = &scene.texture("noise").unwrap().kind else {
        panic!("expected noise");
    };
    assert_eq!(noise.size, 2.0);
    assert_eq!(noise.iterations, 3.0);
}

#[test]
fn slot_multiplier_respects_enable_flag() {
    let scene = Scene::from_json_str(SCENE).unwrap();
    let mut slot = scene.material("steel").unwrap().texture_slots[0].clone();
    assert_eq!(slot.multiplier(Channel::Diffuse), Some(0.5));
    assert_eq!(slot.multiplier(Channel::Bump), None);
    assert_eq!(slot.mapping, TexMapping::Uv { channel: 1 });
    slot.enabled = false;
    assert_eq!(slot.multiplier(Channel::Diffuse), None);
}

#[test]
fn object_list_merges_groups_without_duplicates() {
    let scene = Scene::from_json_str(SCENE).unwrap();
    let list = scene.object_list(&["Cube".to_string()], &["props".to_string()]);
    let names: Vec<_> = list.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["Cube"]);
}

#[test]
fn used_materials_and_textures_follow_object_slots() {
    let scene = Scene::from_json_str(SCENE).unwrap();
    let mats: Vec<_> = scene.object_materials().iter().map(|m| m.name.clone()).collect();
    assert_eq!(mats, vec!["steel"]);
    let texs: Vec<_> = scene.object_textures().iter().map(|t| t.name.clone()).collect();
    assert_eq!(texs, vec!["noise"]);
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = Scene::from_json_str("{ \"objects\": 3 }").unwrap_err();
    assert!(matches!(err, ExportError::Serde(_)));
}

#[test]
fn blend_mode_codes_are_stable() {
    assert_eq!(BlendMode::None.code(), 0);
    assert_eq!(BlendMode::Multiply.code(), 6);
    assert_eq!(BlendMode::Illuminate.code(), 12);
}

#[test]
fn renderer_parameter_names_map_to_snake_case_fields() {
    let s = Scene::from_json_str(
        r#"{
        "objects": [
            { "name": "Bulb", "data": { "kind": "lamp", "type": "POINT", "vray": {
                "shadowColor": [0.5, 0.25, 0.0], "noDecay": true, "dome_rayDistanceMode": true
            } } }
        ],
        "vray": {
            "output": { "img_noAlpha": true },
            "image_sampler": { "dmc_maxSubdivs": 16 }
        }
    }"#,
    )
    .unwrap();
    let ObjectData::Lamp(lamp) = &s.object("Bulb").unwrap().data else {
        panic!("expected a lamp");
    };
    assert_eq!(lamp.vray.shadow_color, Color(0.5, 0.25, 0.0));
    assert!(lamp.vray.no_decay);
    assert!(lamp.vray.dome_ray_distance_mode);
    assert!(s.vray.output.img_no_alpha);
    assert_eq!(s.vray.image_sampler.dmc_max_subdivs, 16);

    let json = serde_json::to_value(&lamp.vray).unwrap();
    assert!(json.get("shadowColor").is_some());
    assert!(json.get("shadow_color").is_none());
}
