use super::*;
use crate::export::streams::MemoryStreams;
use crate::foundation::cancel::CancelToken;
use crate::vrscene::scan::scan;

fn scene() -> Scene {
    Scene::from_json_str(
        r#"{
        "objects": [
            { "name": "Sun", "data": { "kind": "lamp", "type": "SUN", "color": [1.0, 0.0, 0.0] } },
            { "name": "Sky", "data": { "kind": "lamp", "type": "SUN", "vray": { "direct_type": "SUN" } } },
            { "name": "Bulb", "data": { "kind": "lamp", "type": "POINT", "vray": {
                "use_include_exclude": true, "use_exclude": true, "exclude_objects": ["Wall"]
            } } },
            { "name": "Ball", "data": { "kind": "lamp", "type": "POINT", "vray": { "radius": 0.5 } } },
            { "name": "Amb", "data": { "kind": "lamp", "type": "POINT", "vray": { "omni_type": "AMBIENT" } } },
            { "name": "Cone", "data": { "kind": "lamp", "type": "SPOT", "distance": 10.0, "spot_blend": 0.5 } },
            { "name": "Ies", "data": { "kind": "lamp", "type": "SPOT", "vray": {
                "spot_type": "IES", "intensity": 12.6, "ies_file": "/ies/a.ies"
            } } },
            { "name": "Panel", "data": { "kind": "lamp", "type": "AREA", "size": 2.0, "size_y": 4.0, "shape": "RECTANGLE" } },
            { "name": "Dome", "data": { "kind": "lamp", "type": "HEMI", "texture_slots": [
                { "texture": "hdr", "map": { "color": 1.0 } }
            ] } },
            { "name": "Lit", "data": { "kind": "lamp", "type": "POINT", "texture_slots": [
                { "texture": "hdr", "map": { "color": 1.0 } }
            ] } },
            { "name": "Warm", "data": { "kind": "lamp", "type": "SUN", "color": [0.2, 0.4, 0.6], "vray": {
                "direct_type": "SUN", "color_type": "TEMPERATURE", "temperature": 3000.0
            } } },
            { "name": "Odd", "data": { "kind": "lamp", "type": "PHOTON" } },
            { "name": "Glow", "data": { "kind": "mesh", "name": "GlowMesh" },
              "vray": { "light_mesh": { "use": true, "intensity": 4.0 } } },
            { "name": "Proxy", "data": { "kind": "empty" },
              "vray": { "override_with_scene": true, "scene_filepath": "/s/set.vrscene" } },
            { "name": "Hollow", "data": { "kind": "empty" }, "vray": { "override_with_scene": true } },
            { "name": "Wall", "data": { "kind": "mesh" } }
        ],
        "textures": [ { "name": "hdr", "type": "TexBitmap", "file": "/hdr/sky.hdr" } ],
        "vray": {
            "render_channels_use": true,
            "render_channels": [
                { "name": "Key light", "type": "LIGHTSELECT", "lights": ["Bulb"] },
                { "name": "Key spec", "type": "LIGHTSELECT", "lights": ["Bulb"], "light_select_type": "SPECULAR" }
            ]
        }
    }"#,
    )
    .unwrap()
}

fn lamp_of(ob: &Object) -> &Lamp {
    match &ob.data {
        ObjectData::Lamp(l) => l,
        _ => panic!("not a lamp"),
    }
}

fn write(s: &Scene, name: &str) -> (Option<String>, MemoryStreams) {
    let mut out = MemoryStreams::new("scene");
    let res = {
        let mut ctx = ExportContext::new(&mut out, CancelToken::new());
        let ob = s.object(name).unwrap();
        write_lamp(&mut ctx, s, ob, lamp_of(ob), None).unwrap()
    };
    (res, out)
}

#[test]
fn decision_table_maps_host_lamps() {
    let s = scene();
    let kind = |n: &str| light_kind(lamp_of(s.object(n).unwrap()));
    assert_eq!(kind("Sun"), Some(LightKind::DirectMax));
    assert_eq!(kind("Sky"), Some(LightKind::Sun));
    assert_eq!(kind("Bulb"), Some(LightKind::Omni));
    assert_eq!(kind("Ball"), Some(LightKind::Sphere));
    assert_eq!(kind("Amb"), Some(LightKind::Ambient));
    assert_eq!(kind("Cone"), Some(LightKind::Spot));
    assert_eq!(kind("Ies"), Some(LightKind::Ies));
    assert_eq!(kind("Panel"), Some(LightKind::Rectangle));
    assert_eq!(kind("Dome"), Some(LightKind::Dome));
    assert_eq!(kind("Odd"), None);
}

#[test]
fn red_direct_sun_writes_plain_color() {
    let s = scene();
    let (name, out) = write(&s, "Sun");
    assert_eq!(name.as_deref(), Some("LASun"));
    let doc = scan(out.text(Category::Lights)).unwrap();
    let lights = doc.of_plugin("LightDirectMax");
    assert_eq!(lights.len(), 1);
    assert_eq!(lights[0].get("color"), Some("Color(1.000000,0.000000,0.000000)"));
    assert!(lights[0].get("color_tex").is_none());
    assert_eq!(lights[0].get("shadowRadius1"), lights[0].get("shadowRadius"));
    assert_eq!(lights[0].get("shadowSubdivs"), Some("8"));
}

#[test]
fn sun_light_uses_renamed_parameters() {
    let s = scene();
    let (_, out) = write(&s, "Sky");
    let doc = scan(out.text(Category::Lights)).unwrap();
    let sun = doc.find("SunLight", "LASky").unwrap();
    assert_eq!(sun.get("filter_color"), Some("Color(1.000000,1.000000,1.000000)"));
    assert_eq!(sun.get("shadow_subdivs"), Some("8"));
    assert!(sun.get("shadow_color").is_some());
    assert!(sun.get("color").is_none());
}

#[test]
fn ies_intensity_is_written_as_power() {
    let s = scene();
    let (_, out) = write(&s, "Ies");
    let doc = scan(out.text(Category::Lights)).unwrap();
    let ies = doc.find("LightIESMax", "LAIes").unwrap();
    assert_eq!(ies.get("power"), Some("12"));
    assert!(ies.get("intensity").is_none());
    assert_eq!(ies.get("ies_light_shape"), Some("-1"));
    assert_eq!(ies.get("ies_file"), Some("\"/ies/a.ies\""));
    assert!(ies.get("units").is_none());
}

#[test]
fn spot_decay_regions_follow_distance() {
    let s = scene();
    let (_, out) = write(&s, "Cone");
    let doc = scan(out.text(Category::Lights)).unwrap();
    let spot = doc.find("LightSpot", "LACone").unwrap();
    assert_eq!(spot.get("endDistance1"), Some("9.500000"));
    assert_eq!(spot.get("startDistance3"), Some("9.500000"));
    assert_eq!(spot.get("endDistance3"), Some("10.000000"));
    assert_eq!(spot.get("useDecayRegions"), Some("1"));
}

#[test]
fn rectangle_sizes_are_halved() {
    let s = scene();
    let (_, out) = write(&s, "Panel");
    let doc = scan(out.text(Category::Lights)).unwrap();
    let rect = doc.find("LightRectangle", "LAPanel").unwrap();
    assert_eq!(rect.get("u_size"), Some("1.000000"));
    assert_eq!(rect.get("v_size"), Some("2.000000"));
    assert_eq!(rect.get("lightPortal"), Some("0"));
}

#[test]
fn dome_texture_goes_to_dome_tex_only() {
    let s = scene();
    let (_, out) = write(&s, "Dome");
    let doc = scan(out.text(Category::Lights)).unwrap();
    let dome = doc.find("LightDome", "LADome").unwrap();
    assert_eq!(dome.get("use_dome_tex"), Some("1"));
    assert_eq!(dome.get("dome_tex"), Some("TEhdr"));
    assert!(dome.get("color_tex").is_none());
}

#[test]
fn light_select_and_linker_data_are_recorded() {
    let s = scene();
    let mut out = MemoryStreams::new("scene");
    {
        let mut ctx = ExportContext::new(&mut out, CancelToken::new());
        let ob = s.object("Bulb").unwrap();
        write_lamp(&mut ctx, &s, ob, lamp_of(ob), None).unwrap();
        let link = ctx.light_linker.get("LABulb").unwrap();
        assert_eq!(link.include, None);
        assert_eq!(link.exclude, Some(vec!["OBWall".to_string()]));
    }
    let doc = scan(out.text(Category::Lights)).unwrap();
    let omni = doc.find("LightOmni", "LABulb").unwrap();
    assert_eq!(omni.get("channels_raw"), Some("List(LightSelect_Key_light)"));
    assert_eq!(omni.get("channels_specular"), Some("List(LightSelect_Key_spec)"));
    assert!(omni.get("channels_diffuse").is_none());
}

#[test]
fn unsupported_lamp_is_counted_and_skipped() {
    let s = scene();
    let mut out = MemoryStreams::new("scene");
    {
        let mut ctx = ExportContext::new(&mut out, CancelToken::new());
        let ob = s.object("Odd").unwrap();
        assert_eq!(write_lamp(&mut ctx, &s, ob, lamp_of(ob), None).unwrap(), None);
        assert_eq!(ctx.stats.lights_skipped, 1);
    }
    assert_eq!(out.text(Category::Lights), "");
}

#[test]
fn dupli_instances_get_suffixed_names() {
    let s = scene();
    let ob = s.object("Bulb").unwrap();
    let inst = LampInstance {
        suffix: "_dup3".into(),
        matrix: Matrix4::from_translation(DVec3::new(1.0, 2.0, 3.0)),
    };
    let mut out = MemoryStreams::new("scene");
    {
        let mut ctx = ExportContext::new(&mut out, CancelToken::new());
        let name = write_lamp(&mut ctx, &s, ob, lamp_of(ob), Some(&inst)).unwrap();
        assert_eq!(name.as_deref(), Some("LABulb_dup3"));
    }
    let doc = scan(out.text(Category::Lights)).unwrap();
    let t = doc.find("LightOmni", "LABulb_dup3").unwrap().get("transform").unwrap();
    assert!(t.ends_with("Vector(1.000000, 2.000000, 3.000000))"));
}

#[test]
fn mesh_lights_and_scene_includes() {
    let s = scene();
    let mut out = MemoryStreams::new("scene");
    {
        let mut ctx = ExportContext::new(&mut out, CancelToken::new());
        assert_eq!(
            write_mesh_light(&mut ctx, s.object("Glow").unwrap()).unwrap().as_deref(),
            Some("LAGlow")
        );
        assert_eq!(
            write_scene_include(&mut ctx, s.object("Proxy").unwrap()).unwrap().as_deref(),
            Some("SIProxy")
        );
        assert_eq!(write_scene_include(&mut ctx, s.object("Hollow").unwrap()).unwrap(), None);
    }
    let lights = scan(out.text(Category::Lights)).unwrap();
    let mesh = lights.find("LightMesh", "LAGlow").unwrap();
    assert_eq!(mesh.get("geometry"), Some("MEGlowMesh"));
    assert_eq!(mesh.get("intensity"), Some("4.000000"));

    let scene_doc = scan(out.text(Category::Scene)).unwrap();
    let inc = scene_doc.find("SceneInclude", "SIProxy").unwrap();
    assert_eq!(inc.get("filepath"), Some("\"/s/set.vrscene\""));
    assert_eq!(inc.get("prefix"), Some("\"SIProxy\""));
}

#[test]
fn preview_rig_has_four_lights() {
    let recs = preview_records();
    let names: Vec<_> = recs.iter().map(|r| r.name_or_plugin()).collect();
    assert_eq!(names, ["LALamp_008", "LALamp_002", "LALamp", "LALamp_001"]);
    assert!(recs.iter().all(|r| r.comment.as_deref() == Some("PREVIEW")));
}

#[test]
fn point_light_texture_has_no_adaptive_sampling() {
    let s = scene();
    let (_, out) = write(&s, "Lit");
    let doc = scan(out.text(Category::Lights)).unwrap();
    let omni = doc.find("LightOmni", "LALit").unwrap();
    assert_eq!(omni.get("color_tex"), Some("TEhdr"));
    assert!(omni.get("tex_adaptive").is_none());
    assert!(omni.get("tex_resolution").is_none());

    let (_, out) = write(&s, "Dome");
    let doc = scan(out.text(Category::Lights)).unwrap();
    let dome = doc.find("LightDome", "LADome").unwrap();
    assert_eq!(dome.get("tex_adaptive"), Some("1.000000"));
    assert_eq!(dome.get("tex_resolution"), Some("512"));
}

#[test]
fn sun_filter_color_ignores_temperature() {
    let s = scene();
    let (_, out) = write(&s, "Warm");
    let doc = scan(out.text(Category::Lights)).unwrap();
    let sun = doc.find("SunLight", "LAWarm").unwrap();
    assert_eq!(sun.get("filter_color"), Some("Color(0.200000,0.400000,0.600000)"));
}
