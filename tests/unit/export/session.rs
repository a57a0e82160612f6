use super::*;
use crate::export::streams::MemoryStreams;
use crate::vrscene::scan::scan;

/// Node exporter double recording the calls it receives.
#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<String>,
    skip: Vec<String>,
}

impl NodeExporter for Recorder {
    fn init(&mut self, _scene: &Scene) -> ExportResult<()> {
        self.calls.push("init".into());
        Ok(())
    }

    fn init_cache(&mut self, is_animation: bool, check_animated: CheckAnimated) {
        self.calls
            .push(format!("init_cache({is_animation},{})", check_animated.code()));
    }

    fn set_skip_objects(&mut self, names: &[String]) {
        self.skip = names.to_vec();
    }

    fn export_scene(
        &mut self,
        _ctx: &mut ExportContext<'_>,
        _scene: &Scene,
        nodes: bool,
        geometry: bool,
    ) -> ExportResult<()> {
        self.calls.push(format!("export_scene({nodes},{geometry})"));
        Ok(())
    }

    fn clear_cache(&mut self) {
        self.calls.push("clear_cache".into());
    }

    fn clear_frames(&mut self) {
        self.calls.push("clear_frames".into());
    }

    fn exit(&mut self) {
        self.calls.push("exit".into());
    }
}

/// Node exporter that fires the cancel token once the nodes are written.
struct CancelAfterNodes;

impl NodeExporter for CancelAfterNodes {
    fn init(&mut self, _scene: &Scene) -> ExportResult<()> {
        Ok(())
    }

    fn init_cache(&mut self, _is_animation: bool, _check_animated: CheckAnimated) {}

    fn set_skip_objects(&mut self, _names: &[String]) {}

    fn export_scene(
        &mut self,
        ctx: &mut ExportContext<'_>,
        _scene: &Scene,
        _nodes: bool,
        _geometry: bool,
    ) -> ExportResult<()> {
        ctx.cancel.cancel();
        Ok(())
    }

    fn clear_cache(&mut self) {}

    fn clear_frames(&mut self) {}

    fn exit(&mut self) {}
}

fn scene(exporter: &str) -> Scene {
    Scene::from_json_str(&format!(
        r#"{{
        "name": "shot.blend",
        "frame_start": 1,
        "frame_end": 3,
        "frame_current": 7,
        "camera": "Cam",
        "objects": [
            {{ "name": "Cube", "data": {{ "kind": "mesh" }}, "material_slots": ["Steel", "Pulse"] }},
            {{ "name": "Bulb", "data": {{ "kind": "lamp", "type": "POINT" }} }},
            {{ "name": "Spin", "animated": true, "data": {{ "kind": "lamp", "type": "POINT" }} }},
            {{ "name": "Off", "visible": false, "data": {{ "kind": "lamp", "type": "POINT" }} }},
            {{ "name": "Smoke", "data": {{ "kind": "mesh" }} }},
            {{ "name": "Cam", "data": {{ "kind": "camera", "use_camera_loop": true }} }},
            {{ "name": "Side", "data": {{ "kind": "camera", "use_camera_loop": true }} }}
        ],
        "materials": [
            {{ "name": "Steel" }},
            {{ "name": "Pulse", "animated": true, "texture_slots": [
                {{ "texture": "wood", "map": {{ "diffuse": 1.0 }} }}
            ] }}
        ],
        "textures": [ {{ "name": "wood", "type": "TexChecker" }} ],
        "vray": {{
            "exporter": {exporter},
            "effects": {{ "use": true, "fog": [ {{ "use": true, "objects": ["Smoke"] }} ] }}
        }}
    }}"#
    ))
    .unwrap()
}

fn run(s: &mut Scene, nodes: &mut Recorder) -> (ExportResult<ExportOutcome>, MemoryStreams) {
    let mut out = MemoryStreams::new("scene");
    let res = {
        let mut session = ExportSession::new(&mut out, nodes, CancelToken::new());
        session.export(s)
    };
    (res, out)
}

#[test]
fn still_export_writes_every_stream() {
    let mut s = scene("{}");
    let mut nodes = Recorder::default();
    let (res, out) = run(&mut s, &mut nodes);
    let outcome = res.unwrap();
    assert!(!outcome.is_cancelled());
    assert_eq!(outcome.stats().frames, 1);

    assert!(
        out.text(Category::Scene)
            .starts_with("// V-Ray scene exported by vrscene\n// Filename: shot.blend\n\n// Settings\n")
    );
    let tex = scan(out.text(Category::Textures)).unwrap();
    assert!(tex.find("UVWGenChannel", textures::DEFAULT_UVWGEN).is_some());
    assert!(tex.find("TexChecker", "TEwood").is_some());

    let mtl = scan(out.text(Category::Materials)).unwrap();
    assert!(mtl.find("MtlSingleBRDF", materials::NO_MATERIAL).is_some());
    assert!(mtl.find("MtlSingleBRDF", "MASteel").is_some());
    assert!(mtl.find("MtlSingleBRDF", "MAPulse").is_some());

    let lights = scan(out.text(Category::Lights)).unwrap();
    assert_eq!(lights.of_plugin("LightOmni").len(), 2);
    assert!(lights.find("LightOmni", "LAOff").is_none());
    assert_eq!(outcome.stats().lights_skipped, 1);

    let cam = scan(out.text(Category::Camera)).unwrap();
    assert_eq!(cam.of_plugin("RenderView").len(), 1);
    assert_eq!(scan(out.text(Category::Scene)).unwrap().of_plugin("SettingsOutput").len(), 1);

    assert_eq!(
        nodes.calls,
        ["init", "init_cache(false,1)", "export_scene(true,true)", "exit"]
    );
    assert_eq!(nodes.skip, ["Smoke"]);
}

#[test]
fn range_export_rewrites_only_animated_entities() {
    let mut s = scene(r#"{ "animation": true, "animation_type": "NOTMESHES" }"#);
    let mut nodes = Recorder::default();
    let (res, out) = run(&mut s, &mut nodes);
    let stats = res.unwrap().stats();
    assert_eq!(stats.frames, 3);

    let lights = scan(out.text(Category::Lights)).unwrap();
    assert_eq!(lights.named("LASpin").len(), 3);
    assert_eq!(lights.named("LABulb").len(), 1);

    let mtl = scan(out.text(Category::Materials)).unwrap();
    assert_eq!(mtl.named("MASteel").len(), 1);
    assert_eq!(mtl.named("MAPulse").len(), 3);
    let tex = scan(out.text(Category::Textures)).unwrap();
    assert_eq!(tex.named("TEwood").len(), 1);

    let scene_doc = scan(out.text(Category::Scene)).unwrap();
    assert_eq!(scene_doc.of_plugin("SettingsOutput").len(), 1);
    assert!(out.text(Category::Lights).contains("interpolate((2,"));

    assert_eq!(
        nodes.calls,
        [
            "init",
            "init_cache(true,1)",
            "export_scene(true,true)",
            "clear_cache",
            "export_scene(true,false)",
            "clear_cache",
            "export_scene(true,false)",
            "clear_cache",
            "clear_frames",
            "exit",
        ]
    );
    assert_eq!(s.frame_current, 7);
}

#[test]
fn disabled_change_detection_rewrites_everything() {
    let mut s = scene(r#"{ "animation": true, "animation_type": "FULL", "check_animated": "NONE" }"#);
    let mut nodes = Recorder::default();
    let (res, out) = run(&mut s, &mut nodes);
    res.unwrap();
    let lights = scan(out.text(Category::Lights)).unwrap();
    assert_eq!(lights.named("LABulb").len(), 3);
    assert_eq!(
        nodes.calls.iter().filter(|c| *c == "export_scene(true,true)").count(),
        3
    );
}

#[test]
fn camera_mode_writes_only_the_camera_after_the_first_frame() {
    let mut s = scene(r#"{ "animation": true, "animation_type": "CAMERA" }"#);
    let mut nodes = Recorder::default();
    let (res, out) = run(&mut s, &mut nodes);
    assert_eq!(res.unwrap().stats().frames, 3);
    let cam = scan(out.text(Category::Camera)).unwrap();
    assert_eq!(cam.of_plugin("RenderView").len(), 3);
    let lights = scan(out.text(Category::Lights)).unwrap();
    assert_eq!(lights.named("LASpin").len(), 1);
    assert_eq!(
        nodes.calls.iter().filter(|c| c.starts_with("export_scene")).count(),
        1
    );
}

#[test]
fn camera_loop_writes_one_frame_per_camera() {
    let mut s = scene(r#"{ "camera_loop": true }"#);
    let mut nodes = Recorder::default();
    let mut out = MemoryStreams::new("scene");
    {
        let mut session = ExportSession::new(&mut out, &mut nodes, CancelToken::new());
        let outcome = session.export(&mut s).unwrap();
        assert_eq!(outcome.stats().frames, 2);
        assert_eq!(session.context().cameras, ["Cam", "Side"]);
        assert_eq!(session.context().camera.as_deref(), Some("Side"));
    }
    let cam = scan(out.text(Category::Camera)).unwrap();
    assert_eq!(cam.of_plugin("RenderView").len(), 2);
    assert!(out.text(Category::Camera).contains("interpolate((2,"));
}

#[test]
fn camera_loop_without_selected_cameras_fails() {
    let mut s = scene(r#"{ "camera_loop": true }"#);
    s.objects.retain(|o| !matches!(o.data, ObjectData::Camera(_)));
    let mut nodes = Recorder::default();
    let (res, _) = run(&mut s, &mut nodes);
    let err = res.unwrap_err();
    assert!(matches!(err, ExportError::Validation(ref m) if m == "No cameras selected"));
    assert_eq!(nodes.calls.last().map(String::as_str), Some("exit"));
}

#[test]
fn cancelled_export_stops_before_the_first_frame() {
    let mut s = scene("{}");
    let mut nodes = Recorder::default();
    let mut out = MemoryStreams::new("scene");
    let cancel = CancelToken::new();
    cancel.cancel();
    {
        let mut session = ExportSession::new(&mut out, &mut nodes, cancel);
        let outcome = session.export(&mut s).unwrap();
        assert!(outcome.is_cancelled());
        assert_eq!(outcome.stats().frames, 0);
    }
    assert!(out.text(Category::Materials).contains(materials::NO_MATERIAL));
    assert!(!out.text(Category::Lights).contains("LightOmni"));
}

#[test]
fn preview_export_adds_the_light_rig() {
    let mut s = scene(r#"{ "animation": true, "animation_type": "FULL" }"#);
    let mut nodes = Recorder::default();
    let mut out = MemoryStreams::new("scene");
    {
        let mut session = ExportSession::new(&mut out, &mut nodes, CancelToken::new());
        session.set_preview(true);
        assert_eq!(session.export(&mut s).unwrap().stats().frames, 1);
    }
    let lights = scan(out.text(Category::Lights)).unwrap();
    assert!(lights.find("LightDirectMax", "LALamp_008").is_some());
}

#[test]
fn mode_selection_follows_exporter_settings() {
    let mut ex = ExporterSettings::default();
    assert_eq!(ExportMode::select(&ex, false), ExportMode::Still);
    ex.animation = true;
    assert_eq!(ExportMode::select(&ex, false), ExportMode::Still);
    ex.animation_type = AnimationType::Full;
    assert_eq!(ExportMode::select(&ex, false), ExportMode::Range);
    assert_eq!(ExportMode::select(&ex, true), ExportMode::Still);
    ex.animation_type = AnimationType::Camera;
    assert_eq!(ExportMode::select(&ex, false), ExportMode::CameraOnly);
    ex.camera_loop = true;
    assert_eq!(ExportMode::select(&ex, false), ExportMode::CameraLoop);
}

#[test]
fn cancelling_after_nodes_stops_before_materials() {
    let mut s = scene("{}");
    let mut nodes = CancelAfterNodes;
    let mut out = MemoryStreams::new("scene");
    {
        let mut session = ExportSession::new(&mut out, &mut nodes, CancelToken::new());
        let outcome = session.export(&mut s).unwrap();
        assert!(outcome.is_cancelled());
        assert_eq!(outcome.stats().frames, 0);
    }
    let mtl = scan(out.text(Category::Materials)).unwrap();
    assert!(mtl.find("MtlSingleBRDF", materials::NO_MATERIAL).is_some());
    assert!(mtl.named("MASteel").is_empty());
    assert!(mtl.named("MAPulse").is_empty());
    let tex = scan(out.text(Category::Textures)).unwrap();
    assert!(tex.named("TEwood").is_empty());
    assert!(!out.text(Category::Lights).contains("LightOmni"));
}

#[test]
fn range_export_reuses_static_textures_of_animated_consumers() {
    let mut s = Scene::from_json_str(
        r#"{
        "name": "rig.blend",
        "frame_start": 1,
        "frame_end": 3,
        "objects": [
            { "name": "Bulb", "animated": true, "data": { "kind": "lamp", "type": "POINT", "texture_slots": [
                { "texture": "grid", "map": { "color": 1.0 } }
            ] } },
            { "name": "Leaf", "data": { "kind": "mesh" }, "material_slots": ["Thin"] }
        ],
        "materials": [
            { "name": "Thin", "animated": true, "vray": { "two_sided": {
                "use": true, "control": "TEXTURE", "translucency_tex": "veins"
            } } }
        ],
        "textures": [
            { "name": "grid", "type": "TexChecker" },
            { "name": "veins", "type": "TexNoiseMax" }
        ],
        "vray": { "exporter": { "animation": true, "animation_type": "FULL", "check_animated": "SIMPLE" } }
    }"#,
    )
    .unwrap();
    let mut nodes = Recorder::default();
    let (res, out) = run(&mut s, &mut nodes);
    assert_eq!(res.unwrap().stats().frames, 3);

    let lights = scan(out.text(Category::Lights)).unwrap();
    assert_eq!(lights.named("LABulb").len(), 3);
    let tex = scan(out.text(Category::Textures)).unwrap();
    assert_eq!(tex.named("TEgrid").len(), 1);
    assert_eq!(tex.named("TEveins").len(), 1);
    assert_eq!(out.text(Category::Materials).matches("TEveins").count(), 3);
}
