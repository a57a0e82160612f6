use super::*;
use crate::export::streams::MemoryStreams;
use crate::foundation::cancel::CancelToken;
use crate::foundation::core::Color;
use crate::vrscene::scan::scan;

fn scene() -> Scene {
    Scene::from_json_str(
        r#"{
        "textures": [
            { "name": "a", "type": "TexChecker" },
            { "name": "b", "type": "TexNoiseMax" },
            { "name": "m", "type": "TexChecker" }
        ]
    }"#,
    )
    .unwrap()
}

fn slots(json: &str) -> Vec<TextureSlot> {
    serde_json::from_str(json).unwrap()
}

fn red() -> Value {
    Value::AColor(Color(1.0, 0.0, 0.0).with_alpha(1.0))
}

#[test]
fn zero_slots_return_default_without_records() {
    let s = scene();
    let mut out = MemoryStreams::new("scene");
    {
        let mut ctx = ExportContext::new(&mut out, CancelToken::new());
        let no_slots = slots(r#"[{ "texture": "a", "map": { "bump": 1.0 } }, { "texture": "b", "enabled": false, "map": { "diffuse": 1.0 } }]"#);
        let v = composite_channel(&mut ctx, &s, "MAx", None, Channel::Diffuse, red(), &no_slots)
            .unwrap();
        assert_eq!(v, ChannelValue::Constant(red()));
    }
    assert_eq!(out.text(Category::Textures), "");
}

#[test]
fn single_plain_slot_is_a_direct_reference() {
    let s = scene();
    let mut out = MemoryStreams::new("scene");
    {
        let mut ctx = ExportContext::new(&mut out, CancelToken::new());
        let one = slots(r#"[{ "texture": "a", "map": { "diffuse": 1.0 } }]"#);
        let v =
            composite_channel(&mut ctx, &s, "MAx", None, Channel::Diffuse, red(), &one).unwrap();
        assert_eq!(v, ChannelValue::Texture("TEa".into()));
    }
    let doc = scan(out.text(Category::Textures)).unwrap();
    assert!(doc.of_plugin("TexLayered").is_empty());
    assert!(doc.of_plugin("TexBlend").is_empty());
}

#[test]
fn partial_first_layer_inserts_default_at_bottom() {
    let s = scene();
    let mut out = MemoryStreams::new("scene");
    {
        let mut ctx = ExportContext::new(&mut out, CancelToken::new());
        let stack = slots(
            r#"[
            { "texture": "a", "map": { "diffuse": 0.5 } },
            { "texture": "b", "blend_mode": "MULTIPLY", "map": { "diffuse": 1.0 } }
        ]"#,
        );
        let v = composite_channel(&mut ctx, &s, "MAx", None, Channel::Diffuse, red(), &stack)
            .unwrap();
        assert_eq!(v, ChannelValue::Texture("TLMAx_diffuse".into()));
        // Same request again in the same frame: no second node.
        composite_channel(&mut ctx, &s, "MAx", None, Channel::Diffuse, red(), &stack).unwrap();
    }
    let doc = scan(out.text(Category::Textures)).unwrap();
    let layered = doc.named("TLMAx_diffuse");
    assert_eq!(layered.len(), 1);
    assert_eq!(
        layered[0].get("textures"),
        Some("List(AColor(1.000000,0.000000,0.000000,1.000000),TEa,TEb)")
    );
    assert_eq!(layered[0].get("blend_modes"), Some("List(0,0,6)"));
    assert_eq!(
        layered[0].get("opacities"),
        Some("List(1.000000,0.500000,1.000000)")
    );
}

#[test]
fn stencil_splits_stack_into_blend() {
    let s = scene();
    let mut out = MemoryStreams::new("scene");
    {
        let mut ctx = ExportContext::new(&mut out, CancelToken::new());
        let stack = slots(
            r#"[
            { "texture": "a", "map": { "color": 1.0 } },
            { "texture": "m", "use_stencil": true, "map": { "color": 1.0 } },
            { "texture": "b", "map": { "color": 1.0 } }
        ]"#,
        );
        let v = composite_channel(&mut ctx, &s, "LAsun", None, Channel::Color, red(), &stack)
            .unwrap();
        assert_eq!(v, ChannelValue::Texture("TBLAsun_color1".into()));
    }
    let doc = scan(out.text(Category::Textures)).unwrap();
    let blend = doc.find("TexBlend", "TBLAsun_color1").unwrap();
    assert_eq!(blend.get("color_a"), Some("TEa"));
    assert_eq!(blend.get("color_b"), Some("TEb"));
    assert_eq!(blend.get("blend_amount"), Some("TEm::out_intensity"));
}

#[test]
fn leading_stencil_blends_over_default() {
    let s = scene();
    let mut out = MemoryStreams::new("scene");
    {
        let mut ctx = ExportContext::new(&mut out, CancelToken::new());
        let stack = slots(
            r#"[
            { "texture": "m", "use_stencil": true, "map": { "color": 1.0 } },
            { "texture": "a", "map": { "color": 1.0 } }
        ]"#,
        );
        composite_channel(&mut ctx, &s, "LAx", None, Channel::Color, red(), &stack).unwrap();
    }
    let doc = scan(out.text(Category::Textures)).unwrap();
    let blend = doc.find("TexBlend", "TBLAx_color1").unwrap();
    assert_eq!(
        blend.get("color_a"),
        Some("AColor(1.000000,0.000000,0.000000,1.000000)")
    );
    assert_eq!(blend.get("color_b"), Some("TEa"));
}
