use super::*;
use crate::export::streams::MemoryStreams;
use crate::foundation::cancel::CancelToken;
use crate::vrscene::scan::scan;

fn scene() -> Scene {
    Scene::from_json_str(
        r#"{
        "objects": [
            { "name": "Cube", "data": { "kind": "mesh" } },
            { "name": "Target", "data": { "kind": "empty" } }
        ],
        "textures": [
            { "name": "wood", "type": "TexBitmap", "file": "/maps/wood.png" },
            { "name": "wood2", "type": "TexBitmap", "file": "/maps/wood.png" },
            { "name": "mask", "type": "TexChecker" },
            { "name": "dist", "type": "TexDistance", "far_tex": "mask", "objects": ["Target"] },
            { "name": "clouds", "type": "CLOUDS" }
        ]
    }"#,
    )
    .unwrap()
}

#[test]
fn bitmap_buffers_are_shared_between_textures() {
    let s = scene();
    let mut out = MemoryStreams::new("scene");
    {
        let mut ctx = ExportContext::new(&mut out, CancelToken::new());
        let uv = TexMapping::default();
        let a = write_texture(&mut ctx, &s, s.texture("wood").unwrap(), &uv, None).unwrap();
        let b = write_texture(&mut ctx, &s, s.texture("wood2").unwrap(), &uv, None).unwrap();
        assert_eq!(a.as_deref(), Some("TEwood"));
        assert_eq!(b.as_deref(), Some("TEwood2"));
    }
    let doc = scan(out.text(Category::Textures)).unwrap();
    assert_eq!(doc.of_plugin("BitmapBuffer").len(), 1);
    assert_eq!(doc.of_plugin("TexBitmap").len(), 2);
    assert_eq!(
        doc.find("TexBitmap", "TEwood").unwrap().get("uvwgen"),
        Some(DEFAULT_UVWGEN)
    );
}

#[test]
fn repeated_writes_in_one_frame_emit_one_record() {
    let s = scene();
    let mut out = MemoryStreams::new("scene");
    {
        let mut ctx = ExportContext::new(&mut out, CancelToken::new());
        let tex = s.texture("mask").unwrap();
        for _ in 0..3 {
            write_texture(&mut ctx, &s, tex, &TexMapping::default(), None).unwrap();
        }
    }
    let doc = scan(out.text(Category::Textures)).unwrap();
    assert_eq!(doc.named("TEmask").len(), 1);
}

#[test]
fn object_mapping_adds_variant_and_uvw_generator() {
    let s = scene();
    let mut out = MemoryStreams::new("scene");
    {
        let mut ctx = ExportContext::new(&mut out, CancelToken::new());
        let cube = s.object("Cube");
        let name = write_texture(
            &mut ctx,
            &s,
            s.texture("mask").unwrap(),
            &TexMapping::Generated,
            cube,
        )
        .unwrap();
        assert_eq!(name.as_deref(), Some("TEmaskOBCube"));
    }
    let doc = scan(out.text(Category::Textures)).unwrap();
    assert!(doc.find("UVWGenObject", "UVWGenObjectOBCube").is_some());
    assert_eq!(
        doc.find("TexChecker", "TEmaskOBCube").unwrap().get("uvwgen"),
        Some("UVWGenObjectOBCube")
    );
}

#[test]
fn distance_texture_writes_subtextures_and_object_list() {
    let s = scene();
    let mut out = MemoryStreams::new("scene");
    {
        let mut ctx = ExportContext::new(&mut out, CancelToken::new());
        write_subtexture(&mut ctx, &s, "dist").unwrap();
    }
    let doc = scan(out.text(Category::Textures)).unwrap();
    let rec = doc.find("TexDistance", "TEdist").unwrap();
    assert_eq!(rec.get("far_tex"), Some("TEmask"));
    assert_eq!(rec.get("objects"), Some("List(OBTarget)"));
    assert_eq!(
        rec.get("near_tex"),
        Some("AColor(0.000000,0.000000,0.000000,1.000000)")
    );
    assert!(doc.find("TexChecker", "TEmask").is_some());
}

#[test]
fn unsupported_textures_are_skipped() {
    let s = scene();
    let mut out = MemoryStreams::new("scene");
    {
        let mut ctx = ExportContext::new(&mut out, CancelToken::new());
        let r = write_subtexture(&mut ctx, &s, "clouds").unwrap();
        assert!(r.is_none());
        assert!(write_subtexture(&mut ctx, &s, "missing").unwrap().is_none());
    }
    assert_eq!(out.text(Category::Textures), "");
}

#[test]
fn slot_texture_name_matches_written_name() {
    let s = scene();
    let slot: TextureSlot =
        serde_json::from_str(r#"{ "texture": "mask", "mapping": { "type": "generated" } }"#)
            .unwrap();
    let cube = s.object("Cube");
    let predicted = slot_texture_name(&s, &slot, cube);
    let mut out = MemoryStreams::new("scene");
    let mut ctx = ExportContext::new(&mut out, CancelToken::new());
    assert_eq!(write_slot_texture(&mut ctx, &s, &slot, cube).unwrap(), predicted);
    assert_eq!(predicted.as_deref(), Some("TEmaskOBCube"));
}
