use crate::export::cache::CacheKind;
use crate::export::context::ExportContext;
use crate::export::naming::{Prefix, clean_string, object_suffix, resolve};
use crate::export::streams::Category;
use crate::foundation::core::{Color, DMat4};
use crate::foundation::error::ExportResult;
use crate::scene::model::{
    Object, Scene, TexBitmap, TexChecker, TexDistance, TexMapping, TexNoiseMax, Texture,
    TextureKind, TextureSlot,
};
use crate::vrscene::record::{Record, Value};

/// Fail-safe UVW generator (channel 1, identity).
pub const DEFAULT_UVWGEN: &str = "DEFAULTUVWC";
/// Fail-safe texture.
pub const DEFAULT_TEXTURE: &str = "TENOTEXTUREIESSET";
/// White constant used as a neutral blend layer.
pub const DEFAULT_BLEND: &str = "TEDefaultBlend";

/// Records written once per export into the textures stream.
pub fn default_records() -> Vec<Record> {
    vec![
        Record::new("UVWGenChannel", DEFAULT_UVWGEN)
            .with("uvw_channel", 1)
            .with("uvw_transform", DMat4::IDENTITY),
        Record::new("TexChecker", DEFAULT_TEXTURE).with("uvwgen", Value::reference(DEFAULT_UVWGEN)),
        Record::new("TexAColor", DEFAULT_BLEND)
            .with("uvwgen", Value::reference(DEFAULT_UVWGEN))
            .with("texture", Color::WHITE.with_alpha(1.0)),
    ]
}

/// Variant suffix a slot mapping adds to texture and material names.
pub fn mapping_suffix(mapping: &TexMapping, consumer: Option<&Object>) -> Option<String> {
    match mapping {
        TexMapping::Object { object } => Some(object_suffix(object)),
        TexMapping::Generated => consumer.map(|o| object_suffix(&o.name)),
        TexMapping::Uv { .. } | TexMapping::Environment => None,
    }
}

/// Write the texture a slot points at and return its instance name.
///
/// `None` when the slot's texture is missing or of an unsupported kind.
pub fn write_slot_texture(
    ctx: &mut ExportContext<'_>,
    scene: &Scene,
    slot: &TextureSlot,
    consumer: Option<&Object>,
) -> ExportResult<Option<String>> {
    let Some(tex) = scene.texture(&slot.texture) else {
        tracing::debug!(texture = %slot.texture, "slot texture not found");
        return Ok(None);
    };
    write_texture(ctx, scene, tex, &slot.mapping, consumer)
}

/// Name [`write_slot_texture`] gives the slot's texture, without writing anything.
pub fn slot_texture_name(
    scene: &Scene,
    slot: &TextureSlot,
    consumer: Option<&Object>,
) -> Option<String> {
    let tex = scene.texture(&slot.texture)?;
    if matches!(tex.kind, TextureKind::Unsupported) {
        return None;
    }
    let suffix = mapping_suffix(&slot.mapping, consumer);
    Some(resolve(tex, Prefix::Texture, suffix.as_deref()))
}

/// Write `tex` with the given mapping unless it was already written this frame.
pub fn write_texture(
    ctx: &mut ExportContext<'_>,
    scene: &Scene,
    tex: &Texture,
    mapping: &TexMapping,
    consumer: Option<&Object>,
) -> ExportResult<Option<String>> {
    if matches!(tex.kind, TextureKind::Unsupported) {
        tracing::debug!(texture = %tex.name, "unsupported texture type skipped");
        return Ok(None);
    }
    let suffix = mapping_suffix(mapping, consumer);
    let name = resolve(tex, Prefix::Texture, suffix.as_deref());
    if !ctx.cache.mark(CacheKind::Textures, &name) {
        return Ok(Some(name));
    }

    let uvwgen = write_uvwgen(ctx, scene, mapping, consumer)?;
    let rec = match &tex.kind {
        TextureKind::TexBitmap(b) => {
            let bitmap = write_bitmap(ctx, b)?;
            Record::new("TexBitmap", &name)
                .with("bitmap", Value::reference(bitmap))
                .with("uvwgen", Value::reference(uvwgen))
        }
        TextureKind::TexChecker(c) => checker_record(&name, c, &uvwgen),
        TextureKind::TexNoiseMax(n) => noise_record(&name, n, &uvwgen),
        TextureKind::TexDistance(d) => distance_record(ctx, scene, &name, d)?,
        TextureKind::Unsupported => return Ok(None),
    };
    ctx.write(Category::Textures, &rec)?;
    Ok(Some(name))
}

/// Write a texture referenced by name from another plugin parameter.
pub fn write_subtexture(
    ctx: &mut ExportContext<'_>,
    scene: &Scene,
    name: &str,
) -> ExportResult<Option<String>> {
    if name.is_empty() {
        return Ok(None);
    }
    match scene.texture(name) {
        Some(tex) => write_texture(ctx, scene, tex, &TexMapping::default(), None),
        None => {
            tracing::debug!(texture = %name, "referenced texture not found");
            Ok(None)
        }
    }
}

fn write_uvwgen(
    ctx: &mut ExportContext<'_>,
    scene: &Scene,
    mapping: &TexMapping,
    consumer: Option<&Object>,
) -> ExportResult<String> {
    let rec = match mapping {
        TexMapping::Uv { channel } if *channel <= 1 => return Ok(DEFAULT_UVWGEN.to_string()),
        TexMapping::Uv { channel } => Record::new("UVWGenChannel", format!("UVWGenChannel{channel}"))
            .with("uvw_channel", *channel)
            .with("uvw_transform", DMat4::IDENTITY),
        TexMapping::Object { object } => match scene.object(object) {
            Some(ob) => object_uvwgen(ob),
            None => {
                tracing::warn!(object = %object, "mapping object not found, using UV channel 1");
                return Ok(DEFAULT_UVWGEN.to_string());
            }
        },
        TexMapping::Generated => match consumer {
            Some(ob) => object_uvwgen(ob),
            None => return Ok(DEFAULT_UVWGEN.to_string()),
        },
        TexMapping::Environment => Record::new("UVWGenEnvironment", "UVWGenEnvironment")
            .with("mapping_type", Value::quoted("spherical")),
    };
    let name = rec.name_or_plugin().to_string();
    if ctx.cache.mark(CacheKind::UvwGen, &name) {
        ctx.write(Category::Textures, &rec)?;
    }
    Ok(name)
}

fn object_uvwgen(ob: &Object) -> Record {
    Record::new("UVWGenObject", format!("UVWGenObject{}", object_suffix(&ob.name)))
        .with("uvw_transform", ob.matrix_world.0.inverse())
}

fn write_bitmap(ctx: &mut ExportContext<'_>, b: &TexBitmap) -> ExportResult<String> {
    let name = format!("BI{}", clean_string(&b.file));
    if ctx.cache.mark(CacheKind::Bitmap, &name) {
        let rec = Record::new("BitmapBuffer", &name)
            .with("file", Value::quoted(b.file.as_str()))
            .with("filter_type", b.filter_type)
            .with("filter_blur", b.filter_blur)
            .with("interpolation", b.interpolation)
            .with("gamma", b.gamma)
            .with("allow_negative_colors", b.allow_negative_colors);
        ctx.write(Category::Textures, &rec)?;
    }
    Ok(name)
}

fn checker_record(name: &str, c: &TexChecker, uvwgen: &str) -> Record {
    Record::new("TexChecker", name)
        .with("white_color", c.white_color.with_alpha(1.0))
        .with("black_color", c.black_color.with_alpha(1.0))
        .with("contrast", c.contrast)
        .with("uvwgen", Value::reference(uvwgen))
}

fn noise_record(name: &str, n: &TexNoiseMax, uvwgen: &str) -> Record {
    Record::new("TexNoiseMax", name)
        .with("color1", n.color1.with_alpha(1.0))
        .with("color2", n.color2.with_alpha(1.0))
        .with("size", n.size)
        .with("phase", n.phase)
        .with("iterations", n.iterations)
        .with("low", n.low)
        .with("high", n.high)
        .with("type", n.noise_type)
        .with("uvwgen", Value::reference(uvwgen))
}

fn distance_record(
    ctx: &mut ExportContext<'_>,
    scene: &Scene,
    name: &str,
    d: &TexDistance,
) -> ExportResult<Record> {
    let mut rec = Record::new("TexDistance", name);
    match write_subtexture(ctx, scene, &d.distance_tex)? {
        Some(t) => rec.push("distance", Value::output(t, "out_intensity")),
        None => rec.push("distance", d.distance),
    }
    for (key, tex, clr) in [
        ("far_tex", &d.far_tex, d.far_tex_clr),
        ("near_tex", &d.near_tex, d.near_tex_clr),
        ("inside_tex", &d.inside_tex, d.inside_tex_clr),
        ("outside_tex", &d.outside_tex, d.outside_tex_clr),
    ] {
        match write_subtexture(ctx, scene, tex)? {
            Some(t) => rec.push(key, Value::reference(t)),
            None => rec.push(key, clr.with_alpha(1.0)),
        }
    }
    rec.push("inside_separate", d.inside_separate);
    rec.push("inside_solid", d.inside_solid);
    rec.push("outside_separate", d.outside_separate);
    rec.push("outside_solid", d.outside_solid);

    let objects: Vec<String> = scene
        .object_list(&d.objects, &d.groups)
        .into_iter()
        .map(|o| resolve(o, Prefix::Object, None))
        .collect();
    rec.push("objects", Value::ref_list(objects));
    Ok(rec)
}

#[cfg(test)]
#[path = "../../tests/unit/export/textures.rs"]
mod tests;
