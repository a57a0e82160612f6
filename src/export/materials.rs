use crate::export::cache::CacheKind;
use crate::export::compositor::{ChannelValue, composite_channel};
use crate::export::context::{ExportContext, append_unique};
use crate::export::naming::{Prefix, clean_string, resolve};
use crate::export::streams::Category;
use crate::export::textures::{mapping_suffix, write_subtexture};
use crate::foundation::core::Color;
use crate::foundation::error::{ExportError, ExportResult};
use crate::scene::model::{Channel, Material, Object, Scene};
use crate::scene::settings::TranslucencyControl;
use crate::vrscene::record::{Record, Value};

/// Fail-safe BRDF referenced when a material has nothing to offer.
pub const NO_BRDF: &str = "BRDFNOBRDFISSET";
/// Fail-safe material assigned to nodes without a material.
pub const NO_MATERIAL: &str = "MANOMATERIALISSET";

/// Records written once per export into the materials stream.
pub fn default_records() -> Vec<Record> {
    vec![
        Record::new("BRDFDiffuse", NO_BRDF).with("color", Color::gray(0.5)),
        Record::new("MtlSingleBRDF", NO_MATERIAL).with("brdf", Value::reference(NO_BRDF)),
    ]
}

/// A material to compose, optionally on behalf of the object using it.
#[derive(Clone, Copy, Debug)]
pub struct MaterialRequest<'s> {
    pub material: &'s Material,
    /// Object the material is assigned to; drives object-space mapping suffixes and toon
    /// membership.
    pub consumer: Option<&'s Object>,
}

impl<'s> MaterialRequest<'s> {
    pub fn new(material: &'s Material) -> Self {
        Self {
            material,
            consumer: None,
        }
    }

    pub fn for_object(material: &'s Material, consumer: &'s Object) -> Self {
        Self {
            material,
            consumer: Some(consumer),
        }
    }
}

/// Wrapper stages around the base material, innermost first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    TwoSided,
    Wrapper,
    Override,
    RenderStats,
    RoundEdges,
    MaterialId,
}

impl Stage {
    pub const ORDER: [Stage; 6] = [
        Stage::TwoSided,
        Stage::Wrapper,
        Stage::Override,
        Stage::RenderStats,
        Stage::RoundEdges,
        Stage::MaterialId,
    ];

    pub fn plugin(self) -> &'static str {
        match self {
            Self::TwoSided => "Mtl2Sided",
            Self::Wrapper => "MtlWrapper",
            Self::Override => "MtlOverride",
            Self::RenderStats => "MtlRenderStats",
            Self::RoundEdges => "MtlRoundEdges",
            Self::MaterialId => "MtlMaterialID",
        }
    }

    fn enabled(self, ma: &Material) -> bool {
        let v = &ma.vray;
        match self {
            Self::TwoSided => v.two_sided.enabled,
            Self::Wrapper => v.wrapper.enabled,
            Self::Override => v.override_.enabled,
            Self::RenderStats => v.render_stats.enabled,
            Self::RoundEdges => v.round_edges,
            Self::MaterialId => v.material_id_number > 0,
        }
    }
}

/// Enabled wrapper stages of `ma`, innermost first.
pub fn stage_chain(ma: &Material) -> Vec<Stage> {
    Stage::ORDER
        .into_iter()
        .filter(|s| s.enabled(ma))
        .collect()
}

/// Name of stage `index` out of `count` plugins wrapping one another; the outermost one takes
/// the material name.
fn stage_name(name: &str, index: usize, count: usize) -> String {
    if index + 1 == count {
        name.to_string()
    } else {
        format!("MC{index:02}_{name}")
    }
}

/// The material that is actually written for `ma`: the global override or a linked-group
/// slot material when one applies.
pub fn effective_material<'s>(
    scene: &'s Scene,
    ma: &'s Material,
    consumer: Option<&Object>,
) -> &'s Material {
    let opts = &scene.vray.options;
    if opts.mtl_override_on
        && !ma.vray.dont_override
        && let Some(over) = scene.material(&opts.mtl_override)
    {
        return over;
    }

    if let Some(group) = consumer.and_then(|c| c.dupli_group.as_deref())
        && let Some(members) = scene.groups.get(group)
    {
        for slot in members
            .iter()
            .filter_map(|m| scene.object(m))
            .flat_map(|o| o.material_slots.iter())
        {
            if slot != &ma.name
                && slot.contains(ma.name.as_str())
                && let Some(linked) = scene.material(slot)
            {
                return linked;
            }
        }
    }
    ma
}

/// Object-space variant suffix of a material: taken from the first slot whose mapping depends
/// on an object.
pub fn material_suffix(ma: &Material, consumer: Option<&Object>) -> Option<String> {
    ma.texture_slots
        .iter()
        .filter(|s| s.enabled && !s.map.is_empty())
        .find_map(|s| mapping_suffix(&s.mapping, consumer))
}

/// Outermost record name [`compose`] gives `request`, without writing anything.
pub fn material_name(scene: &Scene, request: &MaterialRequest<'_>) -> String {
    let ma = effective_material(scene, request.material, request.consumer);
    let suffix = material_suffix(ma, request.consumer);
    resolve(ma, Prefix::Material, suffix.as_deref())
}

/// Compose `request` into its wrapper chain and return the outermost record name.
///
/// Records are written at most once per frame; later requests for the same resolved name only
/// return it.
pub fn compose(
    ctx: &mut ExportContext<'_>,
    scene: &Scene,
    request: &MaterialRequest<'_>,
) -> ExportResult<String> {
    let ma = effective_material(scene, request.material, request.consumer);
    let consumer = request.consumer;

    write_toon(ctx, ma, consumer)?;

    let suffix = material_suffix(ma, consumer);
    let name = material_name(scene, request);
    if ctx.cache.seen(CacheKind::Materials, &name) {
        return Ok(name);
    }
    ctx.cache.mark(CacheKind::Materials, &name);

    let saved = std::mem::replace(&mut ctx.object_suffix, suffix);
    let res = write_chain(ctx, scene, ma, consumer, &name);
    ctx.object_suffix = saved;
    res?;
    Ok(name)
}

fn write_toon(
    ctx: &mut ExportContext<'_>,
    ma: &Material,
    consumer: Option<&Object>,
) -> ExportResult<()> {
    let toon = &ma.vray.toon;
    if !toon.enabled {
        return Ok(());
    }
    let name = format!("VolumeVRayToon_{}", clean_string(&ma.name));
    if ctx.cache.mark(CacheKind::Toon, &name) {
        let rec = Record::new("VolumeVRayToon", &name)
            .with("lineColor", toon.line_color)
            .with("widthType", toon.width_type)
            .with("lineWidth", toon.line_width)
            .with("opacity", toon.opacity)
            .with("normalThreshold", toon.normal_threshold)
            .with("overlapThreshold", toon.overlap_threshold)
            .with("hideInnerEdges", toon.hide_inner_edges)
            .with("traceBias", toon.trace_bias);
        ctx.write(Category::Environment, &rec)?;
    }
    append_unique(&mut ctx.toon.effects, &name);
    if let Some(ob) = consumer {
        append_unique(&mut ctx.toon.objects, &resolve(ob, Prefix::Object, None));
    }
    Ok(())
}

struct Channels {
    diffuse: ChannelValue,
    reflect: ChannelValue,
    refract: ChannelValue,
    opacity: ChannelValue,
    bump: ChannelValue,
    normal: ChannelValue,
}

fn composite_all(
    ctx: &mut ExportContext<'_>,
    scene: &Scene,
    ma: &Material,
    consumer: Option<&Object>,
    owner: &str,
) -> ExportResult<Channels> {
    let v = &ma.vray.vray_mtl;
    let slots = &ma.texture_slots;
    let mut channel = |ch: Channel, default: Value| {
        composite_channel(ctx, scene, owner, consumer, ch, default, slots)
    };
    Ok(Channels {
        diffuse: channel(Channel::Diffuse, ma.diffuse_color.with_alpha(1.0).into())?,
        reflect: channel(Channel::Reflect, v.reflect_color.with_alpha(1.0).into())?,
        refract: channel(Channel::Refract, v.refract_color.with_alpha(1.0).into())?,
        opacity: channel(Channel::Opacity, Value::Float(ma.alpha))?,
        bump: channel(Channel::Bump, Value::Float(0.0))?,
        normal: channel(Channel::Normal, Value::Float(0.0))?,
    })
}

fn write_chain(
    ctx: &mut ExportContext<'_>,
    scene: &Scene,
    ma: &Material,
    consumer: Option<&Object>,
    name: &str,
) -> ExportResult<()> {
    let kind = ma.vray.kind.as_deref().unwrap_or_default();
    let stages = stage_chain(ma);
    let count = stages.len() + 1;
    let base_name = stage_name(name, 0, count);

    if kind == "MtlVRmat" {
        let rec = Record::new("MtlVRmat", &base_name)
            .with("filename", Value::quoted(ma.vray.vrmat.filename.as_str()))
            .with("mtlname", Value::quoted(ma.vray.vrmat.mtlname.as_str()));
        ctx.write(Category::Materials, &rec)?;
    } else {
        let ch = composite_all(ctx, scene, ma, consumer, name)?;
        let brdf = base_brdf(ma, kind, name, &ch)?;
        let mut brdf_name = brdf.name_or_plugin().to_string();
        ctx.write(Category::Materials, &brdf)?;

        for (channel, value, map_type) in [
            (Channel::Normal, &ch.normal, 1),
            (Channel::Bump, &ch.bump, 0),
        ] {
            let Some(tex) = value.texture() else {
                continue;
            };
            let mult = ma
                .texture_slots
                .iter()
                .find_map(|s| s.multiplier(channel))
                .unwrap_or(1.0);
            let bump_name = format!("BRDFBump{}{name}", channel_tag(channel));
            let mut rec = Record::new("BRDFBump", &bump_name)
                .with("base_brdf", Value::reference(brdf_name.as_str()))
                .with("map_type", map_type);
            if map_type == 1 {
                rec.push("bump_tex_color", Value::reference(tex));
            } else {
                rec.push("bump_tex_float", Value::output(tex, "out_intensity"));
            }
            rec.push("bump_tex_mult", mult);
            ctx.write(Category::Materials, &rec)?;
            brdf_name = bump_name;
        }

        let rec = Record::new("MtlSingleBRDF", &base_name)
            .with("brdf", Value::reference(brdf_name))
            .with("allow_negative_colors", true);
        ctx.write(Category::Materials, &rec)?;
    }

    let mut inner = base_name;
    for (i, stage) in stages.into_iter().enumerate() {
        let stage_name = stage_name(name, i + 1, count);
        let rec = stage_record(ctx, scene, ma, consumer, stage, &stage_name, &inner)?;
        ctx.write(Category::Materials, &rec)?;
        inner = stage_name;
    }
    Ok(())
}

fn channel_tag(channel: Channel) -> &'static str {
    match channel {
        Channel::Normal => "Normal",
        _ => "",
    }
}

fn base_brdf(ma: &Material, kind: &str, name: &str, ch: &Channels) -> ExportResult<Record> {
    let rec = match kind {
        "BRDFVRayMtl" => {
            let v = &ma.vray.vray_mtl;
            Record::new(kind, format!("{kind}{name}"))
                .with("diffuse", ch.diffuse.value())
                .with("opacity", ch.opacity.output("out_intensity"))
                .with("reflect", ch.reflect.value())
                .with("reflect_glossiness", v.reflect_glossiness)
                .with(
                    "hilight_glossiness",
                    if v.hilight_glossiness_lock {
                        v.reflect_glossiness
                    } else {
                        v.hilight_glossiness
                    },
                )
                .with("fresnel", v.fresnel)
                .with("fresnel_ior", v.fresnel_ior)
                .with("reflect_subdivs", v.reflect_subdivs)
                .with("reflect_trace", v.reflect_trace)
                .with("reflect_depth", v.reflect_depth)
                .with("refract", ch.refract.value())
                .with("refract_ior", v.refract_ior)
                .with("refract_glossiness", v.refract_glossiness)
                .with("refract_subdivs", v.refract_subdivs)
                .with("refract_depth", v.refract_depth)
                .with("fog_color", v.fog_color)
                .with("fog_mult", v.fog_mult)
                .with("brdf_type", v.brdf_type)
                .with("anisotropy", v.anisotropy)
                .with("dispersion_on", v.dispersion_on)
        }
        "BRDFDiffuse" => Record::new(kind, format!("{kind}{name}"))
            .with("color", ch.diffuse.value())
            .with("transparency", Color::gray(1.0 - ma.alpha)),
        "BRDFLight" => {
            let l = &ma.vray.light;
            Record::new(kind, format!("{kind}{name}"))
                .with("color", ch.diffuse.value())
                .with("transparency", Color::gray(1.0 - ma.alpha))
                .with("emitOnBackSide", l.emit_on_back_side)
                .with("compensateExposure", l.compensate_exposure)
                .with("doubleSided", l.double_sided)
                .with("intensity", l.intensity)
        }
        "BRDFSSS2Complex" => {
            let s = &ma.vray.sss2_complex;
            Record::new(kind, format!("{kind}{name}"))
                .with("prepass_rate", s.prepass_rate)
                .with("interpolation_accuracy", s.interpolation_accuracy)
                .with("scale", s.scale)
                .with("ior", s.ior)
                .with("overall_color", ch.diffuse.value())
                .with("sub_surface_color", s.sub_surface_color)
                .with("scatter_radius", s.scatter_radius)
                .with("scatter_radius_mult", s.scatter_radius_mult)
                .with("phase_function", s.phase_function)
                .with("specular_color", s.specular_color)
                .with("specular_amount", s.specular_amount)
                .with("specular_glossiness", s.specular_glossiness)
                .with("specular_subdivs", s.specular_subdivs)
                .with("single_scatter", s.single_scatter)
                .with("subdivs", s.subdivs)
        }
        other => return Err(ExportError::unknown_material_type(&ma.name, other)),
    };
    Ok(rec)
}

fn stage_record(
    ctx: &mut ExportContext<'_>,
    scene: &Scene,
    ma: &Material,
    consumer: Option<&Object>,
    stage: Stage,
    name: &str,
    inner: &str,
) -> ExportResult<Record> {
    let v = &ma.vray;
    let mut rec = Record::new(stage.plugin(), name);
    match stage {
        Stage::TwoSided => {
            let ts = &v.two_sided;
            rec.push("front", Value::reference(inner));
            let back = match scene.material(&ts.back) {
                Some(back) if back.name != ma.name => {
                    let req = MaterialRequest {
                        material: back,
                        consumer,
                    };
                    compose(ctx, scene, &req)?
                }
                _ => inner.to_string(),
            };
            rec.push("back", Value::reference(back));
            let slider = Value::from(Color::gray(ts.translucency_slider));
            match ts.control {
                TranslucencyControl::Slider => rec.push("translucency", slider),
                TranslucencyControl::Color => rec.push("translucency", ts.translucency_color),
                TranslucencyControl::Texture => {
                    match write_subtexture(ctx, scene, &ts.translucency_tex)? {
                        Some(tex) => {
                            rec.push("translucency_tex", Value::reference(tex));
                            rec.push("translucency_tex_mult", ts.translucency_tex_mult);
                        }
                        None => rec.push("translucency", slider),
                    }
                }
            }
            rec.push("force_1sided", ts.force_1sided);
        }
        Stage::Wrapper => {
            let w = &v.wrapper;
            rec.push("base_material", Value::reference(inner));
            rec.push("generate_gi", w.generate_gi);
            rec.push("receive_gi", w.receive_gi);
            rec.push("generate_caustics", w.generate_caustics);
            rec.push("receive_caustics", w.receive_caustics);
            rec.push("alpha_contribution", w.alpha_contribution);
            rec.push("matte_surface", w.matte_surface);
            rec.push("shadows", w.shadows);
            rec.push("affect_alpha", w.affect_alpha);
            rec.push("shadow_tint_color", w.shadow_tint_color);
            rec.push("shadow_brightness", w.shadow_brightness);
            rec.push("reflection_amount", w.reflection_amount);
            rec.push("refraction_amount", w.refraction_amount);
            rec.push("gi_amount", w.gi_amount);
            rec.push("no_gi_on_other_mattes", w.no_gi_on_other_mattes);
            rec.push("gi_surface_id", w.gi_surface_id);
        }
        Stage::Override => {
            let o = &v.override_;
            rec.push("base_mtl", Value::reference(inner));
            for (key, target) in [
                ("gi_mtl", &o.gi_mtl),
                ("reflect_mtl", &o.reflect_mtl),
                ("refract_mtl", &o.refract_mtl),
                ("shadow_mtl", &o.shadow_mtl),
            ] {
                let Some(other) = scene.material(target) else {
                    continue;
                };
                if other.name == ma.name {
                    continue;
                }
                let req = MaterialRequest {
                    material: other,
                    consumer,
                };
                let composed = compose(ctx, scene, &req)?;
                rec.push(key, Value::reference(composed));
            }
            if let Some(tex) = write_subtexture(ctx, scene, &o.environment_override)? {
                rec.push("environment_override", Value::reference(tex));
            }
            rec.push("environment_priority", o.environment_priority);
        }
        Stage::RenderStats => {
            let r = &v.render_stats;
            rec.push("base_mtl", Value::reference(inner));
            rec.push("camera_visibility", r.camera_visibility);
            rec.push("reflections_visibility", r.reflections_visibility);
            rec.push("refractions_visibility", r.refractions_visibility);
            rec.push("gi_visibility", r.gi_visibility);
            rec.push("shadows_visibility", r.shadows_visibility);
            rec.push("visibility", r.visibility);
        }
        Stage::RoundEdges => {
            rec.push("base_mtl", Value::reference(inner));
            rec.push("radius", v.radius);
        }
        Stage::MaterialId => {
            rec.push("base_mtl", Value::reference(inner));
            rec.push("material_id_number", v.material_id_number);
            rec.push("material_id_color", v.material_id_color);
        }
    }
    Ok(rec)
}

#[cfg(test)]
#[path = "../../tests/unit/export/materials.rs"]
mod tests;
