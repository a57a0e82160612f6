//! Renderer settings blocks and the `#include` directives of the scene stream.

use std::path::Path;

use crate::export::camera::{active_camera, settings_camera_record};
use crate::export::context::ExportContext;
use crate::export::lights::light_select_name;
use crate::export::naming::clean_string;
use crate::export::streams::Category;
use crate::export::textures::write_subtexture;
use crate::foundation::core::Color;
use crate::foundation::error::ExportResult;
use crate::scene::model::Scene;
use crate::scene::settings::{DrShareType, LightSelectType, RenderChannelKind};
use crate::vrscene::record::{Record, Value};

/// Write every settings block, render channels and include directives.
///
/// Called once per export, on the first frame.
pub fn write_settings(ctx: &mut ExportContext<'_>, scene: &Scene) -> ExportResult<()> {
    let v = &scene.vray;

    if let Some((_, cam)) = active_camera(scene, ctx.camera.as_deref()) {
        ctx.write_static(Category::Scene, &settings_camera_record(scene, cam))?;
    }

    let mb = &v.motion_blur;
    let rec = Record::unnamed("SettingsMotionBlur")
        .with("on", mb.on)
        .with("duration", mb.duration)
        .with("interval_center", mb.interval_center)
        .with("bias", mb.bias)
        .with("geom_samples", mb.geom_samples)
        .with("low_samples", mb.low_samples)
        .with("subdivs", mb.subdivs);
    ctx.write_static(Category::Scene, &rec)?;

    ctx.write_static(Category::Scene, &output_record(scene))?;

    let o = &v.options;
    let rec = Record::unnamed("SettingsOptions")
        .with("geom_doHidden", o.geom_do_hidden)
        .with("light_doLights", o.light_do_lights)
        .with("light_doHiddenLights", o.light_do_hidden_lights)
        .with("light_doShadows", o.light_do_shadows)
        .with("mtl_reflectionRefraction", o.mtl_reflection_refraction)
        .with("mtl_limitDepth", o.mtl_limit_depth)
        .with("mtl_maxDepth", o.mtl_max_depth)
        .with("mtl_doMaps", o.mtl_do_maps)
        .with("mtl_filterMaps", o.mtl_filter_maps)
        .with("mtl_transpMaxLevels", o.mtl_transp_max_levels)
        .with("mtl_transpCutoff", o.mtl_transp_cutoff)
        .with("mtl_glossy", o.mtl_glossy)
        .with("gi_dontRenderImage", o.gi_dont_render_image)
        .with("misc_lowThreadPriority", o.misc_low_thread_priority)
        .with("misc_transferAssets", o.misc_transfer_assets)
        .with("ray_bias", o.ray_bias);
    ctx.write_static(Category::Scene, &rec)?;

    let is = &v.image_sampler;
    let rec = Record::unnamed("SettingsImageSampler")
        .with("type", is.kind)
        .with("fixed_subdivs", is.fixed_subdivs)
        .with("dmc_minSubdivs", is.dmc_min_subdivs)
        .with("dmc_maxSubdivs", is.dmc_max_subdivs)
        .with("dmc_threshold", is.dmc_threshold)
        .with("subdivision_minRate", is.subdivision_min_rate)
        .with("subdivision_maxRate", is.subdivision_max_rate);
    ctx.write_static(Category::Scene, &rec)?;

    let dmc = &v.dmc_sampler;
    let rec = Record::unnamed("SettingsDMCSampler")
        .with("adaptive_amount", dmc.adaptive_amount)
        .with("adaptive_threshold", dmc.adaptive_threshold)
        .with("adaptive_min_samples", dmc.adaptive_min_samples)
        .with("subdivs_mult", dmc.subdivs_mult)
        .with("time_dependent", dmc.time_dependent);
    ctx.write_static(Category::Scene, &rec)?;

    let cm = &v.color_mapping;
    let rec = Record::unnamed("SettingsColorMapping")
        .with("type", cm.kind)
        .with("dark_mult", cm.dark_mult)
        .with("bright_mult", cm.bright_mult)
        .with("gamma", cm.gamma)
        .with("clamp_output", cm.clamp_output)
        .with("subpixel_mapping", cm.subpixel_mapping)
        .with("adaptation_only", cm.adaptation_only);
    ctx.write_static(Category::Scene, &rec)?;

    if let Some(rec) = light_linker_record(ctx) {
        ctx.write_static(Category::Scene, &rec)?;
    }

    write_environment(ctx, scene)?;
    write_render_channels(ctx, scene)?;

    if ctx.preview {
        write_preview_block(ctx)?;
    }
    if v.exporter.draft {
        write_draft_block(ctx)?;
    }

    write_includes(ctx, scene)
}

fn output_record(scene: &Scene) -> Record {
    let out = &scene.vray.output;
    let (w, h) = scene.render.output_size();
    let mut rec = Record::unnamed("SettingsOutput")
        .with("img_separateAlpha", out.img_separate_alpha)
        .with("img_width", w)
        .with("img_height", h)
        .with("img_file", Value::quoted(out.output_filename()))
        .with("img_dir", Value::quoted(out.img_dir.as_str()))
        .with("img_noAlpha", out.img_no_alpha)
        .with("relements_separateFolders", out.relements_separate_folders);
    if scene.vray.exporter.animation {
        rec.push("anim_start", scene.frame_start);
        rec.push("anim_end", scene.frame_end);
        rec.push("frame_start", scene.frame_start);
    }
    rec.push("frames_per_second", scene.render.fps);
    rec
}

/// `SettingsLightLinker` from the include/exclude lists collected by the light writer.
///
/// Each entry lists the light followed by the objects it ignores (exclude) or is restricted to
/// (include); the flags list tells the two apart. Include wins when both are set.
fn light_linker_record(ctx: &ExportContext<'_>) -> Option<Record> {
    let mut lists = Vec::new();
    let mut flags = Vec::new();
    for (light, link) in &ctx.light_linker {
        let (objects, flag) = match (&link.include, &link.exclude) {
            (Some(inc), _) => (inc, 1),
            (None, Some(exc)) => (exc, 0),
            (None, None) => continue,
        };
        let mut entry = vec![Value::reference(light.as_str())];
        entry.extend(objects.iter().map(|o| Value::reference(o.as_str())));
        lists.push(Value::List(entry));
        flags.push(Value::Int(flag));
    }
    if lists.is_empty() {
        return None;
    }
    Some(
        Record::new("SettingsLightLinker", "SettingsLightLinker")
            .with("ignored_lights", Value::List(lists.clone()))
            .with("ignored_shadow_lights", Value::List(lists))
            .with("include_exclude_light_flags", Value::List(flags)),
    )
}

fn write_environment(ctx: &mut ExportContext<'_>, scene: &Scene) -> ExportResult<()> {
    let env = &scene.vray.environment;
    let mut rec = Record::unnamed("SettingsEnvironment");
    for (key, color, tex) in [
        ("bg", env.bg_color, &env.bg_tex),
        ("gi", env.gi_color, &env.gi_tex),
        ("reflect", env.reflect_color, &env.reflect_tex),
        ("refract", env.refract_color, &env.refract_tex),
    ] {
        rec.push(format!("{key}_color"), color);
        if let Some(t) = write_subtexture(ctx, scene, tex)? {
            rec.push(format!("{key}_tex"), Value::reference(t));
            rec.push(format!("{key}_tex_mult"), 1.0);
        }
    }
    if !ctx.toon.effects.is_empty() {
        rec.push(
            "environment_volume",
            Value::ref_list(ctx.toon.effects.iter().map(String::as_str)),
        );
    }
    ctx.write_static(Category::Environment, &rec)
}

fn write_render_channels(ctx: &mut ExportContext<'_>, scene: &Scene) -> ExportResult<()> {
    if !scene.vray.render_channels_use {
        return Ok(());
    }
    for ch in scene.vray.render_channels.iter().filter(|c| c.enabled) {
        let rec = match &ch.kind {
            RenderChannelKind::Lightselect {
                light_select_type, ..
            } => {
                let code = match light_select_type {
                    LightSelectType::Raw => 0,
                    LightSelectType::Diffuse => 1,
                    LightSelectType::Specular => 2,
                };
                Record::new("RenderChannelLightSelect", light_select_name(&ch.name))
                    .with("name", Value::quoted(ch.name.as_str()))
                    .with("type", code)
            }
            RenderChannelKind::Color { alias } => {
                Record::new("RenderChannelColor", format!("RC{}", clean_string(&ch.name)))
                    .with("name", Value::quoted(ch.name.as_str()))
                    .with("alias", *alias)
            }
            RenderChannelKind::Unsupported => {
                tracing::debug!(channel = %ch.name, "unsupported render channel skipped");
                continue;
            }
        };
        ctx.write_static(Category::Scene, &rec)?;
    }
    Ok(())
}

fn write_preview_block(ctx: &mut ExportContext<'_>) -> ExportResult<()> {
    ctx.write_raw(Category::Scene, "\n// Preview settings\n")?;
    let recs = [
        Record::unnamed("SettingsDMCSampler")
            .with("time_dependent", false)
            .with("adaptive_amount", 1.0)
            .with("adaptive_threshold", 0.1)
            .with("adaptive_min_samples", 2)
            .with("subdivs_mult", 0.01),
        Record::unnamed("SettingsOptions")
            .with("mtl_limitDepth", true)
            .with("mtl_maxDepth", 5)
            .with("mtl_transpMaxLevels", 10)
            .with("mtl_transpCutoff", 0.1)
            .with("mtl_glossy", true)
            .with("misc_lowThreadPriority", true),
        Record::unnamed("SettingsImageSampler")
            .with("type", 0)
            .with("fixed_subdivs", 1),
        Record::new("BRDFDiffuse", "BRDFcheckerdark").with("color", Color::gray(0.1)),
        Record::new("BRDFDiffuse", "BRDFcheckerlight").with("color", Color::gray(0.5)),
        Record::new("MtlSingleBRDF", "MAcheckerdark")
            .with("brdf", Value::reference("BRDFcheckerdark")),
        Record::new("MtlSingleBRDF", "MAcheckerlight")
            .with("brdf", Value::reference("BRDFcheckerlight")),
    ];
    for rec in &recs {
        ctx.write_static(Category::Scene, rec)?;
    }
    Ok(())
}

fn write_draft_block(ctx: &mut ExportContext<'_>) -> ExportResult<()> {
    ctx.write_raw(Category::Scene, "\n// Draft settings\n")?;
    let recs = [
        Record::unnamed("SettingsDMCSampler")
            .with("adaptive_amount", 0.85)
            .with("adaptive_threshold", 0.1)
            .with("adaptive_min_samples", 4)
            .with("subdivs_mult", 0.1),
        Record::unnamed("SettingsImageSampler")
            .with("type", 1)
            .with("dmc_minSubdivs", 1)
            .with("dmc_maxSubdivs", 2),
    ];
    for rec in &recs {
        ctx.write_static(Category::Scene, rec)?;
    }
    Ok(())
}

/// Path of a stream file as seen by the renderer.
///
/// With distributed rendering and shared (non-transferred) assets, render nodes read the files
/// from the share.
pub fn include_path(scene: &Scene, file_name: &str) -> String {
    let dr = &scene.vray.dr;
    if dr.on && dr.transfer_assets == "0" {
        return match dr.share_type {
            DrShareType::Ww => {
                let mut parts = vec![dr.host_name.as_str(), dr.share_name.as_str()];
                if !dr.sub_dir.is_empty() {
                    parts.push(dr.sub_dir.as_str());
                }
                parts.push(file_name);
                format!("//{}", parts.join("/"))
            }
            DrShareType::Nfs => {
                let prefix = dr.prefix.trim_end_matches('/');
                if prefix.is_empty() {
                    file_name.to_string()
                } else {
                    format!("{prefix}/{file_name}")
                }
            }
        };
    }
    file_name.to_string()
}

fn write_includes(ctx: &mut ExportContext<'_>, scene: &Scene) -> ExportResult<()> {
    let mut text = String::from("\n");
    for c in Category::ALL.into_iter().filter(|c| *c != Category::Scene) {
        let file = ctx.streams().file_name(c);
        text.push_str(&format!("#include \"{}\"\n", include_path(scene, &file)));
    }

    let preview_file = &scene.vray.color_mapping.preview_file;
    if ctx.preview && !preview_file.is_empty() && Path::new(preview_file).exists() {
        text.push_str(&format!("#include \"{preview_file}\"\n"));
    }

    let inc = &scene.vray.includer;
    if inc.enabled {
        for node in inc.nodes.iter().filter(|n| n.enabled && !n.scene.is_empty()) {
            text.push_str(&format!("#include \"{}\"\t\t // {}\n", node.scene, node.name));
        }
    }
    ctx.write_raw(Category::Scene, &text)
}

#[cfg(test)]
#[path = "../../tests/unit/export/settings.rs"]
mod tests;
