//! Light, mesh-light, scene-include and preview-rig records.

use crate::export::compositor::{ChannelValue, composite_channel};
use crate::export::context::{ExportContext, LightLink};
use crate::export::naming::{Prefix, clean_string, geometry_name, resolve};
use crate::export::streams::Category;
use crate::foundation::core::{Color, DMat4, DVec3, Matrix4, kelvin_to_rgb};
use crate::foundation::error::ExportResult;
use crate::scene::model::{AreaShape, Channel, Lamp, LampKind, Object, ObjectData, Scene};
use crate::scene::settings::{
    ColorType, DirectType, LightSelectType, OmniType, RenderChannelKind, SpotType, VRayLamp,
};
use crate::vrscene::record::{Record, Value};

/// Renderer light plugin chosen for a host lamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    Ambient,
    Sphere,
    Omni,
    Spot,
    Ies,
    DirectMax,
    Sun,
    Rectangle,
    Dome,
}

impl LightKind {
    pub fn plugin(self) -> &'static str {
        match self {
            Self::Ambient => "LightAmbient",
            Self::Sphere => "LightSphere",
            Self::Omni => "LightOmni",
            Self::Spot => "LightSpot",
            Self::Ies => "LightIESMax",
            Self::DirectMax => "LightDirectMax",
            Self::Sun => "SunLight",
            Self::Rectangle => "LightRectangle",
            Self::Dome => "LightDome",
        }
    }

    /// Parameters written verbatim from the lamp settings, in output order.
    pub fn manifest(self) -> &'static [&'static str] {
        match self {
            Self::Omni | Self::Spot => OMNI_PARAMS,
            Self::Ambient => AMBIENT_PARAMS,
            Self::Sphere => SPHERE_PARAMS,
            Self::Rectangle => RECTANGLE_PARAMS,
            Self::DirectMax => DIRECT_PARAMS,
            Self::Sun => SUN_PARAMS,
            Self::Ies => IES_PARAMS,
            Self::Dome => DOME_PARAMS,
        }
    }
}

const OMNI_PARAMS: &[&str] = &[
    "enabled",
    "shadows",
    "shadowColor",
    "shadowBias",
    "causticSubdivs",
    "causticMult",
    "cutoffThreshold",
    "affectDiffuse",
    "affectSpecular",
    "bumped_below_surface_check",
    "nsamples",
    "diffuse_contribution",
    "specular_contribution",
    "intensity",
    "shadowRadius",
    "areaSpeculars",
    "shadowSubdivs",
    "decay",
];

const AMBIENT_PARAMS: &[&str] = &["enabled", "shadowBias", "decay", "ambientShade"];

const SPHERE_PARAMS: &[&str] = &[
    "enabled",
    "shadows",
    "shadowColor",
    "shadowBias",
    "causticSubdivs",
    "causticMult",
    "cutoffThreshold",
    "affectDiffuse",
    "affectSpecular",
    "bumped_below_surface_check",
    "nsamples",
    "diffuse_contribution",
    "specular_contribution",
    "intensity",
    "subdivs",
    "storeWithIrradianceMap",
    "invisible",
    "affectReflections",
    "noDecay",
    "radius",
    "sphere_segments",
];

const RECTANGLE_PARAMS: &[&str] = &[
    "enabled",
    "shadows",
    "shadowColor",
    "shadowBias",
    "causticSubdivs",
    "causticMult",
    "cutoffThreshold",
    "affectDiffuse",
    "affectSpecular",
    "bumped_below_surface_check",
    "nsamples",
    "diffuse_contribution",
    "specular_contribution",
    "intensity",
    "subdivs",
    "storeWithIrradianceMap",
    "invisible",
    "affectReflections",
    "doubleSided",
    "noDecay",
];

const DIRECT_PARAMS: &[&str] = &[
    "enabled",
    "shadows",
    "shadowColor",
    "shadowBias",
    "causticSubdivs",
    "causticMult",
    "cutoffThreshold",
    "affectDiffuse",
    "affectSpecular",
    "bumped_below_surface_check",
    "nsamples",
    "diffuse_contribution",
    "specular_contribution",
    "intensity",
    "shadowRadius",
    "areaSpeculars",
    "shadowSubdivs",
    "fallsize",
];

const SUN_PARAMS: &[&str] = &[
    "turbidity",
    "ozone",
    "water_vapour",
    "intensity_multiplier",
    "size_multiplier",
    "invisible",
    "horiz_illum",
    "shadows",
    "shadowBias",
    "shadow_subdivs",
    "shadow_color",
    "causticSubdivs",
    "causticMult",
    "enabled",
];

const IES_PARAMS: &[&str] = &[
    "enabled",
    "intensity",
    "shadows",
    "shadowColor",
    "shadowBias",
    "causticSubdivs",
    "causticMult",
    "cutoffThreshold",
    "affectDiffuse",
    "affectSpecular",
    "bumped_below_surface_check",
    "nsamples",
    "diffuse_contribution",
    "specular_contribution",
    "shadowSubdivs",
    "ies_file",
    "soft_shadows",
];

const DOME_PARAMS: &[&str] = &[
    "enabled",
    "shadows",
    "shadowColor",
    "shadowBias",
    "causticSubdivs",
    "causticMult",
    "cutoffThreshold",
    "affectDiffuse",
    "affectSpecular",
    "bumped_below_surface_check",
    "nsamples",
    "diffuse_contribution",
    "specular_contribution",
    "intensity",
    "subdivs",
    "invisible",
    "affectReflections",
    "dome_targetRadius",
    "dome_emitRadius",
    "dome_spherical",
    "dome_rayDistance",
    "dome_rayDistanceMode",
];

/// Pick the renderer plugin for `lamp`; `None` for kinds the renderer has no light for.
pub fn light_kind(lamp: &Lamp) -> Option<LightKind> {
    let v = &lamp.vray;
    let kind = match lamp.kind {
        LampKind::Point if v.omni_type == OmniType::Ambient => LightKind::Ambient,
        LampKind::Point if v.radius > 0.0 => LightKind::Sphere,
        LampKind::Point => LightKind::Omni,
        LampKind::Spot => match v.spot_type {
            SpotType::Spot => LightKind::Spot,
            SpotType::Ies => LightKind::Ies,
        },
        LampKind::Sun => match v.direct_type {
            DirectType::Direct => LightKind::DirectMax,
            DirectType::Sun => LightKind::Sun,
        },
        LampKind::Area => LightKind::Rectangle,
        LampKind::Hemi => LightKind::Dome,
        LampKind::Unsupported => return None,
    };
    Some(kind)
}

fn param_value(v: &VRayLamp, key: &str) -> Option<Value> {
    let value = match key {
        "enabled" => v.enabled.into(),
        "shadows" => v.shadows.into(),
        "shadowColor" | "shadow_color" => v.shadow_color.into(),
        "shadowBias" => v.shadow_bias.into(),
        "shadowRadius" => v.shadow_radius.into(),
        "causticSubdivs" => v.caustic_subdivs.into(),
        "causticMult" => v.caustic_mult.into(),
        "cutoffThreshold" => v.cutoff_threshold.into(),
        "affectDiffuse" => v.affect_diffuse.into(),
        "affectSpecular" => v.affect_specular.into(),
        "affectReflections" => v.affect_reflections.into(),
        "bumped_below_surface_check" => v.bumped_below_surface_check.into(),
        "nsamples" => v.nsamples.into(),
        "diffuse_contribution" => v.diffuse_contribution.into(),
        "specular_contribution" => v.specular_contribution.into(),
        "intensity" => v.intensity.into(),
        "areaSpeculars" => v.area_speculars.into(),
        "subdivs" | "shadowSubdivs" | "shadow_subdivs" => v.subdivs.into(),
        "decay" => v.decay.into(),
        "storeWithIrradianceMap" => v.store_with_irradiance_map.into(),
        "invisible" => v.invisible.into(),
        "noDecay" => v.no_decay.into(),
        "doubleSided" => v.double_sided.into(),
        "ambientShade" => v.ambient_shade.into(),
        "radius" => v.radius.into(),
        "sphere_segments" => v.sphere_segments.into(),
        "fallsize" => v.fallsize.into(),
        "turbidity" => v.turbidity.into(),
        "ozone" => v.ozone.into(),
        "water_vapour" => v.water_vapour.into(),
        "intensity_multiplier" => v.intensity_multiplier.into(),
        "size_multiplier" => v.size_multiplier.into(),
        "horiz_illum" => v.horiz_illum.into(),
        "ies_file" => Value::quoted(v.ies_file.as_str()),
        "soft_shadows" => v.soft_shadows.into(),
        "dome_targetRadius" => v.dome_target_radius.into(),
        "dome_emitRadius" => v.dome_emit_radius.into(),
        "dome_spherical" => v.dome_spherical.into(),
        "dome_rayDistance" => v.dome_ray_distance.into(),
        "dome_rayDistanceMode" => v.dome_ray_distance_mode.into(),
        _ => return None,
    };
    Some(value)
}

/// Push one manifest parameter, applying kind-specific output names.
fn push_param(rec: &mut Record, kind: LightKind, v: &VRayLamp, key: &str) {
    match (kind, key) {
        (LightKind::Ies, "intensity") => rec.push("power", v.intensity.trunc() as i64),
        (LightKind::DirectMax, "shadowRadius") => {
            rec.push("shadowRadius", v.shadow_radius);
            rec.push("shadowShape", v.shadow_shape);
            rec.push("shadowRadius1", v.shadow_radius);
            rec.push("shadowRadius2", v.shadow_radius);
        }
        _ => match param_value(v, key) {
            Some(value) => rec.push(key, value),
            None => tracing::debug!(param = key, "light parameter without a source skipped"),
        },
    }
}

/// Instance data supplied when a lamp is written as part of a dupli or particle system.
#[derive(Clone, Debug, PartialEq)]
pub struct LampInstance {
    /// Appended to the light name.
    pub suffix: String,
    pub matrix: Matrix4,
}

/// Light color after temperature conversion.
pub fn lamp_color(lamp: &Lamp) -> Color {
    match lamp.vray.color_type {
        ColorType::Rgb => lamp.color,
        ColorType::Temperature => kelvin_to_rgb(lamp.vray.temperature),
    }
}

/// Write the light record for a lamp object and return its instance name.
///
/// `None` when the lamp kind has no renderer counterpart.
pub fn write_lamp(
    ctx: &mut ExportContext<'_>,
    scene: &Scene,
    ob: &Object,
    lamp: &Lamp,
    instance: Option<&LampInstance>,
) -> ExportResult<Option<String>> {
    let Some(kind) = light_kind(lamp) else {
        tracing::debug!(object = %ob.name, kind = ?lamp.kind, "lamp type has no renderer light");
        ctx.stats.lights_skipped += 1;
        return Ok(None);
    };
    let v = &lamp.vray;
    let name = resolve(ob, Prefix::Light, instance.map(|i| i.suffix.as_str()));
    let color = lamp_color(lamp);

    let slots = &lamp.texture_slots;
    let color_tex = composite_channel(
        ctx,
        scene,
        &name,
        None,
        Channel::Color,
        color.with_alpha(1.0).into(),
        slots,
    )?;
    let intensity_tex = composite_channel(
        ctx,
        scene,
        &name,
        None,
        Channel::Intensity,
        Color::gray(v.intensity).with_alpha(1.0).into(),
        slots,
    )?;
    let shadow_tex = composite_channel(
        ctx,
        scene,
        &name,
        None,
        Channel::ShadowColor,
        v.shadow_color.with_alpha(1.0).into(),
        slots,
    )?;

    let mut rec = Record::new(kind.plugin(), &name);

    if let ChannelValue::Texture(tex) = &color_tex {
        if matches!(kind, LightKind::Sun | LightKind::DirectMax) {
            rec.push("projector_map", Value::reference(tex.as_str()));
        }
        match kind {
            LightKind::Rectangle => {
                rec.push("tex_adaptive", 1.0);
                rec.push("tex_resolution", 512);
                rec.push("use_rect_tex", true);
                rec.push("rect_tex", Value::reference(tex.as_str()));
            }
            LightKind::Dome => {
                rec.push("tex_adaptive", 1.0);
                rec.push("tex_resolution", 512);
                rec.push("use_dome_tex", true);
                rec.push("dome_tex", Value::reference(tex.as_str()));
            }
            _ => {}
        }
        if kind != LightKind::Dome {
            rec.push("color_tex", Value::reference(tex.as_str()));
        }
    }
    if let ChannelValue::Texture(tex) = &intensity_tex {
        rec.push("intensity_tex", Value::output(tex.as_str(), "out_intensity"));
    }
    if let ChannelValue::Texture(tex) = &shadow_tex {
        let key = if kind == LightKind::Sun {
            "shadow_color_tex"
        } else {
            "shadowColor_tex"
        };
        rec.push(key, Value::reference(tex.as_str()));
    }

    match kind {
        LightKind::Sun => {
            rec.push("sky_model", v.sky_model.code());
            rec.push("filter_color", lamp.color);
        }
        _ => {
            rec.push("color", color);
            if !matches!(kind, LightKind::Ies | LightKind::Ambient) {
                rec.push("units", v.units.code());
            }
            if kind == LightKind::Ies {
                let shape = if v.ies_light_shape == 0 {
                    -1
                } else {
                    v.ies_light_shape
                };
                rec.push("ies_light_shape", shape);
                rec.push("ies_light_width", v.ies_light_width);
                let (length, height) = if v.ies_light_shape_lock {
                    (v.ies_light_width, v.ies_light_width)
                } else {
                    (v.ies_light_length, v.ies_light_height)
                };
                rec.push("ies_light_length", length);
                rec.push("ies_light_height", height);
                rec.push("ies_light_diameter", v.ies_light_diameter);
            }
        }
    }

    if kind == LightKind::Spot {
        let falloff = lamp.distance - lamp.spot_blend;
        rec.push("coneAngle", lamp.spot_size);
        rec.push("penumbraAngle", -lamp.spot_size * lamp.spot_blend);
        rec.push("useDecayRegions", true);
        rec.push("startDistance1", 0.0);
        rec.push("endDistance1", falloff);
        rec.push("startDistance2", falloff);
        rec.push("endDistance2", falloff);
        rec.push("startDistance3", falloff);
        rec.push("endDistance3", lamp.distance);
    }

    if kind == LightKind::Rectangle {
        let v_size = match lamp.shape {
            AreaShape::Rectangle => lamp.size_y / 2.0,
            AreaShape::Square => lamp.size / 2.0,
        };
        rec.push("u_size", lamp.size / 2.0);
        rec.push("v_size", v_size);
        rec.push("lightPortal", v.light_portal.code());
    }

    for key in kind.manifest() {
        push_param(&mut rec, kind, v, key);
    }

    let matrix = instance.map_or(ob.matrix_world, |i| i.matrix);
    rec.push("transform", matrix.0);

    for (key, list) in light_select_lists(scene, ob) {
        if !list.is_empty() {
            rec.push(key, Value::ref_list(list));
        }
    }

    if v.use_include_exclude {
        let names = |objects: &[String], groups: &[String]| -> Vec<String> {
            scene
                .object_list(objects, groups)
                .into_iter()
                .map(|o| resolve(o, Prefix::Object, None))
                .collect()
        };
        let link = LightLink {
            include: v
                .use_include
                .then(|| names(&v.include_objects, &v.include_groups)),
            exclude: v
                .use_exclude
                .then(|| names(&v.exclude_objects, &v.exclude_groups)),
        };
        ctx.light_linker.insert(name.clone(), link);
    }

    ctx.write(Category::Lights, &rec)?;
    Ok(Some(name))
}

/// Render-channel record name of a light-select channel.
pub fn light_select_name(channel_name: &str) -> String {
    format!("LightSelect_{}", clean_string(channel_name))
}

/// `channels_raw` / `channels_diffuse` / `channels_specular` membership of `ob`.
fn light_select_lists(scene: &Scene, ob: &Object) -> [(&'static str, Vec<String>); 3] {
    let mut raw = Vec::new();
    let mut diffuse = Vec::new();
    let mut specular = Vec::new();
    if scene.vray.render_channels_use {
        for ch in scene.vray.render_channels.iter().filter(|c| c.enabled) {
            let RenderChannelKind::Lightselect {
                lights,
                light_select_type,
            } = &ch.kind
            else {
                continue;
            };
            if !lights.iter().any(|l| l == &ob.name) {
                continue;
            }
            let target = match light_select_type {
                LightSelectType::Raw => &mut raw,
                LightSelectType::Diffuse => &mut diffuse,
                LightSelectType::Specular => &mut specular,
            };
            target.push(light_select_name(&ch.name));
        }
    }
    [
        ("channels_raw", raw),
        ("channels_diffuse", diffuse),
        ("channels_specular", specular),
    ]
}

/// Write a mesh object flagged as a light emitter.
pub fn write_mesh_light(ctx: &mut ExportContext<'_>, ob: &Object) -> ExportResult<Option<String>> {
    let ObjectData::Mesh(mesh) = &ob.data else {
        return Ok(None);
    };
    let lm = &ob.vray.light_mesh;
    let name = resolve(ob, Prefix::Light, None);
    let rec = Record::new("LightMesh", &name)
        .with("geometry", Value::reference(geometry_name(&mesh.name)))
        .with("transform", ob.matrix_world.0)
        .with("color", lm.color)
        .with("intensity", lm.intensity)
        .with("subdivs", lm.subdivs)
        .with("invisible", lm.invisible)
        .with("noDecay", lm.no_decay);
    ctx.write(Category::Lights, &rec)?;
    Ok(Some(name))
}

/// Write a `SceneInclude` for an empty that pulls in an external scene file.
///
/// Skipped when neither a file nor a directory is set.
pub fn write_scene_include(
    ctx: &mut ExportContext<'_>,
    ob: &Object,
) -> ExportResult<Option<String>> {
    let v = &ob.vray;
    if !v.override_with_scene {
        return Ok(None);
    }
    let path = if v.scene_filepath.is_empty() {
        v.scene_dirpath.as_str()
    } else {
        v.scene_filepath.as_str()
    };
    if path.is_empty() {
        tracing::debug!(object = %ob.name, "scene include without a path skipped");
        return Ok(None);
    }
    let name = resolve(ob, Prefix::SceneInclude, None);
    let rec = Record::new("SceneInclude", &name)
        .with("filepath", Value::quoted(path))
        .with("prefix", Value::quoted(name.as_str()))
        .with("transform", ob.matrix_world.0)
        .with("use_transform", v.scene_use_transform)
        .with("replace", v.scene_replace)
        .with("add_nodes", v.scene_add_nodes)
        .with("add_materials", v.scene_add_materials)
        .with("add_lights", v.scene_add_lights)
        .with("add_cameras", v.scene_add_cameras)
        .with("add_environment", v.scene_add_environment);
    ctx.write(Category::Scene, &rec)?;
    Ok(Some(name))
}

fn rig_transform(x: [f64; 3], y: [f64; 3], z: [f64; 3], t: [f64; 3]) -> DMat4 {
    DMat4::from_cols(
        DVec3::from(x).extend(0.0),
        DVec3::from(y).extend(0.0),
        DVec3::from(z).extend(0.0),
        DVec3::from(t).extend(1.0),
    )
}

/// Fixed light rig used for material previews.
pub fn preview_records() -> Vec<Record> {
    let omni_axes = (
        [0.499935, 0.789660, 0.355671],
        [-0.672205, 0.094855, 0.734263],
        [0.546081, -0.606168, 0.578235],
    );
    vec![
        Record::new("LightDirectMax", "LALamp_008")
            .with_comment("PREVIEW")
            .with("intensity", 1.0)
            .with("color", Color::WHITE)
            .with("shadows", false)
            .with("cutoffThreshold", 0.01)
            .with("affectDiffuse", true)
            .with("affectSpecular", false)
            .with("areaSpeculars", false)
            .with("fallsize", 100.0)
            .with(
                "transform",
                rig_transform(
                    [1.0, 0.0, -0.0],
                    [0.0, 0.0, 1.0],
                    [0.0, -1.0, 0.0],
                    [1.471056, -14.735638, 3.274598],
                ),
            ),
        Record::new("LightSpot", "LALamp_002")
            .with_comment("PREVIEW")
            .with("intensity", 5.0)
            .with("color", Color::WHITE)
            .with("coneAngle", 1.3)
            .with("penumbraAngle", -0.4)
            .with("shadows", true)
            .with("cutoffThreshold", 0.01)
            .with("affectDiffuse", true)
            .with("affectSpecular", false)
            .with("areaSpeculars", false)
            .with("shadowRadius", 0.0)
            .with("shadowSubdivs", 4)
            .with("decay", 1.0)
            .with(
                "transform",
                rig_transform(
                    [-0.549843, 0.655945, 0.517116],
                    [-0.733248, -0.082559, -0.674931],
                    [-0.400025, -0.750280, 0.526365],
                    [-5.725639, -13.646054, 8.5],
                ),
            ),
        Record::new("LightOmni", "LALamp")
            .with_comment("PREVIEW")
            .with("intensity", 50.0)
            .with("color", Color::WHITE)
            .with("shadows", false)
            .with("cutoffThreshold", 0.01)
            .with("affectDiffuse", true)
            .with("affectSpecular", false)
            .with("specular_contribution", 0.0)
            .with("areaSpeculars", false)
            .with("shadowSubdivs", 4)
            .with("decay", 2.0)
            .with(
                "transform",
                rig_transform(
                    omni_axes.0,
                    omni_axes.1,
                    omni_axes.2,
                    [15.685226, -7.460007, 3.0],
                ),
            ),
        Record::new("LightOmni", "LALamp_001")
            .with_comment("PREVIEW")
            .with("intensity", 20.0)
            .with("color", Color::WHITE)
            .with("shadows", false)
            .with("cutoffThreshold", 0.01)
            .with("affectDiffuse", true)
            .with("affectSpecular", false)
            .with("areaSpeculars", false)
            .with("shadowSubdivs", 4)
            .with("decay", 2.0)
            .with(
                "transform",
                rig_transform(
                    omni_axes.0,
                    omni_axes.1,
                    omni_axes.2,
                    [-10.500286, -12.464991, 4.0],
                ),
            ),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/export/lights.rs"]
mod tests;
