use crate::export::context::ExportContext;
use crate::export::naming::{Prefix, resolve};
use crate::export::streams::Category;
use crate::foundation::error::ExportResult;
use crate::scene::model::{CameraData, Object, ObjectData, Scene};
use crate::vrscene::record::Record;

/// Instance name of the view record; the renderer expects exactly one.
pub const RENDER_VIEW: &str = "RenderView";

/// The active camera object and its data, if it exists and is a camera.
pub fn active_camera<'s>(
    scene: &'s Scene,
    name: Option<&str>,
) -> Option<(&'s Object, &'s CameraData)> {
    let ob = scene.object(name?)?;
    match &ob.data {
        ObjectData::Camera(cam) => Some((ob, cam)),
        _ => None,
    }
}

/// Horizontal field of view. For portrait outputs the camera angle spans the vertical side.
pub fn horizontal_fov(scene: &Scene, cam: &CameraData) -> f64 {
    let (w, h) = scene.render.output_size();
    if w < h && h > 0 {
        let aspect = f64::from(w) / f64::from(h);
        2.0 * ((cam.angle / 2.0).tan() * aspect).atan()
    } else {
        cam.angle
    }
}

/// `SettingsCamera` block for the active camera.
pub fn settings_camera_record(scene: &Scene, cam: &CameraData) -> Record {
    Record::unnamed("SettingsCamera")
        .with("type", if cam.ortho { 7 } else { 0 })
        .with("fov", horizontal_fov(scene, cam))
}

/// Write the view (and physical camera when enabled) for `ctx.camera`.
///
/// Returns the physical camera name when one was written.
pub fn write_camera(ctx: &mut ExportContext<'_>, scene: &Scene) -> ExportResult<Option<String>> {
    let Some((ob, cam)) = active_camera(scene, ctx.camera.as_deref()) else {
        tracing::debug!(camera = ?ctx.camera, "no active camera");
        return Ok(None);
    };

    let view = Record::new("RenderView", RENDER_VIEW)
        .with("transform", ob.matrix_world.0)
        .with("fov", horizontal_fov(scene, cam))
        .with("clipping", true)
        .with("clipping_near", cam.clip_start)
        .with("clipping_far", cam.clip_end)
        .with("orthographic", cam.ortho)
        .with("orthographicWidth", cam.ortho_scale);
    ctx.write(Category::Camera, &view)?;

    let phys = &cam.physical;
    if !phys.enabled {
        return Ok(None);
    }
    let name = resolve(ob, Prefix::Camera, None);
    let rec = Record::new("CameraPhysical", &name)
        .with("type", phys.kind)
        .with("film_width", phys.film_width)
        .with("focal_length", phys.focal_length)
        .with("fov", horizontal_fov(scene, cam))
        .with("f_number", phys.f_number)
        .with("shutter_speed", phys.shutter_speed)
        .with("ISO", phys.iso)
        .with("white_balance", phys.white_balance)
        .with("vignetting", phys.vignetting)
        .with("exposure", phys.exposure)
        .with("use_dof", phys.use_dof)
        .with("use_moblur", phys.use_moblur)
        .with("subdivs", phys.subdivs);
    ctx.write(Category::Camera, &rec)?;
    Ok(Some(name))
}
