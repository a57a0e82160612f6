//! Frame orchestration.
//!
//! [`ExportSession`] owns the export context for one run and drives every writer in a fixed
//! order per frame. Animation modes, change detection and host frame seeking live here.

use std::time::Instant;

use crate::export::cache::CacheKind;
use crate::export::camera::write_camera;
use crate::export::context::{ExportContext, ExportStats, FrameState};
use crate::export::lights::{preview_records, write_lamp, write_mesh_light, write_scene_include};
use crate::export::materials::{self, MaterialRequest, compose, effective_material, material_name};
use crate::export::naming::{Prefix, resolve};
use crate::export::native::NodeExporter;
use crate::export::settings::write_settings;
use crate::export::streams::{Category, OutputStreams};
use crate::export::textures::{self, slot_texture_name, write_slot_texture};
use crate::foundation::cancel::CancelToken;
use crate::foundation::core::FrameNumber;
use crate::foundation::error::{ExportError, ExportResult};
use crate::scene::entity::{EntityRef, FrameHost, has_animated_lineage};
use crate::scene::model::{Object, ObjectData, Scene, TextureKind, TextureSlot};
use crate::scene::settings::{AnimationType, CheckAnimated, ExporterSettings};

/// How an export run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    Completed(ExportStats),
    /// The cancel token fired; streams hold everything written up to that point.
    Cancelled(ExportStats),
}

impl ExportOutcome {
    pub fn stats(self) -> ExportStats {
        match self {
            Self::Completed(s) | Self::Cancelled(s) => s,
        }
    }

    pub fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

/// Frame loop shape chosen from the exporter settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportMode {
    /// One frame at the host's current frame.
    Still,
    /// Every frame of the scene range into one interpolated file set.
    Range,
    /// Full first frame, camera records only on later frames.
    CameraOnly,
    /// One frame per camera selected for looping.
    CameraLoop,
}

impl ExportMode {
    pub fn select(ex: &ExporterSettings, preview: bool) -> Self {
        if preview {
            return Self::Still;
        }
        if ex.camera_loop {
            return Self::CameraLoop;
        }
        if ex.is_range_animation() {
            return Self::Range;
        }
        if ex.animation && ex.animation_type == AnimationType::Camera {
            return Self::CameraOnly;
        }
        Self::Still
    }
}

/// What a single frame pass writes.
#[derive(Clone, Copy, Debug)]
struct FramePass {
    state: FrameState,
    geometry: bool,
    camera_only: bool,
}

/// One export run over a set of output streams.
pub struct ExportSession<'a> {
    ctx: ExportContext<'a>,
    nodes: &'a mut dyn NodeExporter,
    /// Change detection active for the running animation.
    check: bool,
}

impl<'a> ExportSession<'a> {
    pub fn new(
        streams: &'a mut dyn OutputStreams,
        nodes: &'a mut dyn NodeExporter,
        cancel: CancelToken,
    ) -> Self {
        Self {
            ctx: ExportContext::new(streams, cancel),
            nodes,
            check: false,
        }
    }

    /// Material preview exports: fixed light rig plus preview settings.
    pub fn set_preview(&mut self, preview: bool) {
        self.ctx.preview = preview;
    }

    pub fn context(&self) -> &ExportContext<'a> {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut ExportContext<'a> {
        &mut self.ctx
    }

    pub fn stats(&self) -> ExportStats {
        self.ctx.stats
    }

    /// Banner and section title at the top of every stream.
    pub fn write_headers(&mut self, scene: &Scene) -> ExportResult<()> {
        for category in Category::ALL {
            let header = format!(
                "// V-Ray scene exported by vrscene\n// Filename: {}\n\n// {}\n",
                scene.name,
                category.title()
            );
            self.ctx.write_raw(category, &header)?;
        }
        Ok(())
    }

    /// Fail-safe records every reference can fall back to.
    pub fn write_defaults(&mut self) -> ExportResult<()> {
        for rec in textures::default_records() {
            self.ctx.write_static(Category::Textures, &rec)?;
        }
        for rec in materials::default_records() {
            self.ctx.write_static(Category::Materials, &rec)?;
        }
        Ok(())
    }

    /// Headers, defaults and every frame the exporter settings ask for.
    #[tracing::instrument(skip_all, fields(scene = %host.scene().name, preview = self.ctx.preview))]
    pub fn export(&mut self, host: &mut dyn FrameHost) -> ExportResult<ExportOutcome> {
        let t0 = Instant::now();
        self.write_headers(host.scene())?;
        self.write_defaults()?;
        let outcome = self.write_scene(host)?;
        let stats = outcome.stats();
        tracing::info!(
            frames = stats.frames,
            records = stats.records,
            bytes = stats.bytes,
            cancelled = outcome.is_cancelled(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "scene exported"
        );
        Ok(outcome)
    }

    /// Run the frame loop selected by the exporter settings.
    ///
    /// The host is returned to its current frame afterwards, on success and on error.
    pub fn write_scene(&mut self, host: &mut dyn FrameHost) -> ExportResult<ExportOutcome> {
        let saved = host.scene().current_frame();
        self.ctx.camera = host.scene().camera.clone();
        self.nodes.init(host.scene())?;

        let res = self.run_frames(host);

        if host.scene().current_frame() != saved {
            host.set_frame(saved);
        }
        self.nodes.exit();

        let completed = res?;
        Ok(if completed {
            ExportOutcome::Completed(self.ctx.stats)
        } else {
            ExportOutcome::Cancelled(self.ctx.stats)
        })
    }

    /// `false` when cancelled.
    fn run_frames(&mut self, host: &mut dyn FrameHost) -> ExportResult<bool> {
        let ex = host.scene().vray.exporter.clone();
        let mode = ExportMode::select(&ex, self.ctx.preview);
        tracing::debug!(?mode, "frame loop");

        match mode {
            ExportMode::Still => {
                self.check = false;
                self.nodes.init_cache(false, ex.check_animated);
                let pass = FramePass {
                    state: FrameState {
                        number: host.scene().current_frame(),
                        first: true,
                        interpolate: false,
                    },
                    geometry: ex.auto_meshes,
                    camera_only: false,
                };
                self.write_frame(host.scene(), pass)
            }
            ExportMode::Range | ExportMode::CameraOnly => {
                let range = host.scene().frame_range()?;
                self.check = ex.check_animated != CheckAnimated::None;
                self.nodes.init_cache(true, ex.check_animated);
                for frame in range.frames() {
                    if self.ctx.is_cancelled() {
                        return Ok(false);
                    }
                    host.set_frame(frame);
                    let first = range.is_first(frame);
                    let pass = FramePass {
                        state: FrameState {
                            number: frame,
                            first,
                            interpolate: true,
                        },
                        geometry: first || ex.animation_type != AnimationType::NotMeshes,
                        camera_only: mode == ExportMode::CameraOnly && !first,
                    };
                    if !self.write_frame(host.scene(), pass)? {
                        return Ok(false);
                    }
                }
                self.nodes.clear_frames();
                Ok(true)
            }
            ExportMode::CameraLoop => {
                let cameras: Vec<String> = host
                    .scene()
                    .cameras()
                    .filter(|o| matches!(&o.data, ObjectData::Camera(c) if c.use_camera_loop))
                    .map(|o| o.name.clone())
                    .collect();
                if cameras.is_empty() {
                    return Err(ExportError::validation("No cameras selected"));
                }
                self.ctx.cameras = cameras.clone();
                self.check = false;
                self.nodes.init_cache(true, CheckAnimated::None);
                for (i, cam) in cameras.into_iter().enumerate() {
                    if self.ctx.is_cancelled() {
                        return Ok(false);
                    }
                    self.ctx.camera = Some(cam);
                    let pass = FramePass {
                        state: FrameState {
                            number: FrameNumber(i as i64 + 1),
                            first: i == 0,
                            interpolate: true,
                        },
                        geometry: i == 0,
                        camera_only: false,
                    };
                    if !self.write_frame(host.scene(), pass)? {
                        return Ok(false);
                    }
                }
                self.nodes.clear_frames();
                Ok(true)
            }
        }
    }

    /// Entities are rewritten on the first frame, without change detection, or when they or an
    /// ancestor are animated.
    fn is_animated(&self, scene: &Scene, entity: &dyn EntityRef) -> bool {
        self.ctx.frame.first || !self.check || has_animated_lineage(scene, entity)
    }

    #[tracing::instrument(skip(self, scene), fields(frame = pass.state.number.0))]
    fn write_frame(&mut self, scene: &Scene, pass: FramePass) -> ExportResult<bool> {
        if self.ctx.is_cancelled() {
            return Ok(false);
        }
        self.ctx.begin_frame(pass.state);

        if pass.camera_only {
            write_camera(&mut self.ctx, scene)?;
            self.ctx.stats.frames += 1;
            return Ok(true);
        }

        if self.ctx.preview {
            for rec in preview_records() {
                self.ctx.write(Category::Lights, &rec)?;
            }
        }

        self.nodes.set_skip_objects(&fog_objects(scene));
        self.nodes
            .export_scene(&mut self.ctx, scene, true, pass.geometry)?;
        if pass.state.interpolate {
            self.nodes.clear_cache();
        }

        if !self.write_textures(scene)?
            || !self.write_materials(scene)?
            || !self.write_lights(scene)?
        {
            return Ok(false);
        }

        if pass.state.first {
            write_settings(&mut self.ctx, scene)?;
        }

        let camera_animated = self
            .ctx
            .camera
            .as_deref()
            .and_then(|name| scene.object(name))
            .is_some_and(|ob| {
                self.is_animated(scene, ob)
                    || matches!(&ob.data, ObjectData::Camera(c) if c.animated)
            });
        if pass.state.first || camera_animated {
            write_camera(&mut self.ctx, scene)?;
        }

        self.ctx.stats.frames += 1;
        Ok(true)
    }

    /// Every scene texture. Unchanged textures are only registered, under each name a slot or
    /// a parameter reference can resolve to, so consumers reuse the records of the first frame.
    fn write_textures(&mut self, scene: &Scene) -> ExportResult<bool> {
        for tex in &scene.textures {
            if self.ctx.is_cancelled() {
                return Ok(false);
            }
            let animated = self.is_animated(scene, tex);
            for (slot, consumer) in slot_consumers(scene, &tex.name) {
                if animated {
                    write_slot_texture(&mut self.ctx, scene, slot, consumer)?;
                } else if let Some(name) = slot_texture_name(scene, slot, consumer) {
                    self.ctx.cache.mark(CacheKind::Textures, &name);
                }
            }
            if !animated && !matches!(tex.kind, TextureKind::Unsupported) {
                let name = resolve(tex, Prefix::Texture, None);
                self.ctx.cache.mark(CacheKind::Textures, &name);
            }
        }
        Ok(true)
    }

    fn write_materials(&mut self, scene: &Scene) -> ExportResult<bool> {
        for ob in &scene.objects {
            for ma in ob.material_slots.iter().filter_map(|m| scene.material(m)) {
                if self.ctx.is_cancelled() {
                    return Ok(false);
                }
                let request = MaterialRequest::for_object(ma, ob);
                if self.is_animated(scene, ma) {
                    compose(&mut self.ctx, scene, &request)?;
                } else {
                    let name = material_name(scene, &request);
                    self.ctx.cache.mark(CacheKind::Materials, &name);
                }
            }
        }
        Ok(true)
    }

    fn write_lights(&mut self, scene: &Scene) -> ExportResult<bool> {
        let opts = &scene.vray.options;
        for ob in &scene.objects {
            if self.ctx.is_cancelled() {
                return Ok(false);
            }
            if matches!(ob.data, ObjectData::Empty) && ob.vray.override_with_scene {
                if self.is_animated(scene, ob) {
                    write_scene_include(&mut self.ctx, ob)?;
                }
                continue;
            }

            let lamp = match &ob.data {
                ObjectData::Lamp(lamp) => Some(lamp),
                ObjectData::Mesh(_) if ob.vray.light_mesh.enabled => None,
                _ => continue,
            };

            if is_hidden(ob) && !opts.light_do_hidden_lights {
                tracing::debug!(object = %ob.name, "hidden light skipped");
                self.ctx.stats.lights_skipped += 1;
                continue;
            }
            let animated = self.is_animated(scene, ob) || lamp.is_some_and(|l| l.animated);
            if !animated {
                self.ctx.stats.lights_skipped += 1;
                continue;
            }

            match lamp {
                Some(lamp) => write_lamp(&mut self.ctx, scene, ob, lamp, None)?,
                None => write_mesh_light(&mut self.ctx, ob)?,
            };
        }
        Ok(true)
    }

    /// Close every stream. Safe to call after a failed export.
    pub fn close(&mut self) -> ExportResult<()> {
        self.ctx.close_streams()
    }
}

/// Texture slots pointing at `texture`, with the object they are written for. Lamp slots
/// have no consumer.
fn slot_consumers<'s>(
    scene: &'s Scene,
    texture: &str,
) -> Vec<(&'s TextureSlot, Option<&'s Object>)> {
    let mut found = Vec::new();
    for ob in &scene.objects {
        for ma in ob.material_slots.iter().filter_map(|m| scene.material(m)) {
            let ma = effective_material(scene, ma, Some(ob));
            found.extend(
                ma.texture_slots
                    .iter()
                    .filter(|slot| slot.texture == texture)
                    .map(|slot| (slot, Some(ob))),
            );
        }
        if let ObjectData::Lamp(lamp) = &ob.data {
            found.extend(
                lamp.texture_slots
                    .iter()
                    .filter(|slot| slot.texture == texture)
                    .map(|slot| (slot, None)),
            );
        }
    }
    found
}

fn is_hidden(ob: &Object) -> bool {
    !ob.visible || ob.hide_render
}

/// Objects rendered as fog volumes; they never become nodes.
fn fog_objects(scene: &Scene) -> Vec<String> {
    let effects = &scene.vray.effects;
    if !effects.enabled {
        return Vec::new();
    }
    let mut names: Vec<String> = Vec::new();
    for fog in effects.fog.iter().filter(|f| f.enabled) {
        for ob in scene.object_list(&fog.objects, &fog.groups) {
            if !names.contains(&ob.name) {
                names.push(ob.name.clone());
            }
        }
    }
    names
}

#[cfg(test)]
#[path = "../../tests/unit/export/session.rs"]
mod tests;
