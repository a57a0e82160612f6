//! Bulk node and geometry export.
//!
//! Heavy geometry serialization lives behind [`NodeExporter`] so hosts can plug in their own
//! implementation. [`SceneNodeExporter`] is the built-in one: it references pre-baked mesh
//! files instead of writing vertex data.

use std::collections::BTreeSet;

use crate::export::cache::CacheKind;
use crate::export::context::ExportContext;
use crate::export::materials::{MaterialRequest, NO_MATERIAL, material_name};
use crate::export::naming::{Prefix, geometry_name, resolve};
use crate::export::streams::Category;
use crate::foundation::error::ExportResult;
use crate::scene::entity::has_animated_lineage;
use crate::scene::model::{Object, ObjectData, Scene};
use crate::scene::settings::CheckAnimated;
use crate::vrscene::record::{Record, Value};

/// Collaborator writing scene nodes and geometry.
///
/// Owns the cross-frame cache; the orchestrator calls `clear_cache` after every frame of a
/// range export and `clear_frames` once the animation is done.
pub trait NodeExporter {
    fn init(&mut self, scene: &Scene) -> ExportResult<()>;
    fn init_cache(&mut self, is_animation: bool, check_animated: CheckAnimated);
    /// Objects never written as nodes (fog volumes).
    fn set_skip_objects(&mut self, names: &[String]);
    /// Write nodes; geometry too when `geometry` is set.
    fn export_scene(
        &mut self,
        ctx: &mut ExportContext<'_>,
        scene: &Scene,
        nodes: bool,
        geometry: bool,
    ) -> ExportResult<()>;
    fn clear_cache(&mut self);
    fn clear_frames(&mut self);
    fn exit(&mut self);
}

/// Writes `Node` records plus `GeomMeshFile` references for mesh objects.
///
/// Materials are only referenced by name; the orchestrator writes them.
#[derive(Debug, Default)]
pub struct SceneNodeExporter {
    skip: BTreeSet<String>,
    /// Objects written in an earlier frame of this animation.
    exported: BTreeSet<String>,
    is_animation: bool,
    check_animated: CheckAnimated,
    /// Objects written during the current frame, cleared by `clear_cache`.
    frame_nodes: Vec<String>,
}

impl SceneNodeExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes written since the last `clear_cache`.
    pub fn frame_nodes(&self) -> &[String] {
        &self.frame_nodes
    }

    fn wants(&self, scene: &Scene, ob: &Object) -> bool {
        if self.skip.contains(&ob.name) {
            return false;
        }
        if !(ob.visible || scene.vray.options.geom_do_hidden) || ob.hide_render {
            return false;
        }
        if !self.is_animation || self.check_animated == CheckAnimated::None {
            return true;
        }
        !self.exported.contains(&ob.name) || has_animated_lineage(scene, ob)
    }

    fn write_geometry(
        &self,
        ctx: &mut ExportContext<'_>,
        mesh_name: &str,
    ) -> ExportResult<String> {
        let name = geometry_name(mesh_name);
        if ctx.cache.mark(CacheKind::Proxy, &name) {
            let rec = Record::new("GeomMeshFile", &name)
                .with("file", Value::quoted(format!("{mesh_name}.vrmesh")));
            ctx.write(Category::Geometry, &rec)?;
        }
        Ok(name)
    }
}

impl NodeExporter for SceneNodeExporter {
    fn init(&mut self, _scene: &Scene) -> ExportResult<()> {
        self.exported.clear();
        self.frame_nodes.clear();
        Ok(())
    }

    fn init_cache(&mut self, is_animation: bool, check_animated: CheckAnimated) {
        self.is_animation = is_animation;
        self.check_animated = check_animated;
    }

    fn set_skip_objects(&mut self, names: &[String]) {
        self.skip = names.iter().cloned().collect();
    }

    #[tracing::instrument(skip(self, ctx, scene))]
    fn export_scene(
        &mut self,
        ctx: &mut ExportContext<'_>,
        scene: &Scene,
        nodes: bool,
        geometry: bool,
    ) -> ExportResult<()> {
        for ob in &scene.objects {
            if ctx.is_cancelled() {
                return Ok(());
            }
            let ObjectData::Mesh(mesh) = &ob.data else {
                continue;
            };
            if ob.vray.light_mesh.enabled || !self.wants(scene, ob) {
                continue;
            }

            let geom = geometry_name(&mesh.name);
            if geometry {
                self.write_geometry(ctx, &mesh.name)?;
            }
            if !nodes {
                continue;
            }

            let material = match ob.material_slots.iter().find_map(|m| scene.material(m)) {
                Some(ma) => material_name(scene, &MaterialRequest::for_object(ma, ob)),
                None => NO_MATERIAL.to_string(),
            };
            let name = resolve(ob, Prefix::Object, None);
            let rec = Record::new("Node", &name)
                .with("objectID", 0)
                .with("geometry", Value::reference(geom))
                .with("material", Value::reference(material))
                .with("transform", ob.matrix_world.0)
                .with("visible", ob.visible);
            ctx.write(Category::Nodes, &rec)?;

            self.exported.insert(ob.name.clone());
            self.frame_nodes.push(name);
        }
        Ok(())
    }

    fn clear_cache(&mut self) {
        self.frame_nodes.clear();
    }

    fn clear_frames(&mut self) {
        self.exported.clear();
    }

    fn exit(&mut self) {
        self.skip.clear();
        self.exported.clear();
        self.frame_nodes.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/native.rs"]
mod tests;
