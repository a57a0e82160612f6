use crate::foundation::core::FrameNumber;
use crate::scene::model::{Lamp, Material, Object, ObjectData, Scene, Texture};

/// Exportable entity kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Object,
    Material,
    Texture,
    Light,
    Camera,
}

/// Read-only view of a host entity.
///
/// Writers only ever see entities through this surface plus the typed payload they handle, so
/// tests can substitute their own entities.
pub trait EntityRef {
    fn kind(&self) -> EntityKind;
    fn name(&self) -> &str;
    /// Linked library the entity comes from, if any.
    fn library(&self) -> Option<&str> {
        None
    }
    /// Parent object name.
    fn parent(&self) -> Option<&str> {
        None
    }
    /// The entity itself carries live animation data.
    fn has_animation(&self) -> bool;
}

impl EntityRef for Object {
    fn kind(&self) -> EntityKind {
        match self.data {
            ObjectData::Lamp(_) => EntityKind::Light,
            ObjectData::Camera(_) => EntityKind::Camera,
            _ => EntityKind::Object,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn library(&self) -> Option<&str> {
        self.library.as_deref()
    }

    fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    fn has_animation(&self) -> bool {
        self.animated
    }
}

impl EntityRef for Lamp {
    fn kind(&self) -> EntityKind {
        EntityKind::Light
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn has_animation(&self) -> bool {
        self.animated
    }
}

impl EntityRef for Material {
    fn kind(&self) -> EntityKind {
        EntityKind::Material
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn library(&self) -> Option<&str> {
        self.library.as_deref()
    }

    fn has_animation(&self) -> bool {
        self.animated
    }
}

impl EntityRef for Texture {
    fn kind(&self) -> EntityKind {
        EntityKind::Texture
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn library(&self) -> Option<&str> {
        self.library.as_deref()
    }

    fn has_animation(&self) -> bool {
        self.animated
    }
}

/// `true` when the entity or any ancestor along the parent chain is animated.
///
/// Parent cycles are cut after visiting every object once.
pub fn has_animated_lineage(scene: &Scene, entity: &dyn EntityRef) -> bool {
    if entity.has_animation() {
        return true;
    }
    let mut parent = entity.parent();
    let mut hops = 0usize;
    while let Some(name) = parent {
        if hops > scene.objects.len() {
            return false;
        }
        hops += 1;
        let Some(ob) = scene.object(name) else {
            return false;
        };
        if ob.animated {
            return true;
        }
        parent = ob.parent.as_deref();
    }
    false
}

/// Host boundary used for frame seeking during animation export.
pub trait FrameHost {
    fn scene(&self) -> &Scene;
    /// Move the host to `frame`, re-evaluating animated data.
    fn set_frame(&mut self, frame: FrameNumber);
}

impl FrameHost for Scene {
    fn scene(&self) -> &Scene {
        self
    }

    fn set_frame(&mut self, frame: FrameNumber) {
        self.frame_current = frame.0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/entity.rs"]
mod tests;
