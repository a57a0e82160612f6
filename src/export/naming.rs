use crate::scene::entity::EntityRef;

/// Kind prefix of a resolved name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prefix {
    Material,
    Texture,
    Light,
    Object,
    SceneInclude,
    Camera,
}

impl Prefix {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Material => "MA",
            Self::Texture => "TE",
            Self::Light => "LA",
            Self::Object => "OB",
            Self::SceneInclude => "SI",
            Self::Camera => "CA",
        }
    }
}

/// Replace characters the scene-description grammar does not accept in instance names.
///
/// `+` becomes `p`, `-` becomes `m`, anything else outside `[A-Za-z0-9]` becomes `_`.
pub fn clean_string(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '+' => 'p',
            '-' => 'm',
            c if c.is_ascii_alphanumeric() => c,
            _ => '_',
        })
        .collect()
}

/// Resolve the instance name of `entity`.
///
/// `prefix + [LI + library] + name [+ variant]`, sanitized. Pure: equal inputs give equal
/// names.
pub fn resolve(entity: &dyn EntityRef, prefix: Prefix, variant: Option<&str>) -> String {
    resolve_parts(prefix, entity.library(), entity.name(), variant)
}

/// [`resolve`] for callers that only hold a name, e.g. a material referenced by name.
pub fn resolve_parts(
    prefix: Prefix,
    library: Option<&str>,
    name: &str,
    variant: Option<&str>,
) -> String {
    let mut out = String::from(prefix.as_str());
    if let Some(lib) = library {
        out.push_str("LI");
        out.push_str(&clean_string(lib_stem(lib)));
    }
    out.push_str(&clean_string(name));
    if let Some(v) = variant {
        out.push_str(&clean_string(v));
    }
    out
}

/// Variant suffix for data that depends on a consuming object (object-space mapping).
pub fn object_suffix(object_name: &str) -> String {
    format!("OB{}", clean_string(object_name))
}

/// Geometry record name of a mesh data block.
pub fn geometry_name(mesh_name: &str) -> String {
    format!("ME{}", clean_string(mesh_name))
}

fn lib_stem(lib: &str) -> &str {
    let file = lib.rsplit(['/', '\\']).next().unwrap_or(lib);
    file.strip_suffix(".blend").unwrap_or(file)
}

#[cfg(test)]
#[path = "../../tests/unit/export/naming.rs"]
mod tests;
