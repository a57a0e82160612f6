use std::collections::BTreeMap;
use std::path::Path;

use crate::foundation::core::{Color, FrameNumber, FrameRange, Matrix4};
use crate::foundation::error::{ExportError, ExportResult};
use crate::scene::settings::VRayScene;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Read-only snapshot of a host scene.
///
/// The exporter never mutates a scene except through [`crate::FrameHost::set_frame`].
pub struct Scene {
    /// Source file name written into stream headers.
    #[serde(default = "default_scene_name")]
    pub name: String,
    #[serde(default = "default_frame")]
    pub frame_start: i64,
    #[serde(default = "default_frame")]
    pub frame_end: i64,
    #[serde(default = "default_frame_step")]
    pub frame_step: u32,
    #[serde(default = "default_frame")]
    pub frame_current: i64,
    #[serde(default)]
    pub render: RenderParams,
    /// Active camera object name.
    #[serde(default)]
    pub camera: Option<String>,
    #[serde(default)]
    pub objects: Vec<Object>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub textures: Vec<Texture>,
    /// Object groups: group name to member object names.
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub vray: VRayScene,
}

fn default_scene_name() -> String {
    "untitled.blend".to_string()
}

fn default_frame() -> i64 {
    1
}

fn default_frame_step() -> u32 {
    1
}

impl Scene {
    /// Parse a scene description from JSON text.
    pub fn from_json_str(s: &str) -> ExportResult<Self> {
        serde_json::from_str(s).map_err(|e| ExportError::serde(e.to_string()))
    }

    /// Read and parse a scene description JSON file.
    pub fn from_path(path: &Path) -> ExportResult<Self> {
        use anyhow::Context as _;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scene '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn frame_range(&self) -> ExportResult<FrameRange> {
        FrameRange::new(
            FrameNumber(self.frame_start),
            FrameNumber(self.frame_end),
            self.frame_step,
        )
    }

    pub fn current_frame(&self) -> FrameNumber {
        FrameNumber(self.frame_current)
    }

    pub fn object(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }

    pub fn texture(&self, name: &str) -> Option<&Texture> {
        self.textures.iter().find(|t| t.name == name)
    }

    /// Objects named directly plus members of the named groups, without duplicates.
    pub fn object_list(&self, objects: &[String], groups: &[String]) -> Vec<&Object> {
        let mut out: Vec<&Object> = Vec::new();
        let members = groups
            .iter()
            .filter_map(|g| self.groups.get(g))
            .flatten();
        for name in objects.iter().chain(members) {
            if let Some(ob) = self.object(name)
                && !out.iter().any(|o| o.name == ob.name)
            {
                out.push(ob);
            }
        }
        out
    }

    /// Materials referenced by object material slots, in object order.
    pub fn object_materials(&self) -> Vec<&Material> {
        let mut out: Vec<&Material> = Vec::new();
        for ob in &self.objects {
            for slot in &ob.material_slots {
                if let Some(ma) = self.material(slot)
                    && !out.iter().any(|m| m.name == ma.name)
                {
                    out.push(ma);
                }
            }
        }
        out
    }

    /// Textures referenced by materials on scene objects, in slot order.
    pub fn object_textures(&self) -> Vec<&Texture> {
        let mut out: Vec<&Texture> = Vec::new();
        for ma in self.object_materials() {
            for slot in &ma.texture_slots {
                if let Some(tex) = self.texture(&slot.texture)
                    && !out.iter().any(|t| t.name == tex.name)
                {
                    out.push(tex);
                }
            }
        }
        out
    }

    pub fn cameras(&self) -> impl Iterator<Item = &Object> {
        self.objects
            .iter()
            .filter(|o| matches!(o.data, ObjectData::Camera(_)))
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Host render output parameters.
pub struct RenderParams {
    #[serde(default = "default_resolution_x")]
    pub resolution_x: u32,
    #[serde(default = "default_resolution_y")]
    pub resolution_y: u32,
    #[serde(default = "default_percentage")]
    pub resolution_percentage: u32,
    #[serde(default = "default_true")]
    pub threads_auto: bool,
    #[serde(default)]
    pub threads: u32,
    #[serde(default)]
    pub use_border: bool,
    #[serde(default)]
    pub use_crop_to_border: bool,
    #[serde(default)]
    pub border_min_x: f64,
    #[serde(default = "default_one")]
    pub border_max_x: f64,
    #[serde(default)]
    pub border_min_y: f64,
    #[serde(default = "default_one")]
    pub border_max_y: f64,
    #[serde(default = "default_fps")]
    pub fps: u32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            resolution_x: default_resolution_x(),
            resolution_y: default_resolution_y(),
            resolution_percentage: default_percentage(),
            threads_auto: true,
            threads: 0,
            use_border: false,
            use_crop_to_border: false,
            border_min_x: 0.0,
            border_max_x: 1.0,
            border_min_y: 0.0,
            border_max_y: 1.0,
            fps: default_fps(),
        }
    }
}

impl RenderParams {
    /// Resolution after applying the percentage scale.
    pub fn output_size(&self) -> (u32, u32) {
        let scale = |v: u32| v * self.resolution_percentage / 100;
        (scale(self.resolution_x), scale(self.resolution_y))
    }
}

fn default_resolution_x() -> u32 {
    1920
}

fn default_resolution_y() -> u32 {
    1080
}

fn default_percentage() -> u32 {
    100
}

fn default_fps() -> u32 {
    24
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_one() -> f64 {
    1.0
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// A scene object.
pub struct Object {
    pub name: String,
    /// Linked library path when the object comes from another file.
    #[serde(default)]
    pub library: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub matrix_world: Matrix4,
    /// On a visible layer.
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub hide_render: bool,
    /// Carries live animation data.
    #[serde(default)]
    pub animated: bool,
    pub data: ObjectData,
    #[serde(default)]
    pub material_slots: Vec<String>,
    /// Instanced group for group duplis.
    #[serde(default)]
    pub dupli_group: Option<String>,
    #[serde(default)]
    pub vray: VRayObject,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Object payload.
pub enum ObjectData {
    Mesh(MeshData),
    Lamp(Lamp),
    Camera(CameraData),
    Empty,
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct MeshData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub animated: bool,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Per-object exporter settings.
pub struct VRayObject {
    /// Replace the object with an external `.vrscene` file.
    pub override_with_scene: bool,
    pub scene_filepath: String,
    pub scene_dirpath: String,
    pub scene_use_transform: bool,
    pub scene_replace: bool,
    pub scene_add_nodes: bool,
    pub scene_add_materials: bool,
    pub scene_add_lights: bool,
    pub scene_add_cameras: bool,
    pub scene_add_environment: bool,
    pub light_mesh: LightMesh,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Mesh object emitting light.
pub struct LightMesh {
    #[serde(rename = "use")]
    pub enabled: bool,
    pub color: Color,
    pub intensity: f64,
    pub subdivs: i32,
    pub invisible: bool,
    pub no_decay: bool,
}

impl Default for LightMesh {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Color::WHITE,
            intensity: 1.0,
            subdivs: 8,
            invisible: false,
            no_decay: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Host light taxonomy.
pub enum LampKind {
    Point,
    Spot,
    Sun,
    Area,
    Hemi,
    #[serde(other)]
    Unsupported,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AreaShape {
    #[default]
    Square,
    Rectangle,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Host light data block.
pub struct Lamp {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub animated: bool,
    #[serde(rename = "type")]
    pub kind: LampKind,
    #[serde(default = "default_white")]
    pub color: Color,
    /// Spot cone angle in radians.
    #[serde(default = "default_spot_size")]
    pub spot_size: f64,
    #[serde(default = "default_spot_blend")]
    pub spot_blend: f64,
    #[serde(default = "default_distance")]
    pub distance: f64,
    #[serde(default = "default_one")]
    pub size: f64,
    #[serde(default = "default_one")]
    pub size_y: f64,
    #[serde(default)]
    pub shape: AreaShape,
    #[serde(default)]
    pub texture_slots: Vec<TextureSlot>,
    #[serde(default)]
    pub vray: crate::scene::settings::VRayLamp,
}

pub(crate) fn default_white() -> Color {
    Color::WHITE
}

fn default_spot_size() -> f64 {
    std::f64::consts::FRAC_PI_4
}

fn default_spot_blend() -> f64 {
    0.15
}

fn default_distance() -> f64 {
    25.0
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Host camera data block.
pub struct CameraData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub animated: bool,
    /// Horizontal field of view in radians.
    #[serde(default = "default_fov")]
    pub angle: f64,
    #[serde(default = "default_clip_start")]
    pub clip_start: f64,
    #[serde(default = "default_clip_end")]
    pub clip_end: f64,
    #[serde(default)]
    pub ortho: bool,
    #[serde(default = "default_ortho_scale")]
    pub ortho_scale: f64,
    /// Selected for camera-loop rendering.
    #[serde(default)]
    pub use_camera_loop: bool,
    #[serde(default)]
    pub physical: crate::scene::settings::CameraPhysical,
}

fn default_fov() -> f64 {
    0.857_556
}

fn default_clip_start() -> f64 {
    0.1
}

fn default_clip_end() -> f64 {
    100.0
}

fn default_ortho_scale() -> f64 {
    7.314
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Host material.
pub struct Material {
    pub name: String,
    #[serde(default)]
    pub library: Option<String>,
    #[serde(default)]
    pub animated: bool,
    #[serde(default = "default_diffuse")]
    pub diffuse_color: Color,
    #[serde(default = "default_one")]
    pub alpha: f64,
    #[serde(default)]
    pub texture_slots: Vec<TextureSlot>,
    #[serde(default)]
    pub vray: crate::scene::settings::VRayMaterial,
}

fn default_diffuse() -> Color {
    Color::gray(0.8)
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Host texture.
pub struct Texture {
    pub name: String,
    #[serde(default)]
    pub library: Option<String>,
    #[serde(default)]
    pub animated: bool,
    #[serde(flatten)]
    pub kind: TextureKind,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
/// Texture plugin payload.
pub enum TextureKind {
    TexBitmap(TexBitmap),
    TexChecker(TexChecker),
    TexNoiseMax(TexNoiseMax),
    TexDistance(TexDistance),
    #[serde(other)]
    Unsupported,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TexBitmap {
    pub file: String,
    pub filter_type: i32,
    pub filter_blur: f64,
    pub interpolation: i32,
    pub gamma: f64,
    pub allow_negative_colors: bool,
}

impl Default for TexBitmap {
    fn default() -> Self {
        Self {
            file: String::new(),
            filter_type: 1,
            filter_blur: 1.0,
            interpolation: 0,
            gamma: 1.0,
            allow_negative_colors: false,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TexChecker {
    pub white_color: Color,
    pub black_color: Color,
    pub contrast: f64,
}

impl Default for TexChecker {
    fn default() -> Self {
        Self {
            white_color: Color::WHITE,
            black_color: Color::BLACK,
            contrast: 1.0,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TexNoiseMax {
    pub color1: Color,
    pub color2: Color,
    pub size: f64,
    pub phase: f64,
    pub iterations: f64,
    pub low: f64,
    pub high: f64,
    pub noise_type: i32,
}

impl Default for TexNoiseMax {
    fn default() -> Self {
        Self {
            color1: Color::BLACK,
            color2: Color::WHITE,
            size: 1.0,
            phase: 0.0,
            iterations: 3.0,
            low: 0.0,
            high: 1.0,
            noise_type: 0,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Color by distance to a set of objects.
pub struct TexDistance {
    pub distance: f64,
    /// Texture driving the distance; overrides `distance`.
    pub distance_tex: String,
    pub far_tex: String,
    pub far_tex_clr: Color,
    pub near_tex: String,
    pub near_tex_clr: Color,
    pub inside_separate: bool,
    pub inside_solid: bool,
    pub inside_tex: String,
    pub inside_tex_clr: Color,
    pub outside_separate: bool,
    pub outside_solid: bool,
    pub outside_tex: String,
    pub outside_tex_clr: Color,
    pub objects: Vec<String>,
    pub groups: Vec<String>,
}

impl Default for TexDistance {
    fn default() -> Self {
        Self {
            distance: 0.1,
            distance_tex: String::new(),
            far_tex: String::new(),
            far_tex_clr: Color::WHITE,
            near_tex: String::new(),
            near_tex_clr: Color::BLACK,
            inside_separate: true,
            inside_solid: false,
            inside_tex: String::new(),
            inside_tex_clr: Color::BLACK,
            outside_separate: false,
            outside_solid: false,
            outside_tex: String::new(),
            outside_tex_clr: Color::BLACK,
            objects: Vec::new(),
            groups: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A mapped channel a texture slot can drive.
pub enum Channel {
    Color,
    Intensity,
    ShadowColor,
    Diffuse,
    Reflect,
    Refract,
    Opacity,
    Bump,
    Normal,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Intensity => "intensity",
            Self::ShadowColor => "shadowColor",
            Self::Diffuse => "diffuse",
            Self::Reflect => "reflect",
            Self::Refract => "refract",
            Self::Opacity => "opacity",
            Self::Bump => "bump",
            Self::Normal => "normal",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Layer blend mode of a texture slot.
pub enum BlendMode {
    #[default]
    None,
    Over,
    In,
    Out,
    Add,
    Subtract,
    Multiply,
    Difference,
    Lighten,
    Darken,
    Saturate,
    Desaturate,
    Illuminate,
}

impl BlendMode {
    /// Layered-texture blend mode code.
    pub fn code(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Over => 1,
            Self::In => 2,
            Self::Out => 3,
            Self::Add => 4,
            Self::Subtract => 5,
            Self::Multiply => 6,
            Self::Difference => 7,
            Self::Lighten => 8,
            Self::Darken => 9,
            Self::Saturate => 10,
            Self::Desaturate => 11,
            Self::Illuminate => 12,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// Texture coordinate source of a slot.
pub enum TexMapping {
    Uv {
        #[serde(default = "default_uv_channel")]
        channel: u32,
    },
    /// Object-space mapping relative to another object.
    Object { object: String },
    /// Local coordinates of the consuming object.
    Generated,
    Environment,
}

fn default_uv_channel() -> u32 {
    1
}

impl Default for TexMapping {
    fn default() -> Self {
        Self::Uv { channel: 1 }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// A texture slot on a material or light.
pub struct TextureSlot {
    pub texture: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub use_stencil: bool,
    #[serde(default)]
    pub blend_mode: BlendMode,
    #[serde(default)]
    pub mapping: TexMapping,
    /// Channels driven by this slot and their multipliers.
    #[serde(default)]
    pub map: BTreeMap<Channel, f64>,
}

impl TextureSlot {
    pub fn multiplier(&self, channel: Channel) -> Option<f64> {
        if !self.enabled {
            return None;
        }
        self.map.get(&channel).copied()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
