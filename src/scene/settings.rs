//! Renderer-specific settings attached to scenes, lamps, materials and cameras.
//!
//! Every struct deserializes with `#[serde(default)]` so partial JSON documents are accepted.

use crate::foundation::core::Color;

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Scene-wide renderer settings.
pub struct VRayScene {
    pub exporter: ExporterSettings,
    pub options: SettingsOptions,
    pub output: SettingsOutput,
    pub image_sampler: SettingsImageSampler,
    pub dmc_sampler: SettingsDmcSampler,
    pub color_mapping: SettingsColorMapping,
    pub motion_blur: SettingsMotionBlur,
    pub environment: SettingsEnvironment,
    pub dr: DistributedRendering,
    pub rt_engine: RtEngine,
    pub render_channels_use: bool,
    pub render_channels: Vec<RenderChannel>,
    pub includer: Includer,
    pub effects: Effects,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Animation export mode.
pub enum AnimationType {
    /// One export and one renderer launch per frame.
    #[default]
    FrameByFrame,
    /// All frames into one interpolated file set.
    Full,
    /// Like `Full`, but geometry is only exported on the first frame.
    NotMeshes,
    /// Full first frame, camera only afterwards.
    Camera,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Change detection between animation frames.
pub enum CheckAnimated {
    /// Re-export every entity on every frame.
    None,
    #[default]
    Simple,
    Hash,
}

impl CheckAnimated {
    /// Code understood by the node exporter cache.
    pub fn code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Simple => 1,
            Self::Hash => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogWindowType {
    #[default]
    Default,
    Xterm,
    Gnome,
    Kde,
    Custom,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Exporter and renderer-launch behavior.
pub struct ExporterSettings {
    pub animation: bool,
    pub animation_type: AnimationType,
    pub check_animated: CheckAnimated,
    pub camera_loop: bool,
    /// Export geometry on still frames.
    pub auto_meshes: bool,
    pub mesh_export_threads: u32,
    pub draft: bool,
    pub debug: bool,
    pub use_still_motion_blur: bool,
    pub auto_save_render: bool,
    pub image_to_blender: bool,
    /// Show the renderer frame buffer.
    pub display: bool,
    pub display_srgb: bool,
    pub verbose_level: u8,
    pub autoclose: bool,
    pub log_window: bool,
    pub log_window_type: LogWindowType,
    /// Terminal command line used with [`LogWindowType::Custom`].
    pub log_window_term: String,
    /// Block until the renderer exits.
    pub wait: bool,
    /// Launch the renderer after export; otherwise only log the command line.
    pub autorun: bool,
    /// Frame number written by camera-loop export.
    pub custom_frame: i64,
    /// Directory receiving the `.vrscene` files. Empty means the system temp dir.
    pub output_dir: String,
    pub output_basename: String,
    /// Renderer binary; looked up on `VRAY_PATH` / `PATH` when empty.
    pub standalone_path: String,
}

impl Default for ExporterSettings {
    fn default() -> Self {
        Self {
            animation: false,
            animation_type: AnimationType::FrameByFrame,
            check_animated: CheckAnimated::Simple,
            camera_loop: false,
            auto_meshes: true,
            mesh_export_threads: 0,
            draft: false,
            debug: false,
            use_still_motion_blur: false,
            auto_save_render: false,
            image_to_blender: false,
            display: true,
            display_srgb: false,
            verbose_level: 3,
            autoclose: false,
            log_window: false,
            log_window_type: LogWindowType::Default,
            log_window_term: String::new(),
            wait: false,
            autorun: true,
            custom_frame: 0,
            output_dir: String::new(),
            output_basename: "scene".to_string(),
            standalone_path: String::new(),
        }
    }
}

impl ExporterSettings {
    /// Range export into one file set (`FULL` / `NOTMESHES`).
    pub fn is_range_animation(&self) -> bool {
        self.animation
            && matches!(
                self.animation_type,
                AnimationType::Full | AnimationType::NotMeshes
            )
    }

    pub fn is_frame_by_frame(&self) -> bool {
        self.animation && self.animation_type == AnimationType::FrameByFrame
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SettingsOptions {
    pub mtl_override_on: bool,
    /// Material name replacing every non-exempt material.
    pub mtl_override: String,
    pub light_do_hidden_lights: bool,
    pub misc_transfer_assets: bool,
    pub geom_do_hidden: bool,
    pub light_do_lights: bool,
    pub light_do_shadows: bool,
    pub mtl_reflection_refraction: bool,
    pub mtl_limit_depth: bool,
    pub mtl_max_depth: i32,
    pub mtl_do_maps: bool,
    pub mtl_filter_maps: bool,
    pub mtl_transp_max_levels: i32,
    pub mtl_transp_cutoff: f64,
    pub mtl_glossy: bool,
    pub gi_dont_render_image: bool,
    pub misc_low_thread_priority: bool,
    pub ray_bias: f64,
}

impl Default for SettingsOptions {
    fn default() -> Self {
        Self {
            mtl_override_on: false,
            mtl_override: String::new(),
            light_do_hidden_lights: false,
            misc_transfer_assets: false,
            geom_do_hidden: false,
            light_do_lights: true,
            light_do_shadows: true,
            mtl_reflection_refraction: true,
            mtl_limit_depth: false,
            mtl_max_depth: 5,
            mtl_do_maps: true,
            mtl_filter_maps: true,
            mtl_transp_max_levels: 50,
            mtl_transp_cutoff: 0.001,
            mtl_glossy: true,
            gi_dont_render_image: false,
            misc_low_thread_priority: false,
            ray_bias: 0.0,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SettingsOutput {
    pub img_dir: String,
    pub img_file: String,
    pub img_format: String,
    #[serde(rename = "img_noAlpha")]
    pub img_no_alpha: bool,
    #[serde(rename = "img_separateAlpha")]
    pub img_separate_alpha: bool,
    #[serde(rename = "relements_separateFolders")]
    pub relements_separate_folders: bool,
}

impl Default for SettingsOutput {
    fn default() -> Self {
        Self {
            img_dir: "//render/".to_string(),
            img_file: "render".to_string(),
            img_format: "png".to_string(),
            img_no_alpha: false,
            img_separate_alpha: false,
            relements_separate_folders: false,
        }
    }
}

impl SettingsOutput {
    /// File name the renderer writes, e.g. `render.png`.
    pub fn output_filename(&self) -> String {
        format!("{}.{}", self.img_file, self.img_format)
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SettingsImageSampler {
    #[serde(rename = "type")]
    pub kind: i32,
    pub fixed_subdivs: i32,
    #[serde(rename = "dmc_minSubdivs")]
    pub dmc_min_subdivs: i32,
    #[serde(rename = "dmc_maxSubdivs")]
    pub dmc_max_subdivs: i32,
    pub dmc_threshold: f64,
    #[serde(rename = "subdivision_minRate")]
    pub subdivision_min_rate: i32,
    #[serde(rename = "subdivision_maxRate")]
    pub subdivision_max_rate: i32,
}

impl Default for SettingsImageSampler {
    fn default() -> Self {
        Self {
            kind: 1,
            fixed_subdivs: 1,
            dmc_min_subdivs: 1,
            dmc_max_subdivs: 4,
            dmc_threshold: 0.01,
            subdivision_min_rate: -1,
            subdivision_max_rate: 2,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SettingsDmcSampler {
    pub adaptive_amount: f64,
    pub adaptive_threshold: f64,
    pub adaptive_min_samples: i32,
    pub subdivs_mult: f64,
    pub time_dependent: bool,
}

impl Default for SettingsDmcSampler {
    fn default() -> Self {
        Self {
            adaptive_amount: 0.85,
            adaptive_threshold: 0.01,
            adaptive_min_samples: 8,
            subdivs_mult: 1.0,
            time_dependent: false,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SettingsColorMapping {
    #[serde(rename = "type")]
    pub kind: i32,
    pub dark_mult: f64,
    pub bright_mult: f64,
    pub gamma: f64,
    pub clamp_output: bool,
    pub subpixel_mapping: bool,
    pub adaptation_only: bool,
    /// Color-mapping file included in preview renders when it exists.
    pub preview_file: String,
}

impl Default for SettingsColorMapping {
    fn default() -> Self {
        Self {
            kind: 0,
            dark_mult: 1.0,
            bright_mult: 1.0,
            gamma: 1.0,
            clamp_output: true,
            subpixel_mapping: false,
            adaptation_only: false,
            preview_file: String::new(),
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SettingsMotionBlur {
    pub on: bool,
    pub duration: f64,
    pub interval_center: f64,
    pub bias: f64,
    pub geom_samples: i32,
    pub low_samples: i32,
    pub subdivs: i32,
}

impl Default for SettingsMotionBlur {
    fn default() -> Self {
        Self {
            on: false,
            duration: 1.0,
            interval_center: 0.5,
            bias: 0.0,
            geom_samples: 2,
            low_samples: 1,
            subdivs: 1,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SettingsEnvironment {
    pub bg_color: Color,
    pub gi_color: Color,
    pub reflect_color: Color,
    pub refract_color: Color,
    /// Texture names overriding the constant colors.
    pub bg_tex: String,
    pub gi_tex: String,
    pub reflect_tex: String,
    pub refract_tex: String,
}

impl Default for SettingsEnvironment {
    fn default() -> Self {
        Self {
            bg_color: Color::BLACK,
            gi_color: Color::BLACK,
            reflect_color: Color::BLACK,
            refract_color: Color::BLACK,
            bg_tex: String::new(),
            gi_tex: String::new(),
            reflect_tex: String::new(),
            refract_tex: String::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Share flavor for distributed rendering.
pub enum DrShareType {
    /// Windows network share (`//HOST/share`).
    #[default]
    Ww,
    /// Mounted directory.
    Nfs,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DrNode {
    pub name: String,
    pub address: String,
    #[serde(rename = "use")]
    pub enabled: bool,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Distributed rendering.
pub struct DistributedRendering {
    pub on: bool,
    #[serde(rename = "type")]
    pub share_type: DrShareType,
    pub share_name: String,
    /// Host name used in `WW` share paths.
    pub host_name: String,
    /// Sub directory of the share holding exported files.
    pub sub_dir: String,
    /// Local shared directory passed as `-include`.
    pub shared_dir: String,
    /// Mount prefix used for non-`WW` shares.
    pub prefix: String,
    pub port: u32,
    pub render_only_on_nodes: bool,
    /// `"0"` uses the shared directory; any other value is passed as `-transferAssets`.
    pub transfer_assets: String,
    pub nodes: Vec<DrNode>,
}

impl Default for DistributedRendering {
    fn default() -> Self {
        Self {
            on: false,
            share_type: DrShareType::Ww,
            share_name: "VRAYDR".to_string(),
            host_name: "localhost".to_string(),
            sub_dir: String::new(),
            shared_dir: String::new(),
            prefix: String::new(),
            port: 20204,
            render_only_on_nodes: false,
            transfer_assets: "0".to_string(),
            nodes: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RtDevice {
    #[default]
    Cpu,
    OpenclSingle,
    OpenclMulti,
    CudaSingle,
}

impl RtDevice {
    pub fn code(self) -> i32 {
        match self {
            Self::Cpu => 1,
            Self::OpenclSingle => 3,
            Self::OpenclMulti => 4,
            Self::CudaSingle => 5,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Interactive (RT) engine.
pub struct RtEngine {
    pub enabled: bool,
    pub device: RtDevice,
    pub rt_timeout: f64,
    pub rt_noise: f64,
    pub rt_sample_level: i32,
}

impl Default for RtEngine {
    fn default() -> Self {
        Self {
            enabled: false,
            device: RtDevice::Cpu,
            rt_timeout: 0.0,
            rt_noise: 0.001,
            rt_sample_level: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LightSelectType {
    #[default]
    Raw,
    Diffuse,
    Specular,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
/// Render channel payload.
pub enum RenderChannelKind {
    /// Isolates the contribution of the listed lamp objects.
    Lightselect {
        #[serde(default)]
        lights: Vec<String>,
        #[serde(default)]
        light_select_type: LightSelectType,
    },
    /// Built-in color channel selected by alias code.
    Color {
        #[serde(default)]
        alias: i32,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RenderChannel {
    pub name: String,
    #[serde(rename = "use", default = "crate::scene::model::default_true")]
    pub enabled: bool,
    #[serde(flatten)]
    pub kind: RenderChannelKind,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct IncludeNode {
    pub name: String,
    #[serde(rename = "use")]
    pub enabled: bool,
    pub scene: String,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Additional user `.vrscene` files appended to the scene stream.
pub struct Includer {
    #[serde(rename = "use")]
    pub enabled: bool,
    pub nodes: Vec<IncludeNode>,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FogEffect {
    #[serde(rename = "use")]
    pub enabled: bool,
    pub objects: Vec<String>,
    pub groups: Vec<String>,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Volumetric effects; fog volumes are excluded from node export.
pub struct Effects {
    #[serde(rename = "use")]
    pub enabled: bool,
    pub fog: Vec<FogEffect>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OmniType {
    #[default]
    Omni,
    Ambient,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpotType {
    #[default]
    Spot,
    Ies,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectType {
    #[default]
    Direct,
    Sun,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorType {
    #[default]
    Rgb,
    Temperature,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Photometric units of a light's intensity.
pub enum LightUnits {
    #[default]
    Default,
    Lumens,
    Lumm,
    Wattsm,
    Watm,
}

impl LightUnits {
    pub fn code(self) -> i32 {
        match self {
            Self::Default => 0,
            Self::Lumens => 1,
            Self::Lumm => 2,
            Self::Wattsm => 3,
            Self::Watm => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LightPortal {
    #[default]
    Normal,
    Portal,
    Sportal,
}

impl LightPortal {
    pub fn code(self) -> i32 {
        match self {
            Self::Normal => 0,
            Self::Portal => 1,
            Self::Sportal => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkyModel {
    #[default]
    Preeth,
    Cieclear,
    Cieover,
}

impl SkyModel {
    pub fn code(self) -> i32 {
        match self {
            Self::Preeth => 0,
            Self::Cieclear => 1,
            Self::Cieover => 2,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Light parameters. Serialized names follow the renderer parameter names where they are
/// written verbatim.
pub struct VRayLamp {
    pub omni_type: OmniType,
    pub spot_type: SpotType,
    pub direct_type: DirectType,
    pub color_type: ColorType,
    pub temperature: f64,
    pub units: LightUnits,

    pub enabled: bool,
    pub shadows: bool,
    #[serde(rename = "shadowColor")]
    pub shadow_color: Color,
    #[serde(rename = "shadowBias")]
    pub shadow_bias: f64,
    #[serde(rename = "shadowRadius")]
    pub shadow_radius: f64,
    #[serde(rename = "shadowShape")]
    pub shadow_shape: i32,
    #[serde(rename = "causticSubdivs")]
    pub caustic_subdivs: i32,
    #[serde(rename = "causticMult")]
    pub caustic_mult: f64,
    #[serde(rename = "cutoffThreshold")]
    pub cutoff_threshold: f64,
    #[serde(rename = "affectDiffuse")]
    pub affect_diffuse: bool,
    #[serde(rename = "affectSpecular")]
    pub affect_specular: bool,
    #[serde(rename = "affectReflections")]
    pub affect_reflections: bool,
    pub bumped_below_surface_check: bool,
    pub nsamples: i32,
    pub diffuse_contribution: f64,
    pub specular_contribution: f64,
    pub intensity: f64,
    #[serde(rename = "areaSpeculars")]
    pub area_speculars: bool,
    pub subdivs: i32,
    pub decay: f64,
    #[serde(rename = "storeWithIrradianceMap")]
    pub store_with_irradiance_map: bool,
    pub invisible: bool,
    #[serde(rename = "noDecay")]
    pub no_decay: bool,
    #[serde(rename = "doubleSided")]
    pub double_sided: bool,
    #[serde(rename = "ambientShade")]
    pub ambient_shade: f64,
    /// Sphere radius; a point light with radius > 0 becomes a sphere light.
    pub radius: f64,
    pub sphere_segments: i32,
    pub fallsize: f64,
    #[serde(rename = "lightPortal")]
    pub light_portal: LightPortal,

    pub sky_model: SkyModel,
    pub turbidity: f64,
    pub ozone: f64,
    pub water_vapour: f64,
    pub intensity_multiplier: f64,
    pub size_multiplier: f64,
    pub horiz_illum: f64,

    pub ies_file: String,
    pub soft_shadows: i32,
    pub ies_light_shape: i32,
    pub ies_light_shape_lock: bool,
    pub ies_light_width: f64,
    pub ies_light_length: f64,
    pub ies_light_height: f64,
    pub ies_light_diameter: f64,

    #[serde(rename = "dome_targetRadius")]
    pub dome_target_radius: f64,
    #[serde(rename = "dome_emitRadius")]
    pub dome_emit_radius: f64,
    pub dome_spherical: bool,
    #[serde(rename = "dome_rayDistance")]
    pub dome_ray_distance: f64,
    #[serde(rename = "dome_rayDistanceMode")]
    pub dome_ray_distance_mode: bool,

    pub use_include_exclude: bool,
    pub use_include: bool,
    pub include_objects: Vec<String>,
    pub include_groups: Vec<String>,
    pub use_exclude: bool,
    pub exclude_objects: Vec<String>,
    pub exclude_groups: Vec<String>,
}

impl Default for VRayLamp {
    fn default() -> Self {
        Self {
            omni_type: OmniType::Omni,
            spot_type: SpotType::Spot,
            direct_type: DirectType::Direct,
            color_type: ColorType::Rgb,
            temperature: 5000.0,
            units: LightUnits::Default,
            enabled: true,
            shadows: true,
            shadow_color: Color::BLACK,
            shadow_bias: 0.0,
            shadow_radius: 0.0,
            shadow_shape: 0,
            caustic_subdivs: 1000,
            caustic_mult: 1.0,
            cutoff_threshold: 0.001,
            affect_diffuse: true,
            affect_specular: true,
            affect_reflections: true,
            bumped_below_surface_check: false,
            nsamples: 0,
            diffuse_contribution: 1.0,
            specular_contribution: 1.0,
            intensity: 30.0,
            area_speculars: false,
            subdivs: 8,
            decay: 2.0,
            store_with_irradiance_map: false,
            invisible: false,
            no_decay: false,
            double_sided: false,
            ambient_shade: 1.0,
            radius: 0.0,
            sphere_segments: 20,
            fallsize: 100.0,
            light_portal: LightPortal::Normal,
            sky_model: SkyModel::Preeth,
            turbidity: 3.0,
            ozone: 0.35,
            water_vapour: 2.0,
            intensity_multiplier: 1.0,
            size_multiplier: 1.0,
            horiz_illum: 25000.0,
            ies_file: String::new(),
            soft_shadows: 1,
            ies_light_shape: 0,
            ies_light_shape_lock: false,
            ies_light_width: 0.0,
            ies_light_length: 0.0,
            ies_light_height: 0.0,
            ies_light_diameter: 0.0,
            dome_target_radius: 100.0,
            dome_emit_radius: 150.0,
            dome_spherical: false,
            dome_ray_distance: 100_000.0,
            dome_ray_distance_mode: false,
            use_include_exclude: false,
            use_include: false,
            include_objects: Vec::new(),
            include_groups: Vec::new(),
            use_exclude: false,
            exclude_objects: Vec::new(),
            exclude_groups: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Physical camera.
pub struct CameraPhysical {
    #[serde(rename = "use")]
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: i32,
    pub film_width: f64,
    pub focal_length: f64,
    pub f_number: f64,
    pub shutter_speed: f64,
    #[serde(rename = "ISO")]
    pub iso: f64,
    pub white_balance: Color,
    pub vignetting: f64,
    pub exposure: bool,
    pub use_dof: bool,
    pub use_moblur: bool,
    pub subdivs: i32,
}

impl Default for CameraPhysical {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: 0,
            film_width: 36.0,
            focal_length: 40.0,
            f_number: 8.0,
            shutter_speed: 300.0,
            iso: 200.0,
            white_balance: Color::WHITE,
            vignetting: 1.0,
            exposure: true,
            use_dof: false,
            use_moblur: false,
            subdivs: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TranslucencyControl {
    #[default]
    Slider,
    Color,
    Texture,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Mtl2Sided {
    #[serde(rename = "use")]
    pub enabled: bool,
    /// Back-side material name; the front material when empty.
    pub back: String,
    pub control: TranslucencyControl,
    pub translucency_slider: f64,
    pub translucency_color: Color,
    pub translucency_tex: String,
    pub translucency_tex_mult: f64,
    pub force_1sided: bool,
}

impl Default for Mtl2Sided {
    fn default() -> Self {
        Self {
            enabled: false,
            back: String::new(),
            control: TranslucencyControl::Slider,
            translucency_slider: 0.5,
            translucency_color: Color::gray(0.5),
            translucency_tex: String::new(),
            translucency_tex_mult: 1.0,
            force_1sided: false,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MtlWrapper {
    #[serde(rename = "use")]
    pub enabled: bool,
    pub generate_gi: f64,
    pub receive_gi: f64,
    pub generate_caustics: f64,
    pub receive_caustics: f64,
    pub alpha_contribution: f64,
    pub matte_surface: bool,
    pub shadows: bool,
    pub affect_alpha: bool,
    pub shadow_tint_color: Color,
    pub shadow_brightness: f64,
    pub reflection_amount: f64,
    pub refraction_amount: f64,
    pub gi_amount: f64,
    pub no_gi_on_other_mattes: bool,
    pub gi_surface_id: i32,
}

impl Default for MtlWrapper {
    fn default() -> Self {
        Self {
            enabled: false,
            generate_gi: 1.0,
            receive_gi: 1.0,
            generate_caustics: 1.0,
            receive_caustics: 1.0,
            alpha_contribution: 1.0,
            matte_surface: false,
            shadows: false,
            affect_alpha: false,
            shadow_tint_color: Color::BLACK,
            shadow_brightness: 1.0,
            reflection_amount: 1.0,
            refraction_amount: 1.0,
            gi_amount: 1.0,
            no_gi_on_other_mattes: true,
            gi_surface_id: 0,
        }
    }
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MtlOverride {
    #[serde(rename = "use")]
    pub enabled: bool,
    pub gi_mtl: String,
    pub reflect_mtl: String,
    pub refract_mtl: String,
    pub shadow_mtl: String,
    /// Texture name.
    pub environment_override: String,
    pub environment_priority: i32,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MtlRenderStats {
    #[serde(rename = "use")]
    pub enabled: bool,
    pub camera_visibility: bool,
    pub reflections_visibility: bool,
    pub refractions_visibility: bool,
    pub gi_visibility: bool,
    pub shadows_visibility: bool,
    pub visibility: bool,
}

impl Default for MtlRenderStats {
    fn default() -> Self {
        Self {
            enabled: false,
            camera_visibility: true,
            reflections_visibility: true,
            refractions_visibility: true,
            gi_visibility: true,
            shadows_visibility: true,
            visibility: true,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Cartoon outline volume effect.
pub struct VolumeVRayToon {
    #[serde(rename = "use")]
    pub enabled: bool,
    #[serde(rename = "lineColor")]
    pub line_color: Color,
    #[serde(rename = "widthType")]
    pub width_type: i32,
    #[serde(rename = "lineWidth")]
    pub line_width: f64,
    pub opacity: f64,
    #[serde(rename = "normalThreshold")]
    pub normal_threshold: f64,
    #[serde(rename = "overlapThreshold")]
    pub overlap_threshold: f64,
    #[serde(rename = "hideInnerEdges")]
    pub hide_inner_edges: bool,
    #[serde(rename = "traceBias")]
    pub trace_bias: f64,
}

impl Default for VolumeVRayToon {
    fn default() -> Self {
        Self {
            enabled: false,
            line_color: Color::BLACK,
            width_type: 0,
            line_width: 1.5,
            opacity: 1.0,
            normal_threshold: 0.7,
            overlap_threshold: 0.95,
            hide_inner_edges: false,
            trace_bias: 0.2,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BrdfVRayMtl {
    pub reflect_color: Color,
    pub reflect_glossiness: f64,
    pub hilight_glossiness: f64,
    pub hilight_glossiness_lock: bool,
    pub fresnel: bool,
    pub fresnel_ior: f64,
    pub reflect_subdivs: i32,
    pub reflect_trace: bool,
    pub reflect_depth: i32,
    pub refract_color: Color,
    pub refract_ior: f64,
    pub refract_glossiness: f64,
    pub refract_subdivs: i32,
    pub refract_depth: i32,
    pub fog_color: Color,
    pub fog_mult: f64,
    pub brdf_type: i32,
    pub anisotropy: f64,
    pub dispersion_on: bool,
}

impl Default for BrdfVRayMtl {
    fn default() -> Self {
        Self {
            reflect_color: Color::BLACK,
            reflect_glossiness: 1.0,
            hilight_glossiness: 1.0,
            hilight_glossiness_lock: true,
            fresnel: false,
            fresnel_ior: 1.6,
            reflect_subdivs: 8,
            reflect_trace: true,
            reflect_depth: 5,
            refract_color: Color::BLACK,
            refract_ior: 1.6,
            refract_glossiness: 1.0,
            refract_subdivs: 8,
            refract_depth: 5,
            fog_color: Color::WHITE,
            fog_mult: 1.0,
            brdf_type: 1,
            anisotropy: 0.0,
            dispersion_on: false,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BrdfLight {
    #[serde(rename = "emitOnBackSide")]
    pub emit_on_back_side: bool,
    #[serde(rename = "compensateExposure")]
    pub compensate_exposure: bool,
    #[serde(rename = "doubleSided")]
    pub double_sided: bool,
    pub intensity: f64,
}

impl Default for BrdfLight {
    fn default() -> Self {
        Self {
            emit_on_back_side: false,
            compensate_exposure: false,
            double_sided: false,
            intensity: 1.0,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BrdfSss2Complex {
    pub prepass_rate: i32,
    pub interpolation_accuracy: f64,
    pub scale: f64,
    pub ior: f64,
    pub overall_color: Color,
    pub sub_surface_color: Color,
    pub scatter_radius: Color,
    pub scatter_radius_mult: f64,
    pub phase_function: f64,
    pub specular_color: Color,
    pub specular_amount: f64,
    pub specular_glossiness: f64,
    pub specular_subdivs: i32,
    pub single_scatter: i32,
    pub subdivs: i32,
}

impl Default for BrdfSss2Complex {
    fn default() -> Self {
        Self {
            prepass_rate: -1,
            interpolation_accuracy: 1.0,
            scale: 1.0,
            ior: 1.5,
            overall_color: Color::WHITE,
            sub_surface_color: Color::WHITE,
            scatter_radius: Color(0.92, 0.52, 0.175),
            scatter_radius_mult: 1.0,
            phase_function: 0.0,
            specular_color: Color::WHITE,
            specular_amount: 1.0,
            specular_glossiness: 0.6,
            specular_subdivs: 8,
            single_scatter: 1,
            subdivs: 8,
        }
    }
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Material loaded from a `.vrmat` file.
pub struct MtlVRmat {
    pub filename: String,
    pub mtlname: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Material wrapper and BRDF settings.
pub struct VRayMaterial {
    /// Base BRDF kind tag.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Exempt from the global material override.
    pub dont_override: bool,
    pub vray_mtl: BrdfVRayMtl,
    pub light: BrdfLight,
    pub sss2_complex: BrdfSss2Complex,
    pub vrmat: MtlVRmat,
    pub two_sided: Mtl2Sided,
    pub wrapper: MtlWrapper,
    #[serde(rename = "override")]
    pub override_: MtlOverride,
    pub render_stats: MtlRenderStats,
    pub round_edges: bool,
    pub radius: f64,
    pub material_id_number: u32,
    pub material_id_color: Color,
    pub toon: VolumeVRayToon,
}

impl Default for VRayMaterial {
    fn default() -> Self {
        Self {
            kind: Some("BRDFVRayMtl".to_string()),
            dont_override: false,
            vray_mtl: BrdfVRayMtl::default(),
            light: BrdfLight::default(),
            sss2_complex: BrdfSss2Complex::default(),
            vrmat: MtlVRmat::default(),
            two_sided: Mtl2Sided::default(),
            wrapper: MtlWrapper::default(),
            override_: MtlOverride::default(),
            render_stats: MtlRenderStats::default(),
            round_edges: false,
            radius: 0.0,
            material_id_number: 0,
            material_id_color: Color::WHITE,
            toon: VolumeVRayToon::default(),
        }
    }
}
