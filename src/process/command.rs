use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::foundation::error::{ExportError, ExportResult};
use crate::scene::model::Scene;
use crate::scene::settings::{AnimationType, ExporterSettings, LogWindowType};

#[cfg(windows)]
const STANDALONE_BINARY: &str = "vray.exe";
#[cfg(not(windows))]
const STANDALONE_BINARY: &str = "vray";

/// Finds the renderer binary: explicit path, then `VRAY_PATH`, then `PATH`.
#[derive(Clone, Debug, Default)]
pub struct StandaloneLocator {
    explicit: Option<PathBuf>,
}

impl StandaloneLocator {
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    pub fn from_settings(ex: &ExporterSettings) -> Self {
        let explicit = (!ex.standalone_path.is_empty()).then(|| PathBuf::from(&ex.standalone_path));
        Self::new(explicit)
    }

    pub fn locate(&self) -> ExportResult<PathBuf> {
        self.locate_in(std::env::var_os("VRAY_PATH"), std::env::var_os("PATH"))
    }

    /// `VRAY_PATH` may name the binary itself or a directory holding it.
    pub fn locate_in(
        &self,
        vray_path: Option<OsString>,
        path: Option<OsString>,
    ) -> ExportResult<PathBuf> {
        if let Some(p) = &self.explicit {
            if p.is_file() {
                return Ok(p.clone());
            }
            return Err(ExportError::resource(format!(
                "V-Ray Standalone not found at '{}'",
                p.display()
            )));
        }

        if let Some(v) = vray_path.filter(|v| !v.is_empty()) {
            let p = PathBuf::from(v);
            if p.is_file() {
                return Ok(p);
            }
            let candidate = p.join(STANDALONE_BINARY);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }

        if let Some(path) = path {
            for dir in std::env::split_paths(&path) {
                let candidate = dir.join(STANDALONE_BINARY);
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }
        }

        Err(ExportError::resource("V-Ray Standalone not found!"))
    }
}

/// What was exported and how the renderer should treat it.
#[derive(Clone, Debug)]
pub struct RenderJob {
    /// Main `.vrscene` file.
    pub scene_file: PathBuf,
    pub preview: bool,
    /// Cameras written by a camera-loop export.
    pub camera_count: usize,
    /// No interactive host: disable the frame buffer and exit on render end.
    pub background: bool,
}

impl RenderJob {
    pub fn new(scene_file: impl Into<PathBuf>) -> Self {
        Self {
            scene_file: scene_file.into(),
            preview: false,
            camera_count: 0,
            background: false,
        }
    }
}

/// Image written by preview renders.
pub fn preview_image_path() -> PathBuf {
    std::env::temp_dir().join("preview.jpg")
}

/// Renderer program plus arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RendererCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl RendererCommand {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Assemble the command line for `job`.
    ///
    /// On Linux the command is wrapped in a terminal when a log window is requested.
    pub fn build(binary: &Path, scene: &Scene, job: &RenderJob) -> Self {
        let cmd = Self::new(binary, renderer_args(scene, job));
        if cfg!(target_os = "linux") && scene.vray.exporter.log_window {
            cmd.in_log_window(&scene.vray.exporter)
        } else {
            cmd
        }
    }

    /// Run the renderer inside a terminal window.
    pub fn in_log_window(self, ex: &ExporterSettings) -> Self {
        let inner: Vec<String> = std::iter::once(self.program.display().to_string())
            .chain(self.args)
            .collect();
        let mut args: Vec<String> = Vec::new();
        let program = match ex.log_window_type {
            LogWindowType::Default | LogWindowType::Xterm => {
                args.extend(["-T", "VRAYSTANDALONE", "-geometry", "90x10", "-e"].map(String::from));
                args.extend(inner);
                "xterm".to_string()
            }
            LogWindowType::Gnome => {
                args.extend(["-x", "sh", "-c"].map(String::from));
                args.push(inner.join(" "));
                "gnome-terminal".to_string()
            }
            LogWindowType::Kde | LogWindowType::Custom => {
                let term = if ex.log_window_type == LogWindowType::Kde {
                    "konsole"
                } else {
                    ex.log_window_term.as_str()
                };
                let mut words = term.split_whitespace().map(String::from);
                let program = words.next().unwrap_or_else(|| "xterm".to_string());
                args.extend(words);
                args.push("-e".to_string());
                args.extend(inner);
                program
            }
        };
        Self::new(program, args)
    }

    pub fn to_command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Space-joined command line, for logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn flag(name: &str, value: impl std::fmt::Display) -> String {
    format!("-{name}={value}")
}

fn renderer_args(scene: &Scene, job: &RenderJob) -> Vec<String> {
    let v = &scene.vray;
    let ex = &v.exporter;
    let render = &scene.render;
    let mut args = vec![flag("sceneFile", job.scene_file.display())];

    if !render.threads_auto {
        args.push(flag("numThreads", render.threads));
    }

    let image_to_host = ex.auto_save_render && ex.image_to_blender && !job.preview;

    if job.preview {
        args.push(flag("imgFile", preview_image_path().display()));
        args.push(flag("showProgress", 0));
        args.push(flag("display", 0));
        args.push(flag("autoclose", 1));
        args.push(flag("verboseLevel", 0));
    } else {
        let rt = &v.rt_engine;
        if rt.enabled {
            args.push(flag("rtEngine", rt.device.code()));
            args.push(flag("rtTimeOut", format!("{:.3}", rt.rt_timeout)));
            args.push(flag("rtNoise", format!("{:.3}", rt.rt_noise)));
            args.push(flag("rtSampleLevel", rt.rt_sample_level));
        }

        args.push(flag("display", i32::from(ex.display)));
        args.push(flag("verboseLevel", ex.verbose_level));

        if render.use_border {
            let (w, h) = render.output_size();
            let (w, h) = (f64::from(w), f64::from(h));
            let x0 = (w * render.border_min_x) as i64;
            let y0 = (h * (1.0 - render.border_max_y)) as i64;
            let x1 = (w * render.border_max_x) as i64;
            let y1 = (h * (1.0 - render.border_min_y)) as i64;
            let region = if render.use_crop_to_border { "crop" } else { "region" };
            args.push(flag(region, format!("{x0};{y0};{x1};{y1}")));
        }

        if let Some(frames) = frames_arg(scene, job) {
            args.push(flag("frames", frames));
        }

        let dr = &v.dr;
        if dr.on && !dr.nodes.is_empty() {
            args.push(flag("distributed", if dr.render_only_on_nodes { 2 } else { 1 }));
            args.push(flag("portNumber", dr.port));
            let hosts: Vec<&str> = dr
                .nodes
                .iter()
                .filter(|n| n.enabled)
                .map(|n| n.address.as_str())
                .collect();
            args.push(flag("renderhost", hosts.join(";")));
            if dr.transfer_assets == "0" {
                let sep = std::path::MAIN_SEPARATOR;
                args.push(flag("include", format!("{}{sep}", dr.shared_dir)));
            } else {
                args.push(flag("transferAssets", &dr.transfer_assets));
            }
        }

        if image_to_host {
            let image = Path::new(&v.output.img_dir).join(v.output.output_filename());
            args.push(flag("imgFile", image.display()));
            args.push(flag("autoclose", 1));
        }
    }

    let blocking_animation = ex.animation
        && (ex.animation_type == AnimationType::FrameByFrame
            || (ex.animation_type == AnimationType::Full && ex.use_still_motion_blur));
    if ex.autoclose || blocking_animation {
        args.push(flag("autoclose", 1));
    }

    args.push(flag("displaySRGB", if ex.display_srgb { 1 } else { 2 }));

    if job.background {
        args.push(flag("display", 0));
        args.push(flag("autoclose", 1));
    }
    args
}

/// `-frames` value: the last frame for still motion blur, the range for animations, one frame
/// per camera for camera loops, the current frame otherwise.
fn frames_arg(scene: &Scene, job: &RenderJob) -> Option<String> {
    let ex = &scene.vray.exporter;
    if ex.use_still_motion_blur {
        return Some(scene.frame_end.to_string());
    }
    if ex.animation {
        return Some(match ex.animation_type {
            AnimationType::FrameByFrame => scene.frame_current.to_string(),
            _ => format!("{}-{},{}", scene.frame_start, scene.frame_end, scene.frame_step),
        });
    }
    if ex.camera_loop {
        return (job.camera_count > 0).then(|| format!("1-{},1", job.camera_count));
    }
    Some(scene.frame_current.to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/process/command.rs"]
mod tests;
