//! Export-and-run entry points.
//!
//! [`export_and_run`] performs one export into a file set and launches the renderer on it;
//! [`render`] drives it once or per frame depending on the animation settings.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::export::native::NodeExporter;
use crate::export::session::{ExportOutcome, ExportSession};
use crate::export::streams::{Category, FileStreams, OutputStreams, stream_file_name};
use crate::foundation::cancel::CancelToken;
use crate::foundation::core::FrameNumber;
use crate::foundation::error::{ExportError, ExportResult};
use crate::process::command::{RenderJob, RendererCommand, StandaloneLocator};
use crate::process::driver::{LaunchMode, RendererDriver, RunOutcome};
use crate::scene::entity::FrameHost;
use crate::scene::model::Scene;
use crate::scene::settings::AnimationType;

#[derive(Clone, Debug, Default)]
/// Per-invocation overrides of the scene's exporter settings.
pub struct PipelineOptions {
    /// Replaces `exporter.output_dir`.
    pub out_dir: Option<PathBuf>,
    /// Replaces `exporter.standalone_path`.
    pub standalone: Option<PathBuf>,
    pub preview: bool,
    /// Launch the renderer after a completed export.
    pub run: bool,
    /// No interactive host is attached.
    pub background: bool,
}

/// Result of one export (and launch).
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineReport {
    pub outcome: ExportOutcome,
    /// Main `.vrscene` file of the export.
    pub scene_file: PathBuf,
    /// `None` when the renderer was not launched.
    pub run: Option<RunOutcome>,
}

/// Directory receiving the exported files; the system temp dir when unset.
pub fn output_dir(scene: &Scene, opts: &PipelineOptions) -> PathBuf {
    if let Some(dir) = &opts.out_dir {
        return dir.clone();
    }
    let dir = &scene.vray.exporter.output_dir;
    if dir.is_empty() {
        std::env::temp_dir()
    } else {
        PathBuf::from(dir)
    }
}

/// Export into `streams`, closing them whatever happens.
///
/// Errors from the export are logged and returned; a close failure is only returned when the
/// export itself succeeded.
pub fn export_to_streams(
    host: &mut dyn FrameHost,
    streams: &mut dyn OutputStreams,
    nodes: &mut dyn NodeExporter,
    preview: bool,
    cancel: CancelToken,
) -> ExportResult<(ExportOutcome, usize)> {
    let mut session = ExportSession::new(streams, nodes, cancel);
    session.set_preview(preview);
    let res = session.export(host);
    let cameras = session.context().cameras.len();
    let closed = session.close();

    match (res, closed) {
        (Err(e), closed) => {
            tracing::error!(error = %e, "export failed");
            if let Err(close_err) = closed {
                tracing::warn!(error = %close_err, "closing streams after a failed export");
            }
            Err(e)
        }
        (Ok(_), Err(e)) => {
            tracing::error!(error = %e, "closing streams failed");
            Err(e)
        }
        (Ok(outcome), Ok(())) => Ok((outcome, cameras)),
    }
}

/// Export the scene into a file set and launch the renderer on it.
#[tracing::instrument(skip_all, fields(scene = %scene.name, frame = scene.frame_current))]
pub fn export_and_run(
    scene: &mut Scene,
    nodes: &mut dyn NodeExporter,
    opts: &PipelineOptions,
    cancel: CancelToken,
) -> ExportResult<PipelineReport> {
    let dir = output_dir(scene, opts);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create output directory '{}'", dir.display()))?;
    let base = scene.vray.exporter.output_basename.clone();
    let scene_file = dir.join(stream_file_name(&base, Category::Scene));

    let mut streams = FileStreams::create(&dir, &base)?;
    let (outcome, cameras) =
        export_to_streams(scene, &mut streams, nodes, opts.preview, cancel.clone())?;

    let mut report = PipelineReport {
        outcome,
        scene_file,
        run: None,
    };
    if outcome.is_cancelled() || !opts.run {
        return Ok(report);
    }

    let job = RenderJob {
        scene_file: report.scene_file.clone(),
        preview: opts.preview,
        camera_count: cameras,
        background: opts.background,
    };
    report.run = Some(run_renderer(scene, &job, opts.standalone.as_deref(), cancel)?);
    Ok(report)
}

/// Locate the renderer, build its command line and launch it.
pub fn run_renderer(
    scene: &Scene,
    job: &RenderJob,
    standalone: Option<&Path>,
    cancel: CancelToken,
) -> ExportResult<RunOutcome> {
    let locator = match standalone {
        Some(p) => StandaloneLocator::new(Some(p.to_path_buf())),
        None => StandaloneLocator::from_settings(&scene.vray.exporter),
    };
    let binary = locator.locate()?;
    let cmd = RendererCommand::build(&binary, scene, job);
    RendererDriver::new(cancel).run(&cmd, LaunchMode::select(scene, job))
}

/// Render the scene: per frame for frame-by-frame animation, as two-frame ranges for still
/// motion blur, otherwise once.
pub fn render(
    scene: &mut Scene,
    nodes: &mut dyn NodeExporter,
    opts: &PipelineOptions,
    cancel: CancelToken,
) -> ExportResult<Vec<PipelineReport>> {
    let ex = scene.vray.exporter.clone();

    if ex.use_still_motion_blur {
        if ex.animation && ex.animation_type != AnimationType::FrameByFrame {
            return Err(ExportError::validation(
                "\"Still Motion Blur\" feature works only in \"Frame By Frame\" animation mode!",
            ));
        }
        let frames: Vec<FrameNumber> = if ex.animation {
            scene.frame_range()?.frames().collect()
        } else {
            vec![scene.current_frame()]
        };
        let saved = (scene.frame_start, scene.frame_end);
        scene.vray.exporter.animation = true;
        scene.vray.exporter.animation_type = AnimationType::Full;

        let res = export_frames(&frames, &cancel, |f| {
            scene.frame_start = f.0 - 1;
            scene.frame_end = f.0;
            export_and_run(scene, nodes, opts, cancel.clone())
        });

        scene.vray.exporter.animation = ex.animation;
        scene.vray.exporter.animation_type = ex.animation_type;
        (scene.frame_start, scene.frame_end) = saved;
        return res;
    }

    if ex.is_frame_by_frame() {
        let frames: Vec<FrameNumber> = scene.frame_range()?.frames().collect();
        let selected = scene.current_frame();
        let res = export_frames(&frames, &cancel, |f| {
            scene.set_frame(f);
            export_and_run(scene, nodes, opts, cancel.clone())
        });
        scene.set_frame(selected);
        return res;
    }

    Ok(vec![export_and_run(scene, nodes, opts, cancel)?])
}

fn export_frames(
    frames: &[FrameNumber],
    cancel: &CancelToken,
    mut each: impl FnMut(FrameNumber) -> ExportResult<PipelineReport>,
) -> ExportResult<Vec<PipelineReport>> {
    let mut reports = Vec::with_capacity(frames.len());
    for &f in frames {
        if cancel.is_cancelled() {
            tracing::info!(frame = f.0, "render cancelled");
            break;
        }
        reports.push(each(f)?);
    }
    Ok(reports)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
