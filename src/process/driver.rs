use std::io::Read as _;
use std::process::{Child, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::foundation::cancel::CancelToken;
use crate::foundation::error::{ExportError, ExportResult};
use crate::process::command::{RenderJob, RendererCommand};
use crate::scene::model::Scene;
use crate::scene::settings::AnimationType;

/// Interval between exit checks of a monitored renderer.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How the renderer is launched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaunchMode {
    /// Run to completion; a failing exit status is an error.
    Wait,
    /// Spawn. When `monitor` is set, poll for exit and kill the renderer on cancellation;
    /// otherwise leave it running.
    Autorun { monitor: bool },
    /// Only log the command line.
    PrintOnly,
}

impl LaunchMode {
    pub fn select(scene: &Scene, job: &RenderJob) -> Self {
        let ex = &scene.vray.exporter;
        if job.background || ex.wait {
            return Self::Wait;
        }
        if !ex.autorun {
            return Self::PrintOnly;
        }
        let per_frame = ex.animation
            && (ex.animation_type == AnimationType::FrameByFrame
                || (ex.animation_type == AnimationType::Full && ex.use_still_motion_blur));
        let image_to_host = ex.auto_save_render && ex.image_to_blender;
        Self::Autorun {
            monitor: per_frame || ((job.preview || image_to_host) && !scene.render.use_border),
        }
    }
}

/// How a launch ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Command line that would have been run.
    Printed(String),
    /// The renderer exited successfully.
    Completed,
    /// The renderer keeps running on its own.
    Detached,
    /// Killed after cancellation.
    Killed,
}

/// Launches the renderer and watches it according to a [`LaunchMode`].
#[derive(Clone, Debug)]
pub struct RendererDriver {
    cancel: CancelToken,
    poll_interval: Duration,
}

impl RendererDriver {
    pub fn new(cancel: CancelToken) -> Self {
        Self {
            cancel,
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[tracing::instrument(skip(self, cmd), fields(program = %cmd.program.display()))]
    pub fn run(&self, cmd: &RendererCommand, mode: LaunchMode) -> ExportResult<RunOutcome> {
        let line = cmd.command_line();
        match mode {
            LaunchMode::PrintOnly => {
                tracing::info!(command = %line, "renderer not started");
                Ok(RunOutcome::Printed(line))
            }
            LaunchMode::Wait => {
                tracing::info!(command = %line, "running renderer");
                self.run_to_completion(cmd)
            }
            LaunchMode::Autorun { monitor } => {
                tracing::info!(command = %line, monitor, "starting renderer");
                let child = spawn(cmd.to_command().stdin(Stdio::null()))?;
                if monitor {
                    self.monitor(child)
                } else {
                    Ok(RunOutcome::Detached)
                }
            }
        }
    }

    fn run_to_completion(&self, cmd: &RendererCommand) -> ExportResult<RunOutcome> {
        let mut child = spawn(
            cmd.to_command()
                .stdin(Stdio::null())
                .stderr(Stdio::piped()),
        )?;
        let drain = child.stderr.take().map(drain_stderr);

        let status = child
            .wait()
            .map_err(|e| ExportError::process(format!("failed to wait for renderer: {e}")))?;
        let stderr_bytes = match drain {
            Some(handle) => handle
                .join()
                .map_err(|_| ExportError::process("renderer stderr drain thread panicked"))?
                .map_err(|e| ExportError::process(format!("renderer stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        check_status(status, &stderr_bytes)?;
        Ok(RunOutcome::Completed)
    }

    fn monitor(&self, mut child: Child) -> ExportResult<RunOutcome> {
        loop {
            if self.cancel.is_cancelled() {
                tracing::info!("renderer interrupted");
                // The renderer may exit between the check and the kill.
                let _ = child.kill();
                let _ = child.wait();
                return Ok(RunOutcome::Killed);
            }
            let polled = child
                .try_wait()
                .map_err(|e| ExportError::process(format!("failed to poll renderer: {e}")))?;
            if let Some(status) = polled {
                check_status(status, &[])?;
                return Ok(RunOutcome::Completed);
            }
            std::thread::sleep(self.poll_interval);
        }
    }
}

fn spawn(cmd: &mut std::process::Command) -> ExportResult<Child> {
    cmd.spawn().map_err(|e| {
        ExportError::process(format!(
            "failed to spawn renderer '{}': {e}",
            cmd.get_program().to_string_lossy()
        ))
    })
}

fn drain_stderr(mut stderr: std::process::ChildStderr) -> JoinHandle<std::io::Result<Vec<u8>>> {
    std::thread::spawn(move || {
        let mut bytes = Vec::new();
        stderr.read_to_end(&mut bytes)?;
        Ok(bytes)
    })
}

fn check_status(status: ExitStatus, stderr: &[u8]) -> ExportResult<()> {
    if status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(stderr);
    Err(ExportError::process(format!(
        "renderer exited with status {}: {}",
        status,
        stderr.trim()
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/process/driver.rs"]
mod tests;
