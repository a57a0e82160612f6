use super::*;

fn scene(exporter: &str) -> Scene {
    Scene::from_json_str(&format!(r#"{{ "vray": {{ "exporter": {exporter} }} }}"#)).unwrap()
}

#[test]
fn launch_mode_selection() {
    let job = RenderJob::new("s.vrscene");
    assert_eq!(
        LaunchMode::select(&scene("{}"), &job),
        LaunchMode::Autorun { monitor: false }
    );
    assert_eq!(
        LaunchMode::select(&scene(r#"{ "wait": true }"#), &job),
        LaunchMode::Wait
    );
    assert_eq!(
        LaunchMode::select(&scene(r#"{ "autorun": false }"#), &job),
        LaunchMode::PrintOnly
    );
    assert_eq!(
        LaunchMode::select(&scene(r#"{ "animation": true }"#), &job),
        LaunchMode::Autorun { monitor: true }
    );

    let mut preview = RenderJob::new("s.vrscene");
    preview.preview = true;
    assert_eq!(
        LaunchMode::select(&scene("{}"), &preview),
        LaunchMode::Autorun { monitor: true }
    );

    let mut background = RenderJob::new("s.vrscene");
    background.background = true;
    assert_eq!(
        LaunchMode::select(&scene(r#"{ "autorun": false }"#), &background),
        LaunchMode::Wait
    );
}

#[test]
fn print_only_never_spawns() {
    let cmd = RendererCommand::new("/nonexistent/vray", vec!["-frames=1".into()]);
    let out = RendererDriver::new(CancelToken::new())
        .run(&cmd, LaunchMode::PrintOnly)
        .unwrap();
    assert_eq!(out, RunOutcome::Printed("/nonexistent/vray -frames=1".into()));
}

#[test]
fn spawn_failure_is_a_process_error() {
    let cmd = RendererCommand::new("/nonexistent/vray", Vec::new());
    let err = RendererDriver::new(CancelToken::new())
        .run(&cmd, LaunchMode::Wait)
        .unwrap_err();
    assert!(matches!(err, ExportError::Process(_)));
}

#[cfg(unix)]
#[test]
fn failing_renderer_reports_stderr() {
    let cmd = RendererCommand::new(
        "sh",
        vec!["-c".into(), "echo scene parse failed >&2; exit 3".into()],
    );
    let err = RendererDriver::new(CancelToken::new())
        .run(&cmd, LaunchMode::Wait)
        .unwrap_err();
    let ExportError::Process(msg) = err else {
        panic!("expected a process error");
    };
    assert!(msg.contains("scene parse failed"));
}

#[cfg(unix)]
#[test]
fn monitored_renderer_runs_to_completion() {
    let cmd = RendererCommand::new("sh", vec!["-c".into(), "exit 0".into()]);
    let out = RendererDriver::new(CancelToken::new())
        .with_poll_interval(Duration::from_millis(5))
        .run(&cmd, LaunchMode::Autorun { monitor: true })
        .unwrap();
    assert_eq!(out, RunOutcome::Completed);
}

#[cfg(unix)]
#[test]
fn cancellation_kills_a_monitored_renderer() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let cmd = RendererCommand::new("sleep", vec!["30".into()]);
    let out = RendererDriver::new(cancel)
        .run(&cmd, LaunchMode::Autorun { monitor: true })
        .unwrap();
    assert_eq!(out, RunOutcome::Killed);
}
