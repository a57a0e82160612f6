use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vrscene", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the .vrscene file set without launching the renderer.
    Export(CommonArgs),
    /// Export, then launch V-Ray Standalone on the result.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Input scene description JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory receiving the exported files (overrides the scene setting).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Export as a material preview.
    #[arg(long)]
    preview: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Renderer binary (overrides the scene setting, VRAY_PATH and PATH lookup).
    #[arg(long)]
    standalone: Option<PathBuf>,

    /// Export and print the renderer command line without running it.
    #[arg(long)]
    no_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_export(args: CommonArgs) -> anyhow::Result<()> {
    let mut scene = vrscene::Scene::from_path(&args.in_path)?;
    let opts = vrscene::PipelineOptions {
        out_dir: args.out_dir,
        preview: args.preview,
        ..vrscene::PipelineOptions::default()
    };
    let mut nodes = vrscene::SceneNodeExporter::new();
    let report =
        vrscene::export_and_run(&mut scene, &mut nodes, &opts, vrscene::CancelToken::new())?;
    eprintln!("wrote {}", report.scene_file.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut scene = vrscene::Scene::from_path(&args.common.in_path)?;
    if args.no_run {
        scene.vray.exporter.autorun = false;
    }
    let opts = vrscene::PipelineOptions {
        out_dir: args.common.out_dir,
        standalone: args.standalone,
        preview: args.common.preview,
        run: true,
        background: false,
    };
    let mut nodes = vrscene::SceneNodeExporter::new();
    let reports = vrscene::render(&mut scene, &mut nodes, &opts, vrscene::CancelToken::new())?;
    for report in &reports {
        match &report.run {
            Some(vrscene::RunOutcome::Printed(line)) => println!("{line}"),
            Some(outcome) => eprintln!("{}: {outcome:?}", report.scene_file.display()),
            None => eprintln!("{}: export cancelled", report.scene_file.display()),
        }
    }
    Ok(())
}
