#![deny(unsafe_code)]
//! CLI binary for the sketchbook.
//!
//! Subcommands:
//! - `render <sketch>`: run a sketch headlessly for N frames, write a PNG
//! - `list`: print available sketches and their parameters

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use glam::DVec2;
use sketchbook_core::{RunSeed, ScalableCanvas, ScalableCanvasType, Sketch};
use sketchbook_sketches::{run_frames, snapshot, Raster, ScriptedInput, SketchKind};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

const DEFAULT_SIZE: u32 = 640;
const DEFAULT_FRAMES: u32 = 120;
const DEFAULT_SEED: u64 = 42;

#[derive(Parser)]
#[command(name = "sketchbook", about = "Generative sketchbook CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a sketch for N frames and write a PNG snapshot.
    Render(RenderArgs),
    /// List available sketches.
    List,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Sketch name (e.g. "stripes"). Optional when --seed-file names one.
    sketch: Option<String>,

    /// Number of frames to advance after setup.
    #[arg(short, long)]
    frames: Option<u32>,

    /// Square canvas side in pixels.
    #[arg(long)]
    size: Option<u32>,

    /// PRNG seed for deterministic output.
    #[arg(long)]
    seed: Option<u64>,

    /// Sketch parameters as a JSON object.
    #[arg(long)]
    params: Option<String>,

    /// Text file replacing the sketch's built-in text.
    #[arg(long)]
    text: Option<PathBuf>,

    /// JSON run seed to replay. Other flags override its fields.
    #[arg(long)]
    seed_file: Option<PathBuf>,

    /// Output file path.
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|e| CliError::Io(format!("{}: {e}", path.display())))
}

/// Builds the run seed from the seed file (if any) and the explicit flags.
fn resolve_seed(args: &RenderArgs) -> Result<RunSeed, CliError> {
    let mut run = match &args.seed_file {
        Some(path) => serde_json::from_str::<RunSeed>(&read_file(path)?)
            .map_err(|e| CliError::Input(format!("invalid seed file: {e}")))?,
        None => {
            let sketch = args.sketch.as_deref().ok_or_else(|| {
                CliError::Input("a sketch name or --seed-file is required".into())
            })?;
            let mut run = RunSeed::new(sketch, DEFAULT_SIZE, DEFAULT_SIZE, DEFAULT_SEED);
            run.frames = DEFAULT_FRAMES;
            run
        }
    };
    if let Some(sketch) = &args.sketch {
        run.sketch = sketch.clone();
    }
    if let Some(size) = args.size {
        run.width = size;
        run.height = size;
        run.canvas = ScalableCanvasType::Square640x640;
    }
    if let Some(seed) = args.seed {
        run.seed = seed;
    }
    if let Some(frames) = args.frames {
        run.frames = frames;
    }
    if let Some(params) = &args.params {
        run.params = serde_json::from_str(params)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
        if !run.params.is_object() {
            return Err(CliError::Input("--params must be a JSON object".into()));
        }
    }
    run.validate()?;
    Ok(run)
}

fn render(args: &RenderArgs, json: bool) -> Result<(), CliError> {
    let run = resolve_seed(args)?;
    let text = args.text.as_deref().map(read_file).transpose()?;

    let mut sketch = SketchKind::from_seed(&run, text.as_deref())?;
    let canvas = sketch.canvas();
    let (width, height) = (canvas.width(), canvas.height());
    let mut raster = Raster::new(width as usize, height as usize)?;
    let inputs = ScriptedInput::new(DVec2::new(width, height));
    run_frames(&mut sketch, &mut raster, inputs, run.frames);
    snapshot::write_png(&raster, &args.output)?;

    if json {
        let info = serde_json::json!({
            "run": run,
            "output": args.output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "rendered {} ({}x{}, {} frames, seed {}) -> {}",
            run.sketch,
            raster.width(),
            raster.height(),
            run.frames,
            run.seed,
            args.output.display()
        );
    }
    Ok(())
}

fn list(json: bool) -> Result<(), CliError> {
    let names = SketchKind::list_sketches();
    if json {
        let canvas = ScalableCanvas::from_type(
            ScalableCanvasType::default(),
            f64::from(DEFAULT_SIZE),
            f64::from(DEFAULT_SIZE),
        )?;
        let mut sketches = Vec::with_capacity(names.len());
        for name in names {
            let sketch = SketchKind::from_name(name, canvas, 0, &serde_json::json!({}), None)?;
            sketches.push(serde_json::json!({
                "name": name,
                "params": sketch.param_schema(),
            }));
        }
        let info = serde_json::json!({ "sketches": sketches });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Sketches:");
        for name in names {
            println!("  {name}");
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::List => list(cli.json),
        Command::Render(args) => render(args, cli.json),
    }
}

fn main() {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        log::debug!("exiting with code {}", e.exit_code());
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
