#![deny(unsafe_code)]
//! Headless CLI for drift.
//!
//! Subcommands:
//! - `render`: run a scene for N frames, write the last frame (and optionally
//!   a numbered sequence) as PNG
//! - `scene`: print the default scene as JSON, ready to edit and pass back
//!   with `--scene`

mod error;

use clap::{Args, Parser, Subcommand};
use drift_core::run_loop::{FixedRate, FrameScheduler, Immediate, RunLoop};
use drift_core::{Animation, DriftError, Raster, Srgb};
use drift_frames::{write_png, FrameSequence};
use drift_sim::{Modifiers, SceneConfig, WheelInput, World};
use error::CliError;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "drift", about = "Interactive particle emitters, rendered headless")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a scene for N frames and write PNG output.
    Render(RenderArgs),
    /// Print the default scene as JSON.
    Scene,
}

#[derive(Args)]
struct RenderArgs {
    /// Scene file (JSON). Defaults to the four-emitter cross.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Canvas width in pixels (overrides the scene).
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Canvas height in pixels (overrides the scene).
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Number of frames to run.
    #[arg(short, long, default_value_t = 100)]
    steps: u64,

    /// PRNG seed (overrides the scene).
    #[arg(long)]
    seed: Option<u64>,

    /// Background color as #rrggbb (overrides the scene).
    #[arg(long)]
    background: Option<String>,

    /// Move the controllable emitter to X,Y before the first frame.
    #[arg(long, value_name = "X,Y", allow_hyphen_values = true)]
    pointer: Option<String>,

    /// Apply one wheel event before the first frame (positive scrolls up).
    #[arg(long, allow_negative_numbers = true)]
    wheel: Option<f64>,

    /// Hold shift for --wheel: adjusts particle size.
    #[arg(long)]
    shift: bool,

    /// Hold alt for --wheel: adjusts scatter.
    #[arg(long)]
    alt: bool,

    /// Frames per second; 0 runs as fast as possible.
    #[arg(long, default_value_t = 0)]
    fps: u32,

    /// Output file for the last frame.
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Also write a numbered frame sequence into this directory.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// With --frames-dir, write every Nth frame.
    #[arg(long, default_value_t = 1)]
    every: u64,
}

/// Parses `"x,y"` into a pointer position.
fn parse_pointer(s: &str) -> Result<(f64, f64), CliError> {
    let invalid = || CliError::Input(format!("invalid --pointer {s:?}: expected X,Y"));
    let (x, y) = s.split_once(',').ok_or_else(invalid)?;
    let x: f64 = x.trim().parse().map_err(|_| invalid())?;
    let y: f64 = y.trim().parse().map_err(|_| invalid())?;
    if !(x.is_finite() && y.is_finite()) {
        return Err(invalid());
    }
    Ok((x, y))
}

fn load_scene(path: &Path) -> Result<SceneConfig, CliError> {
    let origin = path.display().to_string();
    let text =
        std::fs::read_to_string(path).map_err(|e| CliError::Io(format!("{origin}: {e}")))?;
    SceneConfig::from_json_str(&text).map_err(|e| CliError::scene(&origin, e))
}

/// Resolves the scene from `--scene` and the per-field overrides. Every
/// rejection here is exit code 12.
fn build_scene(args: &RenderArgs) -> Result<SceneConfig, CliError> {
    let mut scene = match &args.scene {
        Some(path) => load_scene(path)?,
        None => SceneConfig::default(),
    };
    if let Some(width) = args.width {
        scene.width = width;
    }
    if let Some(height) = args.height {
        scene.height = height;
    }
    if let Some(seed) = args.seed {
        scene.seed = seed;
    }
    if let Some(hex) = &args.background {
        scene.background = Srgb::from_hex(hex).map_err(|e| CliError::scene("--background", e))?;
    }
    scene
        .validate()
        .map_err(|e| CliError::scene("scene with overrides", e))?;
    Ok(scene)
}

/// Feeds `--pointer` and `--wheel` to the world.
fn apply_input(world: &mut World, args: &RenderArgs) -> Result<(), CliError> {
    if let Some(pointer) = &args.pointer {
        let (x, y) = parse_pointer(pointer)?;
        if !world.handle_pointer_move(x, y) {
            log::warn!("--pointer ignored: scene has no controllable emitter");
        }
    }
    if let Some(delta) = args.wheel {
        let wheel = WheelInput::new(
            delta,
            Modifiers {
                shift: args.shift,
                alt: args.alt,
            },
        );
        if !wheel.modifiers.any() {
            log::warn!("--wheel has no effect without --shift or --alt");
        }
        if !world.handle_wheel(&wheel) {
            log::warn!("--wheel ignored: scene has no controllable emitter");
        }
    }
    Ok(())
}

fn drive<S: FrameScheduler>(
    scheduler: S,
    steps: u64,
    world: &mut World,
    raster: &mut Raster,
    frames: &mut Option<FrameSequence>,
) -> Result<u64, DriftError> {
    RunLoop::new(scheduler)
        .with_frame_limit(steps)
        .run(world, raster, |frame, raster| {
            if let Some(seq) = frames.as_mut() {
                seq.observe(frame, raster)?;
            }
            Ok(())
        })
}

fn render(args: RenderArgs, json: bool) -> Result<(), CliError> {
    let scene = build_scene(&args)?;
    let mut world = World::from_scene(&scene)?;
    apply_input(&mut world, &args)?;

    let mut raster = Raster::new(scene.width as usize, scene.height as usize)?;
    let mut frames = match &args.frames_dir {
        Some(dir) => Some(FrameSequence::new(dir, args.every, scene.background)?),
        None => None,
    };

    let produced = if args.fps == 0 {
        drive(Immediate, args.steps, &mut world, &mut raster, &mut frames)?
    } else {
        drive(
            FixedRate::per_second(args.fps),
            args.steps,
            &mut world,
            &mut raster,
            &mut frames,
        )?
    };

    write_png(&raster, scene.background, &args.output)?;
    let manifest = match &frames {
        Some(seq) => Some(seq.write_manifest(&world.params())?),
        None => None,
    };

    if json {
        let info = serde_json::json!({
            "width": scene.width,
            "height": scene.height,
            "frames": produced,
            "seed": scene.seed,
            "output": args.output.display().to_string(),
            "sequence": frames.as_ref().map(|s| s.written().len()),
            "manifest": manifest.map(|p| p.display().to_string()),
            "state": world.params(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "rendered {} emitters ({}x{}, {produced} frames, seed {}, {} particles) -> {}",
            world.systems().len(),
            scene.width,
            scene.height,
            scene.seed,
            world.particle_count(),
            args.output.display()
        );
        if let Some(seq) = &frames {
            eprintln!("wrote {} frames to {}", seq.written().len(), seq.dir().display());
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Scene => {
            let scene = SceneConfig::default();
            println!("{}", serde_json::to_string_pretty(&scene)?);
        }
        Command::Render(args) => render(args, cli.json)?,
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
