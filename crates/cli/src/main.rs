#![deny(unsafe_code)]
//! CLI binary for the morphfield particle simulation.
//!
//! Subcommands:
//! - `run` — drive a simulation headlessly for N frames, optionally writing
//!   a JSON frame snapshot and a replay seed
//! - `list` — print available shapes and palettes
//! - `schema` — print the parameter schema

mod error;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use morphfield_core::{
    AudioEnergy, Palette, ParticleTransform, PointerPosition, Seed, Shape, Srgb, VisualParams,
};
use morphfield_particles::{SimConfig, Simulation};
use morphfield_scheduler::{
    snapshot, FixedClock, FrameClock, FrameScheduler, FrameSink, FrameStats, SystemClock,
};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::path::PathBuf;
use std::process;
use std::rc::Rc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "morphfield", about = "Shape-morphing particle simulation CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log more (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a simulation for N frames.
    Run(RunArgs),
    /// List available shapes and palettes.
    List,
    /// Print the schema of visual parameters and simulation config.
    Schema,
}

#[derive(Args)]
struct RunArgs {
    /// Number of particles.
    #[arg(short = 'n', long, default_value_t = 2000)]
    count: usize,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of frames to simulate.
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Frame rate of the simulated clock.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Pace frames against the wall clock instead of a fixed clock.
    #[arg(long)]
    realtime: bool,

    /// Shape name (sphere, cat, flower, fish, star). Overrides --params.
    #[arg(long)]
    shape: Option<String>,

    /// Built-in palette name. Overrides --params.
    #[arg(short, long)]
    palette: Option<String>,

    /// Visual parameters as a JSON string (chaos, speed, size, colorPalette, shape).
    #[arg(long, default_value = "{}")]
    params: String,

    /// Simulation config overrides as a JSON string.
    #[arg(long, default_value = "{}")]
    config: String,

    /// Use the looser "fluid" friction unless --config sets one.
    #[arg(long)]
    fluid: bool,

    /// Detected pointer as "x,y" in [-1, 1].
    #[arg(long)]
    pointer: Option<String>,

    /// Audio energy as "bass,treble" in [0, 1].
    #[arg(long)]
    audio: Option<String>,

    /// Replay a seed file instead of building one from flags.
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Write the seed of this run to a file for later replay.
    #[arg(long)]
    save_seed: Option<PathBuf>,

    /// Write the final frame as JSON.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_json(text: &str, flag: &str) -> Result<Value, CliError> {
    serde_json::from_str(text).map_err(|e| CliError::Input(format!("invalid {flag} JSON: {e}")))
}

/// Parses `"a,b"` into two finite numbers.
fn parse_pair(text: &str, flag: &str) -> Result<(f32, f32), CliError> {
    let bad = || CliError::Input(format!("{flag} expects two comma-separated numbers, got {text:?}"));
    let (a, b) = text.split_once(',').ok_or_else(bad)?;
    let a: f32 = a.trim().parse().map_err(|_| bad())?;
    let b: f32 = b.trim().parse().map_err(|_| bad())?;
    if !a.is_finite() || !b.is_finite() {
        return Err(bad());
    }
    Ok((a, b))
}

/// Builds the replay seed for a run, from a file or from flags.
fn build_seed(args: &RunArgs) -> Result<Seed, CliError> {
    let pointer = args
        .pointer
        .as_deref()
        .map(|p| parse_pair(p, "--pointer"))
        .transpose()?
        .map(|(x, y)| PointerPosition::detected(x, y));
    let audio = args
        .audio
        .as_deref()
        .map(|a| parse_pair(a, "--audio"))
        .transpose()?
        .map(|(bass, treble)| AudioEnergy::new(bass, treble));

    if let Some(path) = &args.replay {
        let mut seed = Seed::load(path)?;
        if seed.frames == 0 {
            seed.frames = args.frames as usize;
        }
        seed.pointer = pointer.or(seed.pointer);
        seed.audio = audio.or(seed.audio);
        return Ok(seed);
    }

    let mut params = VisualParams::from_json(&parse_json(&args.params, "--params")?);
    if let Some(name) = &args.shape {
        params.shape =
            Shape::parse(name).ok_or_else(|| CliError::Input(format!("unknown shape: {name}")))?;
    }
    if let Some(name) = &args.palette {
        params.color_palette =
            Palette::from_name(name).map_err(|e| CliError::Input(e.to_string()))?;
    }

    let mut config = parse_json(&args.config, "--config")?;
    let overrides = config
        .as_object_mut()
        .ok_or_else(|| CliError::Input("--config must be a JSON object".into()))?;
    if args.fluid && !overrides.contains_key("friction") {
        overrides.insert("friction".into(), json!(SimConfig::fluid().friction));
    }

    let mut seed = Seed::new(args.count, params, args.seed);
    seed.config = config;
    seed.frames = args.frames as usize;
    seed.pointer = pointer;
    seed.audio = audio;
    seed.validate()?;
    Ok(seed)
}

fn run_simulation(args: RunArgs, json_mode: bool) -> Result<(), CliError> {
    if !(args.fps > 0.0 && args.fps.is_finite()) {
        return Err(CliError::Input(format!("--fps must be positive, got {}", args.fps)));
    }
    let seed = build_seed(&args)?;
    let sim = Simulation::from_seed(&seed)?;
    let frames = seed.frames as u64;

    let clock: Box<dyn FrameClock> = if args.realtime {
        Box::new(SystemClock::new())
    } else {
        Box::new(FixedClock::from_fps(args.fps))
    };
    let mut scheduler = FrameScheduler::new(sim, clock);
    let mailbox = scheduler.mailbox();
    if let Some(pointer) = seed.pointer {
        mailbox.set_pointer(pointer);
    }
    if let Some(audio) = seed.audio {
        mailbox.set_audio(audio);
    }

    let stats = Rc::new(RefCell::new(FrameStats::default()));
    let sink_stats = Rc::clone(&stats);
    scheduler.start(Box::new(move |frame: &[ParticleTransform], colors: &[Srgb]| {
        sink_stats.borrow_mut().present(frame, colors);
    }));
    let ran = if args.realtime {
        scheduler.run_paced(Duration::from_secs_f64(1.0 / args.fps), Some(frames))
    } else {
        scheduler.run_for(frames)
    };
    scheduler.stop();
    let sim = scheduler.into_engine();
    info!(frames = ran, "run finished");

    if let Some(path) = &args.output {
        snapshot::write_frame_json(&sim, ran, path)?;
    }
    if let Some(path) = &args.save_seed {
        let text = serde_json::to_string_pretty(&seed)?;
        std::fs::write(path, text)
            .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    }

    let stats = *stats.borrow();
    if json_mode {
        let info = json!({
            "count": sim.len(),
            "seed": seed.seed,
            "frames": ran,
            "shape": sim.visual_params().shape.name(),
            "meanRadius": stats.mean_radius,
            "maxRotation": stats.max_rotation,
            "output": args.output.as_ref().map(|p| p.display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "ran {} particles as {} for {ran} frames (seed {}): mean radius {:.3}",
            sim.len(),
            sim.visual_params().shape,
            seed.seed,
            stats.mean_radius
        );
        if let Some(path) = &args.output {
            eprintln!("frame written to {}", path.display());
        }
    }
    sim.dispose();
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let shapes: Vec<&str> = Shape::ALL.iter().map(|s| s.name()).collect();
            let palettes = Palette::list_names();
            if cli.json {
                let info = json!({
                    "shapes": shapes,
                    "palettes": palettes,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Shapes:");
                println!("  {}", shapes.join(", "));
                println!("Palettes:");
                println!("  {}", palettes.join(", "));
            }
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&Simulation::schema())?);
        }
        Command::Run(args) => run_simulation(args, cli.json)?,
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> RunArgs {
        let mut argv = vec!["morphfield", "run"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Command::Run(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn parse_pair_accepts_spaced_numbers() {
        assert_eq!(parse_pair("0.5, -0.25", "--pointer").unwrap(), (0.5, -0.25));
    }

    #[test]
    fn parse_pair_rejects_garbage() {
        for bad in ["", "1", "a,b", "1,2,3", "nan,1"] {
            let err = parse_pair(bad, "--audio").unwrap_err();
            assert_eq!(err.exit_code(), 12, "{bad:?}");
        }
    }

    #[test]
    fn build_seed_applies_flag_overrides() {
        let seed = build_seed(&args(&[
            "-n", "64", "--seed", "9", "--shape", "Star", "--palette", "ember", "--fluid",
        ]))
        .unwrap();
        assert_eq!(seed.count, 64);
        assert_eq!(seed.seed, 9);
        assert_eq!(seed.params.shape, Shape::Star);
        assert_eq!(seed.params.color_palette, Palette::ember());
        assert_eq!(SimConfig::from_json(&seed.config).friction, 0.94);
    }

    #[test]
    fn explicit_friction_beats_fluid_flag() {
        let seed = build_seed(&args(&["--fluid", "--config", r#"{"friction": 0.9}"#])).unwrap();
        assert_eq!(SimConfig::from_json(&seed.config).friction, 0.9);
    }

    #[test]
    fn build_seed_reports_bad_input() {
        assert_eq!(build_seed(&args(&["--shape", "dragon"])).unwrap_err().exit_code(), 12);
        assert_eq!(build_seed(&args(&["--params", "{oops"])).unwrap_err().exit_code(), 12);
        assert_eq!(build_seed(&args(&["--config", "[1]"])).unwrap_err().exit_code(), 12);
        assert_eq!(build_seed(&args(&["-n", "0"])).unwrap_err().exit_code(), 10);
    }

    #[test]
    fn replay_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        let original = build_seed(&args(&["-n", "32", "--shape", "fish", "-f", "12"])).unwrap();
        std::fs::write(&path, serde_json::to_string(&original).unwrap()).unwrap();

        let replayed = build_seed(&args(&["--replay", path.to_str().unwrap()])).unwrap();
        assert_eq!(replayed, original);
    }

    #[test]
    fn missing_replay_file_is_io_error() {
        let err = build_seed(&args(&["--replay", "/nonexistent/seed.json"])).unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn run_writes_snapshot_and_seed() {
        let dir = tempfile::tempdir().unwrap();
        let frame = dir.path().join("frame.json");
        let seed = dir.path().join("seed.json");
        let a = args(&[
            "-n",
            "16",
            "-f",
            "5",
            "--pointer",
            "0.1,0.1",
            "--audio",
            "0.5,0.5",
            "-o",
            frame.to_str().unwrap(),
            "--save-seed",
            seed.to_str().unwrap(),
        ]);
        run_simulation(a, true).unwrap();

        let snapshot: Value =
            serde_json::from_str(&std::fs::read_to_string(&frame).unwrap()).unwrap();
        assert_eq!(snapshot["frame"], 5);
        assert_eq!(snapshot["count"], 16);
        let saved = Seed::load(&seed).unwrap();
        assert_eq!(saved.count, 16);
        assert_eq!(saved.frames, 5);
    }

    #[test]
    fn build_seed_keeps_pointer_and_audio() {
        let seed = build_seed(&args(&["--pointer", "0.2,-0.4", "--audio", "0.7,0.3"])).unwrap();
        assert_eq!(seed.pointer, Some(PointerPosition::detected(0.2, -0.4)));
        assert_eq!(seed.audio, Some(AudioEnergy::new(0.7, 0.3)));
        assert_eq!(build_seed(&args(&[])).unwrap().pointer, None);
        assert_eq!(build_seed(&args(&["--audio", "loud"])).unwrap_err().exit_code(), 12);
    }

    #[test]
    fn replay_of_saved_seed_reproduces_the_frame() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        let seed = dir.path().join("seed.json");
        run_simulation(
            args(&[
                "-n",
                "24",
                "-f",
                "30",
                "--shape",
                "star",
                "--pointer",
                "0.1,0.2",
                "--audio",
                "0.6,0.4",
                "-o",
                first.to_str().unwrap(),
                "--save-seed",
                seed.to_str().unwrap(),
            ]),
            true,
        )
        .unwrap();
        run_simulation(
            args(&[
                "--replay",
                seed.to_str().unwrap(),
                "-o",
                second.to_str().unwrap(),
            ]),
            true,
        )
        .unwrap();

        let read = |path: &std::path::Path| -> Value {
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
        };
        assert_eq!(read(&first), read(&second));
        assert!(Seed::load(&seed).unwrap().pointer.is_some());
    }

    #[test]
    fn run_rejects_non_positive_fps() {
        let err = run_simulation(args(&["--fps", "0"]), false).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }
}
