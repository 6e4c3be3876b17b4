#![deny(unsafe_code)]
//! CLI binary for the flowfield vector field visualizer.
//!
//! Subcommands:
//! - `render`: run a simulation for N ticks, write a PNG
//! - `eval <expr>`: evaluate one expression at a point
//! - `random`: print a random system of equations
//! - `list`: print available color schemes

mod error;
mod random;

use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Args, Parser, Subcommand};
use error::CliError;
use flowfield_core::{evaluate, Bindings, ColorScheme, SimulationConfig, Srgb, Xorshift64};
use flowfield_runtime::png::write_png;
use flowfield_runtime::{FixedRate, FrameScheduler, RasterRenderer, SimulationLoop, Unthrottled};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "flowfield", about = "Particle visualizer for 2D vector fields")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the simulation for N ticks and write the final frame as PNG.
    Render(RenderArgs),
    /// Evaluate one expression at a point.
    Eval {
        /// Expression over x, y, a, b (e.g. "a*x - b*y").
        #[arg(allow_hyphen_values = true)]
        expr: String,

        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        x: f64,

        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        y: f64,

        #[arg(short, default_value_t = 0.0, allow_negative_numbers = true)]
        a: f64,

        #[arg(short, default_value_t = 0.0, allow_negative_numbers = true)]
        b: f64,
    },
    /// Print a random system of equations.
    Random {
        /// PRNG seed; defaults to the current time.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List available color schemes.
    List,
}

#[derive(Args)]
struct RenderArgs {
    /// JSON config file; flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// dx/dt expression.
    #[arg(long, allow_hyphen_values = true)]
    dx: Option<String>,

    /// dy/dt expression.
    #[arg(long, allow_hyphen_values = true)]
    dy: Option<String>,

    /// Value of parameter `a`.
    #[arg(short, allow_negative_numbers = true)]
    a: Option<f64>,

    /// Value of parameter `b`.
    #[arg(short, allow_negative_numbers = true)]
    b: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    x_min: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    x_max: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    y_min: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    y_max: Option<f64>,

    /// Canvas width in pixels.
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Canvas height in pixels.
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// PRNG seed for deterministic output.
    #[arg(long)]
    seed: Option<u64>,

    /// Color scheme (ocean, fire, rainbow, grayscale, velocity).
    #[arg(short, long)]
    scheme: Option<String>,

    /// Background color as #rrggbb.
    #[arg(long)]
    background: Option<String>,

    /// Draw traced particles with their recent paths.
    #[arg(long)]
    trace: bool,

    /// Particle parameter overrides as a JSON object.
    #[arg(long)]
    params: Option<String>,

    /// Number of ticks to simulate.
    #[arg(short, long, default_value_t = 300, value_parser = clap::value_parser!(u64).range(1..))]
    ticks: u64,

    /// Pace ticks at this many frames per second instead of running flat out.
    #[arg(long)]
    fps: Option<f64>,

    /// Output file path.
    #[arg(short, long, default_value = "flowfield.png")]
    output: PathBuf,
}

impl RenderArgs {
    fn to_config(&self) -> Result<SimulationConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| CliError::Io(format!("reading {}: {e}", path.display())))?;
                serde_json::from_str(&text).map_err(|e| {
                    CliError::Input(format!("invalid config {}: {e}", path.display()))
                })?
            }
            None => SimulationConfig::default(),
        };

        if let Some(dx) = &self.dx {
            config.dx = dx.clone();
        }
        if let Some(dy) = &self.dy {
            config.dy = dy.clone();
        }
        config.a = self.a.unwrap_or(config.a);
        config.b = self.b.unwrap_or(config.b);
        config.bounds.x_min = self.x_min.unwrap_or(config.bounds.x_min);
        config.bounds.x_max = self.x_max.unwrap_or(config.bounds.x_max);
        config.bounds.y_min = self.y_min.unwrap_or(config.bounds.y_min);
        config.bounds.y_max = self.y_max.unwrap_or(config.bounds.y_max);
        config.width = self.width.unwrap_or(config.width);
        config.height = self.height.unwrap_or(config.height);
        config.seed = self.seed.unwrap_or(config.seed);
        config.trace |= self.trace;
        if let Some(name) = &self.scheme {
            config.scheme = ColorScheme::from_name(name)?;
        }
        if let Some(hex) = &self.background {
            config.background = Srgb::from_hex(hex)?;
        }
        if let Some(raw) = &self.params {
            let overrides: Value = serde_json::from_str(raw)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            let Value::Object(overrides) = overrides else {
                return Err(CliError::Input("--params must be a JSON object".into()));
            };
            match &mut config.params {
                Value::Object(existing) => existing.extend(overrides),
                other => *other = Value::Object(overrides),
            }
        }
        Ok(config)
    }
}

fn render(args: &RenderArgs, json_mode: bool) -> Result<(), CliError> {
    let config = args.to_config()?;
    let mut scheduler: Box<dyn FrameScheduler> = match args.fps {
        Some(fps) => Box::new(FixedRate::new(fps)?),
        None => Box::new(Unthrottled),
    };

    let mut sim = SimulationLoop::new(config.clone());
    sim.start()?;
    let mut renderer = RasterRenderer::new();
    let mut last = None;
    for _ in 0..args.ticks {
        scheduler.wait_next();
        match sim.tick(&mut renderer) {
            Some(report) => last = Some(report),
            None => break,
        }
    }
    let ticks = sim.ticks();
    let status = sim.status().map(str::to_owned);
    sim.stop();

    let frame = renderer
        .frame()
        .ok_or_else(|| CliError::Io("no frame was rendered".into()))?;
    write_png(frame, &args.output)?;
    log::info!("wrote {} after {ticks} ticks", args.output.display());

    if json_mode {
        let info = json!({
            "output": args.output.display().to_string(),
            "width": config.width,
            "height": config.height,
            "ticks": ticks,
            "seed": config.seed,
            "dx": config.dx,
            "dy": config.dy,
            "scheme": config.scheme.name(),
            "status": status,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "rendered {}x{} ({ticks} ticks, seed {}) -> {}",
            config.width,
            config.height,
            config.seed,
            args.output.display()
        );
        if let Some(msg) = &status {
            eprintln!("warning: {msg}");
        }
    }

    match (last, status) {
        (Some(report), Some(msg)) if report.field_invalid() => Err(CliError::Expression(msg)),
        _ => Ok(()),
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::List => {
            if cli.json {
                let schemes: Vec<Value> = ColorScheme::ALL
                    .iter()
                    .map(|s| json!({"name": s.name(), "description": s.description()}))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&json!({"schemes": schemes}))?);
            } else {
                println!("Color schemes:");
                for s in ColorScheme::ALL {
                    println!("  {:<10} {}", s.name(), s.description());
                }
            }
        }
        Command::Eval { expr, x, y, a, b } => {
            let value = evaluate(expr, &Bindings::new(*x, *y, *a, *b))?;
            if cli.json {
                let info = json!({"expr": expr, "x": x, "y": y, "a": a, "b": b, "value": value});
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{value}");
            }
        }
        Command::Random { seed } => {
            let seed = seed.unwrap_or_else(time_seed);
            let (dx, dy) = random::random_system(&mut Xorshift64::new(seed));
            if cli.json {
                let info = json!({"dx": dx, "dy": dy, "seed": seed});
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("dx/dt = {dx}");
                println!("dy/dt = {dy}");
            }
        }
        Command::Render(args) => render(args, cli.json)?,
    }

    Ok(())
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
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

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("flowfield").chain(args.iter().copied())).unwrap()
    }

    fn render_args(args: &[&str]) -> RenderArgs {
        let mut all = vec!["render"];
        all.extend_from_slice(args);
        match parse(&all).command {
            Command::Render(r) => r,
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn render_defaults_to_default_config() {
        let config = render_args(&[]).to_config().unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let config = render_args(&[
            "--dx", "-y", "--dy", "x", "-a", "-2", "--x-min", "-1", "--x-max", "1",
            "-W", "320", "-s", "fire", "--background", "#ffffff", "--trace",
            "--params", r#"{"particle_count": 10}"#,
        ])
        .to_config()
        .unwrap();
        assert_eq!(config.dx, "-y");
        assert_eq!(config.a, -2.0);
        assert_eq!((config.bounds.x_min, config.bounds.x_max), (-1.0, 1.0));
        assert_eq!(config.width, 320);
        assert_eq!(config.scheme, ColorScheme::Fire);
        assert_eq!(config.background, Srgb::WHITE);
        assert!(config.trace);
        assert_eq!(config.params["particle_count"], 10);
    }

    #[test]
    fn bad_scheme_is_input_error() {
        let err = render_args(&["-s", "neon"]).to_config().unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn params_must_be_an_object() {
        let err = render_args(&["--params", "[1]"]).to_config().unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn zero_ticks_is_rejected_by_clap() {
        assert!(Cli::try_parse_from(["flowfield", "render", "-t", "0"]).is_err());
    }

    #[test]
    fn eval_accepts_negative_values() {
        match parse(&["eval", "a*x", "--x", "-3", "-a", "2"]).command {
            Command::Eval { expr, x, a, .. } => {
                assert_eq!(expr, "a*x");
                assert_eq!(x, -3.0);
                assert_eq!(a, 2.0);
            }
            _ => panic!("expected eval"),
        }
    }
}
