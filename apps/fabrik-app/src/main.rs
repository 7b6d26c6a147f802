//! FABRIK arm CLI.
//!
//! Provides three modes of operation:
//! - `solve`: Solve a single target and print the resulting pose
//! - `session`: Replay a seeded series of pointer clicks through the Bevy plugin
//! - `info`: Print crate version and default configuration

use std::path::PathBuf;
use std::process::ExitCode;

use bevy::prelude::*;
use clap::{Parser, Subcommand};
use nalgebra::Point2;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fabrik_core::{ArmId, ConfigError, FabrikError, SceneConfig};
use fabrik_ik::{ArmRegistry, Chain, FabrikPlugin, SolveResult, solve_arm};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Planar FABRIK arm solver.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// TOML scene file (solver settings and arm layout).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one target and print the joint positions.
    Solve {
        /// Target x coordinate.
        #[arg(allow_negative_numbers = true)]
        x: f64,

        /// Target y coordinate.
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },

    /// Replay random clicks inside a viewport, one solve per frame.
    Session {
        /// Number of clicks to replay.
        #[arg(short = 'n', long, default_value_t = 10)]
        clicks: u32,

        /// Random seed.
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Viewport width in pixels.
        #[arg(long, default_value_t = 1000.0)]
        width: f64,

        /// Viewport height in pixels.
        #[arg(long, default_value_t = 700.0)]
        height: f64,
    },

    /// Print version and default configuration.
    Info,
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

const fn status_label(result: &SolveResult) -> &'static str {
    if result.reached {
        "Reachable"
    } else if result.iterations_used == 0 {
        "Out of Reach"
    } else {
        "Not Converged"
    }
}

fn print_pose(chain: &Chain) {
    for (i, joint) in chain.joints().iter().enumerate() {
        let label = if i == 0 {
            "base"
        } else if i == chain.segment_count() {
            "end effector"
        } else {
            "joint"
        };
        println!("  [{i}] ({:.3}, {:.3})  {label}", joint.x, joint.y);
    }
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn run_solve(scene: &SceneConfig, target: Point2<f64>) -> Result<(), FabrikError> {
    let (chain, result) = solve_arm(&scene.arm, target, &scene.solver)?;

    println!("target: ({:.3}, {:.3})", target.x, target.y);
    println!(
        "status: {}  iterations={}  distance={:.4}",
        status_label(&result),
        result.iterations_used,
        result.distance_to_target
    );
    print_pose(&chain);
    Ok(())
}

/// Running totals for a click session.
#[derive(Debug, Default)]
struct SessionStats {
    reached: u32,
    out_of_reach: u32,
    not_converged: u32,
    total_iterations: u64,
}

impl SessionStats {
    fn record(&mut self, result: &SolveResult) {
        if result.reached {
            self.reached += 1;
        } else if result.iterations_used == 0 {
            self.out_of_reach += 1;
        } else {
            self.not_converged += 1;
        }
        self.total_iterations += u64::from(result.iterations_used);
    }

    const fn clicks(&self) -> u32 {
        self.reached + self.out_of_reach + self.not_converged
    }
}

/// Click targets are sampled from `[0, width) x [0, height)`, so both sides
/// must be finite and positive.
fn validate_viewport(width: f64, height: f64) -> Result<(), ConfigError> {
    let valid = |side: f64| side.is_finite() && side > 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(ConfigError::InvalidViewport { width, height })
    }
}

fn run_session(
    scene: &SceneConfig,
    clicks: u32,
    seed: u64,
    width: f64,
    height: f64,
) -> Result<(), FabrikError> {
    scene.validate()?;
    validate_viewport(width, height)?;

    let mut app = App::new();
    app.add_plugins(FabrikPlugin);
    app.insert_resource(scene.solver);
    app.finish();
    app.cleanup();

    let arm_id = ArmId(0);
    app.world_mut()
        .resource_mut::<ArmRegistry>()
        .build_and_insert(arm_id, &scene.arm)?;

    info!(
        %arm_id,
        segments = scene.arm.segments.len(),
        reach = scene.arm.total_reach(),
        "arm registered"
    );

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut stats = SessionStats::default();

    for click in 1..=clicks {
        let target = Point2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height));
        app.world_mut()
            .resource_mut::<ArmRegistry>()
            .set_goal(arm_id, target);

        app.update();

        let registry = app.world().resource::<ArmRegistry>();
        let Some(entry) = registry.get(arm_id) else {
            continue;
        };
        let Some(result) = entry.last_result else {
            continue;
        };
        stats.record(&result);

        let ee = entry.chain.end_effector();
        println!(
            "click {click:>3}: target ({:>4.0}, {:>4.0})  {:<13}  end effector ({:.1}, {:.1})  iters={}",
            target.x,
            target.y,
            status_label(&result),
            ee.x,
            ee.y,
            result.iterations_used,
        );
    }

    let clicks_done = stats.clicks();
    println!(
        "\ntotal: clicks={clicks_done}, reached={}, out_of_reach={}, not_converged={}",
        stats.reached, stats.out_of_reach, stats.not_converged
    );
    if clicks_done > 0 {
        #[allow(clippy::cast_precision_loss)]
        let mean = stats.total_iterations as f64 / f64::from(clicks_done);
        println!("mean iterations per click: {mean:.2}");
    }
    Ok(())
}

fn run_info(scene: &SceneConfig) {
    println!("fabrik v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("solver:");
    println!("  margin_of_error  {}", scene.solver.margin_of_error);
    println!("  max_iterations   {}", scene.solver.max_iterations);
    println!();
    println!("arm:");
    println!("  base  ({}, {})", scene.arm.base[0], scene.arm.base[1]);
    for (i, segment) in scene.arm.segments.iter().enumerate() {
        println!(
            "  segment {i}: length={} angle={}deg",
            segment.length, segment.angle_deg
        );
    }
    println!("  total reach  {}", scene.arm.total_reach());
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn load_scene(path: Option<&PathBuf>) -> Result<SceneConfig, FabrikError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading scene config");
            Ok(SceneConfig::from_file(path)?)
        }
        None => Ok(SceneConfig::default()),
    }
}

fn run(cli: Cli) -> Result<(), FabrikError> {
    let scene = load_scene(cli.config.as_ref())?;

    match cli.command {
        Some(Commands::Solve { x, y }) => run_solve(&scene, Point2::new(x, y)),
        Some(Commands::Session {
            clicks,
            seed,
            width,
            height,
        }) => run_session(&scene, clicks, seed, width, height),
        Some(Commands::Info) => {
            run_info(&scene);
            Ok(())
        }
        // Default: a short session over the standard 1000x700 viewport
        None => run_session(&scene, 10, 0, 1000.0, 700.0),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
