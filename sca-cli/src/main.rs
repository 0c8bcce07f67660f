//! Command-line front end for the 3-D space-colonization core.
//!
//! Grows one tree from the given parameters and prints either a short
//! summary or the full branch-point and endpoint records as JSON.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use glam::DVec3;
use log::info;
use sca_core::{ApicalConfig, BoxVolume, Config, EngineBuilder, Growth, GrowthEngine, SphereVolume};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Volume {
    /// Ball of `--radius` around `--center`.
    Sphere,
    /// Cube of half-size `--radius` around `--center`.
    Cube,
}

#[derive(Parser, Debug)]
#[command(version, about = "Grow a branching skeleton toward random attraction points")]
struct Args {
    /// Initial number of endpoints.
    #[arg(long, default_value_t = 100)]
    endpoints: usize,
    #[arg(long, default_value_t = 0.3)]
    step: f64,
    #[arg(long, default_value_t = 2000)]
    iterations: u32,
    #[arg(long, default_value_t = 5.0)]
    kill_distance: f64,
    /// `<= 0` for unbounded.
    #[arg(long, default_value_t = 15.0)]
    influence: f64,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    tropism: f64,

    #[arg(long, default_value_t = 0.0)]
    apical_control: f64,
    #[arg(long, default_value_t = 1.0)]
    apical_falloff: f64,
    /// Generations over which apical control decays to zero.
    #[arg(long, default_value_t = 0)]
    apical_timing: u32,

    #[arg(long, value_enum, default_value_t = Volume::Sphere)]
    volume: Volume,
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], default_values_t = [0.0, 0.0, 8.0], allow_negative_numbers = true)]
    center: Vec<f64>,
    #[arg(long, default_value_t = 5.0)]
    radius: f64,
    /// Preset root, may be repeated. Replaces the root at the origin.
    #[arg(long = "start", num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true, action = clap::ArgAction::Append)]
    starts: Vec<f64>,
    /// Forbid growth below this height.
    #[arg(long, allow_negative_numbers = true)]
    floor: Option<f64>,

    /// New endpoints per 1000 generations.
    #[arg(long, default_value_t = 0.0)]
    new_endpoints_per_1000: f64,
    /// Wall-clock budget in seconds, 0 for none.
    #[arg(long, default_value_t = 0.0)]
    max_time: f64,
    #[arg(long, default_value_t = 100_000)]
    max_sample_attempts: u32,

    /// Print every record as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            endpoints: self.endpoints,
            step_len: self.step,
            max_iterations: self.iterations,
            kill_distance: self.kill_distance,
            influence_radius: self.influence,
            seed: self.seed,
            tropism: self.tropism,
            apical: ApicalConfig {
                strength: self.apical_control,
                falloff: self.apical_falloff,
                timing: self.apical_timing,
            },
            max_sample_attempts: self.max_sample_attempts,
        }
    }

    fn builder(&self) -> EngineBuilder {
        let center = DVec3::from_slice(&self.center);
        let mut builder = GrowthEngine::builder(self.config());

        builder = match self.volume {
            Volume::Sphere => builder.volume(SphereVolume::new(center, self.radius)),
            Volume::Cube => {
                let half = DVec3::splat(self.radius);
                builder.volume(BoxVolume::new(center - half, center + half))
            }
        };

        builder = builder.starting_points(self.starts.chunks_exact(3).map(DVec3::from_slice));

        if let Some(floor) = self.floor {
            builder = builder.exclude(move |p: DVec3| p.z < floor);
        }
        builder
    }
}

fn print_summary(growth: &Growth) {
    let tree = &growth.tree;
    let depth = tree
        .leaves()
        .map(|n| tree.ancestry(n.index).count())
        .max()
        .unwrap_or(0);

    println!("generations      {}", growth.stats.generations);
    println!("timed out        {}", growth.stats.timed_out);
    println!("branch points    {}", tree.len());
    println!("roots            {}", tree.roots().count());
    println!("leaves           {}", tree.leaves().count());
    println!("max depth        {depth}");
    println!("endpoints        {}", growth.endpoints.len());
    println!("endpoints added  {}", growth.stats.endpoints_added);
}

/// Initializes `env_logger` at `info`, overridable through `RUST_LOG`.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let engine = args.builder().build()?;
    info!(
        "growing up to {} generation(s) from seed {}",
        args.iterations, args.seed
    );
    let growth = engine.iterate(args.new_endpoints_per_1000, args.max_time)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&growth)?);
    } else {
        print_summary(&growth);
    }
    Ok(())
}
