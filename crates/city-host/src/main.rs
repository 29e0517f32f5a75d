//! Tree Respiration Simulation
//!
//! Generates a seeded synthetic city and runs the respiration controller
//! against it, one slice per tick, reporting how much pollution the trees
//! removed.

use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use city_host::{
    build_schedule, build_world, step, CityParams, HostConfig, PollutionGrid, RespirationState,
    SimError,
};
use respiration::RespirationConfig;
use respiration_events::Population;

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "respiration_sim")]
#[command(about = "Runs tree respiration over a synthetic city")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 4096)]
    ticks: u64,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the simulation accuracy (clamped to 1..=12)
    #[arg(long)]
    accuracy: Option<i32>,

    /// Override the tree multiplier
    #[arg(long, allow_hyphen_values = true)]
    multiplier_trees: Option<i32>,

    /// Override the building multiplier
    #[arg(long, allow_hyphen_values = true)]
    multiplier_buildings: Option<i32>,

    /// Override the network multiplier
    #[arg(long, allow_hyphen_values = true)]
    multiplier_net: Option<i32>,

    /// Standalone trees in the generated city
    #[arg(long, default_value_t = 20_000)]
    trees: usize,

    /// Buildings in the generated city
    #[arg(long, default_value_t = 4_000)]
    buildings: usize,

    /// Road segments in the generated city
    #[arg(long, default_value_t = 3_000)]
    segments: usize,

    /// Write every sink call as JSON lines to this file
    #[arg(long)]
    dump_log: Option<PathBuf>,

    /// Ticks between progress reports; 0 disables them
    #[arg(long, default_value_t = 512)]
    report_interval: u64,
}

impl Args {
    fn respiration_config(&self) -> Result<RespirationConfig, SimError> {
        let mut config = match &self.config {
            Some(path) => RespirationConfig::from_file(path)?,
            None => RespirationConfig::default(),
        };
        let settings = &mut config.settings;
        if let Some(accuracy) = self.accuracy {
            settings.simulation_accuracy = accuracy;
        }
        if let Some(multiplier) = self.multiplier_trees {
            settings.multiplier_trees = multiplier;
        }
        if let Some(multiplier) = self.multiplier_buildings {
            settings.multiplier_buildings = multiplier;
        }
        if let Some(multiplier) = self.multiplier_net {
            settings.multiplier_net = multiplier;
        }
        Ok(config)
    }

    fn host_config(&self) -> HostConfig {
        HostConfig {
            seed: self.seed,
            city: CityParams {
                trees: self.trees,
                buildings: self.buildings,
                segments: self.segments,
                ..CityParams::default()
            },
            record_dumps: self.dump_log.is_some(),
            ..HostConfig::default()
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), SimError> {
    let config = args.respiration_config()?;
    let host = args.host_config();

    println!("Tree Respiration Simulation");
    println!("===========================");
    println!("Seed: {}", args.seed);
    println!("Ticks: {}", args.ticks);
    println!(
        "Multipliers: trees {}, buildings {}, net {}",
        config.settings.multiplier_trees,
        config.settings.multiplier_buildings,
        config.settings.multiplier_net
    );
    println!("Accuracy: {}", config.settings.accuracy());
    println!();

    let mut world = build_world(config, &host);
    let mut schedule = build_schedule();

    let mut dump_log = match &args.dump_log {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };

    for tick in 0..args.ticks {
        step(&mut world, &mut schedule, tick);

        if let Some(writer) = dump_log.as_mut() {
            let records = world.resource_mut::<PollutionGrid>().take_records();
            for record in &records {
                writeln!(writer, "{}", record.to_jsonl()?)?;
            }
        }

        if args.report_interval > 0 && tick > 0 && tick % args.report_interval == 0 {
            let grid = world.resource::<PollutionGrid>();
            let state = world.resource::<RespirationState>();
            info!(
                tick,
                pollution = grid.total_pollution(),
                removed = grid.reported(),
                dumps = state.totals.total(),
                "progress"
            );
        }
    }

    if let Some(mut writer) = dump_log {
        writer.flush()?;
    }

    let grid = world.resource::<PollutionGrid>();
    let state = world.resource::<RespirationState>();
    let cadence = state.controller.cadence();

    println!();
    println!("Simulation complete. Ran {} ticks.", args.ticks);
    println!("Items processed per frame: {}", cadence.base_divisor);
    println!("Strength offset: {}", cadence.strength_offset);
    for population in Population::ALL {
        println!(
            "  {:<10} stride {:>5}  dumps {:>10}",
            population.to_string(),
            cadence.stride(population),
            state.totals[population]
        );
    }
    println!(
        "Species effects cached: {}",
        state.controller.species_cache().len()
    );
    println!("Pollution removed: {}", -grid.reported());
    println!("Pollution remaining: {}", grid.total_pollution());
    if let Some(path) = &args.dump_log {
        println!("Dump log: {}", path.display());
    }

    Ok(())
}
