//! Plant Evolver - L-system plants with structural mutation
//!
//! CLI commands:
//! - presets: List built-in grammars
//! - grow: Grow a preset and report (or dump) its render commands
//! - random: Same for a randomly generated plant
//! - evolve: Breed generations of mutated children
//! - preview: Draw a plant as ASCII art

mod camera;
mod color;
mod config;
mod error;
mod logging;
mod lsystem;
mod mutation;
mod plant;
mod render;
mod sampling;
mod turtle;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

use crate::camera::Camera;
use crate::lsystem::RuleBody;
use crate::plant::{Plant, Preset};
use crate::render::{render, AsciiCanvas};
use crate::turtle::RenderCommand;

#[derive(Parser)]
#[command(name = "plant_evolver")]
#[command(about = "Grow and mutate L-system plants")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to plants.yaml config
    #[arg(short, long, default_value = "plants.yaml")]
    config: PathBuf,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in presets
    Presets,

    /// Grow a preset plant
    Grow {
        /// Preset name (defaults to the configured preset)
        #[arg(short, long)]
        preset: Option<Preset>,

        /// Print render commands as JSON
        #[arg(long)]
        json: bool,
    },

    /// Grow a plant from random rules and draw settings
    Random {
        /// Print render commands as JSON
        #[arg(long)]
        json: bool,
    },

    /// Breed mutated generations, keeping a random child each time
    Evolve {
        #[arg(short, long)]
        preset: Option<Preset>,

        #[arg(short, long)]
        generations: Option<usize>,

        /// Children per generation
        #[arg(short, long)]
        brood: Option<usize>,
    },

    /// Draw a plant as ASCII art
    Preview {
        #[arg(short, long)]
        preset: Option<Preset>,

        /// Mutations applied before drawing
        #[arg(short, long, default_value = "0")]
        mutations: usize,

        #[arg(long)]
        width: Option<usize>,

        #[arg(long)]
        height: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let env = config::Env::load();

    // Initialize logging first
    logging::init_logging(&env.log_dir)?;
    tracing::info!("Plant Evolver starting up");

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        tracing::info!("Loading config from {:?}", cli.config);
        config::Config::load(&cli.config)?
    } else {
        tracing::debug!("Config file not found: {:?}, using defaults", cli.config);
        config::Config::default()
    };

    let mut rng = match config.resolve_seed(cli.seed, &env) {
        Some(seed) => {
            tracing::info!(seed, "Using fixed seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    match cli.command {
        Commands::Presets => list_presets(),

        Commands::Grow { preset, json } => {
            let preset = preset.unwrap_or(config.default_preset);
            let plant = Plant::from_preset(preset, &mut rng)?;
            report(preset.name(), &plant, json)?;
        }

        Commands::Random { json } => {
            let plant = Plant::random(&mut rng)?;
            report("random", &plant, json)?;
        }

        Commands::Evolve {
            preset,
            generations,
            brood,
        } => {
            let preset = preset.unwrap_or(config.default_preset);
            let generations = generations.unwrap_or(config.generations);
            let brood = brood.unwrap_or(config.brood_size);
            evolve(Plant::from_preset(preset, &mut rng)?, generations, brood, &mut rng);
        }

        Commands::Preview {
            preset,
            mutations,
            width,
            height,
        } => {
            let preset = preset.unwrap_or(config.default_preset);
            let mut plant = Plant::from_preset(preset, &mut rng)?;
            for _ in 0..mutations {
                plant = plant.get_mutation(&mut rng)?;
            }
            let width = width.unwrap_or(config.preview.width);
            let height = height.unwrap_or(config.preview.height);
            print!("{}", preview(plant.commands(), width, height));
        }
    }

    Ok(())
}

fn list_presets() {
    println!("Available presets ({}):", Preset::ALL.len());
    println!();
    for preset in Preset::ALL {
        println!("## {}", preset);
        println!("  axiom: {}", preset.axiom());
        let settings = preset.draw_settings();
        println!(
            "  angle: {}, segment: {}, leaf shape: {}",
            settings.angle,
            settings.trunk_segment_length,
            settings.leaf_shape.id()
        );
        print_rule(&preset.growth_rule());
    }
}

fn print_rule(rule: &RuleBody) {
    match rule {
        RuleBody::Fixed(branch) => println!("  X -> {}", branch),
        RuleBody::Weighted(candidates) => {
            for (branch, weight) in candidates {
                println!("  X -> {} ({:.2})", branch, weight);
            }
        }
    }
}

fn report(name: &str, plant: &Plant, json: bool) -> anyhow::Result<()> {
    if json {
        let data = serde_json::json!({
            "name": name,
            "axiom": plant.axiom(),
            "length": plant.length(),
            "rules": plant.rules(),
            "draw_settings": plant.draw_settings(),
            "commands": plant.commands(),
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    let leaves = plant
        .commands()
        .iter()
        .filter(|c| matches!(c, RenderCommand::Leaf(_)))
        .count();

    println!("{} (length {:.2})", name, plant.length());
    println!("  axiom: {}", plant.axiom());
    if let Some(rule) = plant.growth_rule() {
        print_rule(rule);
    }
    println!("  grown: {} symbols", plant.state().len());
    println!(
        "  commands: {} trunk segments, {} leaves",
        plant.commands().len() - leaves,
        leaves
    );
    Ok(())
}

fn evolve<R: Rng>(mut parent: Plant, generations: usize, brood: usize, rng: &mut R) {
    for generation in 1..=generations {
        let children = parent.brood(brood, rng);
        println!("=== Generation {} ===", generation);
        for (i, child) in children.iter().enumerate().skip(1) {
            println!("[{}] length {:.2}", i, child.length());
            if let Some(rule) = child.growth_rule() {
                print_rule(rule);
            }
        }

        if children.len() > 1 {
            let pick = rng.gen_range(1..children.len());
            tracing::info!(generation, pick, "Selected child");
            parent = children[pick].clone();
        }
        println!();
    }
}

fn preview(commands: &[RenderCommand], width: usize, height: usize) -> AsciiCanvas {
    let mut canvas = AsciiCanvas::new(width, height);
    if let Some(bounds) = turtle::bounds(commands) {
        let camera = Camera::fit(bounds, width as f64 - 1.0, height as f64 - 1.0, 1.0);
        render(commands, &camera, &mut canvas);
    }
    canvas
}
