use anyhow::{Context, Result};
use biotope_lib::model::config::AppConfig;
use biotope_lib::model::persistence;
use biotope_lib::{GameHost, GatherFlags};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(short, long, conflicts_with = "generations")]
    ticks: Option<u64>,

    /// Number of generations to run
    #[arg(short, long)]
    generations: Option<u64>,

    /// Seed overriding the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Saved step to resume from
    #[arg(long)]
    load: Option<PathBuf>,

    /// Where to save the final step
    #[arg(long)]
    save: Option<PathBuf>,

    /// Log progress every N ticks (0 disables)
    #[arg(long, default_value_t = 100)]
    report_every: u64,
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            AppConfig::from_toml(&content)
        }
        None => Ok(AppConfig::default()),
    }
}

fn main() -> Result<()> {
    biotope_lib::model::host::init_logging();
    let args = Args::parse();

    let mut config = load_config(args.config.as_ref())?;
    if args.seed.is_some() {
        config.world.seed = args.seed;
    }

    let mut host = GameHost::new(config)?;
    match &args.load {
        Some(path) => {
            let step = persistence::load_step(path)
                .with_context(|| format!("loading step {}", path.display()))?;
            host.load_step(step)?;
        }
        None => host.populate()?,
    }

    if let Some(generations) = args.generations {
        for _ in 0..generations {
            let summary = host.run_generation()?;
            tracing::info!(
                generation = summary.generation,
                best = ?summary.best_creature,
                extinct = summary.extinct,
                "Generation finished"
            );
        }
    } else {
        let ticks = args.ticks.unwrap_or(host.config.generation.iterations_per_generation);
        for _ in 0..ticks {
            let result = host.advance(GatherFlags::NONE)?;
            if args.report_every > 0 && result.tick % args.report_every == 0 {
                tracing::info!(
                    tick = result.tick,
                    creatures = host.step.live_creature_count(),
                    food = host.step.food.len(),
                    best = ?host.best_creature(),
                    "Progress"
                );
            }
            if host.step.live_creature_count() == 0 {
                tracing::info!(tick = result.tick, "Population extinct");
                break;
            }
        }
    }

    if let Some(path) = &args.save {
        persistence::save_step(&host.step, path)
            .with_context(|| format!("saving step {}", path.display()))?;
        tracing::info!(path = %path.display(), "Step saved");
    }
    Ok(())
}
