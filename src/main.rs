use anyhow::{Context, Result};
use clap::Parser;
use crossga::config::ConfigManager;
use crossga::data::CsvConnector;
use crossga::engines::generation::{EvolutionEngine, LogProgressCallback};
use crossga::SearchReport;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "crossga",
    about = "Genetic search for the best moving-average crossover windows"
)]
struct Cli {
    /// CSV file with a close column and optional date column.
    #[arg(long)]
    prices: PathBuf,

    /// TOML config file. Defaults plus CROSSGA__* environment overrides when absent.
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    population: Option<usize>,

    #[arg(long)]
    generations: Option<usize>,

    /// Stop after this many seconds, keeping the best found so far.
    #[arg(long)]
    deadline_secs: Option<f64>,

    /// Write the JSON report here.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let manager = ConfigManager::new();
    match &cli.config {
        Some(path) => manager
            .load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => manager.load_from_env().context("loading config from environment")?,
    }
    manager.update(|c| {
        if let Some(seed) = cli.seed {
            c.evolution.seed = Some(seed);
        }
        if let Some(population) = cli.population {
            c.evolution.population_size = population;
        }
        if let Some(generations) = cli.generations {
            c.evolution.generations = generations;
        }
        if let Some(secs) = cli.deadline_secs {
            c.evolution.deadline_secs = Some(secs);
        }
    })?;
    let config = manager.get();

    let (prices, metadata) = CsvConnector::load_price_series(&cli.prices)
        .with_context(|| format!("loading prices from {}", cli.prices.display()))?;
    log::info!(
        "Loaded {} bars from {} (close column '{}')",
        metadata.num_rows,
        metadata.file_path,
        metadata.close_column
    );

    let engine_config = config.to_engine_config();
    let mut engine = EvolutionEngine::new(engine_config)?;
    let outcome = engine.run(&prices, LogProgressCallback::new(config.evolution.generations))?;

    match &outcome.best {
        Some(best) => println!(
            "Best: short={} long={} final capital={:.2} ({} generations, {:?})",
            best.individual.short_period,
            best.individual.long_period,
            best.fitness,
            outcome.generations_run,
            outcome.stop_reason
        ),
        None => println!("No individual was scored ({:?})", outcome.stop_reason),
    }

    if let Some(path) = &cli.output {
        let report = SearchReport::build(&prices, &outcome, config.backtesting.initial_capital)?;
        report
            .save_json(path)
            .with_context(|| format!("writing report to {}", path.display()))?;
        log::info!("Report written to {}", path.display());
    }

    Ok(())
}
