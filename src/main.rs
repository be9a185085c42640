use clap::Parser;
use linesim::{replicate_line, ConcurrencyMode, LineConfig, ReplicationConfig, Summary};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "linesim",
    about = "Simulate a two-stage production line with rework and bound secondaries"
)]
struct Cli {
    /// Line description in JSON. Defaults to the reference two-stage line.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Simulated time to run for
    #[arg(long, default_value_t = 100_000.0)]
    horizon: f64,
    /// Queue threshold of the activation controller
    #[arg(long)]
    threshold: Option<usize>,
    /// Seed of the single run, or of the first replication
    #[arg(long)]
    seed: Option<u64>,
    /// Number of independent replications, run on a Rayon pool when above one
    #[arg(long, default_value_t = 1)]
    replications: u64,
    /// Rayon pool size for replications
    #[arg(long)]
    threads: Option<usize>,
}

fn print_summary(summary: &Summary) {
    println!("Run {} stopped at t={:.2}", summary.run_id, summary.simulated_time);
    println!(
        "  produced={} finished={} scrap={} dropped={} in_system={}",
        summary.produced_count,
        summary.finished_count,
        summary.scrap_count,
        summary.dropped_count,
        summary.in_system
    );
    for report in &summary.stations {
        println!(
            "  {:<14} {:<10} utilization={:.4} mean_queue={:.3} completions={} drops={}{}",
            report.name,
            report.kind.to_string(),
            report.utilization,
            report.mean_queue_size,
            report.completions,
            report.drops,
            if report.active { "" } else { " (blocked)" }
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let mut line = match &cli.config {
        Some(path) => serde_json::from_str::<LineConfig>(&fs::read_to_string(path)?)?,
        None => LineConfig::two_stage_line(3),
    };
    if let Some(threshold) = cli.threshold {
        line.activation_threshold = threshold;
    }

    if cli.replications <= 1 {
        if let Some(seed) = cli.seed {
            line.seed = Some(seed);
        }
        let mut simulation = line.build()?;
        let summary = simulation.simulate(cli.horizon)?;
        print_summary(&summary);
        return Ok(());
    }

    let first_seed = cli.seed.unwrap_or(0);
    let mut config = ReplicationConfig::new(cli.horizon, cli.replications)
        .with_seeds((first_seed..first_seed + cli.replications).collect())
        .with_concurrency(ConcurrencyMode::Rayon);
    if let Some(threads) = cli.threads {
        config = config.with_thread_pool_size(threads);
    }

    let summaries = replicate_line(&line, &config)?;
    for (seed, summary) in config.seeds.iter().zip(&summaries) {
        println!("Seed {}", seed);
        print_summary(summary);
    }

    Ok(())
}
