use anyhow::Context;
use clap::Parser;
use log::*;
use oh_race::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run headless races and save per-step traces", long_about = None)]
struct Args {
    /// Number of races to run
    #[arg(long, default_value = "30")]
    runs: u32,

    /// World seed of the first race; race i (counting from 1) uses seed + i - 1
    #[arg(long, default_value = "1")]
    seed: u64,

    /// RON configuration file; built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for the CSV traces
    #[arg(long, default_value = "batch_results")]
    out: PathBuf,

    /// Print an ASCII preview of every generated world
    #[arg(long)]
    preview: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RaceConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => RaceConfig::default(),
    };

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create output directory {}", args.out.display()))?;

    info!(
        "Running {} races, agents: {}",
        args.runs,
        config
            .agents
            .iter()
            .map(|kind| kind.display_name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut wins = vec![0u32; config.agents.len()];
    let mut efficient_counts = vec![0u32; config.agents.len()];
    let mut without_winner = 0u32;

    for run_index in 1..=args.runs {
        let seed = args.seed + (run_index - 1) as u64;

        let outcome = match Race::run(&config, Some(seed), seed) {
            Ok(outcome) => outcome,
            Err(RaceError::Generation(err)) => {
                warn!("Run {} (seed {}) skipped: {}", run_index, seed, err);
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        if args.preview {
            println!(
                "{}\n",
                render_ascii(&outcome.world.grid, &outcome.world.placement)
            );
        }

        let path = args.out.join(format!("run_{:02}_seed_{}.csv", run_index, seed));
        let file = File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
        write_trace_csv(BufWriter::new(file), &outcome.runs)
            .with_context(|| format!("failed to write {}", path.display()))?;

        if let Some(efficient) = outcome.most_efficient() {
            debug!(
                "Run {} (seed {}): agent {} ({}) most efficient with {} time left",
                run_index,
                seed,
                efficient.agent_id,
                efficient.algorithm,
                efficient.trace.final_timer()
            );
            efficient_counts[efficient.agent_id] += 1;
        }

        match outcome.winner() {
            Some(winner) => {
                wins[winner.agent_id] += 1;
                info!(
                    "Run {} (seed {}): agent {} ({}) wins with {} points, saved {}",
                    run_index,
                    seed,
                    winner.agent_id,
                    winner.algorithm,
                    winner.trace.final_score(),
                    path.display()
                );
            }
            None => {
                without_winner += 1;
                info!(
                    "Run {} (seed {}): nobody reached the office, saved {}",
                    run_index,
                    seed,
                    path.display()
                );
            }
        }
    }

    for (agent_id, kind) in config.agents.iter().enumerate() {
        info!(
            "Agent {} ({}): {} wins, most efficient {} times",
            agent_id, kind, wins[agent_id], efficient_counts[agent_id]
        );
    }
    info!("Races without a winner: {}", without_winner);

    Ok(())
}
