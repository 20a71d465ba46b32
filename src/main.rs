use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use dining::config::{DEFAULT_PHILOSOPHERS, DEFAULT_ROUNDS};
use dining::{menu, DiningError, SimConfig, Simulation, StrategyKind};

#[derive(Parser)]
#[command(name = "dining")]
#[command(version)]
#[command(about = "Dining philosophers with four fork-sharing strategies")]
struct Cli {
    /// Number of philosophers (and forks)
    #[arg(short = 'n', long, default_value_t = DEFAULT_PHILOSOPHERS)]
    philosophers: usize,

    /// Meals per philosopher
    #[arg(long, default_value_t = DEFAULT_ROUNDS)]
    rounds: usize,

    #[arg(long, default_value_t = 10)]
    eat_min_ms: u64,

    #[arg(long, default_value_t = 29)]
    eat_max_ms: u64,

    #[arg(long, default_value_t = 10)]
    think_min_ms: u64,

    #[arg(long, default_value_t = 29)]
    think_max_ms: u64,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Run one strategy and exit (1=monitor 2=semaphore 3=mutex per fork 4=waiter)
    #[arg(long)]
    strategy: Option<u8>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    let config = SimConfig {
        philosophers: cli.philosophers,
        rounds: cli.rounds,
        eat_ms: cli.eat_min_ms..=cli.eat_max_ms,
        think_ms: cli.think_min_ms..=cli.think_max_ms,
        seed: cli.seed,
    };
    let sim = Simulation::new(config)?;
    println!("{}", sim.table());

    match cli.strategy {
        Some(code) => {
            let kind = StrategyKind::from_code(code)
                .ok_or_else(|| DiningError::InvalidOption(code.to_string()))?;
            let report = sim.run(kind)?;
            println!("{report}");
        }
        None => {
            let stdin = io::stdin();
            menu::run_menu(stdin.lock(), io::stdout(), |kind| sim.run(kind))?;
        }
    }

    Ok(())
}
