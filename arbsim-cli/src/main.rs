//! ArbSim CLI: simulate markets, run arbitrage detection, save artifacts.
//!
//! Commands:
//! - `simulate`: run the market simulation and save ledger + tick artifacts
//! - `detect`: score an existing ledger CSV and write the suspicion table
//! - `run`: simulate then detect, saving the full artifact bundle

mod artifacts;

use anyhow::{bail, Result};
use arbsim_core::rng::RngHierarchy;
use arbsim_core::{simulate, SimConfig, SimulationResult};
use arbsim_detect::{
    read_ledger_file, write_suspicion, write_suspicion_file, DetectionConfig, DetectionEngine,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "arbsim",
    about = "ArbSim CLI: agent-based market simulation and arbitrage detection"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SimArgs {
    /// Simulation config TOML. Defaults apply to anything it leaves out.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the master seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of ticks.
    #[arg(long)]
    ticks: Option<u64>,

    /// Number of runs; run seeds derive from the master seed.
    #[arg(long, default_value_t = 1)]
    runs: u64,

    /// Output directory for run artifacts.
    #[arg(long, default_value = "results")]
    output_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the market simulation and save ledger and tick artifacts.
    Simulate {
        #[command(flatten)]
        sim: SimArgs,
    },
    /// Score an existing ledger CSV.
    Detect {
        /// Ledger CSV to read.
        #[arg(long)]
        ledger: PathBuf,

        /// Detection config TOML.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output CSV path. Writes to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Simulate, then detect on each run's ledger.
    Run {
        #[command(flatten)]
        sim: SimArgs,

        /// Detection config TOML.
        #[arg(long)]
        detect_config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { sim } => run_simulations(&sim, None),
        Commands::Detect {
            ledger,
            config,
            output,
        } => run_detect(ledger, config, output),
        Commands::Run { sim, detect_config } => {
            let detection = load_detection_config(detect_config)?;
            run_simulations(&sim, Some(&detection))
        }
    }
}

fn load_sim_config(args: &SimArgs) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        config.ticks = ticks;
    }
    config.validate()?;
    Ok(config)
}

fn load_detection_config(path: Option<PathBuf>) -> Result<DetectionConfig> {
    Ok(match path {
        Some(path) => DetectionConfig::from_file(&path)?,
        None => DetectionConfig::default(),
    })
}

fn run_simulations(args: &SimArgs, detection: Option<&DetectionConfig>) -> Result<()> {
    if args.runs == 0 {
        bail!("--runs must be at least 1");
    }
    let base = load_sim_config(args)?;
    let engine = detection.map(DetectionEngine::from_config).transpose()?;
    let seeds = RngHierarchy::new(base.seed);
    if args.runs > 1 {
        log::info!("{} runs from master seed {}", args.runs, seeds.master_seed());
    }
    let label = if detection.is_some() { "run" } else { "sim" };

    for index in 0..args.runs {
        let config = SimConfig {
            seed: seeds.run_seed(index),
            ..base.clone()
        };
        let result = simulate(&config)?;
        print_summary(index, &result);

        let run_dir = artifacts::create_run_dir(&args.output_dir, &format!("{label}_{index:03}"))?;
        match (&engine, detection) {
            (Some(engine), Some(detection)) => {
                let table = engine.detect(&result.ledger)?;
                artifacts::save_artifacts(&run_dir, index, &config, &result, Some((detection, &table)))?;
            }
            _ => artifacts::save_artifacts(&run_dir, index, &config, &result, None)?,
        }
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn run_detect(ledger: PathBuf, config: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let config = load_detection_config(config)?;
    let engine = DetectionEngine::from_config(&config)?;
    let trades = read_ledger_file(&ledger)?;
    log::info!("loaded {} trades from {}", trades.len(), ledger.display());
    if trades.is_empty() {
        bail!("ledger {} has no usable trades", ledger.display());
    }
    let table = engine.detect(&trades)?;

    match output {
        Some(path) => {
            write_suspicion_file(&path, &table, config.output_decimals)?;
            println!(
                "Scored {} trades across {} agents; wrote {}",
                trades.len(),
                table.agents().len(),
                path.display()
            );
        }
        None => write_suspicion(std::io::stdout().lock(), &table, config.output_decimals)?,
    }
    Ok(())
}

fn print_summary(index: u64, result: &SimulationResult) {
    println!("=== Run {index} ===");
    println!("Run ID:       {}", &result.run_id[..12.min(result.run_id.len())]);
    println!("Seed:         {}", result.seed);
    println!("Ticks:        {}", result.ticks.len());
    println!("Trades:       {}", result.ledger.len());
    println!("Units traded: {}", result.total_units());
    println!("Final price:  {:.4}", result.final_price);
    if let Some(best) = result
        .final_wealth
        .iter()
        .max_by(|a, b| a.wealth.total_cmp(&b.wealth))
    {
        println!(
            "Top agent:    {} ({}) wealth {:.2}",
            best.agent_id,
            best.strategy.label(),
            best.wealth
        );
    }
}
