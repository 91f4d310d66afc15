use std::{error::Error, fs::File, path::PathBuf};

use clap::Parser;
use log::{info, LevelFilter};
use smartcab::{algo::QTableAgent, config::Settings, env::ScriptedEnv};

/// Train a smartcab agent on a recorded trip
#[derive(Parser, Debug)]
#[command(about = "Replay a recorded smartcab trip through a Q-learning agent", long_about = None)]
struct Args {
    /// Path to the agent configuration TOML file
    config_path: PathBuf,

    /// Path to the trip CSV (`light,oncoming,left,right,waypoint,reward`)
    script_path: PathBuf,

    /// Number of trials to run
    #[arg(short = 'n', long, default_value_t = 100)]
    trials: u32,

    /// Where to write the learned value table
    #[arg(long, default_value = "q_table.csv")]
    table_out: PathBuf,

    /// Where to write the per-step review
    #[arg(long, default_value = "review.csv")]
    review_out: PathBuf,

    /// Log every step
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(level: LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    setup_logging(if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    })?;

    let settings = Settings::load(&args.config_path)?;
    let mut agent = QTableAgent::new(settings.agent_config()?)?;
    let mut env = ScriptedEnv::from_csv(File::open(&args.script_path)?)?;
    info!(
        "replaying {} steps from {} for {} trials",
        env.len(),
        args.script_path.display(),
        args.trials
    );

    for _ in 0..args.trials {
        agent.go(&mut env)?;
    }

    agent.table().write_csv(File::create(&args.table_out)?)?;
    agent.review().write_csv(File::create(&args.review_out)?)?;
    info!(
        "wrote {} and {}",
        args.table_out.display(),
        args.review_out.display()
    );

    Ok(())
}
