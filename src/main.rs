use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use deinos::engine::{Engine, EngineConfig, RandomEngine, TreeEngine};
use deinos::eval::{default_prior, ValueKind};
use deinos::protocol::ProtocolLoop;
use deinos::{AnalysedPosition, Position};

#[derive(Parser, Debug)]
#[command(author, version, about = "deinos text protocol engine", long_about = None)]
struct Args {
    /// Starting FEN (defaults to the standard start)
    #[arg(long)]
    fen: Option<String>,

    /// JSON engine config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Search threads
    #[arg(long)]
    threads: Option<usize>,

    /// Exploration coefficient
    #[arg(long)]
    exploration: Option<f32>,

    /// Thinking time per `go`, in milliseconds
    #[arg(long, default_value_t = 1000)]
    think_ms: u64,

    /// Leaf value function: uniform or material
    #[arg(long, default_value = "material")]
    value: ValueKind,

    /// Play random legal moves instead of searching
    #[arg(long)]
    random: bool,

    /// Seed for --random
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if let Some(c) = args.exploration {
        config.exploration = c;
    }

    let position = match &args.fen {
        Some(fen) => Position::from_fen(fen).with_context(|| format!("invalid --fen `{fen}`"))?,
        None => Position::startpos(),
    };

    let engine: Engine = if args.random {
        RandomEngine::new(position, args.seed).into()
    } else {
        TreeEngine::new(AnalysedPosition::new(position), args.value.value_fn(), default_prior(), config).into()
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    ProtocolLoop::new(engine, Duration::from_millis(args.think_ms)).run(stdin.lock(), stdout.lock())
}
