use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use deinos::engine::EngineConfig;
use deinos::eval::ValueKind;
use deinos::selfplay::{generate_games, write_json_lines, SelfPlayParams};
use log::info;

#[derive(Parser, Debug)]
#[command(name = "deinos-selfplay", about = "Play the tree engine against the random engine")]
struct Args {
    #[arg(long, default_value_t = 4)]
    games: usize,
    #[arg(long, default_value_t = 200)]
    max_plies: usize,
    #[arg(long, default_value_t = 100)]
    think_ms: u64,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value = "material")]
    value: ValueKind,
    /// JSON engine config
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    threads: Option<usize>,
    /// Output file for JSON lines (stdout when absent)
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    let mut config = match &a.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(threads) = a.threads {
        config.threads = threads;
    }
    let params = SelfPlayParams {
        games: a.games,
        max_plies: a.max_plies,
        think_ms: a.think_ms,
        seed: a.seed,
        value: a.value,
        config,
    };

    let games = generate_games(&params)?;
    let score: i32 = games.iter().map(|g| g.tree_score() as i32).sum();
    info!("tree engine score over {} games: {score:+}", games.len());

    match &a.out {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_json_lines(&games, BufWriter::new(file))
        }
        None => write_json_lines(&games, io::stdout().lock()),
    }
}
