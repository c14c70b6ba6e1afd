use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use deinos::eval::{default_prior, ValueKind};
use deinos::mcts::{Expansion, Tree};
use deinos::{AnalysedPosition, Position};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser, Debug)]
#[command(name = "deinos-bench", about = "Single-threaded tree search throughput")]
struct Args {
    /// Tree searches to run
    #[arg(long, default_value_t = 20_000)]
    searches: u64,
    /// FEN string or "startpos"
    #[arg(long, default_value = "startpos")]
    fen: String,
    #[arg(long, default_value_t = 0.5)]
    exploration: f32,
    /// full or incremental
    #[arg(long, default_value = "full")]
    expansion: String,
    #[arg(long, default_value = "material")]
    value: ValueKind,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let position = if args.fen == "startpos" {
        Position::startpos()
    } else {
        Position::from_fen(&args.fen).with_context(|| format!("invalid FEN `{}`", args.fen))?
    };
    let expansion: Expansion = serde_json::from_value(serde_json::Value::String(args.expansion.to_ascii_lowercase()))
        .with_context(|| format!("unknown expansion `{}`", args.expansion))?;
    let tree = Tree::new(AnalysedPosition::new(position), args.value.value_fn(), default_prior(), args.exploration)
        .with_expansion(expansion);

    let bar = ProgressBar::new(args.searches);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {per_sec}")
            .context("progress template")?,
    );
    let t0 = Instant::now();
    for i in 0..args.searches {
        tree.search();
        if i % 256 == 0 {
            bar.set_position(i);
        }
    }
    bar.finish_and_clear();
    let secs = t0.elapsed().as_secs_f64();
    let rate = if secs > 0.0 { args.searches as f64 / secs } else { 0.0 };

    println!("searches: {} elapsed: {secs:.3}s searches/s: {rate:.0}", args.searches);
    println!("root visits: {}", tree.root().total_visits());
    let pv: Vec<String> = tree.principal_variation(8).iter().map(ToString::to_string).collect();
    println!("pv: {}", pv.join(" "));
    Ok(())
}
