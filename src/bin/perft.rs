use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use deinos::perft::{divide, perft, perft_parallel};
use deinos::{AnalysedPosition, Position};

#[derive(Parser, Debug)]
#[command(name = "perft", about = "Perft driver for deinos")]
struct Args {
    /// Search depth
    #[arg(value_name = "DEPTH")]
    depth: u32,
    /// FEN string or "startpos"
    #[arg(value_name = "FEN", default_value = "startpos")]
    fen: String,
    /// Print per-move node counts
    #[arg(long, default_value_t = false)]
    divide: bool,
    /// Split the root moves over the rayon pool
    #[arg(long, default_value_t = false)]
    parallel: bool,
    /// Number of threads for the rayon pool (0 = rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("building thread pool")?;
    }

    let position = if args.fen == "startpos" {
        Position::startpos()
    } else {
        Position::from_fen(&args.fen).with_context(|| format!("invalid FEN `{}`", args.fen))?
    };
    let root = AnalysedPosition::new(position);

    let t0 = Instant::now();
    let nodes = if args.divide {
        let split = divide(&root, args.depth);
        for (record, count) in &split {
            println!("{record}: {count}");
        }
        split.iter().map(|(_, n)| n).sum()
    } else if args.parallel {
        perft_parallel(&root, args.depth)
    } else {
        perft(&root, args.depth)
    };
    let secs = t0.elapsed().as_secs_f64();
    let nps = if secs > 0.0 { nodes as f64 / secs } else { 0.0 };
    println!("nodes: {nodes} elapsed: {secs:.3}s nps: {nps:.0}");
    Ok(())
}
