//! Tree engine against the random engine, one opening line per game.

use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::info;
use serde::Serialize;

use crate::analysis::AnalysedPosition;
use crate::board::{Position, Side};
use crate::engine::{EngineConfig, RandomEngine, TreeEngine};
use crate::eval::{default_prior, ValueKind};
use crate::openings::Opening;
use crate::perft::legal_moves;

#[derive(Clone, Debug)]
pub struct SelfPlayParams {
    pub games: usize,
    pub max_plies: usize,
    /// Thinking time per tree engine move.
    pub think_ms: u64,
    pub seed: u64,
    pub value: ValueKind,
    pub config: EngineConfig,
}

impl Default for SelfPlayParams {
    fn default() -> Self {
        SelfPlayParams {
            games: 4,
            max_plies: 200,
            think_ms: 100,
            seed: 42,
            value: ValueKind::Material,
            config: EngineConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct GameRecord {
    pub opening: &'static str,
    /// `white` or `black`.
    pub tree_side: String,
    pub start_fen: String,
    pub moves: Vec<String>,
    /// `1-0`, `0-1` or `1/2-1/2`.
    pub result: &'static str,
    pub termination: &'static str,
}

impl GameRecord {
    /// +1 when the tree engine won, -1 when it lost, 0 for draws.
    pub fn tree_score(&self) -> i8 {
        match (self.result, self.tree_side.as_str()) {
            ("1-0", "white") | ("0-1", "black") => 1,
            ("1-0", "black") | ("0-1", "white") => -1,
            _ => 0,
        }
    }
}

/// Plays game `index`: opening `index` of the book, with the tree engine
/// taking White on even indices.
pub fn play_game(params: &SelfPlayParams, index: usize) -> Result<GameRecord> {
    let opening = Opening::nth(index);
    let start = opening.position()?;
    let tree_side = if index % 2 == 0 { Side::White } else { Side::Black };
    let tree = TreeEngine::new(
        AnalysedPosition::new(start.clone()),
        params.value.value_fn(),
        default_prior(),
        params.config.clone(),
    );
    let mut random = RandomEngine::new(start.clone(), params.seed.wrapping_add(index as u64));
    let think = Duration::from_millis(params.think_ms);

    let mut position: Position = start.clone();
    let mut moves = Vec::new();
    let (result, termination) = loop {
        let analysed = AnalysedPosition::new(position.clone());
        let legal = legal_moves(&analysed);
        if legal.is_empty() {
            break match (analysed.legal_check(), position.to_move()) {
                (true, Side::White) => ("0-1", "checkmate"),
                (true, Side::Black) => ("1-0", "checkmate"),
                (false, _) => ("1/2-1/2", "stalemate"),
            };
        }
        if moves.len() >= params.max_plies {
            break ("1/2-1/2", "ply limit");
        }
        if position.halfmove_clock() >= 100 {
            break ("1/2-1/2", "fifty moves");
        }

        let chosen = if position.to_move() == tree_side {
            thread::sleep(think);
            tree.choose_move().filter(|m| legal.contains(m)).unwrap_or(legal[0])
        } else {
            random.choose_move().unwrap_or(legal[0])
        };
        tree.force_move(chosen)?;
        random.force_move(chosen)?;
        position = position.after(chosen);
        moves.push(chosen.to_string());
    };

    info!("game {index} ({}): {result} by {termination} after {} plies", opening.name, moves.len());
    Ok(GameRecord {
        opening: opening.name,
        tree_side: tree_side.to_string(),
        start_fen: start.to_fen(),
        moves,
        result,
        termination,
    })
}

pub fn generate_games(params: &SelfPlayParams) -> Result<Vec<GameRecord>> {
    (0..params.games).map(|i| play_game(params, i)).collect()
}

/// One JSON object per line.
pub fn write_json_lines<W: Write>(games: &[GameRecord], mut out: W) -> Result<()> {
    for game in games {
        serde_json::to_writer(&mut out, game)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
