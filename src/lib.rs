//! deinos: a chess engine built on Monte Carlo tree search over an
//! array-based move generator that keeps per-square attack counts.

pub mod analysis;
pub mod board;
pub mod engine;
pub mod eval;
pub mod mcts;
pub mod openings;
pub mod perft;
pub mod protocol;
pub mod selfplay;

pub use analysis::AnalysedPosition;
pub use board::{Move, MoveRecord, ParseError, Position, Side, Square};
pub use engine::{Engine, EngineConfig, RandomEngine, TreeEngine};
pub use mcts::{GameResult, Tree};
