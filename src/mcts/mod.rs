//! Monte Carlo tree search over analysed positions.
//!
//! Statistics live in atomics on each edge, so many threads can search one
//! tree through a shared reference. Children are created at most once per
//! edge; a thread that loses the race to create one simply descends into it.
//! Values are always from White's point of view.

pub mod edge;
pub mod node;
pub mod tree;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysedPosition;
use crate::board::{MoveRecord, Side};

pub use edge::{Edge, EdgeState};
pub use node::Node;
pub use tree::Tree;

/// Scores a freshly expanded leaf in [0, 1], 1 meaning White wins.
pub type ValueFn = Arc<dyn Fn(&AnalysedPosition) -> f32 + Send + Sync>;

/// Bias for a move out of a position. Carried with the tree for callers that
/// want it; selection does not consult it.
pub type PriorFn = Arc<dyn Fn(&AnalysedPosition, MoveRecord) -> f32 + Send + Sync>;

pub fn value_fn(f: impl Fn(&AnalysedPosition) -> f32 + Send + Sync + 'static) -> ValueFn {
    Arc::new(f)
}

pub fn prior_fn(f: impl Fn(&AnalysedPosition, MoveRecord) -> f32 + Send + Sync + 'static) -> PriorFn {
    Arc::new(f)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    Win(Side),
    Draw,
}

impl GameResult {
    pub fn value(self) -> f32 {
        match self {
            GameResult::Win(Side::White) => 1.0,
            GameResult::Win(Side::Black) => 0.0,
            GameResult::Draw => 0.5,
        }
    }
}

/// How a child's analysis is derived from its parent's.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expansion {
    /// Analyse the child position from scratch.
    #[default]
    Full,
    /// Update a copy of the parent's analysis in place for simple moves,
    /// falling back to a full scan for castling, en passant and promotions.
    Incremental,
}
