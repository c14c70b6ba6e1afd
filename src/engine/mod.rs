//! Move choosers driven by the protocol loop and the self-play driver.

mod random;
mod tree_engine;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::board::{MoveRecord, ParseError, Position};
use crate::mcts::Expansion;

pub use random::RandomEngine;
pub use tree_engine::TreeEngine;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Search worker threads.
    pub threads: usize,
    pub exploration: f32,
    /// Root visits above which workers idle instead of growing the tree.
    pub visit_cap: u32,
    /// Search steps per read lock; the last one is tracked.
    pub batch: u32,
    pub throttle_ms: u64,
    pub expansion: Expansion,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            threads: 4,
            exploration: 0.5,
            visit_cap: 10_000_000,
            batch: 1000,
            throttle_ms: 1,
            expansion: Expansion::Full,
        }
    }
}

impl EngineConfig {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Reads a JSON object; missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<EngineConfig> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_context(|| format!("reading engine config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing engine config {}", path.display()))
    }
}

/// The two move choosers behind one interface.
pub enum Engine {
    Random(RandomEngine),
    Tree(TreeEngine),
}

impl Engine {
    pub fn choose_move(&mut self) -> Option<MoveRecord> {
        match self {
            Engine::Random(e) => e.choose_move(),
            Engine::Tree(e) => e.choose_move(),
        }
    }

    /// Plays `record`, which must be a pseudo-legal move in the current position.
    pub fn force_move(&mut self, record: MoveRecord) -> Result<(), ParseError> {
        match self {
            Engine::Random(e) => e.force_move(record),
            Engine::Tree(e) => e.force_move(record),
        }
    }

    /// Moves to `position`. Returns `true` when search state carried over.
    pub fn set_position(&mut self, position: Position) -> bool {
        match self {
            Engine::Random(e) => e.set_position(position),
            Engine::Tree(e) => e.set_position(position),
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Engine::Random(e) => e.position().clone(),
            Engine::Tree(e) => e.position(),
        }
    }

    pub fn display(&self) -> String {
        match self {
            Engine::Random(e) => e.position().diagram(),
            Engine::Tree(e) => e.summary(),
        }
    }
}

impl From<RandomEngine> for Engine {
    fn from(e: RandomEngine) -> Self {
        Engine::Random(e)
    }
}

impl From<TreeEngine> for Engine {
    fn from(e: TreeEngine) -> Self {
        Engine::Tree(e)
    }
}
