use std::fmt::Write as _;
use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};
use std::sync::OnceLock;

use crate::analysis::AnalysedPosition;
use crate::board::{Move, MoveRecord, Side};

use super::edge::{Edge, EdgeState};
use super::GameResult;

/// How many of the most visited edges a node remembers.
pub const HOT_EDGES: usize = 4;
const NO_EDGE: u16 = u16::MAX;

/// A position in the search tree. The analysis is fixed at construction; only
/// the counters, the result and the children change afterwards.
pub struct Node {
    position: AnalysedPosition,
    white_to_play: bool,
    edges: Box<[Edge]>,
    total: AtomicU32,
    result: OnceLock<GameResult>,
    hot: [AtomicU16; HOT_EDGES],
}

impl Node {
    pub fn new(position: AnalysedPosition) -> Node {
        let edges = (0..position.moves().len()).map(|_| Edge::new()).collect();
        Node {
            white_to_play: position.to_move() == Side::White,
            position,
            edges,
            total: AtomicU32::new(1),
            result: OnceLock::new(),
            hot: std::array::from_fn(|_| AtomicU16::new(NO_EDGE)),
        }
    }

    pub fn position(&self) -> &AnalysedPosition {
        &self.position
    }

    pub fn white_to_play(&self) -> bool {
        self.white_to_play
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, index: usize) -> &Edge {
        &self.edges[index]
    }

    pub fn edge_state(&self, index: usize) -> EdgeState<'_> {
        self.edges[index].state()
    }

    /// The move behind edge `index`.
    pub fn edge_move(&self, index: usize) -> Move<'_> {
        self.position.get_move(index)
    }

    pub fn total_visits(&self) -> u32 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result.get().copied()
    }

    pub fn is_resolved(&self) -> bool {
        self.result.get().is_some()
    }

    /// Settles a node that has no move left to search. A side to move that is
    /// in check has lost; otherwise it is a draw. This stands in for real
    /// mate and stalemate detection.
    pub fn resolve(&self) -> GameResult {
        *self.result.get_or_init(|| {
            if self.position.legal_check() {
                GameResult::Win(!self.position.to_move())
            } else {
                GameResult::Draw
            }
        })
    }

    /// Backs `value` up through edge `index`.
    pub fn update(&self, index: usize, value: f32) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.edges[index].record(value);
    }

    pub fn increment(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    /// Most visited edge that is not pruned, first on ties.
    pub fn preferred_index(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (i, edge) in self.edges.iter().enumerate() {
            if edge.is_pruned() {
                continue;
            }
            let visits = edge.visits();
            if best.map_or(true, |(_, v)| visits > v) {
                best = Some((i, visits));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Most visited move, or `None` when the node is resolved or nothing has
    /// been searched yet.
    pub fn best_move(&self) -> Option<MoveRecord> {
        if self.is_resolved() {
            return None;
        }
        let index = self.preferred_index()?;
        if self.edges[index].visits() == 0 {
            return None;
        }
        Some(self.position.moves()[index])
    }

    /// Expanded child whose FEN matches `fen` in every field but en passant.
    ///
    /// A child reached by a double push carries an en passant target the GUI
    /// may omit when no capture is possible, so that field is not compared.
    pub fn find_child_by_fen(&self, fen: &str) -> Option<usize> {
        let wanted = fen_without_en_passant(fen)?;
        self.edges.iter().position(|edge| match edge.child() {
            Some(child) => fen_without_en_passant(&child.position.position().to_fen()).as_ref() == Some(&wanted),
            None => false,
        })
    }

    pub fn find_child_by_move(&self, record: &MoveRecord) -> Option<usize> {
        let index = self.position.moves().iter().position(|m| m == record)?;
        self.edges[index].child().map(|_| index)
    }

    pub(crate) fn take_child(&mut self, index: usize) -> Option<Box<Node>> {
        self.edges.get_mut(index)?.take_child()
    }

    /// Recomputes the hot edge list from the current visit counts.
    pub fn refresh_hot_edges(&self) {
        let mut ranked: Vec<(usize, u32)> = self.edges.iter().map(|e| e.visits()).enumerate().filter(|&(_, v)| v > 0).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        for (slot, hot) in self.hot.iter().enumerate() {
            let index = ranked.get(slot).map_or(NO_EDGE, |&(i, _)| i as u16);
            hot.store(index, Ordering::Relaxed);
        }
    }

    pub fn hot_edges(&self) -> Vec<usize> {
        self.hot
            .iter()
            .map(|h| h.load(Ordering::Relaxed))
            .take_while(|&i| i != NO_EDGE)
            .map(usize::from)
            .collect()
    }

    /// Debug dump: FEN, visits, every edge's statistics and the hot list.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.position.position());
        if let Some(result) = self.result() {
            let _ = writeln!(out, "result: {result:?}");
        }
        let _ = writeln!(out, "total visits: {}", self.total_visits());
        for (i, edge) in self.edges.iter().enumerate() {
            let mv = self.edge_move(i);
            match edge.state() {
                EdgeState::Pruned => {
                    let _ = writeln!(out, "{mv}: pruned");
                }
                _ if edge.visits() == 0 => {
                    let _ = writeln!(out, "{mv}: 0 unknown");
                }
                _ => {
                    let _ = writeln!(out, "{mv}: {} {:.4}", edge.visits(), edge.average());
                }
            }
        }
        let hot: Vec<String> = self.hot_edges().iter().map(|i| i.to_string()).collect();
        let _ = write!(out, "hot: {}", hot.join(" "));
        out
    }
}

fn fen_without_en_passant(fen: &str) -> Option<Vec<&str>> {
    let mut fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() != 6 {
        return None;
    }
    fields.remove(3);
    Some(fields)
}
