//! Legal move counting on top of the analyser, for validating generation.
//!
//! A pseudo-legal move is legal when the resulting analysis shows no attack
//! on the mover's king. Castling through or out of check is already excluded
//! at generation time by the control counts.

use rayon::prelude::*;

use crate::analysis::AnalysedPosition;
use crate::board::MoveRecord;

/// Moves of the side to move that do not leave its king attacked.
pub fn legal_moves(position: &AnalysedPosition) -> Vec<MoveRecord> {
    position.moves().iter().copied().filter(|&m| !position.after(m).illegal_check()).collect()
}

pub fn perft(position: &AnalysedPosition, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0u64;
    for &m in position.moves() {
        let child = position.after(m);
        if child.illegal_check() {
            continue;
        }
        nodes += if depth == 1 { 1 } else { perft(&child, depth - 1) };
    }
    nodes
}

/// Per-root-move counts, searched in parallel, in move generation order.
pub fn divide(position: &AnalysedPosition, depth: u32) -> Vec<(MoveRecord, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    position
        .moves()
        .par_iter()
        .filter_map(|&m| {
            let child = position.after(m);
            if child.illegal_check() {
                None
            } else {
                Some((m, perft(&child, depth - 1)))
            }
        })
        .collect()
}

/// Same count as `perft`, split over the root moves with rayon.
pub fn perft_parallel(position: &AnalysedPosition, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    divide(position, depth).iter().map(|&(_, n)| n).sum()
}
