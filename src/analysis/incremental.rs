use crate::board::{Move, MoveRecord, PieceKind, Square};

use super::AnalysedPosition;

fn push_unique(list: &mut Vec<Square>, sq: Square) {
    if !list.contains(&sq) {
        list.push(sq);
    }
}

impl AnalysedPosition {
    /// Plays `record` in place, regenerating only the mover, the captured
    /// piece and the pieces in the move's occlusion set.
    ///
    /// The result is equivalent to `AnalysedPosition::new` on the new
    /// position (see [`AnalysedPosition::equivalent`]); only move order may
    /// differ. Castling, en passant and promotions touch squares the occlusion
    /// walk does not cover, so they panic here and must go through the full
    /// recompute.
    pub fn advance_by(&mut self, record: MoveRecord) {
        let mv = Move::new(&self.position, record);
        assert!(mv.is_simple(), "{} is not a simple move in {}", mv, self.position);
        let moved = mv.moved();
        let from = record.initial();
        let to = record.destination();

        let occluded = self.occlusion(record);

        let mut stripped = vec![from];
        if !self.position.at(to).is_empty() {
            push_unique(&mut stripped, to);
        }
        for sq in occluded.iter() {
            push_unique(&mut stripped, sq);
        }
        for &sq in &stripped {
            self.strip_control(sq);
        }
        let position = &self.position;
        for list in self.moves.iter_mut() {
            list.retain(|m| {
                let origin = m.initial();
                let castling = position.at(origin).kind() == PieceKind::King && origin.file().abs_diff(m.destination().file()) == 2;
                !castling && !stripped.contains(&origin)
            });
        }

        self.position = self.position.after(record);

        let mut regenerated = vec![to];
        for sq in occluded.iter().filter(|&sq| sq != from) {
            push_unique(&mut regenerated, sq);
        }
        for &sq in &regenerated {
            self.append_calculation(sq);
        }
        self.append_castling();

        if moved.kind() == PieceKind::King {
            self.king_squares[moved.side().index()] = to;
        }
    }
}
