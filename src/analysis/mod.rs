//! Position analysis: pseudo-legal moves and per-square control counts for
//! both sides, computed in one pass over the board.
//!
//! `AnalysedPosition::new` does a full scan. `advance_by` (see `incremental`)
//! updates an existing analysis in place for simple moves by regenerating only
//! the pieces the move can affect.

pub mod control;
mod incremental;
pub mod movegen;
pub mod occlusion;

use std::fmt;

use crate::board::{Move, MoveRecord, PieceKind, Position, Side, Square};

pub use control::{ControlGrid, MAX_CONTROL};
pub use occlusion::Occlusion;

#[derive(Clone, PartialEq, Eq)]
pub struct AnalysedPosition {
    position: Position,
    moves: [Vec<MoveRecord>; 2],
    control: [ControlGrid; 2],
    king_squares: [Square; 2],
}

impl AnalysedPosition {
    pub fn new(position: Position) -> AnalysedPosition {
        let mut analysed = AnalysedPosition {
            position,
            moves: [Vec::with_capacity(48), Vec::with_capacity(48)],
            control: [ControlGrid::default(), ControlGrid::default()],
            king_squares: [Square::default(); 2],
        };
        for sq in Square::all() {
            analysed.append_calculation(sq);
            let piece = analysed.position.at(sq);
            if piece.kind() == PieceKind::King {
                analysed.king_squares[piece.side().index()] = sq;
            }
        }
        analysed.append_castling();
        analysed
    }

    pub fn startpos() -> AnalysedPosition {
        AnalysedPosition::new(Position::startpos())
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn into_position(self) -> Position {
        self.position
    }

    #[inline]
    pub fn to_move(&self) -> Side {
        self.position.to_move()
    }

    #[inline]
    pub fn control(&self, side: Side, sq: Square) -> u8 {
        self.control[side.index()].get(sq)
    }

    pub fn control_grid(&self, side: Side) -> &ControlGrid {
        &self.control[side.index()]
    }

    pub fn moves_of(&self, side: Side) -> &[MoveRecord] {
        &self.moves[side.index()]
    }

    /// Pseudo-legal moves of the side to move.
    #[inline]
    pub fn moves(&self) -> &[MoveRecord] {
        self.moves_of(self.position.to_move())
    }

    /// Where `side`'s king stands. Positions without one report a1.
    pub fn king_square(&self, side: Side) -> Square {
        self.king_squares[side.index()]
    }

    pub fn in_check(&self, side: Side) -> bool {
        self.control(!side, self.king_square(side)) > 0
    }

    /// The side to move is in check: the previous move gave check.
    pub fn legal_check(&self) -> bool {
        self.in_check(self.position.to_move())
    }

    /// The side that just moved left its own king attacked. Positions like
    /// this are reached by pseudo-legal moves and get pruned from the tree.
    pub fn illegal_check(&self) -> bool {
        self.in_check(!self.position.to_move())
    }

    /// Looks up coordinate text such as `e2e4` among the side to move's moves.
    pub fn find_record(&self, name: &str) -> Option<Move<'_>> {
        let record: MoveRecord = name.parse().ok()?;
        self.moves().iter().find(|&&m| m == record).map(|&m| Move::new(&self.position, m))
    }

    /// The `index`th move of the side to move. Panics when out of range.
    pub fn get_move(&self, index: usize) -> Move<'_> {
        Move::new(&self.position, self.moves()[index])
    }

    /// The analysis after `record`, recomputed from scratch.
    pub fn after(&self, record: MoveRecord) -> AnalysedPosition {
        AnalysedPosition::new(self.position.after(record))
    }

    /// Squares whose pieces' generation may change when `record` is played.
    pub fn occlusion(&self, record: MoveRecord) -> Occlusion {
        occlusion::occlusion(&self.position, record)
    }

    /// Counts and records everything the piece on `sq` threatens and can do.
    fn append_calculation(&mut self, sq: Square) {
        let side = self.position.at(sq).side().index();
        let AnalysedPosition { position, moves, control, .. } = self;
        let grid = &mut control[side];
        let list = &mut moves[side];
        movegen::walk_piece(position, sq, &mut |t| grid.increment(t), &mut |m| list.push(m));
    }

    /// Uncounts the control of the piece on `sq`, walking its threats in the
    /// current position. Its moves are left for the caller to filter.
    fn strip_control(&mut self, sq: Square) {
        let side = self.position.at(sq).side().index();
        let AnalysedPosition { position, control, .. } = self;
        let grid = &mut control[side];
        movegen::walk_piece(position, sq, &mut |t| grid.decrement(t), &mut |_| {});
    }

    fn append_castling(&mut self) {
        movegen::append_castling(&self.position, &self.control, &mut self.moves);
    }

    /// Same moves for both sides, ignoring order.
    pub fn same_moves(&self, other: &AnalysedPosition) -> bool {
        Side::ALL.iter().all(|&side| {
            let mut a = self.moves_of(side).to_vec();
            let mut b = other.moves_of(side).to_vec();
            a.sort_unstable();
            b.sort_unstable();
            a == b
        })
    }

    /// Same position, control, kings and move multisets. Move order may differ
    /// after incremental updates, so this is the comparison to use between the
    /// two analysis paths.
    pub fn equivalent(&self, other: &AnalysedPosition) -> bool {
        self.position == other.position
            && self.control == other.control
            && self.king_squares == other.king_squares
            && self.same_moves(other)
    }
}

impl fmt::Display for AnalysedPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.position)?;
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let sq = Square::at(file, rank);
                write!(
                    f,
                    " {}{:x}{:x}",
                    self.position.at(sq),
                    self.control(Side::White, sq),
                    self.control(Side::Black, sq)
                )?;
            }
            writeln!(f)?;
        }
        writeln!(f, "    a   b   c   d   e   f   g   h")?;
        for side in Side::ALL {
            let list: Vec<String> = self.moves_of(side).iter().map(|&m| Move::new(&self.position, m).to_string()).collect();
            writeln!(f, "{} ({}): {}", side, list.len(), list.join(" "))?;
        }
        write!(f, "kings: {} {}", self.king_square(Side::White), self.king_square(Side::Black))
    }
}

impl fmt::Debug for AnalysedPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnalysedPosition({})", self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_counts() {
        let ap = AnalysedPosition::startpos();
        assert_eq!(ap.moves_of(Side::White).len(), 20);
        assert_eq!(ap.moves_of(Side::Black).len(), 20);
        assert_eq!(ap.control(Side::White, "f3".parse().unwrap()), 3);
        assert_eq!(ap.control(Side::White, "e2".parse().unwrap()), 4);
        assert_eq!(ap.control(Side::Black, "f3".parse().unwrap()), 0);
        assert!(!ap.legal_check());
        assert!(!ap.illegal_check());
    }

    #[test]
    fn find_and_get_move() {
        let ap = AnalysedPosition::startpos();
        let mv = ap.find_record("g1f3").unwrap();
        assert_eq!(mv.to_string(), "Ng1-f3");
        assert!(ap.find_record("e2e5").is_none());
        assert!(ap.find_record("nonsense").is_none());
        assert_eq!(ap.get_move(0).record(), ap.moves()[0]);
    }

    #[test]
    fn kings_are_located() {
        let ap = AnalysedPosition::new(Position::from_fen("8/8/3k4/8/8/8/8/6K1 b - - 0 1").unwrap());
        assert_eq!(ap.king_square(Side::White).to_string(), "g1");
        assert_eq!(ap.king_square(Side::Black).to_string(), "d6");
    }
}
