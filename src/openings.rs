//! A small fixed book of opening lines, four moves a side, in coordinate text.
//! Used to vary self-play games and as replay material in tests and benches.

use crate::board::{MoveRecord, ParseError, Position};

#[derive(Debug, Clone, Copy)]
pub struct Opening {
    pub name: &'static str,
    pub moves: &'static [&'static str],
}

pub const BOOK: &[Opening] = &[
    Opening { name: "Italian Game", moves: &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "f8c5", "e1g1", "g8f6"] },
    Opening { name: "Ruy Lopez", moves: &["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6", "b5a4", "g8f6"] },
    Opening { name: "Queen's Gambit", moves: &["d2d4", "d7d5", "c2c4", "e7e6", "b1c3", "g8f6", "c1g5", "f8e7"] },
    Opening { name: "Sicilian Dragon", moves: &["e2e4", "c7c5", "g1f3", "d7d6", "d2d4", "c5d4", "f3d4", "g8f6"] },
    Opening { name: "French Defense", moves: &["e2e4", "e7e6", "d2d4", "d7d5", "b1c3", "f8b4", "e4e5", "c7c5"] },
    Opening { name: "King's Indian Defense", moves: &["d2d4", "g8f6", "c2c4", "g7g6", "b1c3", "f8g7", "e2e4", "d7d6"] },
    Opening { name: "English Opening", moves: &["c2c4", "e7e5", "b1c3", "g8f6", "g2g3", "d7d5", "c4d5", "f6d5"] },
    Opening { name: "Caro-Kann Defense", moves: &["e2e4", "c7c6", "d2d4", "d7d5", "b1c3", "d5e4", "c3e4", "c8f5"] },
    Opening { name: "Nimzo-Indian Defense", moves: &["d2d4", "g8f6", "c2c4", "e7e6", "b1c3", "f8b4", "e2e3", "e8g8"] },
    Opening { name: "Scandinavian Defense", moves: &["e2e4", "d7d5", "e4d5", "d8d5", "b1c3", "d5a5", "d2d4", "g8f6"] },
    Opening { name: "King's Gambit", moves: &["e2e4", "e7e5", "f2f4", "e5f4", "g1f3", "g7g5", "h2h4", "g5g4"] },
    Opening { name: "London System", moves: &["d2d4", "d7d5", "g1f3", "g8f6", "c1f4", "c7c5", "e2e3", "b8c6"] },
];

impl Opening {
    /// Cycles through the book.
    pub fn nth(index: usize) -> Opening {
        BOOK[index % BOOK.len()]
    }

    pub fn records(&self) -> Result<Vec<MoveRecord>, ParseError> {
        self.moves.iter().map(|m| m.parse()).collect()
    }

    /// The position at the end of the line.
    pub fn position(&self) -> Result<Position, ParseError> {
        self.moves.iter().try_fold(Position::startpos(), |pos, m| pos.apply_uci(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_line_replays() {
        for opening in BOOK {
            assert_eq!(opening.moves.len(), 8, "{}", opening.name);
            let pos = opening.position().unwrap_or_else(|e| panic!("{}: {e}", opening.name));
            assert_eq!(pos.fullmove_number(), 5, "{}", opening.name);
        }
    }

    #[test]
    fn nth_cycles() {
        assert_eq!(Opening::nth(0).name, "Italian Game");
        assert_eq!(Opening::nth(BOOK.len() + 1).name, "Ruy Lopez");
    }

    #[test]
    fn italian_game_castles() {
        let pos = Opening::nth(0).position().unwrap();
        assert_eq!(pos.to_fen(), "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQ1RK1 w kq - 6 5");
    }
}
