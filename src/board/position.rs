use std::fmt;
use std::str::FromStr;

use super::{Move, MoveRecord, ParseError, Piece, PieceKind, Side, Square};
use crate::analysis::AnalysedPosition;

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Wing {
    Kingside,
    Queenside,
}

impl Wing {
    pub const ALL: [Wing; 2] = [Wing::Kingside, Wing::Queenside];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// File direction the king travels when castling on this wing.
    pub const fn direction(self) -> i8 {
        match self {
            Wing::Kingside => 1,
            Wing::Queenside => -1,
        }
    }

    pub const fn rook_file(self) -> u8 {
        match self {
            Wing::Kingside => 7,
            Wing::Queenside => 0,
        }
    }

    /// Squares beyond the king that must be empty.
    pub const fn span(self) -> i8 {
        match self {
            Wing::Kingside => 2,
            Wing::Queenside => 3,
        }
    }
}

/// A complete game state. Immutable once built: [`Position::after`] returns
/// a fresh value and leaves `self` alone.
#[derive(Clone)]
pub struct Position {
    board: [Piece; 64],
    to_move: Side,
    castling: [[bool; 2]; 2],
    en_passant: Option<Square>,
    halfmove: u32,
    fullmove: u32,
}

impl Position {
    pub fn empty() -> Position {
        Position {
            board: [Piece::EMPTY; 64],
            to_move: Side::White,
            castling: [[false; 2]; 2],
            en_passant: None,
            halfmove: 0,
            fullmove: 1,
        }
    }

    pub fn startpos() -> Position {
        const BACK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut pos = Position::empty();
        for side in Side::ALL {
            for (file, kind) in BACK.iter().enumerate() {
                pos.set(Square::at(file as u8, side.back_rank()), Piece::new(side, *kind));
                pos.set(Square::at(file as u8, side.pawn_rank()), Piece::new(side, PieceKind::Pawn));
            }
        }
        pos.castling = [[true; 2]; 2];
        pos
    }

    #[inline]
    pub fn at(&self, sq: Square) -> Piece {
        self.board[sq.index()]
    }

    #[inline]
    pub(crate) fn set(&mut self, sq: Square, piece: Piece) {
        self.board[sq.index()] = piece;
    }

    #[inline]
    pub fn to_move(&self) -> Side {
        self.to_move
    }

    pub fn castling_right(&self, side: Side, wing: Wing) -> bool {
        self.castling[side.index()][wing.index()]
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove
    }

    /// Plays `record` and returns the resulting position.
    ///
    /// The record must describe a move of the side to move onto an empty or
    /// enemy square. That is a contract, checked by assertion, not something
    /// to feed untrusted input through; use [`Position::apply_uci`] for text.
    pub fn after(&self, record: MoveRecord) -> Position {
        let mv = Move::new(self, record);
        let moved = mv.moved();
        let captured = mv.captured();
        assert!(!moved.is_empty(), "no piece on {} in {}", record.initial(), self);
        assert_eq!(moved.side(), self.to_move, "{} moves out of turn in {}", record, self);
        assert!(
            captured.occupant() != Some(moved.side()),
            "{} captures its own piece in {}",
            record,
            self
        );

        let side = moved.side();
        let from = record.initial();
        let to = record.destination();
        let mut next = self.clone();
        next.en_passant = None;
        next.to_move = !side;
        next.halfmove = if captured.is_empty() && moved.kind() != PieceKind::Pawn { self.halfmove + 1 } else { 0 };
        if side == Side::Black {
            next.fullmove += 1;
        }

        if mv.is_castling() {
            let wing = if to.file() > from.file() { Wing::Kingside } else { Wing::Queenside };
            let rank = from.rank();
            let dir = wing.direction();
            let king_to = Square::at((4 + 2 * dir) as u8, rank);
            let rook_to = Square::at((4 + dir) as u8, rank);
            next.set(Square::at(4, rank), Piece::EMPTY);
            next.set(Square::at(wing.rook_file(), rank), Piece::EMPTY);
            next.set(king_to, moved);
            next.set(rook_to, Piece::new(side, PieceKind::Rook));
        } else if let Some(kind) = record.promotion() {
            assert_eq!(moved.kind(), PieceKind::Pawn, "{} promotes a non-pawn", record);
            next.set(to, Piece::new(side, kind));
            next.set(from, Piece::EMPTY);
        } else {
            if mv.is_en_passant() {
                next.set(Square::at(to.file(), from.rank()), Piece::EMPTY);
            }
            next.set(to, moved);
            next.set(from, Piece::EMPTY);
        }

        match moved.kind() {
            PieceKind::King => next.castling[side.index()] = [false; 2],
            PieceKind::Rook => {
                for wing in Wing::ALL {
                    if from == Square::at(wing.rook_file(), side.back_rank()) {
                        next.castling[side.index()][wing.index()] = false;
                    }
                }
            }
            PieceKind::Pawn if from.rank().abs_diff(to.rank()) == 2 => {
                next.en_passant = from.translate(0, side.forward());
            }
            _ => {}
        }
        if captured.kind() == PieceKind::Rook {
            let other = !side;
            for wing in Wing::ALL {
                if to == Square::at(wing.rook_file(), other.back_rank()) {
                    next.castling[other.index()][wing.index()] = false;
                }
            }
        }
        next
    }

    /// Plays coordinate text such as `e2e4` or `e7e8q`, provided it names a
    /// pseudo-legal move of the side to move.
    pub fn apply_uci(&self, text: &str) -> Result<Position, ParseError> {
        let record: MoveRecord = text.parse()?;
        let analysed = AnalysedPosition::new(self.clone());
        if analysed.moves().contains(&record) {
            Ok(self.after(record))
        } else {
            Err(ParseError::UnavailableMove(text.to_string()))
        }
    }

    pub fn from_start_and_moves(moves: &[String]) -> Result<Position, ParseError> {
        moves.iter().try_fold(Position::startpos(), |pos, text| pos.apply_uci(text))
    }

    pub fn from_fen(fen: &str) -> Result<Position, ParseError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(ParseError::FieldCount(fields.len()));
        }
        let mut pos = Position::empty();

        let placement = fields[0];
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(ParseError::Placement(placement.to_string()));
        }
        for (i, row) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(ParseError::Placement(placement.to_string()));
                    }
                    file += skip as u8;
                } else {
                    let piece = Piece::from_fen_char(c).ok_or_else(|| ParseError::Placement(placement.to_string()))?;
                    let sq = Square::new(file, rank).ok_or_else(|| ParseError::Placement(placement.to_string()))?;
                    pos.set(sq, piece);
                    file += 1;
                }
                if file > 8 {
                    return Err(ParseError::Placement(placement.to_string()));
                }
            }
            if file != 8 {
                return Err(ParseError::Placement(placement.to_string()));
            }
        }

        pos.to_move = match fields[1] {
            "w" => Side::White,
            "b" => Side::Black,
            other => return Err(ParseError::SideToMove(other.to_string())),
        };

        if fields[2] != "-" {
            for c in fields[2].chars() {
                let (side, wing) = match c {
                    'K' => (Side::White, Wing::Kingside),
                    'Q' => (Side::White, Wing::Queenside),
                    'k' => (Side::Black, Wing::Kingside),
                    'q' => (Side::Black, Wing::Queenside),
                    _ => return Err(ParseError::Castling(fields[2].to_string())),
                };
                pos.castling[side.index()][wing.index()] = true;
            }
        }

        pos.en_passant = match fields[3] {
            "-" => None,
            text => Some(text.parse().map_err(|_| ParseError::EnPassant(text.to_string()))?),
        };

        pos.halfmove = fields[4].parse().map_err(|_| ParseError::Clock(fields[4].to_string()))?;
        pos.fullmove = fields[5].parse().map_err(|_| ParseError::Clock(fields[5].to_string()))?;
        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8u8).rev() {
            let mut gap = 0;
            for file in 0..8u8 {
                match self.at(Square::at(file, rank)).fen_char() {
                    None => gap += 1,
                    Some(c) => {
                        if gap > 0 {
                            out.push(char::from(b'0' + gap));
                            gap = 0;
                        }
                        out.push(c);
                    }
                }
            }
            if gap > 0 {
                out.push(char::from(b'0' + gap));
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out.push_str(match self.to_move {
            Side::White => " w ",
            Side::Black => " b ",
        });
        let mut rights = String::new();
        for (side, letters) in [(Side::White, ['K', 'Q']), (Side::Black, ['k', 'q'])] {
            for wing in Wing::ALL {
                if self.castling_right(side, wing) {
                    rights.push(letters[wing.index()]);
                }
            }
        }
        if rights.is_empty() {
            rights.push('-');
        }
        out.push_str(&rights);
        match self.en_passant {
            Some(sq) => out.push_str(&format!(" {sq}")),
            None => out.push_str(" -"),
        }
        out.push_str(&format!(" {} {}", self.halfmove, self.fullmove));
        out
    }

    /// Eight-line board picture, rank 8 first, `.` for empty squares.
    pub fn diagram(&self) -> String {
        let mut out = String::new();
        for rank in (0..8u8).rev() {
            out.push(char::from(b'1' + rank));
            out.push(' ');
            for file in 0..8u8 {
                out.push_str(&self.at(Square::at(file, rank)).to_string());
                out.push(' ');
            }
            out.push('\n');
        }
        out.push_str("  a b c d e f g h\n");
        out
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::startpos()
    }
}

/// Clocks are bookkeeping; two positions that differ only in them are the same.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.to_move == other.to_move
            && self.en_passant == other.en_passant
            && self.castling == other.castling
    }
}

impl Eq for Position {}

impl FromStr for Position {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Position, ParseError> {
        Position::from_fen(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(text: &str) -> MoveRecord {
        text.parse().unwrap()
    }

    #[test]
    fn startpos_matches_fen() {
        assert_eq!(Position::startpos().to_fen(), STARTPOS_FEN);
        assert_eq!(Position::from_fen(STARTPOS_FEN).unwrap(), Position::startpos());
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let pos = Position::startpos().after(rec("e2e4"));
        assert_eq!(pos.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
        let pos = pos.after(rec("g8f6"));
        assert_eq!(pos.to_fen(), "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2");
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let short = pos.after(rec("e1g1"));
        assert_eq!(short.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
        let long = short.after(rec("e8c8"));
        assert_eq!(long.to_fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 2 2");
    }

    #[test]
    fn rook_capture_revokes_opponent_wing() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let pos = pos.after(rec("a1a8"));
        assert_eq!(pos.to_fen(), "R3k2r/8/8/8/8/8/8/4K2R b Kk - 0 1");
    }

    #[test]
    fn equality_ignores_clocks() {
        let a = Position::from_fen("8/8/8/4k3/8/8/8/4K3 w - - 0 1").unwrap();
        let b = Position::from_fen("8/8/8/4k3/8/8/8/4K3 w - - 37 80").unwrap();
        assert_eq!(a, b);
        assert_ne!(a.to_fen(), b.to_fen());
    }

    #[test]
    #[should_panic]
    fn moving_out_of_turn_panics() {
        let _ = Position::startpos().after(rec("e7e5"));
    }

    #[test]
    fn diagram_layout() {
        let text = Position::startpos().diagram();
        assert_eq!(text.lines().count(), 9);
        assert!(text.starts_with("8 r n b q k b n r"));
    }
}
