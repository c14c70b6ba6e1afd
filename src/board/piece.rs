use std::fmt;

use super::Side;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceKind {
    Empty = 0,
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceKind {
    /// Kinds a pawn may promote to, in generation order.
    pub const PROMOTIONS: [PieceKind; 4] = [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen];

    const fn from_bits(bits: u8) -> PieceKind {
        match bits & 7 {
            1 => PieceKind::Pawn,
            2 => PieceKind::Knight,
            3 => PieceKind::Bishop,
            4 => PieceKind::Rook,
            5 => PieceKind::Queen,
            6 => PieceKind::King,
            _ => PieceKind::Empty,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            PieceKind::Empty => '_',
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Reads an uppercase or lowercase piece letter.
    pub fn from_letter(c: char) -> Option<PieceKind> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    pub const fn is_promotion_target(self) -> bool {
        matches!(self, PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }
}

/// A side and kind packed into one byte. Empty squares still carry a side
/// bit, which is always White for `Piece::EMPTY`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Piece(u8);

const SIDE_BIT: u8 = 0x08;

impl Piece {
    pub const EMPTY: Piece = Piece(0);

    pub const fn new(side: Side, kind: PieceKind) -> Piece {
        let side_bits = match side {
            Side::White => 0,
            Side::Black => SIDE_BIT,
        };
        Piece(side_bits | kind as u8)
    }

    #[inline]
    pub const fn side(self) -> Side {
        if self.0 & SIDE_BIT == 0 {
            Side::White
        } else {
            Side::Black
        }
    }

    #[inline]
    pub const fn kind(self) -> PieceKind {
        PieceKind::from_bits(self.0)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 & 7 == 0
    }

    /// The side holding this square, `None` when empty.
    #[inline]
    pub const fn occupant(self) -> Option<Side> {
        if self.is_empty() {
            None
        } else {
            Some(self.side())
        }
    }

    pub fn fen_char(self) -> Option<char> {
        if self.is_empty() {
            return None;
        }
        let letter = self.kind().letter();
        Some(match self.side() {
            Side::White => letter,
            Side::Black => letter.to_ascii_lowercase(),
        })
    }

    pub fn from_fen_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_letter(c)?;
        let side = if c.is_ascii_uppercase() { Side::White } else { Side::Black };
        Some(Piece::new(side, kind))
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Piece({:?} {:?})", self.side(), self.kind())
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_char().unwrap_or('.'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_piece_is_white_empty() {
        assert_eq!(Piece::default(), Piece::new(Side::White, PieceKind::Empty));
        assert_eq!(Piece::default().occupant(), None);
    }

    #[test]
    fn packing_keeps_side_and_kind() {
        for side in Side::ALL {
            for kind in [PieceKind::Pawn, PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen, PieceKind::King] {
                let p = Piece::new(side, kind);
                assert_eq!(p.side(), side);
                assert_eq!(p.kind(), kind);
                assert_eq!(p.occupant(), Some(side));
                assert_eq!(Piece::from_fen_char(p.fen_char().unwrap()), Some(p));
            }
        }
    }

    #[test]
    fn black_empty_differs_from_white_empty() {
        let black_empty = Piece::new(Side::Black, PieceKind::Empty);
        assert!(black_empty.is_empty());
        assert_ne!(black_empty, Piece::EMPTY);
    }
}
