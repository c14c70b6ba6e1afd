use std::fmt;
use std::str::FromStr;

use super::{ParseError, Piece, PieceKind, Position, Square};

const SQUARE_MASK: u8 = 0x3f;
const PROMOTION_FLAG: u8 = 0x40;

/// Initial square, destination square and optional promotion, in two bytes.
///
/// The first byte holds the initial square plus a promotion flag, the second
/// the destination square with the promotion kind in its top two bits. A
/// record alone says nothing about captures or castling; pair it with a
/// `Position` through [`Move`] for that.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoveRecord {
    initial: u8,
    destination: u8,
}

impl MoveRecord {
    pub const fn new(initial: Square, destination: Square) -> MoveRecord {
        MoveRecord { initial: initial.index() as u8, destination: destination.index() as u8 }
    }

    /// A pawn move that promotes. Panics if `kind` is not N, B, R or Q.
    pub fn promoting(initial: Square, destination: Square, kind: PieceKind) -> MoveRecord {
        let slot = PieceKind::PROMOTIONS
            .iter()
            .position(|&k| k == kind)
            .unwrap_or_else(|| panic!("{kind:?} is not a valid promotion candidate"));
        MoveRecord {
            initial: initial.index() as u8 | PROMOTION_FLAG,
            destination: destination.index() as u8 | ((slot as u8) << 6),
        }
    }

    #[inline]
    pub const fn initial(self) -> Square {
        Square::at(self.initial & 7, (self.initial & SQUARE_MASK) >> 3)
    }

    #[inline]
    pub const fn destination(self) -> Square {
        Square::at(self.destination & 7, (self.destination & SQUARE_MASK) >> 3)
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.initial & PROMOTION_FLAG != 0
    }

    pub const fn promotion(self) -> Option<PieceKind> {
        if self.is_promotion() {
            Some(PieceKind::PROMOTIONS[(self.destination >> 6) as usize])
        } else {
            None
        }
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.initial(), self.destination())?;
        if let Some(kind) = self.promotion() {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}

impl fmt::Debug for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for MoveRecord {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<MoveRecord, ParseError> {
        let bad = || ParseError::MoveText(s.to_string());
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(bad());
        }
        let initial: Square = s[0..2].parse().map_err(|_| bad())?;
        let destination: Square = s[2..4].parse().map_err(|_| bad())?;
        match s[4..].chars().next() {
            None => Ok(MoveRecord::new(initial, destination)),
            Some(c) => match PieceKind::from_letter(c) {
                Some(kind) if kind.is_promotion_target() => Ok(MoveRecord::promoting(initial, destination, kind)),
                _ => Err(bad()),
            },
        }
    }
}

/// A [`MoveRecord`] read against the position it is played from.
#[derive(Clone, Copy)]
pub struct Move<'a> {
    position: &'a Position,
    record: MoveRecord,
}

impl<'a> Move<'a> {
    pub fn new(position: &'a Position, record: MoveRecord) -> Move<'a> {
        Move { position, record }
    }

    pub fn position(&self) -> &'a Position {
        self.position
    }

    pub fn record(&self) -> MoveRecord {
        self.record
    }

    pub fn initial(&self) -> Square {
        self.record.initial()
    }

    pub fn destination(&self) -> Square {
        self.record.destination()
    }

    pub fn promotion(&self) -> Option<PieceKind> {
        self.record.promotion()
    }

    pub fn moved(&self) -> Piece {
        self.position.at(self.initial())
    }

    /// The piece removed by this move. For en passant that is the pawn beside
    /// the initial square, not the (empty) destination.
    pub fn captured(&self) -> Piece {
        if self.is_en_passant() {
            let behind = Square::at(self.destination().file(), self.initial().rank());
            self.position.at(behind)
        } else {
            self.position.at(self.destination())
        }
    }

    pub fn is_en_passant(&self) -> bool {
        self.moved().kind() == PieceKind::Pawn
            && self.position.at(self.destination()).is_empty()
            && self.initial().file() != self.destination().file()
    }

    pub fn is_castling(&self) -> bool {
        let file_delta = self.destination().file() as i8 - self.initial().file() as i8;
        self.moved().kind() == PieceKind::King && file_delta.abs() > 1
    }

    pub fn is_promotion(&self) -> bool {
        self.record.is_promotion()
    }

    /// Neither castling, en passant nor a promotion.
    pub fn is_simple(&self) -> bool {
        !(self.is_castling() || self.is_en_passant() || self.is_promotion())
    }

    /// The position after this move. See [`Position::after`].
    pub fn apply(&self) -> Position {
        self.position.after(self.record)
    }

    /// Coordinate text, as sent over the text protocol.
    pub fn to_coordinate(&self) -> String {
        self.record.to_string()
    }
}

impl PartialEq for Move<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record && self.position == other.position
    }
}

impl fmt::Display for Move<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.captured().is_empty() { '-' } else { 'x' };
        write!(f, "{}{}{}{}", self.moved().kind().letter(), self.initial(), sep, self.destination())?;
        if let Some(kind) = self.promotion() {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
