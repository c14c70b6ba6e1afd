//! Board model: squares, pieces, positions and moves.
//!
//! Everything here is a plain value type. A `Position` is never mutated once
//! built; playing a move produces a new one.

pub mod moves;
pub mod piece;
pub mod position;
pub mod square;

pub use moves::{Move, MoveRecord};
pub use piece::{Piece, PieceKind};
pub use position::{Position, Wing};
pub use square::{Side, Square};

use thiserror::Error;

/// Errors raised while reading position notation or move text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected 6 FEN fields, found {0}")]
    FieldCount(usize),

    #[error("invalid piece placement `{0}`")]
    Placement(String),

    #[error("invalid side to move `{0}`")]
    SideToMove(String),

    #[error("invalid castling rights `{0}`")]
    Castling(String),

    #[error("invalid en passant square `{0}`")]
    EnPassant(String),

    #[error("invalid move clock `{0}`")]
    Clock(String),

    #[error("invalid square `{0}`")]
    Square(String),

    #[error("invalid move text `{0}`")]
    MoveText(String),

    /// Well-formed move text that names no move of the side to move.
    #[error("move `{0}` is not available in this position")]
    UnavailableMove(String),
}
