//! Stock value and prior functions for the tree search.

use std::str::FromStr;

use crate::analysis::AnalysedPosition;
use crate::board::{MoveRecord, PieceKind, Side, Square};
use crate::mcts::{prior_fn, value_fn, PriorFn, ValueFn};

/// Pawn 1, knight 2.5, bishop 3, rook 5, queen 9. Kings are not counted.
pub fn piece_value(kind: PieceKind) -> f32 {
    match kind {
        PieceKind::Empty | PieceKind::King => 0.0,
        PieceKind::Pawn => 1.0,
        PieceKind::Knight => 2.5,
        PieceKind::Bishop => 3.0,
        PieceKind::Rook => 5.0,
        PieceKind::Queen => 9.0,
    }
}

const CONTROL_WEIGHT: f32 = 0.05;
const KING_PRESSURE_THRESHOLD: f32 = 10.0;
const GAIN: f32 = 0.3;

pub fn uniform_value(_: &AnalysedPosition) -> f32 {
    0.5
}

pub fn uniform_prior(position: &AnalysedPosition, _: MoveRecord) -> f32 {
    1.0 / position.moves().len().max(1) as f32
}

/// White material minus Black material.
pub fn material_balance(position: &AnalysedPosition) -> f32 {
    Square::all()
        .map(|sq| {
            let piece = position.position().at(sq);
            match piece.occupant() {
                Some(Side::White) => piece_value(piece.kind()),
                Some(Side::Black) => -piece_value(piece.kind()),
                None => 0.0,
            }
        })
        .sum()
}

/// How hard `side` presses on the enemy king: 0.1 per attack on each square
/// next to it.
pub fn king_control_score(position: &AnalysedPosition, side: Side) -> f32 {
    const NEIGHBOURS: [(i8, i8); 8] = [(0, 1), (1, 0), (0, -1), (-1, 0), (1, 1), (1, -1), (-1, 1), (-1, -1)];
    let king = position.king_square(!side);
    NEIGHBOURS
        .iter()
        .filter_map(|&(df, dr)| king.translate(df, dr))
        .map(|sq| 0.1 * position.control(side, sq) as f32)
        .sum()
}

/// Material plus a little mobility, squashed into [0, 1]. A side more than
/// ten points ahead is also rewarded for attacking the enemy king's field.
pub fn material_value(position: &AnalysedPosition) -> f32 {
    let material = material_balance(position);
    let control: i32 = Square::all()
        .map(|sq| position.control(Side::White, sq) as i32 - position.control(Side::Black, sq) as i32)
        .sum();
    let mut king_pressure = 0.0;
    if material > KING_PRESSURE_THRESHOLD {
        king_pressure += king_control_score(position, Side::White);
    }
    if material < -KING_PRESSURE_THRESHOLD {
        king_pressure -= king_control_score(position, Side::Black);
    }
    let weight = material + control as f32 * CONTROL_WEIGHT + king_pressure;
    0.5 * ((GAIN * 0.5 * weight).tanh() + 1.0)
}

/// Value function selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Uniform,
    Material,
}

impl ValueKind {
    pub fn value_fn(self) -> ValueFn {
        match self {
            ValueKind::Uniform => value_fn(uniform_value),
            ValueKind::Material => value_fn(material_value),
        }
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uniform" => Ok(ValueKind::Uniform),
            "material" => Ok(ValueKind::Material),
            other => Err(format!("unknown value function `{other}` (expected uniform or material)")),
        }
    }
}

pub fn default_prior() -> PriorFn {
    prior_fn(uniform_prior)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    fn analyse(fen: &str) -> AnalysedPosition {
        AnalysedPosition::new(Position::from_fen(fen).unwrap())
    }

    #[test]
    fn startpos_is_balanced() {
        let ap = AnalysedPosition::startpos();
        assert_eq!(material_balance(&ap), 0.0);
        assert!((material_value(&ap) - 0.5).abs() < 1e-6);
        assert_eq!(uniform_prior(&ap, ap.moves()[0]), 0.05);
    }

    #[test]
    fn extra_queen_favours_white() {
        let ap = analyse("4k3/8/8/8/8/8/8/3QK3 w - - 0 1");
        assert_eq!(material_balance(&ap), 9.0);
        assert!(material_value(&ap) > 0.75);
        let mirrored = analyse("3qk3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert!(material_value(&mirrored) < 0.25);
    }

    #[test]
    fn king_pressure_counts_neighbour_attacks() {
        let ap = analyse("7k/8/8/8/8/8/8/K5R1 w - - 0 1");
        // The g1 rook sees g7 and g8 next to the h8 king.
        assert!((king_control_score(&ap, Side::White) - 0.2).abs() < 1e-6);
        assert_eq!(king_control_score(&ap, Side::Black), 0.0);
    }

    #[test]
    fn value_kind_parses() {
        assert_eq!("Material".parse::<ValueKind>().unwrap(), ValueKind::Material);
        assert!("nnue".parse::<ValueKind>().is_err());
    }
}
