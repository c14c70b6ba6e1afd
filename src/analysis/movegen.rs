//! Array-walking move generation.
//!
//! Every generator reports two things through callbacks: squares the piece
//! threatens (counted as control, friendly-occupied squares included) and the
//! moves it may make (empty or enemy-occupied targets only). Callers decide
//! whether to count, uncount or record.

use crate::board::{MoveRecord, PieceKind, Position, Side, Square, Wing};

use super::control::ControlGrid;

pub const KNIGHT_STEPS: [(i8, i8); 8] = [(1, 2), (-1, 2), (1, -2), (-1, -2), (2, 1), (2, -1), (-2, 1), (-2, -1)];
pub const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const ALL_DIRECTIONS: [(i8, i8); 8] = [(1, 0), (0, 1), (-1, 0), (0, -1), (1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Generates for whatever stands on `sq`. Empty squares produce nothing.
pub fn walk_piece(pos: &Position, sq: Square, on_threat: &mut impl FnMut(Square), on_move: &mut impl FnMut(MoveRecord)) {
    match pos.at(sq).kind() {
        PieceKind::Empty => {}
        PieceKind::Pawn => walk_pawn(pos, sq, on_threat, on_move),
        PieceKind::Knight => walk_template(pos, sq, &KNIGHT_STEPS, false, on_threat, on_move),
        PieceKind::Bishop => walk_template(pos, sq, &DIAGONAL, true, on_threat, on_move),
        PieceKind::Rook => walk_template(pos, sq, &ORTHOGONAL, true, on_threat, on_move),
        PieceKind::Queen => walk_template(pos, sq, &ALL_DIRECTIONS, true, on_threat, on_move),
        PieceKind::King => walk_template(pos, sq, &ALL_DIRECTIONS, false, on_threat, on_move),
    }
}

/// Steps or slides (`repeat`) from `sq` along each of `steps`, stopping at the
/// board edge or the first occupied square.
pub fn walk_template(
    pos: &Position,
    sq: Square,
    steps: &[(i8, i8)],
    repeat: bool,
    on_threat: &mut impl FnMut(Square),
    on_move: &mut impl FnMut(MoveRecord),
) {
    let side = pos.at(sq).side();
    for &(df, dr) in steps {
        let mut cursor = sq;
        while let Some(next) = cursor.translate(df, dr) {
            let target = pos.at(next);
            on_threat(next);
            if target.occupant() != Some(side) {
                on_move(MoveRecord::new(sq, next));
            }
            if !target.is_empty() || !repeat {
                break;
            }
            cursor = next;
        }
    }
}

pub fn walk_pawn(pos: &Position, sq: Square, on_threat: &mut impl FnMut(Square), on_move: &mut impl FnMut(MoveRecord)) {
    let side = pos.at(sq).side();
    let fwd = side.forward();
    let promoting = sq.rank() == side.promotion_rank();
    for df in [-1i8, 0, 1] {
        let Some(to) = sq.translate(df, fwd) else {
            continue;
        };
        let target = pos.at(to);
        if df != 0 {
            on_threat(to);
            let en_passant = side == pos.to_move() && pos.en_passant() == Some(to);
            if en_passant || target.occupant() == Some(!side) {
                emit_pawn_move(sq, to, promoting, on_move);
            }
        } else if target.is_empty() {
            emit_pawn_move(sq, to, promoting, on_move);
            if sq.rank() == side.pawn_rank() {
                if let Some(double) = sq.translate(0, 2 * fwd) {
                    if pos.at(double).is_empty() {
                        on_move(MoveRecord::new(sq, double));
                    }
                }
            }
        }
    }
}

fn emit_pawn_move(from: Square, to: Square, promoting: bool, on_move: &mut impl FnMut(MoveRecord)) {
    if promoting {
        for kind in PieceKind::PROMOTIONS {
            on_move(MoveRecord::promoting(from, to, kind));
        }
    } else {
        on_move(MoveRecord::new(from, to));
    }
}

/// Appends castling moves for both sides, White first, kingside before
/// queenside. Reads `control` for the opponent's attacks, so call this after
/// every other piece has been counted.
pub fn append_castling(pos: &Position, control: &[ControlGrid; 2], moves: &mut [Vec<MoveRecord>; 2]) {
    for side in Side::ALL {
        let rank = side.back_rank();
        let home = Square::at(4, rank);
        if pos.at(home).kind() != PieceKind::King || pos.at(home).side() != side {
            continue;
        }
        for wing in Wing::ALL {
            if !pos.castling_right(side, wing) {
                continue;
            }
            let rook = pos.at(Square::at(wing.rook_file(), rank));
            if rook.kind() != PieceKind::Rook || rook.side() != side {
                continue;
            }
            let dir = wing.direction();
            let unattacked = (0..3).all(|i| match home.translate(i * dir, 0) {
                Some(sq) => control[(!side).index()].get(sq) == 0,
                None => false,
            });
            let clear = (1..=wing.span()).all(|i| match home.translate(i * dir, 0) {
                Some(sq) => pos.at(sq).is_empty(),
                None => false,
            });
            if unattacked && clear {
                moves[side.index()].push(MoveRecord::new(home, Square::at((4 + 2 * dir) as u8, rank)));
            }
        }
    }
}

/// Collects what `walk_piece` reports for one square.
pub fn piece_moves(pos: &Position, sq: Square) -> Vec<MoveRecord> {
    let mut out = Vec::new();
    walk_piece(pos, sq, &mut |_| {}, &mut |m| out.push(m));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn names(moves: &[MoveRecord]) -> Vec<String> {
        moves.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn knight_order_follows_step_table() {
        let pos = Position::startpos();
        assert_eq!(names(&piece_moves(&pos, sq("g1"))), ["g1h3", "g1f3"]);
    }

    #[test]
    fn pawn_push_and_double_push() {
        let pos = Position::startpos();
        assert_eq!(names(&piece_moves(&pos, sq("e2"))), ["e2e3", "e2e4"]);
    }

    #[test]
    fn pawn_threats_include_empty_diagonals() {
        let pos = Position::startpos();
        let mut threats = Vec::new();
        walk_piece(&pos, sq("a2"), &mut |s| threats.push(s), &mut |_| {});
        assert_eq!(threats, [sq("b3")]);
    }

    #[test]
    fn promotions_expand_in_fixed_order() {
        let pos = Position::from_fen("1n6/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
        assert_eq!(names(&piece_moves(&pos, sq("a7"))), ["a7a8N", "a7a8B", "a7a8R", "a7a8Q", "a7b8N", "a7b8B", "a7b8R", "a7b8Q"]);
    }

    #[test]
    fn blocked_slider_threatens_its_blocker() {
        let pos = Position::startpos();
        let mut threats = Vec::new();
        let mut moves = Vec::new();
        walk_piece(&pos, sq("a1"), &mut |s| threats.push(s), &mut |m| moves.push(m));
        assert_eq!(threats, [sq("b1"), sq("a2")]);
        assert!(moves.is_empty());
    }
}
