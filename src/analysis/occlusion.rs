use crate::board::{MoveRecord, PieceKind, Position, Side, Square};

use super::movegen::KNIGHT_STEPS;

/// Clockwise from north. Odd entries are diagonals.
const COMPASS: [(i8, i8); 8] = [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1)];

/// Squares, per side, holding pieces whose moves or control may change when a
/// move is played: sliders looking through the vacated or filled square,
/// adjacent kings, pawns whose pushes are unblocked or blocked, knights that
/// defend or attack either end, and pawns gaining or losing an en passant
/// capture.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Occlusion {
    squares: [Vec<Square>; 2],
}

impl Occlusion {
    pub fn of(&self, side: Side) -> &[Square] {
        &self.squares[side.index()]
    }

    /// White's squares, then Black's.
    pub fn iter(&self) -> impl Iterator<Item = Square> + '_ {
        self.squares[0].iter().chain(self.squares[1].iter()).copied()
    }

    pub fn len(&self) -> usize {
        self.squares[0].len() + self.squares[1].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, sq: Square) -> bool {
        self.iter().any(|s| s == sq)
    }

    fn mark(&mut self, pos: &Position, sq: Square) {
        let list = &mut self.squares[pos.at(sq).side().index()];
        if !list.contains(&sq) {
            list.push(sq);
        }
    }
}

/// True when the pawn on `pawn` would step onto `target` with a push, a
/// double push or a diagonal capture.
fn pawn_reaches(pos: &Position, pawn: Square, target: Square) -> bool {
    let side = pos.at(pawn).side();
    let fwd = side.forward();
    let df = target.file() as i8 - pawn.file() as i8;
    let dr = target.rank() as i8 - pawn.rank() as i8;
    if dr == fwd && df.abs() <= 1 {
        return true;
    }
    df == 0 && dr == 2 * fwd && pawn.rank() == side.pawn_rank()
}

fn walk_rays(pos: &Position, from: Square, skip: Square, out: &mut Occlusion) {
    for (i, &(df, dr)) in COMPASS.iter().enumerate() {
        let diagonal = i % 2 == 1;
        let mut cursor = from;
        let mut distance = 0;
        while let Some(next) = cursor.translate(df, dr) {
            cursor = next;
            distance += 1;
            if next == skip {
                continue;
            }
            let piece = pos.at(next);
            let hit = match piece.kind() {
                PieceKind::Empty => continue,
                PieceKind::Bishop => diagonal,
                PieceKind::Rook => !diagonal,
                PieceKind::Queen => true,
                PieceKind::King => distance == 1,
                PieceKind::Pawn => pawn_reaches(pos, next, from),
                PieceKind::Knight => false,
            };
            if hit {
                out.mark(pos, next);
            }
            break;
        }
    }
}

fn mark_knights(pos: &Position, from: Square, skip: Square, out: &mut Occlusion) {
    for &(df, dr) in &KNIGHT_STEPS {
        if let Some(sq) = from.translate(df, dr) {
            if sq != skip && pos.at(sq).kind() == PieceKind::Knight {
                out.mark(pos, sq);
            }
        }
    }
}

/// Pieces whose generation depends on the origin or destination of `record`
/// in `pos`. The mover itself is never included.
pub fn occlusion(pos: &Position, record: MoveRecord) -> Occlusion {
    let from = record.initial();
    let to = record.destination();
    let mut out = Occlusion::default();

    walk_rays(pos, from, from, &mut out);
    mark_knights(pos, from, from, &mut out);
    walk_rays(pos, to, from, &mut out);
    mark_knights(pos, to, from, &mut out);

    let stm = pos.to_move();
    if let Some(target) = pos.en_passant() {
        for df in [-1, 1] {
            if let Some(sq) = target.translate(df, -stm.forward()) {
                let piece = pos.at(sq);
                if sq != from && piece.kind() == PieceKind::Pawn && piece.side() == stm {
                    out.mark(pos, sq);
                }
            }
        }
    }

    let mover = pos.at(from);
    if mover.kind() == PieceKind::Pawn && from.rank().abs_diff(to.rank()) == 2 {
        for df in [-1, 1] {
            if let Some(sq) = to.translate(df, 0) {
                let piece = pos.at(sq);
                if piece.kind() == PieceKind::Pawn && piece.side() == !stm {
                    out.mark(pos, sq);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(squares: &[Square]) -> Vec<String> {
        let mut v: Vec<String> = squares.iter().map(|s| s.to_string()).collect();
        v.sort();
        v
    }

    #[test]
    fn knight_development_from_startpos() {
        let pos = Position::startpos();
        let occ = occlusion(&pos, "g1f3".parse().unwrap());
        assert_eq!(names(occ.of(Side::White)), ["e2", "f2", "g2", "h1"]);
        assert!(occ.of(Side::Black).is_empty());
    }

    #[test]
    fn double_push_marks_adjacent_enemy_pawns() {
        let pos = Position::from_fen("4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1").unwrap();
        let occ = occlusion(&pos, "e2e4".parse().unwrap());
        assert_eq!(names(occ.of(Side::Black)), ["d4"]);
    }

    #[test]
    fn en_passant_capturers_are_marked() {
        let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        let occ = occlusion(&pos, "e1d1".parse().unwrap());
        assert!(occ.of(Side::White).contains(&"e5".parse().unwrap()));
    }
}
