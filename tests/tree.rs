use std::thread;

use deinos::mcts::{prior_fn, value_fn, EdgeState, Expansion, GameResult, Tree};
use deinos::{AnalysedPosition, Position, Side};
use pretty_assertions::assert_eq;

fn tree_at(fen: &str, exploration: f32) -> Tree {
    Tree::new(
        AnalysedPosition::new(Position::from_fen(fen).unwrap()),
        value_fn(|_| 0.5),
        prior_fn(|_, _| 0.0),
        exploration,
    )
}

fn startpos_tree() -> Tree {
    tree_at("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 0.5)
}

#[test]
fn checkmate_resolves_in_one_step() {
    let tree = tree_at("8/7k/8/7R/4K3/6R1/8/8 b - - 3 2", 0.3);
    tree.search();
    assert_eq!(tree.root().result(), Some(GameResult::Win(Side::White)));
    assert!(tree.root().edges().iter().all(|e| e.is_pruned()));

    let tree = tree_at("8/8/8/8/8/4k3/3q4/3K4 w - - 1 2", 0.3);
    tree.search();
    assert_eq!(tree.root().result(), Some(GameResult::Win(Side::Black)));
}

#[test]
fn stalemate_resolves_to_a_draw() {
    let tree = tree_at("7k/3R4/8/8/4K3/6R1/8/8 b - - 1 1", 0.3);
    tree.search();
    assert_eq!(tree.root().result(), Some(GameResult::Draw));
    tree.search();
    assert_eq!(tree.root().total_visits(), 3);
}

#[test]
fn every_root_move_gets_expanded() {
    let tree = startpos_tree();
    for _ in 0..100 {
        tree.search();
    }
    let root = tree.root();
    assert_eq!(root.total_visits(), 101);
    for i in 0..root.edges().len() {
        assert!(matches!(root.edge_state(i), EdgeState::Expanded(_)), "edge {i}");
    }
    let visits: u32 = root.edges().iter().map(|e| e.visits()).sum();
    assert_eq!(visits, 100);
}

#[test]
fn advance_by_keeps_the_subtree() {
    let mut tree = startpos_tree();
    for _ in 0..200 {
        tree.search();
    }
    let record = "e2e4".parse().unwrap();
    let index = tree.root().find_child_by_move(&record).unwrap();
    let kept = tree.root().edge(index).visits();
    assert!(tree.advance_by(&record));
    assert_eq!(tree.root().total_visits(), kept);
    assert_eq!(tree.root().position().position().to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
}

#[test]
fn advance_misses_leave_the_root_alone() {
    let mut tree = startpos_tree();
    tree.search();
    assert!(!tree.advance_by(&"e2e5".parse().unwrap()));
    assert!(!tree.advance_to("8/8/8/4k3/8/8/8/4K3 w - - 0 1"));
    assert!(!tree.advance_to("not a fen"));
    assert_eq!(tree.root().position().position(), &Position::startpos());
    assert_eq!(tree.root().total_visits(), 2);
}

/// Child lookup by FEN skips the en passant field, so a position with a
/// different en passant target still matches. Kept deliberately; two such
/// positions can differ in their legal moves.
#[test]
fn advance_to_ignores_en_passant_field() {
    let mut tree = startpos_tree();
    for _ in 0..100 {
        tree.search();
    }
    assert!(tree.advance_to("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"));
    assert_eq!(tree.root().position().position().en_passant(), Some("e3".parse().unwrap()));
}

#[test]
fn reset_discards_everything() {
    let mut tree = startpos_tree();
    for _ in 0..50 {
        tree.search();
    }
    tree.reset(AnalysedPosition::new(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap()));
    assert_eq!(tree.root().total_visits(), 1);
    assert_eq!(tree.root().edges().len(), 5);
}

#[test]
fn principal_variation_starts_with_the_best_move() {
    let tree = startpos_tree();
    for _ in 0..500 {
        tree.search_tracked();
    }
    let pv = tree.principal_variation(6);
    assert!(!pv.is_empty() && pv.len() <= 6);
    assert_eq!(Some(pv[0]), tree.root().best_move());
    let hot = tree.root().hot_edges();
    assert_eq!(hot.len(), 4);
    assert_eq!(Some(hot[0]), tree.root().preferred_index());
}

#[test]
fn concurrent_searches_keep_counts_consistent() {
    for expansion in [Expansion::Full, Expansion::Incremental] {
        let tree = startpos_tree().with_expansion(expansion);
        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..300 {
                        tree.search();
                    }
                });
            }
        });
        let root = tree.root();
        assert_eq!(root.total_visits(), 1 + 4 * 300);
        let visits: u32 = root.edges().iter().map(|e| e.visits()).sum();
        assert_eq!(visits, 4 * 300);
    }
}

#[test]
fn incremental_expansion_searches_the_same_tree() {
    let full = startpos_tree();
    let incremental = startpos_tree().with_expansion(Expansion::Incremental);
    for _ in 0..300 {
        full.search();
        incremental.search();
    }
    let visits = |t: &Tree| -> Vec<u32> { t.root().edges().iter().map(|e| e.visits()).collect() };
    assert_eq!(visits(&full), visits(&incremental));
    assert_eq!(full.root().total_visits(), incremental.root().total_visits());
}
