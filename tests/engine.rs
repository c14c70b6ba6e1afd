use std::thread;
use std::time::Duration;

use deinos::engine::{Engine, EngineConfig, RandomEngine, TreeEngine};
use deinos::eval::{default_prior, ValueKind};
use deinos::mcts::Expansion;
use deinos::{AnalysedPosition, MoveRecord, ParseError, Position};
use pretty_assertions::assert_eq;

fn small_config() -> EngineConfig {
    EngineConfig { threads: 2, batch: 50, ..EngineConfig::default() }
}

fn tree_engine(position: Position, config: EngineConfig) -> TreeEngine {
    TreeEngine::new(AnalysedPosition::new(position), ValueKind::Material.value_fn(), default_prior(), config)
}

fn wait_for_visits(engine: &TreeEngine, visits: u32) {
    for _ in 0..2000 {
        if engine.total_visits() >= visits {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("search stalled at {} visits", engine.total_visits());
}

#[test]
fn workers_search_in_the_background() {
    let engine = tree_engine(Position::startpos(), small_config());
    wait_for_visits(&engine, 500);
    let record = engine.choose_move().unwrap();
    assert!(AnalysedPosition::startpos().moves().contains(&record));
}

#[test]
fn paused_engine_does_not_search() {
    let engine = tree_engine(Position::startpos(), small_config());
    wait_for_visits(&engine, 100);
    engine.pause();
    let frozen = engine.total_visits();
    thread::sleep(Duration::from_millis(30));
    assert_eq!(engine.total_visits(), frozen);
    engine.resume();
    wait_for_visits(&engine, frozen + 100);
}

#[test]
fn visit_cap_stops_growth() {
    let config = EngineConfig { visit_cap: 300, ..small_config() };
    let engine = tree_engine(Position::startpos(), config);
    wait_for_visits(&engine, 300);
    thread::sleep(Duration::from_millis(50));
    // Each worker may finish the batch it started before seeing the cap.
    assert!(engine.total_visits() <= 301 + 2 * 50);
}

#[test]
fn force_move_follows_or_rebuilds() {
    let engine = tree_engine(Position::startpos(), EngineConfig { expansion: Expansion::Incremental, ..small_config() });
    wait_for_visits(&engine, 200);
    let e4: MoveRecord = "e2e4".parse().unwrap();
    engine.force_move(e4).unwrap();
    assert_eq!(engine.position(), Position::startpos().after(e4));

    let bogus: MoveRecord = "e2e4".parse().unwrap();
    assert_eq!(engine.force_move(bogus), Err(ParseError::UnavailableMove("e2e4".into())));

    // Replies outside the searched tree rebuild it instead.
    let reply: MoveRecord = "a7a6".parse().unwrap();
    engine.force_move(reply).unwrap();
    assert_eq!(engine.position().to_fen(), "rnbqkbnr/1ppppppp/p7/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2");
}

#[test]
fn set_position_reports_tree_hits() {
    let engine = tree_engine(Position::startpos(), small_config());
    wait_for_visits(&engine, 500);
    let after = Position::startpos().apply_uci("d2d4").unwrap();
    assert!(engine.set_position(after.clone()));
    assert_eq!(engine.position(), after);

    let elsewhere = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    assert!(!engine.set_position(elsewhere.clone()));
    assert_eq!(engine.position(), elsewhere);
}

#[test]
fn engine_enum_dispatches() {
    let mut engine: Engine = RandomEngine::new(Position::startpos(), 11).into();
    let record = engine.choose_move().unwrap();
    engine.force_move(record).unwrap();
    assert_eq!(engine.position(), Position::startpos().after(record));
    assert!(!engine.set_position(Position::startpos()));
    assert!(engine.display().contains("r n b q k b n r"));

    let mut engine: Engine = tree_engine(Position::startpos(), small_config()).into();
    assert!(!engine.set_position(Position::startpos()));
    assert!(engine.display().contains("total visits"));
}

#[test]
fn dropping_a_paused_engine_joins_workers() {
    let engine = tree_engine(Position::startpos(), small_config());
    engine.pause();
    drop(engine);
}
