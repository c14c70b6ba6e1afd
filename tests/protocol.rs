use std::time::Duration;

use deinos::engine::{EngineConfig, RandomEngine, TreeEngine};
use deinos::eval::{default_prior, ValueKind};
use deinos::protocol::ProtocolLoop;
use deinos::{AnalysedPosition, Position, Side};
use pretty_assertions::assert_eq;

fn drive(proto: &mut ProtocolLoop, commands: &str) -> String {
    let mut out = Vec::new();
    proto.run(commands.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn random_engine_plays_a_short_game() {
    let mut proto = ProtocolLoop::new(RandomEngine::new(Position::startpos(), 5).into(), Duration::ZERO);
    let out = drive(&mut proto, "ping 1\ngo\ngo\ngo\nping 2\nquit\n");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "pong 1");
    assert!(lines[1..4].iter().all(|l| l.starts_with("move ")));
    assert_eq!(lines[4], "pong 2");
    assert_eq!(proto.engine().position().to_move(), Side::Black);
    assert_eq!(proto.engine().position().fullmove_number(), 2);
}

#[test]
fn setboard_then_go_from_a_tree_engine() {
    let config = EngineConfig { threads: 2, batch: 50, ..EngineConfig::default() };
    let engine = TreeEngine::new(AnalysedPosition::startpos(), ValueKind::Material.value_fn(), default_prior(), config);
    let mut proto = ProtocolLoop::new(engine.into(), Duration::from_millis(50));

    let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
    let out = drive(&mut proto, &format!("setboard {fen}\ngo\nquit\n"));
    let text = out.trim().strip_prefix("move ").unwrap();
    let after = Position::from_fen(fen).unwrap().apply_uci(text).unwrap();
    assert_eq!(proto.engine().position(), after);
}

#[test]
fn input_ends_without_quit() {
    let mut proto = ProtocolLoop::new(RandomEngine::new(Position::startpos(), 5).into(), Duration::ZERO);
    assert_eq!(drive(&mut proto, "ping 9"), "pong 9\n");
}

#[test]
fn setboard_on_finished_game_answers_nothing_to_go() {
    let mut proto = ProtocolLoop::new(RandomEngine::new(Position::startpos(), 5).into(), Duration::ZERO);
    let out = drive(&mut proto, "setboard 8/7k/8/7R/4K3/6R1/8/8 b - - 3 2\ngo\nping 3\n");
    assert_eq!(out, "pong 3\n");
}

#[test]
fn tree_engine_on_finished_game_answers_nothing_to_go() {
    let config = EngineConfig { threads: 2, batch: 10, ..EngineConfig::default() };
    let engine = TreeEngine::new(AnalysedPosition::startpos(), ValueKind::Material.value_fn(), default_prior(), config);
    let mut proto = ProtocolLoop::new(engine.into(), Duration::from_millis(50));
    let out = drive(&mut proto, "setboard 8/7k/8/7R/4K3/6R1/8/8 b - - 3 2\ngo\nping 4\n");
    assert_eq!(out, "pong 4\n");
}
