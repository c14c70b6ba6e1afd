//! Line-based text protocol.
//!
//! Commands: `ping N`, `setboard <fen>`, `go`, `display`, `quit`. Anything
//! else is ignored. Replies go to the writer, one per line.

use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::board::Position;
use crate::engine::Engine;

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct ProtocolLoop {
    engine: Engine,
    think_time: Duration,
}

impl ProtocolLoop {
    pub fn new(engine: Engine, think_time: Duration) -> Self {
        ProtocolLoop { engine, think_time }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Reads commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("reading protocol input")?;
            if self.handle(line.trim(), &mut output)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    fn handle<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let (command, rest) = line.split_once(' ').map_or((line, ""), |(c, r)| (c, r.trim()));
        match command {
            "" => {}
            "quit" => return Ok(Flow::Quit),
            "ping" => {
                writeln!(out, "pong {rest}")?;
                out.flush()?;
            }
            "setboard" => self.cmd_setboard(rest),
            "go" => self.cmd_go(out)?,
            "display" => eprintln!("{}", self.engine.display()),
            other => debug!("ignoring command `{other}`"),
        }
        Ok(Flow::Continue)
    }

    fn cmd_setboard(&mut self, fen: &str) {
        let position = match Position::from_fen(fen) {
            Ok(p) => p,
            Err(e) => {
                warn!("setboard ignored: {e}");
                return;
            }
        };
        if !self.engine.set_position(position) {
            warn!("position {fen} was not in the search tree; starting over");
        }
    }

    fn cmd_go<W: Write>(&mut self, out: &mut W) -> Result<()> {
        thread::sleep(self.think_time);
        let Some(record) = self.engine.choose_move() else {
            warn!("no move available in {}", self.engine.position());
            return Ok(());
        };
        writeln!(out, "move {record}")?;
        out.flush()?;
        info!("played {record}");
        if let Err(e) = self.engine.force_move(record) {
            warn!("could not advance past {record}: {e}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RandomEngine;

    fn run(commands: &str) -> (String, ProtocolLoop) {
        let mut proto = ProtocolLoop::new(RandomEngine::new(Position::startpos(), 3).into(), Duration::ZERO);
        let mut out = Vec::new();
        proto.run(commands.as_bytes(), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), proto)
    }

    #[test]
    fn ping_pong_and_quit() {
        let (out, _) = run("ping 7\n\nbogus\nquit\nping 8\n");
        assert_eq!(out, "pong 7\n");
    }

    #[test]
    fn go_answers_with_a_move() {
        let (out, proto) = run("go\n");
        let text = out.strip_prefix("move ").unwrap().trim();
        assert!(Position::startpos().apply_uci(text).is_ok());
        assert_eq!(proto.engine().position().to_move(), crate::board::Side::Black);
    }

    #[test]
    fn bad_setboard_is_ignored() {
        let (_, proto) = run("setboard not a fen\n");
        assert_eq!(proto.engine().position(), Position::startpos());
    }
}
