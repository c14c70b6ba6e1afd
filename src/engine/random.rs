use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::analysis::AnalysedPosition;
use crate::board::{MoveRecord, ParseError, Position};
use crate::perft::legal_moves;

/// Plays a uniformly random legal move. Used as a sparring partner.
pub struct RandomEngine {
    position: Position,
    rng: SmallRng,
}

impl RandomEngine {
    pub fn new(position: Position, seed: u64) -> Self {
        RandomEngine { position, rng: SmallRng::seed_from_u64(seed) }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn choose_move(&mut self) -> Option<MoveRecord> {
        let moves = legal_moves(&AnalysedPosition::new(self.position.clone()));
        moves.choose(&mut self.rng).copied()
    }

    pub fn force_move(&mut self, record: MoveRecord) -> Result<(), ParseError> {
        let analysed = AnalysedPosition::new(self.position.clone());
        if !analysed.moves().contains(&record) {
            return Err(ParseError::UnavailableMove(record.to_string()));
        }
        self.position = self.position.after(record);
        Ok(())
    }

    pub fn set_position(&mut self, position: Position) -> bool {
        self.position = position;
        false
    }
}
