use crate::board::Square;

/// Attacker count per square, two squares to a byte. Counts saturate at 15.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ControlGrid([u8; 32]);

pub const MAX_CONTROL: u8 = 15;

impl ControlGrid {
    #[inline]
    pub fn get(&self, sq: Square) -> u8 {
        let byte = self.0[sq.index() >> 1];
        if sq.index() & 1 == 0 {
            byte & 0x0f
        } else {
            byte >> 4
        }
    }

    #[inline]
    fn put(&mut self, sq: Square, count: u8) {
        let slot = &mut self.0[sq.index() >> 1];
        if sq.index() & 1 == 0 {
            *slot = (*slot & 0xf0) | count;
        } else {
            *slot = (*slot & 0x0f) | (count << 4);
        }
    }

    #[inline]
    pub fn increment(&mut self, sq: Square) {
        let count = self.get(sq);
        if count < MAX_CONTROL {
            self.put(sq, count + 1);
        }
    }

    #[inline]
    pub fn decrement(&mut self, sq: Square) {
        let count = self.get(sq);
        if count > 0 {
            self.put(sq, count - 1);
        }
    }

    /// Squares with at least one attacker.
    pub fn covered(&self) -> usize {
        Square::all().filter(|&sq| self.get(sq) > 0).count()
    }

    pub fn total(&self) -> u32 {
        Square::all().map(|sq| self.get(sq) as u32).sum()
    }
}

impl std::fmt::Debug for ControlGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                write!(f, "{:x}", self.get(Square::at(file, rank)))?;
            }
            if rank > 0 {
                f.write_str("/")?;
            }
        }
        Ok(())
    }
}
