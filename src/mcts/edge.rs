use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::OnceLock;

use super::node::Node;

/// An `f32` updated in place through its bit pattern.
#[derive(Debug, Default)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        AtomicF32(AtomicU32::new(value.to_bits()))
    }

    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn fetch_add(&self, delta: f32) -> f32 {
        let mut current = self.0.load(Ordering::Relaxed);
        loop {
            let next = (f32::from_bits(current) + delta).to_bits();
            match self.0.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(previous) => return f32::from_bits(previous),
                Err(actual) => current = actual,
            }
        }
    }
}

/// What a search step finds when it looks at an edge.
pub enum EdgeState<'a> {
    Unvisited,
    /// Leads to a position where the mover's king can be taken. Never selected again.
    Pruned,
    Expanded(&'a Node),
}

/// One move out of a node: statistics plus the child, created on first visit.
#[derive(Default)]
pub struct Edge {
    value: AtomicF32,
    visits: AtomicU32,
    pruned: AtomicBool,
    child: OnceLock<Box<Node>>,
}

impl Edge {
    pub fn new() -> Self {
        Edge::default()
    }

    pub fn visits(&self) -> u32 {
        self.visits.load(Ordering::Relaxed)
    }

    /// Sum of the values backed up through this edge, White's point of view.
    pub fn value(&self) -> f32 {
        self.value.load()
    }

    /// Mean backed-up value, or 0 before the first visit.
    pub fn average(&self) -> f32 {
        match self.visits() {
            0 => 0.0,
            n => self.value() / n as f32,
        }
    }

    pub fn is_pruned(&self) -> bool {
        self.pruned.load(Ordering::Acquire)
    }

    pub fn state(&self) -> EdgeState<'_> {
        if self.is_pruned() {
            EdgeState::Pruned
        } else {
            match self.child.get() {
                Some(child) => EdgeState::Expanded(child),
                None => EdgeState::Unvisited,
            }
        }
    }

    pub fn child(&self) -> Option<&Node> {
        self.child.get().map(|c| c.as_ref())
    }

    /// Stores the child built by `make` unless another thread got there
    /// first, and returns whichever child ended up in the slot.
    pub fn expand_with(&self, make: impl FnOnce() -> Node) -> &Node {
        self.child.get_or_init(|| Box::new(make()))
    }

    pub(crate) fn take_child(&mut self) -> Option<Box<Node>> {
        self.child.take()
    }

    pub(crate) fn prune(&self) {
        debug_assert!(self.child.get().is_none() && self.visits() == 0, "pruning a visited edge");
        self.pruned.store(true, Ordering::Release);
    }

    pub(crate) fn record(&self, value: f32) {
        self.visits.fetch_add(1, Ordering::Relaxed);
        self.value.fetch_add(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn atomic_f32_accumulates_across_threads() {
        let acc = Arc::new(AtomicF32::new(0.0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let acc = Arc::clone(&acc);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        acc.fetch_add(0.5);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(acc.load(), 2000.0);
    }

    #[test]
    fn fresh_edge_is_unvisited() {
        let edge = Edge::new();
        assert!(matches!(edge.state(), EdgeState::Unvisited));
        assert_eq!(edge.average(), 0.0);
        edge.record(1.0);
        edge.record(0.0);
        assert_eq!(edge.visits(), 2);
        assert_eq!(edge.average(), 0.5);

        let illegal = Edge::new();
        illegal.prune();
        assert!(matches!(illegal.state(), EdgeState::Pruned));
    }
}
