use log::{info, trace};

use crate::analysis::AnalysedPosition;
use crate::board::{Move, MoveRecord};

use super::edge::EdgeState;
use super::node::Node;
use super::{Expansion, PriorFn, ValueFn};

/// Outcome of taking one edge during a descent.
enum Step<'a> {
    /// The move left the mover's king attacked; the edge is now pruned.
    Pruned,
    Descend(&'a Node),
    /// A new child was stored and scored.
    Leaf(f32),
}

pub struct Tree {
    root: Box<Node>,
    value_fn: ValueFn,
    prior_fn: PriorFn,
    exploration: f32,
    expansion: Expansion,
}

impl Tree {
    pub fn new(position: AnalysedPosition, value_fn: ValueFn, prior_fn: PriorFn, exploration: f32) -> Tree {
        Tree {
            root: Box::new(Node::new(position)),
            value_fn,
            prior_fn,
            exploration,
            expansion: Expansion::Full,
        }
    }

    pub fn with_expansion(mut self, expansion: Expansion) -> Tree {
        self.expansion = expansion;
        self
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn exploration(&self) -> f32 {
        self.exploration
    }

    pub fn expansion(&self) -> Expansion {
        self.expansion
    }

    pub fn prior(&self, position: &AnalysedPosition, record: MoveRecord) -> f32 {
        (self.prior_fn)(position, record)
    }

    /// Picks the edge to explore next, or `None` when every edge is pruned.
    ///
    /// The exploration bonus is scaled by how undecided the node looks: a
    /// node averaging near 0 or 1 explores less than one near 0.5.
    pub fn edge_to_search(&self, node: &Node) -> Option<usize> {
        let total = node.total_visits() as f32;
        let legal_value: f32 = node.edges().iter().filter(|e| !e.is_pruned()).map(|e| e.value()).sum();
        let node_average = legal_value / total;
        let mut margin = 0.5 - (node_average - 0.5).abs();
        if margin == 0.0 {
            margin = 0.5;
        }
        let reach = self.exploration * total.sqrt();

        let mut best: Option<(usize, f32)> = None;
        for (i, edge) in node.edges().iter().enumerate() {
            let score = if edge.is_pruned() {
                -1.0
            } else {
                let average = edge.average();
                let oriented = if node.white_to_play() { average } else { 1.0 - average };
                oriented + reach / (1.0 + edge.visits() as f32) * 2.0 * margin
            };
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((i, score));
            }
        }
        match best {
            Some((i, score)) if score != -1.0 => Some(i),
            _ => None,
        }
    }

    fn child_analysis(&self, parent: &AnalysedPosition, record: MoveRecord) -> AnalysedPosition {
        match self.expansion {
            Expansion::Incremental if Move::new(parent.position(), record).is_simple() => {
                let mut child = parent.clone();
                child.advance_by(record);
                child
            }
            _ => parent.after(record),
        }
    }

    fn follow<'a>(&self, node: &'a Node, index: usize) -> Step<'a> {
        let edge = node.edge(index);
        match edge.state() {
            EdgeState::Pruned => Step::Pruned,
            EdgeState::Expanded(child) => Step::Descend(child),
            EdgeState::Unvisited => {
                let record = node.position().moves()[index];
                let analysis = self.child_analysis(node.position(), record);
                if analysis.illegal_check() {
                    trace!("pruning {} in {}", node.edge_move(index), node.position().position());
                    edge.prune();
                    return Step::Pruned;
                }
                let mut created = false;
                let child = edge.expand_with(|| {
                    created = true;
                    Node::new(analysis)
                });
                if created {
                    Step::Leaf((self.value_fn)(child.position()))
                } else {
                    Step::Descend(child)
                }
            }
        }
    }

    /// One search step from `node`, recursing down expanded edges. Returns the
    /// value backed up through `node`.
    pub fn evaluate_node(&self, node: &Node) -> f32 {
        loop {
            if let Some(result) = node.result() {
                node.increment();
                return result.value();
            }
            let Some(index) = self.edge_to_search(node) else {
                node.resolve();
                continue;
            };
            let value = match self.follow(node, index) {
                Step::Pruned => continue,
                Step::Descend(child) => self.evaluate_node(child),
                Step::Leaf(value) => value,
            };
            node.update(index, value);
            return value;
        }
    }

    /// One search step from the root, walking down iteratively and backing
    /// the leaf value up every recorded edge.
    pub fn search(&self) {
        self.search_path(false);
    }

    /// Like [`Tree::search`], also refreshing the hot edge list of every node
    /// on the path.
    pub fn search_tracked(&self) {
        self.search_path(true);
    }

    fn search_path(&self, track: bool) {
        let mut path: Vec<(&Node, usize)> = Vec::with_capacity(64);
        let mut node: &Node = &self.root;
        let value = loop {
            if let Some(result) = node.result() {
                node.increment();
                break result.value();
            }
            let Some(index) = self.edge_to_search(node) else {
                node.resolve();
                continue;
            };
            match self.follow(node, index) {
                Step::Pruned => {}
                Step::Descend(child) => {
                    path.push((node, index));
                    node = child;
                }
                Step::Leaf(value) => {
                    path.push((node, index));
                    break value;
                }
            }
        };
        for &(node, index) in &path {
            node.update(index, value);
            if track {
                node.refresh_hot_edges();
            }
        }
    }

    fn replace_root(&mut self, index: usize) -> bool {
        match self.root.take_child(index) {
            Some(child) => {
                self.root = child;
                info!("root advanced to {} ({} visits kept)", self.root.position().position(), self.root.total_visits());
                true
            }
            None => false,
        }
    }

    /// Makes the expanded child matching `fen` (en passant ignored) the new
    /// root. Returns `false` and leaves the tree alone when there is none.
    pub fn advance_to(&mut self, fen: &str) -> bool {
        match self.root.find_child_by_fen(fen) {
            Some(index) => self.replace_root(index),
            None => false,
        }
    }

    pub fn advance_by(&mut self, record: &MoveRecord) -> bool {
        match self.root.find_child_by_move(record) {
            Some(index) => self.replace_root(index),
            None => false,
        }
    }

    /// Throws the whole tree away and starts again from `position`.
    pub fn reset(&mut self, position: AnalysedPosition) {
        info!("tree reset to {}", position.position());
        self.root = Box::new(Node::new(position));
    }

    /// Preferred moves from the root, following expanded children only.
    pub fn principal_variation(&self, max_len: usize) -> Vec<MoveRecord> {
        let mut line = Vec::new();
        let mut node: &Node = &self.root;
        while line.len() < max_len {
            let Some(index) = node.preferred_index() else {
                break;
            };
            let Some(child) = node.edge(index).child() else {
                break;
            };
            line.push(node.position().moves()[index]);
            node = child;
        }
        line
    }
}
