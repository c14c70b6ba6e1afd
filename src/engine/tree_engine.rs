use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, JoinHandle};

use log::{debug, error, info};

use crate::analysis::AnalysedPosition;
use crate::board::{MoveRecord, ParseError, Position};
use crate::mcts::{PriorFn, Tree, ValueFn};

use super::EngineConfig;

#[derive(Default)]
struct PauseState {
    requested: bool,
    parked: usize,
    /// Workers that have not exited, normally or by panicking.
    live: usize,
}

struct Shared {
    tree: RwLock<Tree>,
    halt: AtomicBool,
    pause: Mutex<PauseState>,
    pause_cv: Condvar,
    config: EngineConfig,
}

impl Shared {
    fn read_tree(&self) -> RwLockReadGuard<'_, Tree> {
        self.tree.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tree(&self) -> RwLockWriteGuard<'_, Tree> {
        self.tree.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn pause_state(&self) -> MutexGuard<'_, PauseState> {
        self.pause.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Searches one shared tree on a fixed pool of threads for as long as it
/// lives. The root is only swapped while every worker is parked.
pub struct TreeEngine {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl TreeEngine {
    pub fn new(position: AnalysedPosition, value_fn: ValueFn, prior_fn: PriorFn, config: EngineConfig) -> TreeEngine {
        info!("starting tree engine at {} with {} threads", position.position(), config.threads);
        let tree = Tree::new(position, value_fn, prior_fn, config.exploration).with_expansion(config.expansion);
        let shared = Arc::new(Shared {
            tree: RwLock::new(tree),
            halt: AtomicBool::new(false),
            pause: Mutex::new(PauseState { live: config.threads, ..PauseState::default() }),
            pause_cv: Condvar::new(),
            config,
        });
        let workers = (0..shared.config.threads)
            .map(|id| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || worker_loop(&shared, id))
            })
            .collect();
        TreeEngine { shared, workers }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    /// Blocks until every live worker has parked.
    pub fn pause(&self) {
        let mut state = self.shared.pause_state();
        state.requested = true;
        while state.parked < state.live {
            state = self.shared.pause_cv.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
        debug!("search paused");
    }

    /// Releases parked workers and blocks until all of them are running.
    pub fn resume(&self) {
        let mut state = self.shared.pause_state();
        state.requested = false;
        self.shared.pause_cv.notify_all();
        while state.parked > 0 {
            state = self.shared.pause_cv.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
        debug!("search resumed");
    }

    /// Runs `f` against the tree with every worker parked.
    fn paused<R>(&self, f: impl FnOnce(&mut Tree) -> R) -> R {
        self.pause();
        let out = f(&mut self.shared.write_tree());
        self.resume();
        out
    }

    /// Read access to the live tree. Workers keep searching meanwhile.
    pub fn inspect<R>(&self, f: impl FnOnce(&Tree) -> R) -> R {
        f(&self.shared.read_tree())
    }

    pub fn live_workers(&self) -> usize {
        self.shared.pause_state().live
    }

    /// Most visited root move, `None` before the first search step or when
    /// the game is over at the root.
    pub fn choose_move(&self) -> Option<MoveRecord> {
        self.inspect(|tree| tree.root().best_move())
    }

    pub fn total_visits(&self) -> u32 {
        self.inspect(|tree| tree.root().total_visits())
    }

    pub fn position(&self) -> Position {
        self.inspect(|tree| tree.root().position().position().clone())
    }

    pub fn summary(&self) -> String {
        self.inspect(|tree| tree.root().summary())
    }

    pub fn advance_to(&self, fen: &str) -> bool {
        self.paused(|tree| tree.advance_to(fen))
    }

    pub fn advance_by(&self, record: &MoveRecord) -> bool {
        self.paused(|tree| tree.advance_by(record))
    }

    /// Replaces the tree with a fresh one rooted at `position`.
    pub fn reset(&self, position: AnalysedPosition) {
        self.paused(|tree| tree.reset(position));
    }

    /// Plays `record`, keeping its subtree when it has one.
    pub fn force_move(&self, record: MoveRecord) -> Result<(), ParseError> {
        self.paused(|tree| {
            if tree.advance_by(&record) {
                return Ok(());
            }
            let root = tree.root().position();
            if !root.moves().contains(&record) {
                return Err(ParseError::UnavailableMove(record.to_string()));
            }
            let next = root.after(record);
            tree.reset(next);
            Ok(())
        })
    }

    /// Advances to `position` when it is a searched child of the root and
    /// rebuilds otherwise. Returns `true` on the first outcome.
    pub fn set_position(&self, position: Position) -> bool {
        self.paused(|tree| {
            if tree.advance_to(&position.to_fen()) {
                return true;
            }
            tree.reset(AnalysedPosition::new(position));
            false
        })
    }
}

impl Drop for TreeEngine {
    fn drop(&mut self) {
        self.shared.halt.store(true, Ordering::Release);
        {
            let mut state = self.shared.pause_state();
            state.requested = false;
            self.shared.pause_cv.notify_all();
        }
        for (id, handle) in self.workers.drain(..).enumerate() {
            if let Err(panic) = handle.join() {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!("search worker {id} panicked: {message}");
            }
        }
        debug!("tree engine stopped");
    }
}

/// Takes a worker off the live count when its loop ends, including by unwinding.
struct LiveWorker<'a>(&'a Shared);

impl Drop for LiveWorker<'_> {
    fn drop(&mut self) {
        let mut state = self.0.pause_state();
        state.live -= 1;
        self.0.pause_cv.notify_all();
    }
}

fn worker_loop(shared: &Shared, id: usize) {
    let _live = LiveWorker(shared);
    debug!("search worker {id} started");
    let batch = shared.config.batch.max(1);
    loop {
        if shared.halt.load(Ordering::Acquire) {
            break;
        }
        {
            let mut state = shared.pause_state();
            if state.requested {
                state.parked += 1;
                shared.pause_cv.notify_all();
                while state.requested && !shared.halt.load(Ordering::Acquire) {
                    state = shared.pause_cv.wait(state).unwrap_or_else(PoisonError::into_inner);
                }
                state.parked -= 1;
                shared.pause_cv.notify_all();
                continue;
            }
        }
        let tree = shared.read_tree();
        if tree.root().total_visits() > shared.config.visit_cap {
            drop(tree);
            thread::sleep(shared.config.throttle());
            continue;
        }
        for _ in 1..batch {
            tree.search();
        }
        tree.search_tracked();
    }
    debug!("search worker {id} stopped");
}
