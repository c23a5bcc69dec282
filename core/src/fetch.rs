//! Tri-state fetch results and the generation-guarded cell that owns them.
//!
//! # Design
//! Every fetch cycle is tagged with a `Generation`. Starting a cycle bumps
//! the generation and publishes `Loading` in one step; settling a cycle only
//! succeeds while its generation is still the latest. Both steps run under
//! the watch channel's lock, so a superseded response can never overwrite
//! state set by a later cycle, whatever the runtime flavor.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::watch;

/// Outcome of the latest fetch cycle. Exactly one variant holds at a time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state")]
pub enum FetchResult<T> {
    Loading,
    Success { payload: T },
    Failure { message: String },
}

impl<T> FetchResult<T> {
    pub fn success(payload: T) -> Self {
        FetchResult::Success { payload }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        FetchResult::Failure {
            message: message.into(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchResult::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FetchResult::Failure { .. })
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            FetchResult::Success { payload } => Some(payload),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            FetchResult::Failure { message } => Some(message),
            _ => None,
        }
    }
}

impl<T> Default for FetchResult<T> {
    fn default() -> Self {
        FetchResult::Loading
    }
}

/// Marker identifying one fetch cycle of a `FetchCell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

/// Owner of one `FetchResult`, published to observers through a watch channel.
#[derive(Debug)]
pub struct FetchCell<T> {
    state: watch::Sender<FetchResult<T>>,
    generation: AtomicU64,
}

impl<T> FetchCell<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(FetchResult::Loading);
        Self {
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Start a new cycle: supersede every earlier one and publish `Loading`.
    pub fn begin(&self) -> Generation {
        let mut started = Generation(0);
        self.state.send_modify(|state| {
            started = Generation(self.generation.fetch_add(1, Ordering::AcqRel) + 1);
            *state = FetchResult::Loading;
        });
        started
    }

    /// Settle `generation` with `result`. Returns `false`, leaving state
    /// untouched, when a later cycle has started or the cell was invalidated.
    pub fn commit(&self, generation: Generation, result: FetchResult<T>) -> bool {
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::Acquire) != generation.0 {
                return false;
            }
            *state = result;
            true
        })
    }

    /// Supersede every pending cycle without changing the published state.
    pub fn invalidate(&self) {
        self.state.send_if_modified(|_| {
            self.generation.fetch_add(1, Ordering::AcqRel);
            false
        });
    }

    pub fn current(&self) -> Generation {
        Generation(self.generation.load(Ordering::Acquire))
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.current() == generation
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchResult<T>> {
        self.state.subscribe()
    }
}

impl<T: Clone> FetchCell<T> {
    pub fn snapshot(&self) -> FetchResult<T> {
        self.state.borrow().clone()
    }
}

impl<T> Default for FetchCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
