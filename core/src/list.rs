//! List synchronizer: owns the "fetch all movies" cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error};

use crate::api::ApiClient;
use crate::config::Messages;
use crate::fetch::{FetchCell, FetchResult};
use crate::transport::Transport;
use crate::types::Movie;

/// Fetch state of the movie collection.
#[derive(Debug)]
pub struct ListSynchronizer<T> {
    api: Arc<ApiClient<T>>,
    cell: FetchCell<Vec<Movie>>,
    active: AtomicBool,
    failure_message: String,
}

impl<T: Transport> ListSynchronizer<T> {
    pub fn new(api: Arc<ApiClient<T>>, messages: &Messages) -> Self {
        Self {
            api,
            cell: FetchCell::new(),
            active: AtomicBool::new(false),
            failure_message: messages.list_failure.clone(),
        }
    }

    /// Load once per activation. Repeated calls before `deactivate` do nothing.
    pub async fn activate(&self) {
        if self.active.swap(true, Ordering::AcqRel) {
            return;
        }
        self.load_all().await;
    }

    /// Run one fetch cycle: `Loading`, then `Success` or `Failure`.
    pub async fn load_all(&self) {
        let generation = self.cell.begin();
        let result = match self.api.list_movies().await {
            Ok(movies) => {
                debug!(count = movies.len(), "loaded movie list");
                FetchResult::success(movies)
            }
            Err(err) => {
                error!(error = %err, status = ?err.status(), "failed to load movie list");
                FetchResult::failure(self.failure_message.as_str())
            }
        };
        if !self.cell.commit(generation, result) {
            debug!(?generation, "discarded superseded movie list response");
        }
    }

    /// Pending responses are dropped on arrival; the last state stays visible.
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
        self.cell.invalidate();
    }

    pub fn state(&self) -> FetchResult<Vec<Movie>> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchResult<Vec<Movie>>> {
        self.cell.subscribe()
    }
}
