//! Detail synchronizer: owns the "fetch one movie" cycle for the routed id.
//!
//! # Design
//! The routed identifier is an explicit input. A new cycle runs only when it
//! differs from the input of the last cycle, and switching identifiers
//! supersedes whatever is still in flight. Identifier update and cycle start
//! happen under one lock so the active identifier always names the latest
//! generation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, error};

use crate::api::ApiClient;
use crate::config::Messages;
use crate::error::TransportError;
use crate::fetch::{FetchCell, FetchResult, Generation};
use crate::transport::Transport;
use crate::types::{Movie, MovieId};

#[derive(Debug)]
pub struct DetailSynchronizer<T> {
    api: Arc<ApiClient<T>>,
    cell: FetchCell<Movie>,
    active: Mutex<Option<MovieId>>,
    failure_message: String,
}

impl<T: Transport> DetailSynchronizer<T> {
    pub fn new(api: Arc<ApiClient<T>>, messages: &Messages) -> Self {
        Self {
            api,
            cell: FetchCell::new(),
            active: Mutex::new(None),
            failure_message: messages.detail_failure.clone(),
        }
    }

    /// Follow the routed identifier.
    ///
    /// Re-runs the cycle only when `identifier` differs from the last one.
    /// A missing or blank identifier fetches nothing and leaves the state as
    /// it was, but still supersedes any pending cycle.
    pub async fn set_identifier(&self, identifier: Option<MovieId>) {
        let identifier = identifier.filter(|id| !id.is_blank());
        if let Some((id, generation)) = self.activate(identifier, false) {
            self.run_cycle(id, generation).await;
        }
    }

    /// Run a cycle for `identifier` even if it is already the active one.
    pub async fn load_one(&self, identifier: &MovieId) {
        if identifier.is_blank() {
            debug!("no movie identifier, skipping fetch");
            return;
        }
        if let Some((id, generation)) = self.activate(Some(identifier.clone()), true) {
            self.run_cycle(id, generation).await;
        }
    }

    /// Stop applying responses, e.g. when the page is left.
    pub fn deactivate(&self) {
        let mut active = self.lock_active();
        *active = None;
        self.cell.invalidate();
    }

    pub fn identifier(&self) -> Option<MovieId> {
        self.lock_active().clone()
    }

    pub fn state(&self) -> FetchResult<Movie> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchResult<Movie>> {
        self.cell.subscribe()
    }

    /// Generation to resync against, if `id` is the movie currently in view.
    pub(crate) fn resync_token(&self, id: &MovieId) -> Option<Generation> {
        let active = self.lock_active();
        (active.as_ref() == Some(id)).then(|| self.cell.current())
    }

    /// Re-read `id` and publish it as `Success` without a `Loading` step.
    ///
    /// Returns whether the fresh movie was applied; it is dropped when the
    /// view moved on since `token` was taken.
    pub(crate) async fn resync(
        &self,
        id: &MovieId,
        token: Option<Generation>,
    ) -> Result<bool, TransportError> {
        let movie = self.api.get_movie(id).await?;
        let applied = match token {
            Some(generation) => self.cell.commit(generation, FetchResult::success(movie)),
            None => false,
        };
        if !applied {
            debug!(movie_id = %id, "discarded refetch for a movie no longer in view");
        }
        Ok(applied)
    }

    fn activate(&self, identifier: Option<MovieId>, force: bool) -> Option<(MovieId, Generation)> {
        let mut active = self.lock_active();
        if !force && *active == identifier {
            return None;
        }
        *active = identifier.clone();
        match identifier {
            Some(id) => Some((id, self.cell.begin())),
            None => {
                self.cell.invalidate();
                None
            }
        }
    }

    async fn run_cycle(&self, id: MovieId, generation: Generation) {
        let result = match self.api.get_movie(&id).await {
            Ok(movie) => {
                debug!(movie_id = %id, "loaded movie");
                FetchResult::success(movie)
            }
            Err(err) => {
                error!(movie_id = %id, error = %err, status = ?err.status(), "failed to load movie");
                FetchResult::failure(self.failure_message.as_str())
            }
        };
        if !self.cell.commit(generation, result) {
            debug!(movie_id = %id, ?generation, "discarded stale movie response");
        }
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<MovieId>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
