//! Like/rate followed by a detail refetch.
//!
//! # Design
//! The client never guesses a new like count or rating: after a successful
//! write it re-reads the movie and lets the detail state follow the server.
//! A failed write skips the read and leaves the detail state alone.
//! Mutations are not serialized against each other; when several overlap,
//! whichever refetch completes last is what stays on screen.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::config::{Messages, MutationFailurePolicy};
use crate::detail::DetailSynchronizer;
use crate::transport::Transport;
use crate::types::{MovieId, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutation {
    Like,
    Rate(Score),
}

#[derive(Debug)]
pub struct MutationCoordinator<T> {
    api: Arc<ApiClient<T>>,
    detail: Arc<DetailSynchronizer<T>>,
    policy: MutationFailurePolicy,
    notice: watch::Sender<Option<String>>,
    failure_message: String,
}

impl<T: Transport> MutationCoordinator<T> {
    pub fn new(
        api: Arc<ApiClient<T>>,
        detail: Arc<DetailSynchronizer<T>>,
        policy: MutationFailurePolicy,
        messages: &Messages,
    ) -> Self {
        let (notice, _) = watch::channel(None);
        Self {
            api,
            detail,
            policy,
            notice,
            failure_message: messages.mutation_failure.clone(),
        }
    }

    pub async fn like(&self, id: &MovieId) {
        self.mutate(id, Mutation::Like).await;
    }

    pub async fn rate(&self, id: &MovieId, score: Score) {
        self.mutate(id, Mutation::Rate(score)).await;
    }

    /// Failure notices. Only ever set under `MutationFailurePolicy::Surface`.
    pub fn notices(&self) -> watch::Receiver<Option<String>> {
        self.notice.subscribe()
    }

    async fn mutate(&self, id: &MovieId, mutation: Mutation) {
        let token = self.detail.resync_token(id);
        if token.is_none() {
            warn!(movie_id = %id, ?mutation, "mutating a movie that is not in view");
        }

        let written = match mutation {
            Mutation::Like => self.api.like_movie(id).await,
            Mutation::Rate(score) => self.api.rate_movie(id, score).await,
        };
        if let Err(err) = written {
            warn!(movie_id = %id, ?mutation, error = %err, status = ?err.status(), "mutation failed");
            self.report_failure();
            return;
        }

        match self.detail.resync(id, token).await {
            Ok(applied) => {
                debug!(movie_id = %id, ?mutation, applied, "resynced movie after mutation");
                if applied {
                    self.clear_failure();
                }
            }
            Err(err) => {
                warn!(movie_id = %id, ?mutation, error = %err, "refetch after mutation failed");
                self.report_failure();
            }
        }
    }

    fn report_failure(&self) {
        if self.policy == MutationFailurePolicy::Surface {
            self.notice.send_replace(Some(self.failure_message.clone()));
        }
    }

    fn clear_failure(&self) {
        if self.policy == MutationFailurePolicy::Surface {
            self.notice.send_replace(None);
        }
    }
}
