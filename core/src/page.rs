//! Page-level wiring of synchronizers for the presentation layer.
//!
//! The presentation layer renders from `state()` / `subscribe()` and hands
//! user intents back through `MoviePage::dispatch`.

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::detail::DetailSynchronizer;
use crate::fetch::FetchResult;
use crate::list::ListSynchronizer;
use crate::mutation::MutationCoordinator;
use crate::transport::Transport;
use crate::types::{Movie, MovieId, Score};

/// Outbound intents emitted by the movie detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Back,
    Like(MovieId),
    Rate(MovieId, Score),
}

/// What the router should do after an intent was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Back,
}

/// The movie grid.
#[derive(Debug)]
pub struct HomePage<T> {
    movies: ListSynchronizer<T>,
}

impl<T: Transport> HomePage<T> {
    pub fn new(api: Arc<ApiClient<T>>, config: &ClientConfig) -> Self {
        Self {
            movies: ListSynchronizer::new(api, &config.messages),
        }
    }

    pub async fn mount(&self) {
        self.movies.activate().await;
    }

    pub fn unmount(&self) {
        self.movies.deactivate();
    }

    pub fn state(&self) -> FetchResult<Vec<Movie>> {
        self.movies.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchResult<Vec<Movie>>> {
        self.movies.subscribe()
    }
}

/// The detail view of one movie, with its like and rate actions.
#[derive(Debug)]
pub struct MoviePage<T> {
    detail: Arc<DetailSynchronizer<T>>,
    mutations: MutationCoordinator<T>,
}

impl<T: Transport> MoviePage<T> {
    pub fn new(api: Arc<ApiClient<T>>, config: &ClientConfig) -> Self {
        let detail = Arc::new(DetailSynchronizer::new(Arc::clone(&api), &config.messages));
        let mutations = MutationCoordinator::new(
            api,
            Arc::clone(&detail),
            config.mutation_failures,
            &config.messages,
        );
        Self { detail, mutations }
    }

    /// Feed the identifier extracted from the current route.
    pub async fn route(&self, identifier: Option<MovieId>) {
        self.detail.set_identifier(identifier).await;
    }

    pub async fn dispatch(&self, intent: Intent) -> Navigation {
        match intent {
            Intent::Back => return Navigation::Back,
            Intent::Like(id) => self.mutations.like(&id).await,
            Intent::Rate(id, score) => self.mutations.rate(&id, score).await,
        }
        Navigation::Stay
    }

    pub fn unmount(&self) {
        self.detail.deactivate();
    }

    pub fn state(&self) -> FetchResult<Movie> {
        self.detail.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchResult<Movie>> {
        self.detail.subscribe()
    }

    pub fn notices(&self) -> watch::Receiver<Option<String>> {
        self.mutations.notices()
    }
}
