//! API client: `MovieClient` request building glued to a `Transport`.

use std::time::Duration;

use tracing::debug;

use crate::client::MovieClient;
use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Movie, MovieId, Score};

/// Stateless, reentrant client for the movie API.
///
/// Shared between synchronizers behind an `Arc`; holds no per-call state.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    client: MovieClient,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            client: MovieClient::new(base_url),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issue one request and return the raw response.
    pub async fn call(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = %request.method, path = %request.path, "sending request");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "received response");
        Ok(response)
    }

    pub async fn list_movies(&self) -> Result<Vec<Movie>, TransportError> {
        let response = self.call(self.client.build_list_movies()).await?;
        self.client.parse_list_movies(response)
    }

    pub async fn get_movie(&self, id: &MovieId) -> Result<Movie, TransportError> {
        let response = self.call(self.client.build_get_movie(id)).await?;
        self.client.parse_get_movie(response)
    }

    pub async fn like_movie(&self, id: &MovieId) -> Result<(), TransportError> {
        let response = self.call(self.client.build_like_movie(id)).await?;
        self.client.parse_mutation(response)
    }

    pub async fn rate_movie(&self, id: &MovieId, score: Score) -> Result<(), TransportError> {
        let request = self.client.build_rate_movie(id, score)?;
        let response = self.call(request).await?;
        self.client.parse_mutation(response)
    }
}

impl ApiClient<ReqwestTransport> {
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        Ok(Self::new(&config.base_url, ReqwestTransport::new(timeout)?))
    }
}
