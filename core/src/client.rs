//! Stateless HTTP request builder and response parser for the movie API.
//!
//! # Design
//! `MovieClient` holds only a `base_url` and carries no mutable state between
//! calls. Each endpoint is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The round-trip itself belongs to a `Transport`.
//!
//! The list endpoint is served either as a bare array or wrapped in a
//! pagination envelope; `normalize_collection` is the single place that
//! reconciles the two.

use serde_json::Value;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Movie, MovieId, RateMovie, Score};

const MOVIES_PATH: &str = "/api/movies/";

/// Synchronous, stateless client for the movie API.
#[derive(Debug, Clone)]
pub struct MovieClient {
    base_url: String,
}

impl MovieClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_movies(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{MOVIES_PATH}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_movie(&self, id: &MovieId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.movie_path(id, ""),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_like_movie(&self, id: &MovieId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            path: self.movie_path(id, "like/"),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_rate_movie(&self, id: &MovieId, score: Score) -> Result<HttpRequest, TransportError> {
        let body = serde_json::to_string(&RateMovie { score })
            .map_err(|e| TransportError::Encode(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.movie_path(id, "rate/"),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn parse_list_movies(&self, response: HttpResponse) -> Result<Vec<Movie>, TransportError> {
        check_status(&response)?;
        let value: Value =
            serde_json::from_str(&response.body).map_err(|e| TransportError::Decode(e.to_string()))?;
        normalize_collection(value)
    }

    pub fn parse_get_movie(&self, response: HttpResponse) -> Result<Movie, TransportError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| TransportError::Decode(e.to_string()))
    }

    /// Like and rate responses only matter for their status; the body is ignored.
    pub fn parse_mutation(&self, response: HttpResponse) -> Result<(), TransportError> {
        check_status(&response)
    }

    fn movie_path(&self, id: &MovieId, action: &str) -> String {
        format!("{}{MOVIES_PATH}{id}/{action}", self.base_url)
    }
}

/// Turn a list response into an ordered collection.
///
/// Precedence:
/// 1. a bare JSON array is the collection;
/// 2. an object whose `results` field is an array (pagination envelope)
///    yields that array, other envelope fields are ignored;
/// 3. anything else yields an empty collection.
///
/// Server order is preserved. An element that does not decode as a movie is
/// an error rather than being skipped.
pub fn normalize_collection(value: Value) -> Result<Vec<Movie>, TransportError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut envelope) => match envelope.remove("results") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| TransportError::Decode(e.to_string())))
        .collect()
}

/// Map non-2xx status codes to `TransportError::Status`.
fn check_status(response: &HttpResponse) -> Result<(), TransportError> {
    if response.is_success() {
        return Ok(());
    }
    Err(TransportError::Status {
        status: response.status,
        body: response.body.clone(),
    })
}
