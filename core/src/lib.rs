//! Data-synchronization core for the Cinemax movie client.
//!
//! # Overview
//! Keeps UI state in step with the movie API across three flows: fetching
//! the movie list, fetching one movie, and liking/rating a movie followed by
//! a refetch. Each flow publishes a tri-state `FetchResult` that the
//! presentation layer renders from.
//!
//! # Design
//! - `MovieClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network; a `Transport` executes them.
//! - `ApiClient` is stateless and shared behind an `Arc`.
//! - Each synchronizer owns a `FetchCell`, which tags fetch cycles with a
//!   generation so responses from superseded cycles are dropped.
//! - After a like or rate, the movie is re-read from the server; nothing is
//!   updated locally.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod detail;
pub mod error;
pub mod fetch;
pub mod http;
pub mod list;
pub mod mutation;
pub mod page;
pub mod transport;
pub mod types;

pub use api::ApiClient;
pub use client::{normalize_collection, MovieClient};
pub use config::{ClientConfig, ConfigError, Messages, MutationFailurePolicy};
pub use detail::DetailSynchronizer;
pub use error::TransportError;
pub use fetch::{FetchCell, FetchResult, Generation};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use list::ListSynchronizer;
pub use mutation::MutationCoordinator;
pub use page::{HomePage, Intent, MoviePage, Navigation};
pub use transport::{ReqwestTransport, Transport};
pub use types::{Movie, MovieId, RateMovie, Score};
