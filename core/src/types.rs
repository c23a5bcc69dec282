//! Domain DTOs for the movie API.
//!
//! # Design
//! The core only interprets a movie's identifier. Everything else the server
//! sends (like counts, rating aggregates, cast, posters) is carried verbatim
//! in `Movie::fields` so a server-side schema change never breaks decoding.
//! These types are defined independently from the mock-server crate;
//! integration tests catch schema drift.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Identifier of a movie.
///
/// The server emits numeric ids while the router hands over path segments,
/// so both forms are accepted. An all-digit string, whether it comes from a
/// route segment or from a server payload, is always held as `Number`, so
/// equal ids compare equal regardless of how they were spelled on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum MovieId {
    Number(u64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMovieId {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawMovieId::deserialize(deserializer)? {
            RawMovieId::Number(n) => MovieId::Number(n),
            RawMovieId::Text(s) => MovieId::parse(&s),
        })
    }
}

impl MovieId {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<u64>() {
            Ok(n) => MovieId::Number(n),
            Err(_) => MovieId::Text(raw.to_string()),
        }
    }

    /// A blank identifier is treated the same as a missing one.
    pub fn is_blank(&self) -> bool {
        match self {
            MovieId::Number(_) => false,
            MovieId::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovieId::Number(n) => write!(f, "{n}"),
            MovieId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for MovieId {
    fn from(n: u64) -> Self {
        MovieId::Number(n)
    }
}

impl From<&str> for MovieId {
    fn from(raw: &str) -> Self {
        MovieId::parse(raw)
    }
}

/// A movie as returned by the list or detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    /// Every other field of the server representation, in server order.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Movie {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The title when the server sent it as a plain string.
    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }
}

/// Rating score. Bounds are the server's business.
pub type Score = i64;

/// Request payload for rating a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateMovie {
    pub score: Score,
}
