use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

/// Wire representation of a movie, as served by both list and detail routes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub likes_count: u64,
    pub avg_rating: Option<f64>,
    pub user_liked: bool,
    pub user_rating: Option<i64>,
}

/// Stored movie. The server has a single implicit user whose like and
/// rating are tracked separately from everybody else's.
#[derive(Clone, Debug)]
pub struct MovieRecord {
    pub id: u64,
    pub title: String,
    pub likes_count: u64,
    pub liked: bool,
    pub ratings: Vec<i64>,
    pub user_rating: Option<i64>,
}

impl MovieRecord {
    pub fn new(id: u64, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            likes_count: 0,
            liked: false,
            ratings: Vec::new(),
            user_rating: None,
        }
    }

    pub fn with_likes(mut self, likes_count: u64) -> Self {
        self.likes_count = likes_count;
        self
    }

    pub fn with_ratings(mut self, ratings: Vec<i64>) -> Self {
        self.ratings = ratings;
        self
    }

    pub fn to_movie(&self) -> Movie {
        let all: Vec<i64> = self.ratings.iter().copied().chain(self.user_rating).collect();
        let avg_rating = if all.is_empty() {
            None
        } else {
            Some(all.iter().sum::<i64>() as f64 / all.len() as f64)
        };
        Movie {
            id: self.id,
            title: self.title.clone(),
            likes_count: self.likes_count,
            avg_rating,
            user_liked: self.liked,
            user_rating: self.user_rating,
        }
    }
}

/// How `GET /api/movies/` wraps its collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListShape {
    #[default]
    Bare,
    /// Page-number pagination envelope with everything on one page.
    Paginated,
}

impl ListShape {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bare" => Some(Self::Bare),
            "paginated" => Some(Self::Paginated),
            _ => None,
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum MovieList {
    Bare(Vec<Movie>),
    Paginated {
        count: usize,
        next: Option<String>,
        previous: Option<String>,
        results: Vec<Movie>,
    },
}

#[derive(Debug, Deserialize)]
pub struct RateMovie {
    pub score: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LikeResponse {
    pub liked: bool,
    pub likes_count: u64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RatingResponse {
    pub movie: u64,
    pub score: i64,
}

pub type Db = Arc<RwLock<BTreeMap<u64, MovieRecord>>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

#[derive(Clone)]
struct AppState {
    db: Db,
    shape: ListShape,
}

pub fn database(movies: impl IntoIterator<Item = MovieRecord>) -> Db {
    Arc::new(RwLock::new(movies.into_iter().map(|m| (m.id, m)).collect()))
}

/// Demo catalogue served by the binary.
pub fn seed() -> Vec<MovieRecord> {
    vec![
        MovieRecord::new(1, "Le Samouraï").with_likes(12).with_ratings(vec![9, 8, 9]),
        MovieRecord::new(2, "La Haine").with_likes(30).with_ratings(vec![8, 7]),
        MovieRecord::new(3, "Amélie").with_likes(41).with_ratings(vec![7, 9, 8, 6]),
        MovieRecord::new(4, "Les Quatre Cents Coups").with_likes(8),
    ]
}

pub fn app() -> Router {
    router(database(Vec::new()), ListShape::Bare)
}

pub fn router(db: Db, shape: ListShape) -> Router {
    Router::new()
        .route("/api/movies/", get(list_movies))
        .route("/api/movies/{id}/", get(get_movie))
        .route("/api/movies/{id}/like/", post(toggle_like))
        .route("/api/movies/{id}/rate/", post(rate_movie))
        .with_state(AppState { db, shape })
}

pub async fn run(listener: TcpListener, db: Db, shape: ListShape) -> Result<(), std::io::Error> {
    axum::serve(listener, router(db, shape)).await
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." })))
}

async fn list_movies(State(state): State<AppState>) -> Json<MovieList> {
    let movies: Vec<Movie> = state.db.read().await.values().map(MovieRecord::to_movie).collect();
    debug!(count = movies.len(), shape = ?state.shape, "listing movies");
    Json(match state.shape {
        ListShape::Bare => MovieList::Bare(movies),
        ListShape::Paginated => MovieList::Paginated {
            count: movies.len(),
            next: None,
            previous: None,
            results: movies,
        },
    })
}

async fn get_movie(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<Json<Movie>> {
    let movies = state.db.read().await;
    movies.get(&id).map(|m| Json(m.to_movie())).ok_or_else(not_found)
}

/// First call likes the movie, the next one takes the like back.
async fn toggle_like(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<Json<LikeResponse>> {
    let mut movies = state.db.write().await;
    let record = movies.get_mut(&id).ok_or_else(not_found)?;
    record.liked = !record.liked;
    if record.liked {
        record.likes_count += 1;
    } else {
        record.likes_count = record.likes_count.saturating_sub(1);
    }
    info!(movie_id = id, liked = record.liked, likes_count = record.likes_count, "toggled like");
    Ok(Json(LikeResponse {
        liked: record.liked,
        likes_count: record.likes_count,
    }))
}

/// Create or replace the user's rating. Scores must lie in 1..=10.
async fn rate_movie(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<RateMovie>,
) -> ApiResult<(StatusCode, Json<RatingResponse>)> {
    let mut movies = state.db.write().await;
    let record = movies.get_mut(&id).ok_or_else(not_found)?;
    if !(1..=10).contains(&input.score) {
        info!(movie_id = id, score = input.score, "rejected out-of-range score");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "score": ["La note doit être entre 1 et 10."] })),
        ));
    }
    record.user_rating = Some(input.score);
    info!(movie_id = id, score = input.score, "rated movie");
    Ok((
        StatusCode::CREATED,
        Json(RatingResponse {
            movie: id,
            score: input.score,
        }),
    ))
}
