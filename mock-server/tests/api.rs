use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, database, router, LikeResponse, ListShape, Movie, MovieRecord, RatingResponse};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn post(uri: &str) -> Request<String> {
    Request::builder().method("POST").uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn catalogue() -> Vec<MovieRecord> {
    vec![
        MovieRecord::new(1, "A").with_likes(5),
        MovieRecord::new(2, "B").with_ratings(vec![6, 8]),
    ]
}

// --- list ---

#[tokio::test]
async fn list_movies_empty() {
    let resp = app().oneshot(get("/api/movies/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let movies: Vec<Movie> = body_json(resp).await;
    assert!(movies.is_empty());
}

#[tokio::test]
async fn list_movies_bare_array_in_id_order() {
    let db = database(vec![MovieRecord::new(2, "B"), MovieRecord::new(1, "A")]);
    let resp = router(db, ListShape::Bare).oneshot(get("/api/movies/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let movies: Vec<Movie> = body_json(resp).await;
    let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B"]);
}

#[tokio::test]
async fn list_movies_paginated_envelope() {
    let resp = router(database(catalogue()), ListShape::Paginated)
        .oneshot(get("/api/movies/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["count"], 2);
    assert!(body["next"].is_null());
    assert!(body["previous"].is_null());
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["results"][0]["title"], "A");
}

// --- detail ---

#[tokio::test]
async fn get_movie_returns_representation() {
    let resp = router(database(catalogue()), ListShape::Bare)
        .oneshot(get("/api/movies/2/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let movie: Movie = body_json(resp).await;
    assert_eq!(movie.id, 2);
    assert_eq!(movie.avg_rating, Some(7.0));
    assert!(!movie.user_liked);
}

#[tokio::test]
async fn get_movie_not_found() {
    let resp = app().oneshot(get("/api/movies/99/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["detail"], "Not found.");
}

#[tokio::test]
async fn get_movie_bad_id_returns_400() {
    let resp = app().oneshot(get("/api/movies/not-a-number/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- like ---

#[tokio::test]
async fn like_not_found() {
    let resp = app().oneshot(post("/api/movies/1/like/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn like_toggles() {
    let db = database(catalogue());

    let resp = router(db.clone(), ListShape::Bare)
        .oneshot(post("/api/movies/1/like/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let liked: LikeResponse = body_json(resp).await;
    assert_eq!(
        liked,
        LikeResponse {
            liked: true,
            likes_count: 6
        }
    );

    let resp = router(db.clone(), ListShape::Bare)
        .oneshot(post("/api/movies/1/like/"))
        .await
        .unwrap();
    let unliked: LikeResponse = body_json(resp).await;
    assert_eq!(
        unliked,
        LikeResponse {
            liked: false,
            likes_count: 5
        }
    );
    assert_eq!(db.read().await[&1].likes_count, 5);
}

// --- rate ---

#[tokio::test]
async fn rate_returns_201() {
    let resp = router(database(catalogue()), ListShape::Bare)
        .oneshot(json_request("POST", "/api/movies/2/rate/", r#"{"score":10}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let rating: RatingResponse = body_json(resp).await;
    assert_eq!(rating, RatingResponse { movie: 2, score: 10 });
}

#[tokio::test]
async fn rate_out_of_range_returns_400() {
    let db = database(catalogue());
    for score in ["0", "11", "-3"] {
        let resp = router(db.clone(), ListShape::Bare)
            .oneshot(json_request(
                "POST",
                "/api/movies/2/rate/",
                &format!(r#"{{"score":{score}}}"#),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "score {score}");
        let body: serde_json::Value = body_json(resp).await;
        assert!(body["score"].is_array());
    }
    assert_eq!(db.read().await[&2].user_rating, None);
}

#[tokio::test]
async fn rate_missing_score_returns_422() {
    let resp = router(database(catalogue()), ListShape::Bare)
        .oneshot(json_request("POST", "/api/movies/2/rate/", r#"{"stars":3}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn rate_unknown_movie_returns_404() {
    let resp = app()
        .oneshot(json_request("POST", "/api/movies/5/rate/", r#"{"score":5}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full like/rate lifecycle ---

#[tokio::test]
async fn like_rate_lifecycle() {
    use tower::Service;

    let mut app = router(database(catalogue()), ListShape::Bare).into_service();

    // detail before any mutation
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/movies/1/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let before: Movie = body_json(resp).await;
    assert_eq!(before.likes_count, 5);
    assert_eq!(before.avg_rating, None);

    // like
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(post("/api/movies/1/like/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // rate twice; the second replaces the first
    for score in ["4", "9"] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request(
                "POST",
                "/api/movies/1/rate/",
                &format!(r#"{{"score":{score}}}"#),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // detail reflects both mutations
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/movies/1/"))
        .await
        .unwrap();
    let after: Movie = body_json(resp).await;
    assert_eq!(after.likes_count, 6);
    assert!(after.user_liked);
    assert_eq!(after.user_rating, Some(9));
    assert_eq!(after.avg_rating, Some(9.0));

    // list agrees with detail
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/movies/"))
        .await
        .unwrap();
    let movies: Vec<Movie> = body_json(resp).await;
    assert_eq!(movies[0], after);

    // unknown route
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/movies/1/comments/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}
