//! Genre, movie and rating flows through the HTTP API

mod common;

use axum::http::StatusCode;
use axum::Router;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{app, send, signed_in};

async fn create_genre(app: &Router, token: &str, name: &str) -> Value {
    let (status, body) = send(app, "POST", "/genres", Some(token), Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

async fn create_movie(app: &Router, token: &str, title: &str, genre_ids: &[&Value]) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/movies",
        Some(token),
        Some(json!({
            "title": title,
            "duration": 117,
            "year": 1979,
            "synopsis": "A crew answers a distress call.",
            "genre_ids": genre_ids,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[tokio::test]
async fn test_reads_are_public_writes_are_not() {
    let app = app();

    let (status, body) = send(&app, "GET", "/genres", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 0);

    let (status, _) = send(&app, "GET", "/movies", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", "/genres", None, Some(json!({ "name": "Horror" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/ratings",
        None,
        Some(json!({ "rating": 5.0, "movie_id": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_genre_crud() {
    let app = app();
    let token = signed_in(&app, "alice").await;

    let genre = create_genre(&app, &token, "Horror").await;
    let id = genre["id"].as_str().unwrap();
    assert_eq!(genre["name"], "Horror");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/genres/{}", id),
        Some(&token),
        Some(json!({ "name": "Sci-Fi Horror" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Data successfully updated!");

    let (status, body) = send(&app, "GET", &format!("/genres/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Sci-Fi Horror");

    let (status, body) = send(&app, "DELETE", &format!("/genres/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Data successfully deleted!");

    let (status, _) = send(&app, "GET", &format!("/genres/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/genres/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_genre_validation() {
    let app = app();
    let token = signed_in(&app, "alice").await;

    let (status, _) = send(&app, "POST", "/genres", Some(&token), Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/genres", Some(&token), Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, "GET", "/genres/123", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "the id is not valid.");
}

#[tokio::test]
async fn test_movie_links_genres() {
    let app = app();
    let token = signed_in(&app, "alice").await;

    let horror = create_genre(&app, &token, "Horror").await;
    let scifi = create_genre(&app, &token, "Sci-Fi").await;
    let movie = create_movie(&app, &token, "Alien", &[&horror["id"], &scifi["id"]]).await;
    assert_eq!(movie["genres"].as_array().unwrap().len(), 2);

    let (status, list) = send(&app, "GET", "/movies", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["meta"]["total"], 1);
    assert_eq!(list["data"][0]["genres"].as_array().unwrap().len(), 2);

    let genre_id = horror["id"].as_str().unwrap();
    let (_, genre) = send(&app, "GET", &format!("/genres/{}", genre_id), None, None).await;
    assert_eq!(genre["movies"][0]["title"], "Alien");
}

#[tokio::test]
async fn test_movie_with_unknown_genre_is_rejected() {
    let app = app();
    let token = signed_in(&app, "alice").await;
    let horror = create_genre(&app, &token, "Horror").await;
    let unknown = json!(Uuid::new_v4());

    let (status, body) = send(
        &app,
        "POST",
        "/movies",
        Some(&token),
        Some(json!({
            "title": "Alien",
            "duration": 117,
            "year": 1979,
            "synopsis": "...",
            "genre_ids": [horror["id"], unknown],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "The genre(s) is not valid.");

    let (status, _) = send(
        &app,
        "POST",
        "/movies",
        Some(&token),
        Some(json!({
            "title": "Alien",
            "duration": 117,
            "year": 1979,
            "synopsis": "...",
            "genre_ids": [],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_movie_update_replaces_genres() {
    let app = app();
    let token = signed_in(&app, "alice").await;
    let horror = create_genre(&app, &token, "Horror").await;
    let drama = create_genre(&app, &token, "Drama").await;
    let movie = create_movie(&app, &token, "Alien", &[&horror["id"]]).await;
    let id = movie["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/movies/{}", id),
        Some(&token),
        Some(json!({ "title": "Aliens", "genre_ids": [drama["id"]] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = send(&app, "GET", &format!("/movies/{}", id), None, None).await;
    assert_eq!(detail["title"], "Aliens");
    assert_eq!(detail["year"], 1979);
    let genres = detail["genres"].as_array().unwrap();
    assert_eq!(genres.len(), 1);
    assert_eq!(genres[0]["name"], "Drama");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/movies/{}", id),
        Some(&token),
        Some(json!({ "genre_ids": [Uuid::new_v4()] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "The genre(s) is not valid.");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/movies/{}", Uuid::new_v4()),
        Some(&token),
        Some(json!({ "title": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ratings_flow() {
    let app = app();
    let token = signed_in(&app, "alice").await;
    let horror = create_genre(&app, &token, "Horror").await;
    let movie = create_movie(&app, &token, "Alien", &[&horror["id"]]).await;
    let movie_id = movie["id"].as_str().unwrap();

    let (status, rating) = send(
        &app,
        "POST",
        "/ratings",
        Some(&token),
        Some(json!({ "rating": 9.5, "comment": "Terrifying", "movie_id": movie_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(rating["movie"]["title"], "Alien");
    let rating_id = rating["id"].as_str().unwrap();

    let (status, shown) = send(&app, "GET", &format!("/ratings/{}", rating_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shown["comment"], "Terrifying");
    assert_eq!(shown["movie"]["id"], movie_id);

    let (_, detail) = send(&app, "GET", &format!("/movies/{}", movie_id), None, None).await;
    assert_eq!(detail["ratings"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/ratings/{}", rating_id),
        Some(&token),
        Some(json!({ "rating": 8.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, shown) = send(&app, "GET", &format!("/ratings/{}", rating_id), None, None).await;
    assert_eq!(shown["rating"], 8.0);
    assert_eq!(shown["comment"], "Terrifying");

    let (status, _) = send(&app, "DELETE", &format!("/ratings/{}", rating_id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/ratings/{}", rating_id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rating_for_unknown_or_deleted_movie() {
    let app = app();
    let token = signed_in(&app, "alice").await;

    let (status, body) = send(
        &app,
        "POST",
        "/ratings",
        Some(&token),
        Some(json!({ "rating": 7.0, "movie_id": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "The movie is not valid.");

    let horror = create_genre(&app, &token, "Horror").await;
    let movie = create_movie(&app, &token, "Alien", &[&horror["id"]]).await;
    let movie_id = movie["id"].as_str().unwrap();
    send(&app, "DELETE", &format!("/movies/{}", movie_id), Some(&token), None).await;

    let (status, _) = send(&app, "GET", &format!("/movies/{}", movie_id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "POST",
        "/ratings",
        Some(&token),
        Some(json!({ "rating": 7.0, "movie_id": movie_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "The movie is not valid.");

    let (status, _) = send(
        &app,
        "POST",
        "/ratings",
        Some(&token),
        Some(json!({ "rating": 11.0, "movie_id": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
