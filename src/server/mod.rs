//! REST backend for the board.
//!
//! # Endpoints
//!
//! - `GET /health`
//! - `GET /posts`, `POST /posts`
//! - `PUT /posts/{id}`, `DELETE /posts/{id}`, `DELETE /posts/{id}/image`
//! - `GET /comments?board_id=`, `POST /comments`
//! - `PATCH /comments/{id}`, `DELETE /comments/{id}`

mod error;
mod routes;

pub use error::ApiError;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, put},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::{CommentRepository, PostRepository};

/// Request bodies carry inlined images.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    posts: Arc<PostRepository>,
    comments: Arc<CommentRepository>,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            posts: Arc::new(PostRepository::new(pool.clone())),
            comments: Arc::new(CommentRepository::new(pool)),
        }
    }
}

pub fn router(pool: SqlitePool) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/posts", get(routes::list_posts).post(routes::create_post))
        .route(
            "/posts/{id}",
            put(routes::update_post).delete(routes::delete_post),
        )
        .route("/posts/{id}/image", delete(routes::remove_post_image))
        .route(
            "/comments",
            get(routes::list_comments).post(routes::create_comment),
        )
        .route(
            "/comments/{id}",
            patch(routes::update_comment).delete(routes::delete_comment),
        )
        .with_state(AppState::new(pool))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
}
