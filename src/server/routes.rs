use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use postboard_core::{Comment, CommentUpdate, NewComment, NewPost, Post, PostUpdate};

use super::{ApiError, AppState};
use crate::db::PostChanges;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Success marker for mutations that return no record.
#[derive(Serialize)]
pub struct MessageResponse {
    message: &'static str,
}

fn message(message: &'static str) -> Json<MessageResponse> {
    Json(MessageResponse { message })
}

/// Unknown and malformed ids are both "not found".
fn parse_id(raw: &str, kind: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("{} not found", kind)))
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    Ok(Json(state.posts.list().await?))
}

pub async fn create_post(
    State(state): State<AppState>,
    body: Result<Json<NewPost>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let Json(body) = body?;

    if is_blank(&body.title) || is_blank(&body.content) {
        return Err(ApiError::BadRequest("title and content are required".into()));
    }
    let user_id = match body.user_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return Err(ApiError::Unauthorized("login required".into())),
    };

    let mut post = Post::new(body.title, body.content, user_id);
    post.image_url = body.image_url.filter(|url| !url.is_empty());

    let created = state.posts.create(&post).await?;
    tracing::info!(id = %created.id, "Post created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<PostUpdate>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "post")?;
    let Json(body) = body?;

    if is_blank(&body.title) || is_blank(&body.content) {
        return Err(ApiError::BadRequest("title and content are required".into()));
    }

    let changes = PostChanges {
        title: &body.title,
        content: &body.content,
        image_url: body.image_url.as_deref().filter(|url| !url.is_empty()),
    };
    if !state.posts.update(id, changes).await? {
        return Err(ApiError::NotFound("post not found".into()));
    }

    tracing::info!(%id, "Post updated");
    Ok(message("post updated"))
}

pub async fn remove_post_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "post")?;
    if !state.posts.remove_image(id).await? {
        return Err(ApiError::NotFound("post not found".into()));
    }

    tracing::info!(%id, "Post image removed");
    Ok(message("image removed"))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "post")?;
    if !state.posts.delete(id).await? {
        return Err(ApiError::NotFound("post not found".into()));
    }

    tracing::info!(%id, "Post deleted");
    Ok(message("post deleted"))
}

#[derive(Deserialize)]
pub struct CommentsQuery {
    board_id: Option<String>,
}

pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentsQuery>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let board_id = match query.board_id.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Uuid::parse_str(raw)
            .map_err(|_| ApiError::BadRequest("board_id must be a post id".into()))?,
        _ => return Err(ApiError::BadRequest("board_id is required".into())),
    };

    Ok(Json(state.comments.list_for_post(board_id).await?))
}

pub async fn create_comment(
    State(state): State<AppState>,
    body: Result<Json<NewComment>, JsonRejection>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let Json(body) = body?;

    let board_id = match body.board_id {
        Some(board_id) if !is_blank(&body.content) => board_id,
        _ => {
            return Err(ApiError::BadRequest(
                "board_id and content are required".into(),
            ))
        }
    };
    if state.posts.get_by_id(board_id).await?.is_none() {
        return Err(ApiError::NotFound("post not found".into()));
    }

    let created = state
        .comments
        .create(&Comment::new(board_id, body.content))
        .await?;
    tracing::info!(id = %created.id, %board_id, "Comment created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CommentUpdate>, JsonRejection>,
) -> Result<Json<Comment>, ApiError> {
    let id = parse_id(&id, "comment")?;
    let Json(body) = body?;

    if is_blank(&body.content) {
        return Err(ApiError::BadRequest("content is required".into()));
    }

    let updated = state
        .comments
        .update(id, &body.content)
        .await?
        .ok_or_else(|| ApiError::NotFound("comment not found".into()))?;

    tracing::info!(%id, "Comment updated");
    Ok(Json(updated))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "comment")?;
    if !state.comments.delete(id).await? {
        return Err(ApiError::NotFound("comment not found".into()));
    }

    tracing::info!(%id, "Comment deleted");
    Ok(message("comment deleted"))
}

#[cfg(test)]
mod tests {
    use crate::db::init_db;
    use crate::server::router;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn app() -> (Router, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_dir.path().join("test.db")).await.unwrap();
        (router(pool), temp_dir)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_post(app: &Router, title: &str) -> Value {
        let (status, post) = call(
            app,
            Method::POST,
            "/posts",
            Some(json!({"title": title, "content": "C", "user_id": "user1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        post
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _dir) = app().await;
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_post_validation() {
        let (app, _dir) = app().await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/posts",
            Some(json!({"title": "", "content": "C", "user_id": "u"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "title and content are required");

        let (status, body) = call(
            &app,
            Method::POST,
            "/posts",
            Some(json!({"title": "T", "content": "C"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "login required");
    }

    #[tokio::test]
    async fn test_create_then_list_post() {
        let (app, _dir) = app().await;
        let created = create_post(&app, "T").await;
        assert!(created["image_url"].is_null());
        assert!(created["updated_at"].is_null());

        let (status, posts) = call(&app, Method::GET, "/posts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(posts[0]["id"], created["id"]);
        assert_eq!(posts[0]["user_id"], "user1");
    }

    #[tokio::test]
    async fn test_update_post_and_unknown_id() {
        let (app, _dir) = app().await;
        let post = create_post(&app, "T").await;
        let uri = format!("/posts/{}", post["id"].as_str().unwrap());

        let (status, body) = call(
            &app,
            Method::PUT,
            &uri,
            Some(json!({"title": "T", "content": "C2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "post updated");

        let (_, posts) = call(&app, Method::GET, "/posts", None).await;
        assert_eq!(posts[0]["content"], "C2");
        assert!(!posts[0]["updated_at"].is_null());

        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("/posts/{}", uuid::Uuid::new_v4()),
            Some(json!({"title": "T", "content": "C"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "post not found");
    }

    #[tokio::test]
    async fn test_delete_post_twice() {
        let (app, _dir) = app().await;
        let post = create_post(&app, "T").await;
        let uri = format!("/posts/{}", post["id"].as_str().unwrap());

        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "post not found");
    }

    #[tokio::test]
    async fn test_remove_post_image() {
        let (app, _dir) = app().await;
        let (_, post) = call(
            &app,
            Method::POST,
            "/posts",
            Some(json!({
                "title": "T",
                "content": "C",
                "image_url": "data:image/png;base64,AAAA",
                "user_id": "u"
            })),
        )
        .await;
        assert_eq!(post["image_url"], "data:image/png;base64,AAAA");

        let uri = format!("/posts/{}/image", post["id"].as_str().unwrap());
        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, posts) = call(&app, Method::GET, "/posts", None).await;
        assert!(posts[0]["image_url"].is_null());
    }

    #[tokio::test]
    async fn test_comments_lifecycle() {
        let (app, _dir) = app().await;
        let post = create_post(&app, "T").await;
        let post_id = post["id"].as_str().unwrap();

        let (status, comment) = call(
            &app,
            Method::POST,
            "/comments",
            Some(json!({"board_id": post_id, "content": "nice post"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(comment["board_id"], post_id);

        let comment_uri = format!("/comments/{}", comment["id"].as_str().unwrap());
        let (status, updated) = call(
            &app,
            Method::PATCH,
            &comment_uri,
            Some(json!({"content": "edited"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["content"], "edited");
        assert!(!updated["updated_at"].is_null());

        let list_uri = format!("/comments?board_id={}", post_id);
        let (_, comments) = call(&app, Method::GET, &list_uri, None).await;
        assert_eq!(comments.as_array().unwrap().len(), 1);

        let (status, _) = call(&app, Method::DELETE, &comment_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, Method::DELETE, &comment_uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_comment_validation() {
        let (app, _dir) = app().await;

        let (status, body) = call(&app, Method::GET, "/comments", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "board_id is required");

        let (status, body) = call(
            &app,
            Method::POST,
            "/comments",
            Some(json!({"content": "hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "board_id and content are required");

        let (status, _) = call(
            &app,
            Method::POST,
            "/comments",
            Some(json!({"board_id": uuid::Uuid::new_v4(), "content": "hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = call(
            &app,
            Method::PATCH,
            &format!("/comments/{}", uuid::Uuid::new_v4()),
            Some(json!({"content": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "content is required");
    }

    #[tokio::test]
    async fn test_delete_post_removes_its_comments() {
        let (app, _dir) = app().await;
        let post = create_post(&app, "T").await;
        let post_id = post["id"].as_str().unwrap();
        call(
            &app,
            Method::POST,
            "/comments",
            Some(json!({"board_id": post_id, "content": "nice post"})),
        )
        .await;

        call(&app, Method::DELETE, &format!("/posts/{}", post_id), None).await;

        let (status, comments) = call(
            &app,
            Method::GET,
            &format!("/comments?board_id={}", post_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(comments.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let (app, _dir) = app().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/posts")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }
}
