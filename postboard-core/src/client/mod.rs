//! HTTP client for the Postboard REST backend.
//!
//! The client owns no state beyond the connection settings; every call maps
//! one-to-one onto a backend verb:
//!
//! - `GET /posts`, `POST /posts`, `PUT /posts/:id`, `DELETE /posts/:id`
//! - `DELETE /posts/:id/image`
//! - `GET /comments?board_id=`, `POST /comments`, `PATCH /comments/:id`,
//!   `DELETE /comments/:id`

mod error;

pub use error::ClientError;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{Comment, CommentUpdate, NewComment, NewPost, Post, PostUpdate};

/// CRUD operations against the remote store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Posts, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>, ClientError>;
    async fn create_post(&self, post: &NewPost) -> Result<Post, ClientError>;
    async fn update_post(&self, id: Uuid, update: &PostUpdate) -> Result<(), ClientError>;
    async fn delete_post(&self, id: Uuid) -> Result<(), ClientError>;
    async fn remove_post_image(&self, id: Uuid) -> Result<(), ClientError>;

    /// Comments of one post, oldest first.
    async fn list_comments(&self, board_id: Uuid) -> Result<Vec<Comment>, ClientError>;
    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, ClientError>;
    async fn update_comment(
        &self,
        id: Uuid,
        update: &CommentUpdate,
    ) -> Result<Comment, ClientError>;
    async fn delete_comment(&self, id: Uuid) -> Result<(), ClientError>;
}

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`RemoteStore`] backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    server_url: String,
    http: reqwest::Client,
}

impl HttpStore {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Builds an HTTP URL for an API path, defaulting to `http://` for bare hosts.
    fn build_http_url(&self, path: &str) -> String {
        let base = self.server_url.trim_end_matches('/');
        if base.starts_with("http://") || base.starts_with("https://") {
            format!("{}{}", base, path)
        } else {
            format!("http://{}{}", base, path)
        }
    }

    /// Turns a non-success response into a [`ClientError`], keeping the server's message.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("Server returned status {}", status),
        };

        if status == reqwest::StatusCode::NOT_FOUND {
            Err(ClientError::NotFound(message))
        } else {
            Err(ClientError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let response = Self::check(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn list_posts(&self) -> Result<Vec<Post>, ClientError> {
        let response = self.http.get(self.build_http_url("/posts")).send().await?;
        Self::decode(response).await
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, ClientError> {
        let response = self
            .http
            .post(self.build_http_url("/posts"))
            .json(post)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn update_post(&self, id: Uuid, update: &PostUpdate) -> Result<(), ClientError> {
        let response = self
            .http
            .put(self.build_http_url(&format!("/posts/{}", id)))
            .json(update)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.build_http_url(&format!("/posts/{}", id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn remove_post_image(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.build_http_url(&format!("/posts/{}/image", id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn list_comments(&self, board_id: Uuid) -> Result<Vec<Comment>, ClientError> {
        let path = format!(
            "/comments?board_id={}",
            urlencoding::encode(&board_id.to_string())
        );
        let response = self.http.get(self.build_http_url(&path)).send().await?;
        Self::decode(response).await
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, ClientError> {
        let response = self
            .http
            .post(self.build_http_url("/comments"))
            .json(comment)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn update_comment(
        &self,
        id: Uuid,
        update: &CommentUpdate,
    ) -> Result<Comment, ClientError> {
        let response = self
            .http
            .patch(self.build_http_url(&format!("/comments/{}", id)))
            .json(update)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete_comment(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.build_http_url(&format!("/comments/{}", id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
