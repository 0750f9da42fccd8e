//! In-memory collaborators for board tests.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::auth::StaticAuth;
use crate::board::Board;
use crate::client::{ClientError, RemoteStore};
use crate::models::{Comment, CommentUpdate, NewComment, NewPost, Post, PostUpdate};
use crate::prompt::UserPrompt;

#[derive(Default)]
struct State {
    posts: Vec<Post>,
    comments: Vec<Comment>,
    calls: Vec<&'static str>,
    fail_next: Option<ClientError>,
    fail_on: Option<(&'static str, ClientError)>,
}

/// Store that keeps records in memory and logs every call.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_post(&self, post: Post) -> Post {
        self.state.lock().unwrap().posts.push(post.clone());
        post
    }

    pub fn seed_comment(&self, comment: Comment) -> Comment {
        self.state.lock().unwrap().comments.push(comment.clone());
        comment
    }

    /// Makes the next call fail with `err`.
    pub fn fail_next(&self, err: ClientError) {
        self.state.lock().unwrap().fail_next = Some(err);
    }

    /// Makes the next call named `call` fail with `err`.
    pub fn fail_on(&self, call: &'static str, err: ClientError) {
        self.state.lock().unwrap().fail_on = Some((call, err));
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    /// Number of calls other than reads.
    pub fn mutation_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| !c.starts_with("list_"))
            .count()
    }

    pub fn post(&self, id: Uuid) -> Option<Post> {
        self.state
            .lock()
            .unwrap()
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn comments_of(&self, post_id: Uuid) -> Vec<Comment> {
        self.state
            .lock()
            .unwrap()
            .comments
            .iter()
            .filter(|c| c.board_id == post_id)
            .cloned()
            .collect()
    }

    /// Lets other futures run before the call is answered.
    async fn enter(&self, call: &'static str) -> Result<(), ClientError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if let Some(err) = state.fail_next.take() {
            return Err(err);
        }
        if state.fail_on.as_ref().is_some_and(|(name, _)| *name == call) {
            if let Some((_, err)) = state.fail_on.take() {
                return Err(err);
            }
        }
        Ok(())
    }
}

fn not_found(kind: &str) -> ClientError {
    ClientError::NotFound(format!("{} not found", kind))
}

fn edited_at(created_at: chrono::DateTime<Utc>) -> chrono::DateTime<Utc> {
    Utc::now().max(created_at + Duration::milliseconds(1))
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list_posts(&self) -> Result<Vec<Post>, ClientError> {
        self.enter("list_posts").await?;
        let state = self.state.lock().unwrap();
        Ok(state.posts.iter().rev().cloned().collect())
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, ClientError> {
        self.enter("create_post").await?;
        let mut created = Post::new(
            post.title.clone(),
            post.content.clone(),
            post.user_id.clone().unwrap_or_default(),
        );
        created.image_url = post.image_url.clone();
        Ok(self.seed_post(created))
    }

    async fn update_post(&self, id: Uuid, update: &PostUpdate) -> Result<(), ClientError> {
        self.enter("update_post").await?;
        let mut state = self.state.lock().unwrap();
        let post = state
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("post"))?;
        post.title = update.title.clone();
        post.content = update.content.clone();
        if let Some(image_url) = &update.image_url {
            post.image_url = Some(image_url.clone());
        }
        post.updated_at = Some(edited_at(post.created_at));
        Ok(())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), ClientError> {
        self.enter("delete_post").await?;
        let mut state = self.state.lock().unwrap();
        let before = state.posts.len();
        state.posts.retain(|p| p.id != id);
        if state.posts.len() == before {
            return Err(not_found("post"));
        }
        state.comments.retain(|c| c.board_id != id);
        Ok(())
    }

    async fn remove_post_image(&self, id: Uuid) -> Result<(), ClientError> {
        self.enter("remove_post_image").await?;
        let mut state = self.state.lock().unwrap();
        let post = state
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("post"))?;
        post.image_url = None;
        Ok(())
    }

    async fn list_comments(&self, board_id: Uuid) -> Result<Vec<Comment>, ClientError> {
        self.enter("list_comments").await?;
        Ok(self.comments_of(board_id))
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, ClientError> {
        self.enter("create_comment").await?;
        let board_id = comment
            .board_id
            .ok_or_else(|| ClientError::Server {
                status: 400,
                message: "board_id and content are required".into(),
            })?;
        if self.post(board_id).is_none() {
            return Err(not_found("post"));
        }
        Ok(self.seed_comment(Comment::new(board_id, comment.content.clone())))
    }

    async fn update_comment(
        &self,
        id: Uuid,
        update: &CommentUpdate,
    ) -> Result<Comment, ClientError> {
        self.enter("update_comment").await?;
        let mut state = self.state.lock().unwrap();
        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("comment"))?;
        comment.content = update.content.clone();
        comment.updated_at = Some(edited_at(comment.created_at));
        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<(), ClientError> {
        self.enter("delete_comment").await?;
        let mut state = self.state.lock().unwrap();
        let before = state.comments.len();
        state.comments.retain(|c| c.id != id);
        if state.comments.len() == before {
            return Err(not_found("comment"));
        }
        Ok(())
    }
}

/// Prompt with a fixed confirmation answer that records every dialog.
#[derive(Default)]
pub struct RecordingPrompt {
    answer: bool,
    confirms: Mutex<Vec<String>>,
    notices: Mutex<Vec<String>>,
}

impl RecordingPrompt {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            ..Self::default()
        }
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }
}

impl UserPrompt for RecordingPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.confirms.lock().unwrap().push(message.to_string());
        self.answer
    }

    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }
}

/// Board signed in as `tester` on top of `store`.
pub fn board_with(store: MemoryStore, confirm: bool) -> (Board, Arc<RecordingPrompt>) {
    let prompt = Arc::new(RecordingPrompt::answering(confirm));
    let board = Board::new(
        Arc::new(store),
        Arc::new(StaticAuth::signed_in("tester")),
        prompt.clone(),
    );
    (board, prompt)
}

pub fn signed_out_board(store: MemoryStore) -> (Board, Arc<RecordingPrompt>) {
    let prompt = Arc::new(RecordingPrompt::answering(true));
    let board = Board::new(
        Arc::new(store),
        Arc::new(StaticAuth::signed_out()),
        prompt.clone(),
    );
    (board, prompt)
}
