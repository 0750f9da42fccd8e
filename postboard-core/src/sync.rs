//! List synchronizer: full-replace refresh of a collection from a fresh fetch.
//!
//! A refresh discards every rendered node of the collection, so open edit
//! sessions in it collapse back to VIEW. Concurrent refreshes are not
//! ordered; whichever completes last wins.

use futures::future::join_all;
use uuid::Uuid;

use crate::board::Board;
use crate::client::ClientError;
use crate::models::Comment;

/// What a refresh rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Every post together with its comment sub-list
    Posts,
    /// The comment sub-list of one post
    Comments(Uuid),
}

impl Board {
    pub async fn refresh(&self, collection: Collection) -> Result<(), ClientError> {
        match collection {
            Collection::Posts => self.refresh_posts().await,
            Collection::Comments(post_id) => self.refresh_comments(post_id).await,
        }
    }

    pub async fn refresh_posts(&self) -> Result<(), ClientError> {
        let posts = self.store.list_posts().await?;

        let comment_lists = join_all(posts.iter().map(|post| self.fetch_comments(post.id))).await;
        let entries: Vec<_> = posts.into_iter().zip(comment_lists).collect();

        tracing::debug!(posts = entries.len(), "refreshed posts");
        self.doc().replace_posts(entries);
        Ok(())
    }

    pub async fn refresh_comments(&self, post_id: Uuid) -> Result<(), ClientError> {
        let comments = self.store.list_comments(post_id).await?;
        let count = comments.len();

        if self.doc().replace_comments(post_id, comments) {
            tracing::debug!(%post_id, comments = count, "refreshed comments");
        } else {
            tracing::debug!(%post_id, "post no longer rendered, comments dropped");
        }
        Ok(())
    }

    /// A post whose comments fail to load is still shown, with an empty sub-list.
    async fn fetch_comments(&self, post_id: Uuid) -> Vec<Comment> {
        match self.store.list_comments(post_id).await {
            Ok(comments) => comments,
            Err(e) => {
                tracing::warn!(%post_id, error = %e, "failed to load comments");
                Vec::new()
            }
        }
    }

    /// Refresh after a mutation that already succeeded. A failed refresh is
    /// reported but does not change the mutation's outcome.
    pub(crate) async fn resync(&self, collection: Collection) -> bool {
        match self.refresh(collection).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(?collection, error = %e, "refresh after mutation failed");
                self.prompt.notify(&e.user_message());
                false
            }
        }
    }
}
