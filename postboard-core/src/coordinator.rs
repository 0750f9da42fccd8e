//! Mutation coordinator: routes triggers from the action registry to the
//! edit-mode controller or to the remote store.
//!
//! Every mutation follows the same order: take the control's in-flight slot,
//! check the auth gate, validate locally, call the store, then refresh the
//! affected collection. Nothing reaches the network before the first three
//! steps pass.

use uuid::Uuid;

use crate::board::{Board, Outcome};
use crate::client::ClientError;
use crate::error::ActionError;
use crate::guard::Slot;
use crate::image::inline_image;
use crate::models::{CommentUpdate, EntityKind, NewComment, NewPost, PostUpdate};
use crate::sync::Collection;
use crate::view::{ActionKey, ActionKind, CommentDraft, PostDraft};

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl Board {
    /// Handles one user trigger.
    ///
    /// The key is resolved against the registry first, so a comment control
    /// only ever acts on that comment. A control that is not on screen in the
    /// entity's current mode is stale.
    pub async fn dispatch(&self, key: ActionKey) -> Outcome {
        let resolved = {
            let doc = self.doc();
            doc.resolve(&key).zip(doc.mode_of(key.kind, key.id))
        };
        let Some((capability, mode)) = resolved else {
            tracing::debug!(%key, "stale action");
            return Outcome::Stale;
        };
        if !key.action.visible_in(mode) {
            tracing::debug!(%key, ?mode, "control not shown in this mode");
            return Outcome::Stale;
        }
        tracing::debug!(%key, node = %capability.node_id, "dispatch");

        match key.action {
            ActionKind::Edit => self.begin_edit(key),
            ActionKind::Cancel => self.cancel_edit(key),
            ActionKind::Save => self.save(key).await,
            ActionKind::Delete => self.delete(key, capability.post_id).await,
            ActionKind::AddComment => self.add_comment(key).await,
            ActionKind::RemoveImage => self.remove_image(key).await,
        }
    }

    fn begin_edit(&self, key: ActionKey) -> Outcome {
        let delete = Slot::Action(ActionKey {
            action: ActionKind::Delete,
            ..key
        });
        if self.in_flight.is_held(delete) {
            tracing::debug!(%key, "edit refused, delete in flight");
            return Outcome::Suppressed;
        }

        let mut doc = self.doc();
        let started = match key.kind {
            EntityKind::Post => doc.post_mut(key.id).map(|p| p.node.begin_edit()),
            EntityKind::Comment => doc.comment_mut(key.id).map(|c| c.begin_edit()),
        };
        match started {
            Some(true) => Outcome::Toggled,
            _ => Outcome::Stale,
        }
    }

    fn cancel_edit(&self, key: ActionKey) -> Outcome {
        let mut doc = self.doc();
        let cancelled = match key.kind {
            EntityKind::Post => doc.post_mut(key.id).map(|p| p.node.cancel_edit()),
            EntityKind::Comment => doc.comment_mut(key.id).map(|c| c.cancel_edit()),
        };
        match cancelled {
            Some(true) => Outcome::Toggled,
            _ => Outcome::Stale,
        }
    }

    async fn save(&self, key: ActionKey) -> Outcome {
        let Some(_guard) = self.in_flight.try_acquire(Slot::Action(key)) else {
            return Outcome::Suppressed;
        };
        if let Err(e) = self.require_identity() {
            return self.fail(e);
        }

        match key.kind {
            EntityKind::Post => self.save_post(key.id).await,
            EntityKind::Comment => self.save_comment(key.id).await,
        }
    }

    async fn save_post(&self, id: Uuid) -> Outcome {
        let Some((draft, current_image)) = self.doc().post(id).and_then(|p| {
            p.node
                .draft()
                .cloned()
                .map(|d| (d, p.node.record().image_url.clone()))
        }) else {
            return Outcome::Stale;
        };
        let PostDraft {
            title,
            content,
            image_file,
        } = draft;

        if is_blank(&title) || is_blank(&content) {
            return self.fail(ActionError::Validation(
                "title and content are required".into(),
            ));
        }

        // A picked file replaces the image; otherwise the stored one is kept.
        let image_url = match image_file {
            Some(path) => match inline_image(&path).await {
                Ok(uri) => Some(uri),
                Err(e) => return self.fail(e),
            },
            None => current_image,
        };

        let update = PostUpdate {
            title,
            content,
            image_url,
        };
        match self.store.update_post(id, &update).await {
            Ok(()) => {
                tracing::info!(%id, "post updated");
                if !self.resync(Collection::Posts).await {
                    self.rerender_post(id, update);
                }
                Outcome::Applied
            }
            Err(e) if e.is_not_found() => self.reconcile_missing(EntityKind::Post, id, None).await,
            Err(e) => self.fail(e),
        }
    }

    /// Shows the saved values when the follow-up refresh could not run.
    ///
    /// Timestamps stay as last fetched; only the server assigns them.
    fn rerender_post(&self, id: Uuid, update: PostUpdate) {
        let mut doc = self.doc();
        if let Some(post) = doc.post_mut(id) {
            let mut record = post.node.record().clone();
            record.title = update.title;
            record.content = update.content;
            record.image_url = update.image_url;
            post.node.rerender(record);
        }
    }

    async fn save_comment(&self, id: Uuid) -> Outcome {
        let Some(CommentDraft { content }) = self
            .doc()
            .comment(id)
            .and_then(|c| c.draft().cloned())
        else {
            return Outcome::Stale;
        };

        if is_blank(&content) {
            return self.fail(ActionError::Validation("content is required".into()));
        }

        let post_id = self.doc().comment(id).map(|c| c.record().board_id);
        match self
            .store
            .update_comment(id, &CommentUpdate { content })
            .await
        {
            Ok(updated) => {
                tracing::info!(%id, "comment updated");
                let board_id = updated.board_id;
                if !self.resync(Collection::Comments(board_id)).await {
                    if let Some(node) = self.doc().comment_mut(id) {
                        node.rerender(updated);
                    }
                }
                Outcome::Applied
            }
            Err(e) if e.is_not_found() => {
                self.reconcile_missing(EntityKind::Comment, id, post_id)
                    .await
            }
            Err(e) => self.fail(e),
        }
    }

    async fn delete(&self, key: ActionKey, post_id: Uuid) -> Outcome {
        let Some(_guard) = self.in_flight.try_acquire(Slot::Action(key)) else {
            tracing::debug!(%key, "delete already in flight");
            return Outcome::Suppressed;
        };
        if let Err(e) = self.require_identity() {
            return self.fail(e);
        }

        if !self.prompt.confirm(&format!("Delete this {}?", key.kind)) {
            return Outcome::Declined;
        }

        let result = match key.kind {
            EntityKind::Post => self.store.delete_post(key.id).await,
            EntityKind::Comment => self.store.delete_comment(key.id).await,
        };

        match result {
            Ok(()) => {
                tracing::info!(kind = %key.kind, id = %key.id, "deleted");
                self.remove_node(key.kind, key.id);
                self.resync(Self::collection_of(key.kind, post_id)).await;
                Outcome::Applied
            }
            Err(e) if e.is_not_found() => {
                // Already gone; the first delete won.
                tracing::debug!(%key, "delete target already removed");
                self.remove_node(key.kind, key.id);
                self.resync(Self::collection_of(key.kind, post_id)).await;
                Outcome::Reconciled
            }
            Err(e) => self.fail(e),
        }
    }

    async fn add_comment(&self, key: ActionKey) -> Outcome {
        let Some(_guard) = self.in_flight.try_acquire(Slot::Action(key)) else {
            return Outcome::Suppressed;
        };
        let post_id = key.id;
        let Some(input) = self
            .doc()
            .post(post_id)
            .map(|p| p.comment_input.clone())
        else {
            return Outcome::Stale;
        };
        if let Err(e) = self.require_identity() {
            return self.fail(e);
        }

        let content = input.trim().to_string();
        if content.is_empty() {
            return self.fail(ActionError::Validation("content is required".into()));
        }

        let comment = NewComment {
            board_id: Some(post_id),
            content,
        };
        match self.store.create_comment(&comment).await {
            Ok(created) => {
                tracing::info!(id = %created.id, %post_id, "comment created");
                if let Some(post) = self.doc().post_mut(post_id) {
                    post.comment_input.clear();
                }
                self.resync(Collection::Comments(post_id)).await;
                Outcome::Applied
            }
            Err(e) if e.is_not_found() => {
                self.reconcile_missing(EntityKind::Post, post_id, None)
                    .await
            }
            Err(e) => self.fail(e),
        }
    }

    async fn remove_image(&self, key: ActionKey) -> Outcome {
        let Some(_guard) = self.in_flight.try_acquire(Slot::Action(key)) else {
            return Outcome::Suppressed;
        };
        let has_image = self
            .doc()
            .post(key.id)
            .map(|p| p.node.record().image_url.is_some());
        if has_image != Some(true) {
            return Outcome::Stale;
        }
        if let Err(e) = self.require_identity() {
            return self.fail(e);
        }

        if !self.prompt.confirm("Remove this image?") {
            return Outcome::Declined;
        }

        match self.store.remove_post_image(key.id).await {
            Ok(()) => {
                tracing::info!(id = %key.id, "post image removed");
                self.resync(Collection::Posts).await;
                Outcome::Applied
            }
            Err(e) if e.is_not_found() => {
                self.reconcile_missing(EntityKind::Post, key.id, None)
                    .await
            }
            Err(e) => self.fail(e),
        }
    }

    /// Sends the compose form as a new post.
    ///
    /// The form is cleared only once the store has accepted the post.
    pub async fn submit_post(&self) -> Outcome {
        let Some(_guard) = self.in_flight.try_acquire(Slot::Compose) else {
            return Outcome::Suppressed;
        };
        let identity = match self.require_identity() {
            Ok(identity) => identity,
            Err(e) => return self.fail(e),
        };

        let form = self.doc().compose().clone();
        if is_blank(&form.title) || is_blank(&form.content) {
            return self.fail(ActionError::Validation(
                "title and content are required".into(),
            ));
        }

        let image_url = match &form.image_file {
            Some(path) => match inline_image(path).await {
                Ok(uri) => Some(uri),
                Err(e) => return self.fail(e),
            },
            None => None,
        };

        let post = NewPost {
            title: form.title.clone(),
            content: form.content.clone(),
            image_url,
            user_id: Some(identity.user_id),
        };
        match self.store.create_post(&post).await {
            Ok(created) => {
                tracing::info!(id = %created.id, "post created");
                self.doc().compose_mut().clear();
                self.resync(Collection::Posts).await;
                Outcome::Applied
            }
            Err(e) => self.fail(e),
        }
    }

    /// Shorthand for the add-comment control of `post_id`.
    pub async fn submit_comment(&self, post_id: Uuid) -> Outcome {
        self.dispatch(ActionKey::post(ActionKind::AddComment, post_id))
            .await
    }

    fn collection_of(kind: EntityKind, post_id: Uuid) -> Collection {
        match kind {
            EntityKind::Post => Collection::Posts,
            EntityKind::Comment => Collection::Comments(post_id),
        }
    }

    fn remove_node(&self, kind: EntityKind, id: Uuid) {
        let mut doc = self.doc();
        let removed = match kind {
            EntityKind::Post => doc.remove_post(id),
            EntityKind::Comment => doc.remove_comment(id),
        };
        if !removed {
            tracing::debug!(%kind, %id, "node already removed");
        }
    }

    /// The mutation targeted something already deleted on the server: drop the
    /// node, refresh, and tell the user.
    async fn reconcile_missing(
        &self,
        kind: EntityKind,
        id: Uuid,
        post_id: Option<Uuid>,
    ) -> Outcome {
        tracing::info!(%kind, %id, "target no longer exists, reconciling");
        self.remove_node(kind, id);
        let collection = match post_id {
            Some(post_id) => Self::collection_of(kind, post_id),
            None => Collection::Posts,
        };
        self.resync(collection).await;
        self.prompt
            .notify(&ClientError::NotFound(format!("this {} no longer exists", kind)).user_message());
        Outcome::Reconciled
    }
}
