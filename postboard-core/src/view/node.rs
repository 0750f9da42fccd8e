//! Per-entity presentation state.
//!
//! An [`EntityNode`] is always in exactly one [`Mode`]. The uncommitted edit
//! values live inside `Mode::Edit`, so leaving edit mode drops them and the
//! view side is always rendered from the stored record.

use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::models::{Comment, EntityKind, Post};

/// Stable, queryable identifier of a rendered node (`post-<id>`, `comment-<id>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(kind: EntityKind, id: Uuid) -> Self {
        Self(format!("{}-{}", kind, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    View,
    Edit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode<D> {
    View,
    Edit(D),
}

impl<D> Mode<D> {
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::View => ModeKind::View,
            Mode::Edit(_) => ModeKind::Edit,
        }
    }
}

/// Editable fields of a post.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    /// Replacement image picked in the edit form
    pub image_file: Option<PathBuf>,
}

/// Editable fields of a comment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommentDraft {
    pub content: String,
}

/// A record that can be shown in view mode and edited in edit mode.
pub trait Entity: Clone {
    type Draft: Clone + PartialEq + fmt::Debug;

    const KIND: EntityKind;

    fn id(&self) -> Uuid;

    /// Edit fields pre-populated with the stored values.
    fn draft(&self) -> Self::Draft;
}

impl Entity for Post {
    type Draft = PostDraft;

    const KIND: EntityKind = EntityKind::Post;

    fn id(&self) -> Uuid {
        self.id
    }

    fn draft(&self) -> PostDraft {
        PostDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            image_file: None,
        }
    }
}

impl Entity for Comment {
    type Draft = CommentDraft;

    const KIND: EntityKind = EntityKind::Comment;

    fn id(&self) -> Uuid {
        self.id
    }

    fn draft(&self) -> CommentDraft {
        CommentDraft {
            content: self.content.clone(),
        }
    }
}

/// A rendered entity together with its view/edit state.
#[derive(Debug, Clone)]
pub struct EntityNode<E: Entity> {
    record: E,
    mode: Mode<E::Draft>,
}

impl<E: Entity> EntityNode<E> {
    /// New nodes start in view mode.
    pub fn new(record: E) -> Self {
        Self {
            record,
            mode: Mode::View,
        }
    }

    pub fn node_id(&self) -> NodeId {
        NodeId::new(E::KIND, self.record.id())
    }

    pub fn id(&self) -> Uuid {
        self.record.id()
    }

    pub fn record(&self) -> &E {
        &self.record
    }

    pub fn mode(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn is_editing(&self) -> bool {
        self.mode() == ModeKind::Edit
    }

    /// VIEW -> EDIT. Returns `false` when already editing.
    pub fn begin_edit(&mut self) -> bool {
        match self.mode {
            Mode::View => {
                self.mode = Mode::Edit(self.record.draft());
                true
            }
            Mode::Edit(_) => false,
        }
    }

    /// EDIT -> VIEW, discarding uncommitted values. Returns `false` when not editing.
    pub fn cancel_edit(&mut self) -> bool {
        match self.mode {
            Mode::Edit(_) => {
                self.mode = Mode::View;
                true
            }
            Mode::View => false,
        }
    }

    pub fn draft(&self) -> Option<&E::Draft> {
        match &self.mode {
            Mode::Edit(draft) => Some(draft),
            Mode::View => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut E::Draft> {
        match &mut self.mode {
            Mode::Edit(draft) => Some(draft),
            Mode::View => None,
        }
    }

    /// Replaces the stored record and collapses back to view mode.
    pub fn rerender(&mut self, record: E) {
        self.record = record;
        self.mode = Mode::View;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_format() {
        let id = Uuid::new_v4();
        assert_eq!(NodeId::new(EntityKind::Post, id).as_str(), format!("post-{}", id));
        assert_eq!(
            NodeId::new(EntityKind::Comment, id).to_string(),
            format!("comment-{}", id)
        );
    }

    #[test]
    fn test_new_node_is_view() {
        let node = EntityNode::new(Post::new("T", "C", "u"));
        assert_eq!(node.mode(), ModeKind::View);
        assert!(node.draft().is_none());
    }

    #[test]
    fn test_begin_edit_prepopulates_draft() {
        let mut node = EntityNode::new(Post::new("T", "C", "u"));
        assert!(node.begin_edit());
        assert!(!node.begin_edit());

        let draft = node.draft().unwrap();
        assert_eq!(draft.title, "T");
        assert_eq!(draft.content, "C");
        assert!(draft.image_file.is_none());
    }

    #[test]
    fn test_cancel_discards_typed_values() {
        let mut node = EntityNode::new(Comment::new(Uuid::new_v4(), "original"));
        node.begin_edit();
        node.draft_mut().unwrap().content = "typed but not saved".into();

        assert!(node.cancel_edit());
        assert_eq!(node.mode(), ModeKind::View);
        assert_eq!(node.record().content, "original");

        // Re-entering edit starts from the stored value again
        node.begin_edit();
        assert_eq!(node.draft().unwrap().content, "original");
    }

    #[test]
    fn test_rerender_collapses_to_view() {
        let mut node = EntityNode::new(Comment::new(Uuid::new_v4(), "a"));
        node.begin_edit();

        let mut fresh = node.record().clone();
        fresh.content = "b".into();
        node.rerender(fresh);

        assert!(!node.is_editing());
        assert_eq!(node.record().content, "b");
    }
}
