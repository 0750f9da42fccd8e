//! The shared list container: every rendered post, its comments, and the
//! action registry that routes triggers to them.

use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

use super::fragment::{render_post, Rendered};
use super::node::{EntityNode, ModeKind};
use super::registry::{ActionKey, ActionRegistry, Capability};
use crate::models::{Comment, EntityKind, Post};

/// The new-post form above the list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposeForm {
    pub title: String,
    pub content: String,
    pub image_file: Option<PathBuf>,
}

impl ComposeForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A rendered post with its comment-add input and comment sub-list.
#[derive(Debug, Clone)]
pub struct PostNode {
    pub node: EntityNode<Post>,
    pub comment_input: String,
    pub comments: Vec<EntityNode<Comment>>,
}

impl PostNode {
    fn new(post: Post, comments: Vec<Comment>) -> Self {
        Self {
            node: EntityNode::new(post),
            comment_input: String::new(),
            comments: comments.into_iter().map(EntityNode::new).collect(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.node.id()
    }

    pub fn render(&self) -> Rendered {
        render_post(&self.node, &self.comment_input, &self.comments)
    }
}

/// A value typed into one of the board's inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    ComposeTitle(String),
    ComposeContent(String),
    ComposeImage(Option<PathBuf>),
    CommentInput { post_id: Uuid, content: String },
    EditTitle { post_id: Uuid, title: String },
    EditPostContent { post_id: Uuid, content: String },
    EditImage { post_id: Uuid, file: Option<PathBuf> },
    EditCommentContent { comment_id: Uuid, content: String },
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    compose: ComposeForm,
    posts: Vec<PostNode>,
    registry: ActionRegistry,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compose(&self) -> &ComposeForm {
        &self.compose
    }

    pub fn compose_mut(&mut self) -> &mut ComposeForm {
        &mut self.compose
    }

    pub fn posts(&self) -> &[PostNode] {
        &self.posts
    }

    pub fn post(&self, id: Uuid) -> Option<&PostNode> {
        self.posts.iter().find(|p| p.id() == id)
    }

    pub fn post_mut(&mut self, id: Uuid) -> Option<&mut PostNode> {
        self.posts.iter_mut().find(|p| p.id() == id)
    }

    pub fn comment(&self, id: Uuid) -> Option<&EntityNode<Comment>> {
        self.posts
            .iter()
            .flat_map(|p| p.comments.iter())
            .find(|c| c.id() == id)
    }

    pub fn comment_mut(&mut self, id: Uuid) -> Option<&mut EntityNode<Comment>> {
        self.posts
            .iter_mut()
            .flat_map(|p| p.comments.iter_mut())
            .find(|c| c.id() == id)
    }

    /// Current mode of a rendered entity.
    pub fn mode_of(&self, kind: EntityKind, id: Uuid) -> Option<ModeKind> {
        match kind {
            EntityKind::Post => self.post(id).map(|p| p.node.mode()),
            EntityKind::Comment => self.comment(id).map(|c| c.mode()),
        }
    }

    pub fn resolve(&self, key: &ActionKey) -> Option<Capability> {
        self.registry.resolve(key).cloned()
    }

    /// Discards every rendered post and rebuilds the list from `entries`.
    ///
    /// Open edit sessions are lost. Text typed into the comment input of a
    /// post that is still listed carries over; the compose form is outside
    /// the list and kept.
    pub fn replace_posts(&mut self, entries: Vec<(Post, Vec<Comment>)>) {
        self.registry.clear();
        let mut typed: HashMap<Uuid, String> = self
            .posts
            .drain(..)
            .filter(|p| !p.comment_input.is_empty())
            .map(|p| (p.id(), p.comment_input))
            .collect();
        self.posts = entries
            .into_iter()
            .map(|(post, comments)| {
                let mut node = PostNode::new(post, comments);
                if let Some(text) = typed.remove(&node.id()) {
                    node.comment_input = text;
                }
                node
            })
            .collect();

        for post in &self.posts {
            self.registry
                .register_entity(EntityKind::Post, post.id(), post.id());
            for comment in &post.comments {
                self.registry
                    .register_entity(EntityKind::Comment, comment.id(), post.id());
            }
        }
    }

    /// Rebuilds one post's comment sub-list. Returns `false` if the post is gone.
    pub fn replace_comments(&mut self, post_id: Uuid, comments: Vec<Comment>) -> bool {
        let Some(post) = self.posts.iter_mut().find(|p| p.id() == post_id) else {
            return false;
        };

        self.registry.unregister_comments_of(post_id);
        post.comments = comments.into_iter().map(EntityNode::new).collect();
        for comment in &post.comments {
            self.registry
                .register_entity(EntityKind::Comment, comment.id(), post_id);
        }
        true
    }

    /// Removes a post node together with its comments.
    pub fn remove_post(&mut self, id: Uuid) -> bool {
        let before = self.posts.len();
        self.posts.retain(|p| p.id() != id);
        if self.posts.len() == before {
            return false;
        }
        self.registry.unregister_entity(EntityKind::Post, id);
        self.registry.unregister_comments_of(id);
        true
    }

    pub fn remove_comment(&mut self, id: Uuid) -> bool {
        for post in &mut self.posts {
            let before = post.comments.len();
            post.comments.retain(|c| c.id() != id);
            if post.comments.len() != before {
                self.registry.unregister_entity(EntityKind::Comment, id);
                return true;
            }
        }
        false
    }

    /// Applies a typed value. Returns `false` if the target input is not on screen.
    pub fn apply_input(&mut self, input: Input) -> bool {
        match input {
            Input::ComposeTitle(title) => {
                self.compose.title = title;
                true
            }
            Input::ComposeContent(content) => {
                self.compose.content = content;
                true
            }
            Input::ComposeImage(file) => {
                self.compose.image_file = file;
                true
            }
            Input::CommentInput { post_id, content } => match self.post_mut(post_id) {
                Some(post) if !post.node.is_editing() => {
                    post.comment_input = content;
                    true
                }
                _ => false,
            },
            Input::EditTitle { post_id, title } => self
                .post_draft(post_id)
                .map(|draft| draft.title = title)
                .is_some(),
            Input::EditPostContent { post_id, content } => self
                .post_draft(post_id)
                .map(|draft| draft.content = content)
                .is_some(),
            Input::EditImage { post_id, file } => self
                .post_draft(post_id)
                .map(|draft| draft.image_file = file)
                .is_some(),
            Input::EditCommentContent {
                comment_id,
                content,
            } => self
                .comment_mut(comment_id)
                .and_then(|c| c.draft_mut())
                .map(|draft| draft.content = content)
                .is_some(),
        }
    }

    fn post_draft(&mut self, post_id: Uuid) -> Option<&mut super::node::PostDraft> {
        self.post_mut(post_id).and_then(|p| p.node.draft_mut())
    }

    pub fn render(&self) -> Vec<Rendered> {
        self.posts.iter().map(PostNode::render).collect()
    }
}
