mod comment;
mod post;

pub use comment::{Comment, CommentUpdate, NewComment};
pub use post::{NewPost, Post, PostUpdate};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two kinds of content record the board manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Post,
    Comment,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Post => write!(f, "post"),
            EntityKind::Comment => write!(f, "comment"),
        }
    }
}

/// The date line shown under an entity: either "created" or "updated", never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateText {
    Created(DateTime<Utc>),
    Updated(DateTime<Utc>),
}

impl DateText {
    /// An `updated_at` equal to `created_at` means the entity was never edited.
    pub fn for_times(created_at: DateTime<Utc>, updated_at: Option<DateTime<Utc>>) -> Self {
        match updated_at {
            Some(updated) if updated != created_at => DateText::Updated(updated),
            _ => DateText::Created(created_at),
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, DateText::Updated(_))
    }
}

impl fmt::Display for DateText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateText::Created(at) => write!(f, "created {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
            DateText::Updated(at) => write!(f, "updated {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        }
    }
}
