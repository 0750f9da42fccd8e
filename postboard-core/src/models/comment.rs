use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::DateText;

/// A comment attached to a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    /// The post this comment belongs to
    pub board_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(board_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            board_id,
            content: content.into(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn date_text(&self) -> DateText {
        DateText::for_times(self.created_at, self.updated_at)
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.content, self.date_text())
    }
}

/// Body of `POST /comments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    #[serde(default)]
    pub board_id: Option<Uuid>,
    #[serde(default)]
    pub content: String,
}

/// Body of `PATCH /comments/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentUpdate {
    #[serde(default)]
    pub content: String,
}
