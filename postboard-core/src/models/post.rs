use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::DateText;

/// A post on the board, as stored and served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Inlined `data:` URI or external URL
    #[serde(default)]
    pub image_url: Option<String>,
    /// Identity that created the post
    #[serde(rename = "user_id")]
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    /// Set only once the post has been edited
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        owner_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            image_url: None,
            owner_id: owner_id.into(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn date_text(&self) -> DateText {
        DateText::for_times(self.created_at, self.updated_at)
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        writeln!(f, "{}", self.content)?;
        write!(f, "{}", self.date_text())
    }
}

/// Body of `POST /posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Body of `PUT /posts/:id`.
///
/// A missing `image_url` leaves the stored image untouched; clearing an image
/// goes through the dedicated image-removal endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostUpdate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
