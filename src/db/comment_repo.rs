use sqlx::SqlitePool;
use uuid::Uuid;

use postboard_core::Comment;

use super::{now_after, parse_id, parse_timestamp, timestamp};

pub struct CommentRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: String,
    board_id: String,
    content: String,
    created_at: String,
    updated_at: Option<String>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = sqlx::Error;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: parse_id(&row.id)?,
            board_id: parse_id(&row.board_id)?,
            content: row.content,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: row.updated_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

impl CommentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Comments of one post, oldest first.
    pub async fn list_for_post(&self, board_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
        let rows: Vec<CommentRow> = sqlx::query_as(
            "SELECT * FROM comments WHERE board_id = ? ORDER BY created_at ASC, rowid ASC",
        )
        .bind(board_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
        let row: Option<CommentRow> = sqlx::query_as("SELECT * FROM comments WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Comment::try_from).transpose()
    }

    /// Fails with a foreign key violation if the post does not exist.
    pub async fn create(&self, comment: &Comment) -> Result<Comment, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, board_id, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, NULL)
            "#,
        )
        .bind(comment.id.to_string())
        .bind(comment.board_id.to_string())
        .bind(&comment.content)
        .bind(timestamp(comment.created_at))
        .execute(&self.pool)
        .await?;

        self.get_by_id(comment.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Replaces the content and returns the updated comment, or `None` if it does not exist.
    pub async fn update(&self, id: Uuid, content: &str) -> Result<Option<Comment>, sqlx::Error> {
        let Some(existing) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        sqlx::query("UPDATE comments SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
            .bind(timestamp(now_after(existing.created_at)))
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
