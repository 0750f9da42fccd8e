use sqlx::SqlitePool;
use uuid::Uuid;

use postboard_core::Post;

use super::{now_after, parse_id, parse_timestamp, timestamp};

pub struct PostRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: String,
    title: String,
    content: String,
    image_url: Option<String>,
    user_id: String,
    created_at: String,
    updated_at: Option<String>,
}

impl TryFrom<PostRow> for Post {
    type Error = sqlx::Error;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Post {
            id: parse_id(&row.id)?,
            title: row.title,
            content: row.content,
            image_url: row.image_url,
            owner_id: row.user_id,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: row.updated_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

/// Fields replaced by an update. `image_url: None` keeps the stored image.
#[derive(Debug, Clone)]
pub struct PostChanges<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub image_url: Option<&'a str>,
}

impl PostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All posts, newest first.
    pub async fn list(&self) -> Result<Vec<Post>, sqlx::Error> {
        let rows: Vec<PostRow> =
            sqlx::query_as("SELECT * FROM posts ORDER BY created_at DESC, rowid DESC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Post::try_from).collect()
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        let row: Option<PostRow> = sqlx::query_as("SELECT * FROM posts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Post::try_from).transpose()
    }

    pub async fn create(&self, post: &Post) -> Result<Post, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, title, content, image_url, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, NULL)
            "#,
        )
        .bind(post.id.to_string())
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(&post.owner_id)
        .bind(timestamp(post.created_at))
        .execute(&self.pool)
        .await?;

        self.get_by_id(post.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Returns `false` when no post has this id.
    pub async fn update(&self, id: Uuid, changes: PostChanges<'_>) -> Result<bool, sqlx::Error> {
        let Some(existing) = self.get_by_id(id).await? else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = ?, content = ?, image_url = COALESCE(?, image_url), updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(changes.title)
        .bind(changes.content)
        .bind(changes.image_url)
        .bind(timestamp(now_after(existing.created_at)))
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Clears the post's image. Returns `false` when no post has this id.
    pub async fn remove_image(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let Some(existing) = self.get_by_id(id).await? else {
            return Ok(false);
        };

        let result = sqlx::query("UPDATE posts SET image_url = NULL, updated_at = ? WHERE id = ?")
            .bind(timestamp(now_after(existing.created_at)))
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes the post; its comments go with it (ON DELETE CASCADE).
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    struct TestContext {
        repo: PostRepository,
        _temp_dir: TempDir,
    }

    async fn setup_repo() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_dir.path().join("test.db")).await.unwrap();
        TestContext {
            repo: PostRepository::new(pool),
            _temp_dir: temp_dir,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_post() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let post = Post::new("T", "C", "user1");
        let created = repo.create(&post).await.unwrap();
        assert_eq!(created.id, post.id);
        assert_eq!(created.title, "T");
        assert!(created.image_url.is_none());
        assert!(created.updated_at.is_none());
        assert!(!created.date_text().is_updated());

        let fetched = repo.get_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        repo.create(&Post::new("first", "a", "u")).await.unwrap();
        repo.create(&Post::new("second", "b", "u")).await.unwrap();
        repo.create(&Post::new("third", "c", "u")).await.unwrap();

        let titles: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_update_sets_updated_at_and_keeps_image() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let post = Post::new("T", "C", "u").with_image_url("data:image/png;base64,AAAA");
        repo.create(&post).await.unwrap();

        let changed = repo
            .update(
                post.id,
                PostChanges {
                    title: "T",
                    content: "C2",
                    image_url: None,
                },
            )
            .await
            .unwrap();
        assert!(changed);

        let updated = repo.get_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(updated.content, "C2");
        assert_eq!(updated.image_url.as_deref(), Some("data:image/png;base64,AAAA"));
        assert!(updated.updated_at.unwrap() > updated.created_at);
        assert!(updated.date_text().is_updated());
    }

    #[tokio::test]
    async fn test_update_missing_post() {
        let ctx = setup_repo().await;
        let changes = PostChanges {
            title: "T",
            content: "C",
            image_url: None,
        };
        assert!(!ctx.repo.update(Uuid::new_v4(), changes).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_image() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let post = Post::new("T", "C", "u").with_image_url("https://example.com/a.png");
        repo.create(&post).await.unwrap();

        assert!(repo.remove_image(post.id).await.unwrap());
        let fetched = repo.get_by_id(post.id).await.unwrap().unwrap();
        assert!(fetched.image_url.is_none());
        assert!(!repo.remove_image(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_post() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let post = Post::new("T", "C", "u");
        repo.create(&post).await.unwrap();

        assert!(repo.delete(post.id).await.unwrap());
        assert!(repo.get_by_id(post.id).await.unwrap().is_none());
        // Second delete finds nothing
        assert!(!repo.delete(post.id).await.unwrap());
    }
}
