use crate::domain::error::DomainError;
use crate::domain::post::{Comment, Post};
use crate::presentation::dto::UpdatePostRequest;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> Result<(), DomainError>;
    async fn find_all(&self) -> Result<Vec<Post>, DomainError>;
    async fn update(
        &self,
        id: Uuid,
        patch: UpdatePostRequest,
    ) -> Result<Option<Post>, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    /// Increment the like counter by one in a single store-side statement.
    async fn increment_likes(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    /// Append a comment to the post's comment array in a single store-side
    /// statement.
    async fn append_comment(
        &self,
        id: Uuid,
        comment: Comment,
    ) -> Result<Option<Post>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: Post) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_username, title, content, category, likes, comments, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            "#,
        )
        .bind(post.id)
        .bind(&post.author_username)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.category)
        .bind(post.likes)
        .bind(sqlx::types::Json(&post.comments))
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create blog: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(post_id = %post.id, author = %post.author_username, "blog created");
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author_username, title, content, category, likes, comments, created_at, updated_at
            FROM posts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching blogs: {}", e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn update(
        &self,
        id: Uuid,
        patch: UpdatePostRequest,
    ) -> Result<Option<Post>, DomainError> {
        let now = Utc::now();
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET
                title = COALESCE($1, title),
                content = COALESCE($2, content),
                category = COALESCE($3, category),
                updated_at = $4
            WHERE id = $5
            RETURNING id, author_username, title, content, category, likes, comments, created_at, updated_at
            "#,
        )
        .bind(patch.title)
        .bind(patch.content)
        .bind(patch.category)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update blog {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })?;

        if post.is_some() {
            info!(post_id = %id, "blog updated");
        }

        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete blog {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        let removed = deleted.rows_affected() > 0;
        if removed {
            info!(post_id = %id, "blog deleted");
        }
        Ok(removed)
    }

    async fn increment_likes(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let now = Utc::now();
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET likes = likes + 1, updated_at = $1
            WHERE id = $2
            RETURNING id, author_username, title, content, category, likes, comments, created_at, updated_at
            "#,
        )
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to like blog {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })?;

        if let Some(post) = &post {
            info!(post_id = %id, likes = post.likes, "blog liked");
        }

        Ok(post)
    }

    async fn append_comment(
        &self,
        id: Uuid,
        comment: Comment,
    ) -> Result<Option<Post>, DomainError> {
        let now = Utc::now();
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET comments = comments || jsonb_build_array($1::jsonb), updated_at = $2
            WHERE id = $3
            RETURNING id, author_username, title, content, category, likes, comments, created_at, updated_at
            "#,
        )
        .bind(sqlx::types::Json(&comment))
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to comment on blog {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })?;

        if post.is_some() {
            info!(post_id = %id, commenter = %comment.username, "comment added");
        }

        Ok(post)
    }
}
