use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single comment on a blog. Comments are append-only and keep their
/// insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub username: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_username: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub likes: i64,
    #[sqlx(json)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author_username: String, title: String, content: String, category: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_username,
            title,
            content,
            category,
            likes: 0,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
