//! In-memory repositories backing the test suite.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::post::{Comment, Post};
use crate::domain::user::User;
use crate::presentation::dto::UpdatePostRequest;

use super::post_repository::PostRepository;
use super::user_repository::UserRepository;

/// In-memory post store. Each mutation holds the write lock for its full
/// duration, which matches the single-statement atomicity of the SQL
/// implementation.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: Post) -> Result<(), DomainError> {
        self.posts.write().await.push(post);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Post>, DomainError> {
        let mut posts: Vec<Post> = self.posts.read().await.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: UpdatePostRequest,
    ) -> Result<Option<Post>, DomainError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(category) = patch.category {
            post.category = category;
        }
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() != before)
    }

    async fn increment_likes(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.likes += 1;
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn append_comment(
        &self,
        id: Uuid,
        comment: Comment,
    ) -> Result<Option<Post>, DomainError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.comments.push(comment);
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}
