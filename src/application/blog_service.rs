use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{Comment, Post};
use crate::presentation::dto::UpdatePostRequest;

/// The one service object. Every operation is a single repository call; no
/// state is held between requests.
#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl BlogService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.posts.find_all().await
    }

    #[instrument(skip(self, content))]
    pub async fn create_post(
        &self,
        caller: Uuid,
        title: String,
        content: String,
        category: String,
    ) -> Result<(), DomainError> {
        let author = self.caller_username(caller).await?;
        let post = Post::new(author, title, content, category);
        self.posts.create(post).await
    }

    #[instrument(skip(self))]
    pub async fn update_post(
        &self,
        id: Uuid,
        patch: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        self.posts
            .update(id, patch)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: Uuid) -> Result<(), DomainError> {
        if self.posts.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::PostNotFound(id))
        }
    }

    #[instrument(skip(self))]
    pub async fn like_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .increment_likes(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    #[instrument(skip(self, content))]
    pub async fn comment_on_post(
        &self,
        id: Uuid,
        caller: Uuid,
        content: String,
    ) -> Result<Post, DomainError> {
        let username = self.caller_username(caller).await?;
        self.posts
            .append_comment(id, Comment { username, content })
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    // A verified caller without a profile row maps to Internal, not NotFound.
    async fn caller_username(&self, caller: Uuid) -> Result<String, DomainError> {
        let user = self
            .users
            .find_by_id(caller)
            .await?
            .ok_or_else(|| DomainError::Internal(format!("no user record for caller {}", caller)))?;
        Ok(user.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::{InMemoryPostRepository, InMemoryUserRepository};
    use crate::domain::user::User;
    use chrono::Utc;

    struct Fixture {
        service: BlogService,
        users: Arc<InMemoryUserRepository>,
    }

    fn fixture() -> Fixture {
        let posts = Arc::new(InMemoryPostRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        Fixture {
            service: BlogService::new(posts, Arc::clone(&users) as Arc<dyn UserRepository>),
            users,
        }
    }

    impl Fixture {
        async fn register(&self, username: &str) -> Uuid {
            let user = User {
                id: Uuid::new_v4(),
                username: username.to_string(),
                created_at: Utc::now(),
            };
            let id = user.id;
            self.users.insert(user).await;
            id
        }
    }

    async fn service_with_user(username: &str) -> (BlogService, Uuid) {
        let fx = fixture();
        let caller = fx.register(username).await;
        (fx.service, caller)
    }

    #[tokio::test]
    async fn created_post_starts_with_zero_likes_and_no_comments() {
        let (service, alice) = service_with_user("alice").await;

        service
            .create_post(alice, "T".into(), "C".into(), "cat".into())
            .await
            .unwrap();

        let posts = service.list_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].author_username, "alice");
        assert_eq!(posts[0].likes, 0);
        assert!(posts[0].comments.is_empty());
    }

    #[tokio::test]
    async fn create_without_user_profile_is_internal() {
        let posts = Arc::new(InMemoryPostRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let service = BlogService::new(posts, users);

        let err = service
            .create_post(Uuid::new_v4(), "T".into(), "C".into(), "cat".into())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));

        assert!(service.list_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_likes_are_not_lost() {
        let (service, alice) = service_with_user("alice").await;
        service
            .create_post(alice, "T".into(), "C".into(), "cat".into())
            .await
            .unwrap();
        let id = service.list_posts().await.unwrap()[0].id;

        let n = 32;
        let mut handles = Vec::new();
        for _ in 0..n {
            let service = service.clone();
            handles.push(tokio::spawn(async move { service.like_post(id).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let post = service.list_posts().await.unwrap().remove(0);
        assert_eq!(post.likes, n);
    }

    #[tokio::test]
    async fn comments_preserve_insertion_order() {
        let (service, alice) = service_with_user("alice").await;
        service
            .create_post(alice, "T".into(), "C".into(), "cat".into())
            .await
            .unwrap();
        let id = service.list_posts().await.unwrap()[0].id;

        service
            .comment_on_post(id, alice, "first".into())
            .await
            .unwrap();
        let post = service
            .comment_on_post(id, alice, "second".into())
            .await
            .unwrap();

        let contents: Vec<&str> = post.comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert!(post.comments.iter().all(|c| c.username == "alice"));
    }

    #[tokio::test]
    async fn update_touches_only_title_content_category() {
        let (service, alice) = service_with_user("alice").await;
        service
            .create_post(alice, "T".into(), "C".into(), "cat".into())
            .await
            .unwrap();
        let id = service.list_posts().await.unwrap()[0].id;
        service.like_post(id).await.unwrap();
        service.comment_on_post(id, alice, "hi".into()).await.unwrap();

        let updated = service
            .update_post(
                id,
                UpdatePostRequest {
                    title: Some("T2".into()),
                    content: None,
                    category: Some("other".into()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "T2");
        assert_eq!(updated.content, "C");
        assert_eq!(updated.category, "other");
        assert_eq!(updated.author_username, "alice");
        assert_eq!(updated.likes, 1);
        assert_eq!(updated.comments.len(), 1);
    }

    #[tokio::test]
    async fn operations_on_unknown_id_are_not_found() {
        let (service, alice) = service_with_user("alice").await;
        let missing = Uuid::new_v4();

        assert!(matches!(
            service.delete_post(missing).await.unwrap_err(),
            DomainError::PostNotFound(id) if id == missing
        ));
        assert!(matches!(
            service.like_post(missing).await.unwrap_err(),
            DomainError::PostNotFound(_)
        ));
        assert!(matches!(
            service
                .update_post(missing, UpdatePostRequest {
                    title: Some("T".into()),
                    content: None,
                    category: None,
                })
                .await
                .unwrap_err(),
            DomainError::PostNotFound(_)
        ));
        assert!(matches!(
            service
                .comment_on_post(missing, alice, "hi".into())
                .await
                .unwrap_err(),
            DomainError::PostNotFound(_)
        ));
    }

    #[tokio::test]
    async fn full_lifecycle_scenario() {
        let fx = fixture();
        let alice = fx.register("alice").await;
        let bob = fx.register("bob").await;
        let service = &fx.service;

        service
            .create_post(alice, "T".into(), "C".into(), "cat".into())
            .await
            .unwrap();
        let posts = service.list_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].author_username, "alice");
        assert_eq!(posts[0].likes, 0);
        let id = posts[0].id;

        let liked = service.like_post(id).await.unwrap();
        assert_eq!(liked.likes, 1);

        let commented = service.comment_on_post(id, bob, "nice".into()).await.unwrap();
        assert_eq!(
            commented.comments,
            vec![Comment {
                username: "bob".into(),
                content: "nice".into(),
            }]
        );

        service.delete_post(id).await.unwrap();
        assert!(service.list_posts().await.unwrap().is_empty());
    }
}
