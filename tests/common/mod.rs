use std::sync::Arc;

use blog_api::application::blog_service::BlogService;
use blog_api::data::memory::{InMemoryPostRepository, InMemoryUserRepository};
use blog_api::domain::user::User;
use blog_api::infrastructure::security::JwtKeys;
use chrono::Utc;
use uuid::Uuid;

pub struct TestContext {
    pub posts: Arc<InMemoryPostRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub keys: JwtKeys,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            keys: JwtKeys::new("test-secret".into()),
        }
    }

    pub fn service(&self) -> BlogService {
        BlogService::new(self.posts.clone(), self.users.clone())
    }

    /// Provision a user profile and mint a bearer token for it.
    pub async fn register(&self, username: &str) -> (Uuid, String) {
        let user = User {
            id: Uuid::new_v4(),
            username: username.into(),
            created_at: Utc::now(),
        };
        let id = user.id;
        self.users.insert(user).await;
        let token = self.keys.generate_token(id).expect("token");
        (id, token)
    }

    /// Insert a blog through the service object, sharing the same stores the
    /// HTTP app under test sees.
    pub async fn seed_blog(&self, caller: Uuid) -> Uuid {
        let service = self.service();
        service
            .create_post(caller, "T".into(), "C".into(), "cat".into())
            .await
            .expect("seed blog");
        service.list_posts().await.expect("list blogs")[0].id
    }
}
