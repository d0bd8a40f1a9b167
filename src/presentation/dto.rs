use serde::{Deserialize, Serialize};

use crate::domain::post::Post;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub category: String,
}

/// Patch body for updates. Absent fields keep their stored value; author,
/// likes and comments are never touched by an update.
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub message: &'static str,
    pub blog: Post,
}
