use actix_web::{HttpMessage, HttpRequest, HttpResponse, Scope, delete, get, patch, post, put, web};
use tracing::info;
use uuid::Uuid;

use crate::application::blog_service::BlogService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{
    BlogResponse, CommentRequest, CreatePostRequest, MessageResponse, UpdatePostRequest,
};
use crate::presentation::utils::AuthenticatedUser;

/// All blog routes. Callers must wrap this scope in the JWT middleware;
/// every operation requires an authenticated caller.
pub fn scope() -> Scope {
    web::scope("/blogs")
        .service(list_blogs)
        .service(create_blog)
        .service(update_blog)
        .service(delete_blog)
        .service(like_blog)
        .service(comment_on_blog)
}

#[get("")]
async fn list_blogs(
    req: HttpRequest,
    service: web::Data<BlogService>,
) -> Result<HttpResponse, DomainError> {
    let blogs = service.list_posts().await?;

    info!(
        request_id = %request_id(&req),
        total = blogs.len(),
        "blogs retrieved"
    );

    Ok(HttpResponse::Ok().json(blogs))
}

#[post("")]
async fn create_blog(
    req: HttpRequest,
    user: AuthenticatedUser,
    service: web::Data<BlogService>,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let body = payload.into_inner();
    service
        .create_post(user.id, body.title, body.content, body.category)
        .await?;

    info!(
        request_id = %request_id(&req),
        caller = %user.id,
        "blog created"
    );

    Ok(HttpResponse::Created().json(MessageResponse {
        message: "Blog created successfully",
    }))
}

#[put("/{id}")]
async fn update_blog(
    req: HttpRequest,
    service: web::Data<BlogService>,
    payload: web::Json<UpdatePostRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let blog_id = path.into_inner();
    let blog = service.update_post(blog_id, payload.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        blog_id = %blog_id,
        "blog updated"
    );

    Ok(HttpResponse::Ok().json(BlogResponse {
        message: "Blog updated successfully",
        blog,
    }))
}

#[delete("/{id}")]
async fn delete_blog(
    req: HttpRequest,
    service: web::Data<BlogService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let blog_id = path.into_inner();
    service.delete_post(blog_id).await?;

    info!(
        request_id = %request_id(&req),
        blog_id = %blog_id,
        "blog deleted"
    );

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Blog deleted successfully",
    }))
}

#[patch("/{id}/like")]
async fn like_blog(
    req: HttpRequest,
    service: web::Data<BlogService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let blog_id = path.into_inner();
    let blog = service.like_post(blog_id).await?;

    info!(
        request_id = %request_id(&req),
        blog_id = %blog_id,
        likes = blog.likes,
        "blog liked"
    );

    Ok(HttpResponse::Ok().json(BlogResponse {
        message: "Blog liked successfully",
        blog,
    }))
}

#[patch("/{id}/comment")]
async fn comment_on_blog(
    req: HttpRequest,
    user: AuthenticatedUser,
    service: web::Data<BlogService>,
    payload: web::Json<CommentRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let blog_id = path.into_inner();
    let blog = service
        .comment_on_post(blog_id, user.id, payload.into_inner().content)
        .await?;

    info!(
        request_id = %request_id(&req),
        blog_id = %blog_id,
        caller = %user.id,
        "comment added"
    );

    Ok(HttpResponse::Ok().json(BlogResponse {
        message: "Comment added successfully",
        blog,
    }))
}

fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<crate::presentation::middleware::RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}
