use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};

use blog_api::application::blog_service::BlogService;
use blog_api::data::post_repository::PostgresPostRepository;
use blog_api::data::user_repository::PostgresUserRepository;
use blog_api::infrastructure::config::AppConfig;
use blog_api::infrastructure::database::{create_pool, run_migrations};
use blog_api::infrastructure::logging::init_logging;
use blog_api::infrastructure::security::JwtKeys;
use blog_api::presentation::handlers;
use blog_api::presentation::middleware::{JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = AppConfig::from_env().expect("invalid configuration");
    let pool = create_pool(&config.database_url)
        .await
        .expect("failed to connect to database");
    run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    let post_repo = Arc::new(PostgresPostRepository::new(pool.clone()));
    let user_repo = Arc::new(PostgresUserRepository::new(pool));

    let blog_service = BlogService::new(post_repo, user_repo);
    let keys = JwtKeys::new(config.jwt_secret.clone());

    let config_data = config.clone();

    HttpServer::new(move || {
        let cors = build_cors(&config_data);
        // wrap() order is inside-out: RequestId runs first, so the timing
        // line carries the request id.
        App::new()
            .wrap(cors)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer")),
            )
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(blog_service.clone()))
            .service(handlers::health::health)
            .service(handlers::blog::scope().wrap(JwtAuthMiddleware::new(keys.clone())))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}
