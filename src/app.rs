use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::auth::middleware::{require_api_key, API_KEY_HEADER};
use crate::config::Config;
use crate::db::author_repository::{AuthorRepository, MongoAuthorRepository};
use crate::db::post_repository::{MongoPostRepository, PostRepository};
use crate::db::tag_repository::{MongoTagRepository, TagRepository};
use crate::db::team_repository::{MongoTeamRepository, TeamRepository};
use crate::error::AppError;
use crate::pagination::PageSettings;

/// Shared application state available to all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub teams: Arc<dyn TeamRepository>,
    pub authors: Arc<dyn AuthorRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub pages: PageSettings,
}

impl AppState {
    /// Wire every repository to the same MongoDB database.
    pub fn from_database(db: &mongodb::Database, pages: PageSettings) -> Self {
        Self {
            teams: Arc::new(MongoTeamRepository::new(db)),
            authors: Arc::new(MongoAuthorRepository::new(db)),
            tags: Arc::new(MongoTagRepository::new(db)),
            posts: Arc::new(MongoPostRepository::new(db)),
            pages,
        }
    }
}

/// Content routes, relative to the API prefix. Every one of them sits
/// behind the API key gate.
pub fn content_routes(state: AppState) -> Router {
    Router::new()
        .route("/posts", get(api::posts::list_posts))
        .route("/posts/{id}", get(api::posts::get_post_by_id))
        .route("/posts/slug/{slug}", get(api::posts::get_post_by_slug))
        .route("/posts/tag/{slug}", get(api::posts::list_posts_by_tag))
        .route("/posts/author/{slug}", get(api::posts::list_posts_by_author))
        .route("/authors", get(api::authors::list_authors))
        .route("/authors/{id}", get(api::authors::get_author_by_id))
        .route("/authors/slug/{slug}", get(api::authors::get_author_by_slug))
        .route("/tags", get(api::tags::list_tags))
        .route("/tags/{id}", get(api::tags::get_tag_by_id))
        .route("/tags/slug/{slug}", get(api::tags::get_tag_by_slug))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ))
        .with_state(state)
}

/// Build the full router: `/health`, the gated content routes under
/// `config.api_prefix`, CORS and request tracing.
pub fn router(state: AppState, config: &Config) -> anyhow::Result<Router> {
    let origin: HeaderValue = config
        .cors_origin
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid cors_origin '{}': {e}", config.cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            HeaderName::from_static(API_KEY_HEADER),
        ])
        .allow_credentials(true);

    Ok(Router::new()
        .route("/health", get(api::health::health))
        .nest(&config.api_prefix, content_routes(state))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        ))
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found".into())
}
