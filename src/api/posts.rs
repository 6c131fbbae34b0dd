use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use bson::Document;

use crate::api::envelope::{Listing, Single};
use crate::app::AppState;
use crate::assembler::post::{assemble_one, assemble_page};
use crate::auth::models::TenantId;
use crate::db::author_repository::AuthorRepository;
use crate::db::post_repository::{PostRepository, PostScope};
use crate::error::AppError;
use crate::models::post::PostView;
use crate::pagination::{PageQuery, PageRequest};
use crate::reader::Lookup;

/// Core listing logic, kept apart from the HTTP layer.
///
/// Count and page fetch run concurrently; the page is then assembled with
/// one author join. Any failure fails the whole page.
pub async fn fetch_post_page(
    posts: &dyn PostRepository,
    authors: &dyn AuthorRepository,
    tenant: TenantId,
    scope: PostScope,
    request: PageRequest,
) -> Result<Listing<PostView>, AppError> {
    let (total, records) = tokio::try_join!(
        posts.count(tenant, &scope),
        posts.list(tenant, &scope, request.window()),
    )?;

    let views = assemble_page(authors, tenant, &records).await?;
    Ok(Listing::new(views, request.paginate(total)))
}

/// Read one post of `tenant` using its embedded author data.
pub async fn fetch_post(
    posts: &dyn PostRepository,
    tenant: TenantId,
    lookup: Lookup<'_>,
) -> Result<PostView, AppError> {
    let record: Option<Document> = match lookup {
        Lookup::Id(_) => match lookup.object_id() {
            Some(id) => posts.find_by_id(tenant, id).await?,
            None => None,
        },
        Lookup::Slug(slug) => posts.find_by_slug(tenant, slug).await?,
    };

    match record {
        Some(record) => assemble_one(&record),
        None => {
            tracing::debug!(%tenant, ?lookup, "post not found");
            Err(AppError::NotFound("Post not found".into()))
        }
    }
}

async fn list_scoped(
    state: &AppState,
    tenant: TenantId,
    scope: PostScope,
    query: &PageQuery,
) -> Result<Json<Listing<PostView>>, AppError> {
    let request = PageRequest::from_query(query, &state.pages);
    let listing = fetch_post_page(
        state.posts.as_ref(),
        state.authors.as_ref(),
        tenant,
        scope,
        request,
    )
    .await
    .map_err(|e| e.during("Error fetching posts"))?;

    Ok(Json(listing))
}

/// `GET /posts`
pub async fn list_posts(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Listing<PostView>>, AppError> {
    list_scoped(&state, tenant, PostScope::All, &query).await
}

/// `GET /posts/tag/{slug}`
pub async fn list_posts_by_tag(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Listing<PostView>>, AppError> {
    list_scoped(&state, tenant, PostScope::Tag(slug), &query).await
}

/// `GET /posts/author/{slug}`
pub async fn list_posts_by_author(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Listing<PostView>>, AppError> {
    list_scoped(&state, tenant, PostScope::Author(slug), &query).await
}

/// `GET /posts/{id}`
///
/// The only endpoint whose server errors carry a `details` field.
pub async fn get_post_by_id(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    Path(id): Path<String>,
) -> Result<Json<Single<PostView>>, AppError> {
    let post = fetch_post(state.posts.as_ref(), tenant, Lookup::Id(&id))
        .await
        .map_err(|e| e.during_with_details("Error fetching post"))?;
    Ok(Json(Single::new(post)))
}

/// `GET /posts/slug/{slug}`
pub async fn get_post_by_slug(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    Path(slug): Path<String>,
) -> Result<Json<Single<PostView>>, AppError> {
    let post = fetch_post(state.posts.as_ref(), tenant, Lookup::Slug(&slug))
        .await
        .map_err(|e| e.during("Error fetching post"))?;
    Ok(Json(Single::new(post)))
}
