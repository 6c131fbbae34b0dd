use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use crate::api::envelope::{Listing, Single};
use crate::app::AppState;
use crate::auth::models::TenantId;
use crate::db::author_repository::AuthorRepository;
use crate::error::AppError;
use crate::models::author::AuthorView;
use crate::pagination::{PageQuery, PageRequest};
use crate::reader::{read_author, Lookup};

/// One page of a tenant's authors, oldest first.
pub async fn fetch_author_page(
    repo: &dyn AuthorRepository,
    tenant: TenantId,
    request: PageRequest,
) -> Result<Listing<AuthorView>, AppError> {
    let (total, records) = tokio::try_join!(
        repo.count(tenant),
        repo.list(tenant, request.window()),
    )?;

    let views = records
        .into_iter()
        .map(AuthorView::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Listing::new(views, request.paginate(total)))
}

/// `GET /authors`
pub async fn list_authors(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Listing<AuthorView>>, AppError> {
    let request = PageRequest::from_query(&query, &state.pages);
    let listing = fetch_author_page(state.authors.as_ref(), tenant, request)
        .await
        .map_err(|e| e.during("Error fetching authors"))?;
    Ok(Json(listing))
}

/// `GET /authors/{id}`
pub async fn get_author_by_id(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    Path(id): Path<String>,
) -> Result<Json<Single<AuthorView>>, AppError> {
    let author = read_author(state.authors.as_ref(), tenant, Lookup::Id(&id))
        .await
        .map_err(|e| e.during("Error fetching author"))?;
    Ok(Json(Single::new(author)))
}

/// `GET /authors/slug/{slug}`
pub async fn get_author_by_slug(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    Path(slug): Path<String>,
) -> Result<Json<Single<AuthorView>>, AppError> {
    let author = read_author(state.authors.as_ref(), tenant, Lookup::Slug(&slug))
        .await
        .map_err(|e| e.during("Error fetching author"))?;
    Ok(Json(Single::new(author)))
}
