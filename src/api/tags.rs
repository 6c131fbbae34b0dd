use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use crate::api::envelope::{Listing, Single};
use crate::app::AppState;
use crate::auth::models::TenantId;
use crate::db::tag_repository::TagRepository;
use crate::error::AppError;
use crate::models::tag::TagView;
use crate::pagination::{PageQuery, PageRequest};
use crate::reader::{read_tag, Lookup};

/// One page of a tenant's tags, oldest first.
pub async fn fetch_tag_page(
    repo: &dyn TagRepository,
    tenant: TenantId,
    request: PageRequest,
) -> Result<Listing<TagView>, AppError> {
    let (total, records) = tokio::try_join!(
        repo.count(tenant),
        repo.list(tenant, request.window()),
    )?;

    let views = records
        .into_iter()
        .map(TagView::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Listing::new(views, request.paginate(total)))
}

/// `GET /tags`
pub async fn list_tags(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Listing<TagView>>, AppError> {
    let request = PageRequest::from_query(&query, &state.pages);
    let listing = fetch_tag_page(state.tags.as_ref(), tenant, request)
        .await
        .map_err(|e| e.during("Error fetching tags"))?;
    Ok(Json(listing))
}

/// `GET /tags/{id}`
pub async fn get_tag_by_id(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    Path(id): Path<String>,
) -> Result<Json<Single<TagView>>, AppError> {
    let tag = read_tag(state.tags.as_ref(), tenant, Lookup::Id(&id))
        .await
        .map_err(|e| e.during("Error fetching tag"))?;
    Ok(Json(Single::new(tag)))
}

/// `GET /tags/slug/{slug}`
pub async fn get_tag_by_slug(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantId>,
    Path(slug): Path<String>,
) -> Result<Json<Single<TagView>>, AppError> {
    let tag = read_tag(state.tags.as_ref(), tenant, Lookup::Slug(&slug))
        .await
        .map_err(|e| e.during("Error fetching tag"))?;
    Ok(Json(Single::new(tag)))
}
