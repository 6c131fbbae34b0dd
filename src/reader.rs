//! Tenant-scoped single-entity reads for authors and tags.

use bson::oid::ObjectId;

use crate::auth::models::TenantId;
use crate::db::author_repository::AuthorRepository;
use crate::db::tag_repository::TagRepository;
use crate::error::AppError;
use crate::models::author::AuthorView;
use crate::models::tag::TagView;

/// How a single entity is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// 24-character hex identifier.
    Id(&'a str),
    Slug(&'a str),
}

impl Lookup<'_> {
    /// Parse the id form. Malformed ids address nothing.
    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            Lookup::Id(raw) if raw.len() == 24 => ObjectId::parse_str(raw).ok(),
            _ => None,
        }
    }
}

/// Read one author of `tenant`.
///
/// A record owned by another tenant is reported exactly like a missing one.
/// A matching record without a team reference is an integrity error.
pub async fn read_author(
    repo: &dyn AuthorRepository,
    tenant: TenantId,
    lookup: Lookup<'_>,
) -> Result<AuthorView, AppError> {
    let record = match lookup {
        Lookup::Id(_) => match lookup.object_id() {
            Some(id) => repo.find_by_id(tenant, id).await?,
            None => None,
        },
        Lookup::Slug(slug) => repo.find_by_slug(tenant, slug).await?,
    };

    match record {
        Some(record) => AuthorView::try_from(record),
        None => {
            tracing::debug!(%tenant, ?lookup, "author not found");
            Err(AppError::NotFound("Author not found".into()))
        }
    }
}

/// Read one tag of `tenant`. Same rules as [`read_author`].
pub async fn read_tag(
    repo: &dyn TagRepository,
    tenant: TenantId,
    lookup: Lookup<'_>,
) -> Result<TagView, AppError> {
    let record = match lookup {
        Lookup::Id(_) => match lookup.object_id() {
            Some(id) => repo.find_by_id(tenant, id).await?,
            None => None,
        },
        Lookup::Slug(slug) => repo.find_by_slug(tenant, slug).await?,
    };

    match record {
        Some(record) => TagView::try_from(record),
        None => {
            tracing::debug!(%tenant, ?lookup, "tag not found");
            Err(AppError::NotFound("Tag not found".into()))
        }
    }
}
