use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};

use crate::auth::models::TenantId;
use crate::error::AppError;
use crate::pagination::Window;

pub const POSTS_COLLECTION: &str = "blogposts";

/// Which of a tenant's posts a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostScope {
    All,
    /// Posts carrying a tag with this slug.
    Tag(String),
    /// Posts listing an author with this slug.
    Author(String),
}

/// Build the storage filter for a tenant and scope.
pub fn scope_filter(tenant: TenantId, scope: &PostScope) -> Document {
    let mut filter = doc! { "team_id": tenant.object_id() };
    match scope {
        PostScope::All => {}
        PostScope::Tag(slug) => {
            filter.insert("tags.slug", slug.as_str());
        }
        PostScope::Author(slug) => {
            filter.insert("authors.slug", slug.as_str());
        }
    }
    filter
}

/// Read access to the posts collection.
///
/// Posts come back as raw documents: records of different vintages use
/// different field names and are normalized by the assembler, not here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn count(&self, tenant: TenantId, scope: &PostScope) -> Result<u64, AppError>;

    /// One page of posts, newest first.
    async fn list(
        &self,
        tenant: TenantId,
        scope: &PostScope,
        window: Window,
    ) -> Result<Vec<Document>, AppError>;

    async fn find_by_id(&self, tenant: TenantId, id: ObjectId)
        -> Result<Option<Document>, AppError>;

    async fn find_by_slug(&self, tenant: TenantId, slug: &str)
        -> Result<Option<Document>, AppError>;
}

/// MongoDB implementation of the PostRepository.
pub struct MongoPostRepository {
    collection: mongodb::Collection<Document>,
}

impl MongoPostRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(POSTS_COLLECTION),
        }
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn count(&self, tenant: TenantId, scope: &PostScope) -> Result<u64, AppError> {
        self.collection
            .count_documents(scope_filter(tenant, scope))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn list(
        &self,
        tenant: TenantId,
        scope: &PostScope,
        window: Window,
    ) -> Result<Vec<Document>, AppError> {
        use futures::TryStreamExt;
        use mongodb::options::FindOptions;

        // _id breaks ties between posts created in the same millisecond.
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1, "_id": -1 })
            .skip(window.skip)
            .limit(i64::try_from(window.limit).unwrap_or(i64::MAX))
            .build();

        self.collection
            .find(scope_filter(tenant, scope))
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn find_by_id(
        &self,
        tenant: TenantId,
        id: ObjectId,
    ) -> Result<Option<Document>, AppError> {
        self.collection
            .find_one(doc! { "_id": id, "team_id": tenant.object_id() })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn find_by_slug(
        &self,
        tenant: TenantId,
        slug: &str,
    ) -> Result<Option<Document>, AppError> {
        self.collection
            .find_one(doc! { "slug": slug, "team_id": tenant.object_id() })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
