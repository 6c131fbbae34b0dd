use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::Document;

use crate::auth::models::TenantId;
use crate::db::models::AuthorRecord;
use crate::error::AppError;
use crate::pagination::Window;

pub const AUTHORS_COLLECTION: &str = "authors";

/// Read access to the `authors` collection.
///
/// Every method is scoped to a single tenant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Number of authors owned by the tenant.
    async fn count(&self, tenant: TenantId) -> Result<u64, AppError>;

    /// One page of the tenant's authors, ordered by id.
    async fn list(&self, tenant: TenantId, window: Window) -> Result<Vec<AuthorRecord>, AppError>;

    async fn find_by_id(
        &self,
        tenant: TenantId,
        id: ObjectId,
    ) -> Result<Option<AuthorRecord>, AppError>;

    async fn find_by_slug(
        &self,
        tenant: TenantId,
        slug: &str,
    ) -> Result<Option<AuthorRecord>, AppError>;

    /// Fetch all of the given authors in one round trip.
    ///
    /// Ids that do not exist, or belong to another tenant, are simply absent
    /// from the result.
    async fn find_many(
        &self,
        tenant: TenantId,
        ids: &[ObjectId],
    ) -> Result<Vec<AuthorRecord>, AppError>;
}

/// Decode the authors fetched for a post join. A document that cannot be
/// read is logged and left out, so the reference falls back like any other
/// unresolved one.
fn decode_joinable(documents: Vec<Document>) -> Vec<AuthorRecord> {
    documents
        .into_iter()
        .filter_map(|document| {
            let id = document.get_object_id("_id").ok();
            match bson::from_document::<AuthorRecord>(document) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(author_id = ?id, error = %e, "skipping unreadable author");
                    None
                }
            }
        })
        .collect()
}

/// MongoDB implementation of the AuthorRepository.
pub struct MongoAuthorRepository {
    collection: mongodb::Collection<AuthorRecord>,
}

impl MongoAuthorRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(AUTHORS_COLLECTION),
        }
    }
}

#[async_trait]
impl AuthorRepository for MongoAuthorRepository {
    async fn count(&self, tenant: TenantId) -> Result<u64, AppError> {
        use mongodb::bson::doc;

        self.collection
            .count_documents(doc! { "team_id": tenant.object_id() })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn list(&self, tenant: TenantId, window: Window) -> Result<Vec<AuthorRecord>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder()
            .sort(doc! { "_id": 1 })
            .skip(window.skip)
            .limit(i64::try_from(window.limit).unwrap_or(i64::MAX))
            .build();

        self.collection
            .find(doc! { "team_id": tenant.object_id() })
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
    ) -> Result<Option<AuthorRecord>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "_id": id, "team_id": tenant.object_id() })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn find_by_slug(
        &self,
        tenant: TenantId,
        slug: &str,
    ) -> Result<Option<AuthorRecord>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "slug": slug, "team_id": tenant.object_id() })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn find_many(
        &self,
        tenant: TenantId,
        ids: &[ObjectId],
    ) -> Result<Vec<AuthorRecord>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let documents: Vec<Document> = self
            .collection
            .clone_with_type::<Document>()
            .find(doc! {
                "_id": { "$in": ids.to_vec() },
                "team_id": tenant.object_id(),
            })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(decode_joinable(documents))
    }
}
