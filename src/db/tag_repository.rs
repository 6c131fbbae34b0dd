use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::auth::models::TenantId;
use crate::db::models::TagRecord;
use crate::error::AppError;
use crate::pagination::Window;

pub const TAGS_COLLECTION: &str = "tags";

/// Read access to the `tags` collection, scoped per tenant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn count(&self, tenant: TenantId) -> Result<u64, AppError>;

    /// One page of the tenant's tags, ordered by id.
    async fn list(&self, tenant: TenantId, window: Window) -> Result<Vec<TagRecord>, AppError>;

    async fn find_by_id(&self, tenant: TenantId, id: ObjectId)
        -> Result<Option<TagRecord>, AppError>;

    async fn find_by_slug(&self, tenant: TenantId, slug: &str)
        -> Result<Option<TagRecord>, AppError>;
}

/// MongoDB implementation of the TagRepository.
pub struct MongoTagRepository {
    collection: mongodb::Collection<TagRecord>,
}

impl MongoTagRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(TAGS_COLLECTION),
        }
    }
}

#[async_trait]
impl TagRepository for MongoTagRepository {
    async fn count(&self, tenant: TenantId) -> Result<u64, AppError> {
        use mongodb::bson::doc;

        self.collection
            .count_documents(doc! { "team_id": tenant.object_id() })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn list(&self, tenant: TenantId, window: Window) -> Result<Vec<TagRecord>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder()
            .sort(doc! { "_id": 1 })
            .skip(window.skip)
            .limit(i64::try_from(window.limit).unwrap_or(i64::MAX))
            .build();

        let mut cursor = self
            .collection
            .find(doc! { "team_id": tenant.object_id() })
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut tags = Vec::new();
        while let Some(tag) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            tags.push(tag);
        }

        Ok(tags)
    }

    async fn find_by_id(
        &self,
        tenant: TenantId,
        id: ObjectId,
    ) -> Result<Option<TagRecord>, AppError> {
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
    ) -> Result<Option<TagRecord>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "slug": slug, "team_id": tenant.object_id() })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
