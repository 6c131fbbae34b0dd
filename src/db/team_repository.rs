use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::auth::models::{Team, TenantId};
use crate::error::AppError;

pub const TEAMS_COLLECTION: &str = "teams";

/// Credential lookups against the `teams` collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Find the team holding an API key with this hash.
    async fn find_by_key_hash(&self, key_hash: &str) -> Result<Option<Team>, AppError>;

    /// Record when the key with this hash was last used.
    async fn touch_key(
        &self,
        tenant: TenantId,
        key_hash: &str,
        used_at: DateTime<Utc>,
    ) -> Result<(), AppError>;
}

/// MongoDB implementation of the TeamRepository.
pub struct MongoTeamRepository {
    collection: mongodb::Collection<Team>,
}

impl MongoTeamRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(TEAMS_COLLECTION),
        }
    }
}

#[async_trait]
impl TeamRepository for MongoTeamRepository {
    async fn find_by_key_hash(&self, key_hash: &str) -> Result<Option<Team>, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::FindOneOptions;

        // The gate only needs the owning team, not the stored key entries.
        let options = FindOneOptions::builder()
            .projection(doc! { "_id": 1, "name": 1 })
            .build();

        self.collection
            .find_one(doc! { "apiKeys.hash": key_hash })
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn touch_key(
        &self,
        tenant: TenantId,
        key_hash: &str,
        used_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        use mongodb::bson::doc;

        // The positional `$` targets the array entry matched by the filter.
        self.collection
            .update_one(
                doc! { "_id": tenant.object_id(), "apiKeys.hash": key_hash },
                doc! { "$set": { "apiKeys.$.lastUsed": bson::DateTime::from_chrono(used_at) } },
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
