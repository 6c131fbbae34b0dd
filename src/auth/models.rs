use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of the team (tenant) that owns a piece of content.
///
/// Every read against the content collections takes one of these, so a
/// query can never be issued without a tenant filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(ObjectId);

impl TenantId {
    pub fn new(id: ObjectId) -> Self {
        Self(id)
    }

    /// Parse a 24-character hex string.
    pub fn parse_str(s: &str) -> Option<Self> {
        ObjectId::parse_str(s).ok().map(Self)
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// A team document from the `teams` collection.
///
/// Only the fields the authentication gate needs are modelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Hashes of the API keys issued to this team. Entries that cannot be
    /// read are dropped.
    #[serde(rename = "apiKeys", default, deserialize_with = "readable_keys")]
    pub api_keys: Vec<ApiKeyRecord>,
}

impl Team {
    pub fn tenant_id(&self) -> TenantId {
        TenantId(self.id)
    }
}

fn readable_keys<'de, D>(deserializer: D) -> Result<Vec<ApiKeyRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<bson::Bson>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .filter_map(|entry| bson::from_bson(entry).ok())
        .collect())
}

/// One issued API key, stored only as its hex-encoded SHA-256 hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    pub hash: String,
    #[serde(rename = "lastUsed", default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<bson::DateTime>,
}
