use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::models::{AuthorRecord, TenantOwned};
use crate::error::AppError;

/// Identifier of the placeholder author.
pub const ANONYMOUS_AUTHOR_ID: &str = "default";

/// Public representation of an author returned by the author endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorView {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    pub team_id: String,
    #[serde(rename = "isDefault")]
    pub is_default: bool,
    /// Relative URL of the author's page, `/author/{slug}/`.
    pub url: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<AuthorRecord> for AuthorView {
    type Error = AppError;

    /// Fails with an integrity error when the record has no team reference.
    fn try_from(record: AuthorRecord) -> Result<Self, Self::Error> {
        let team_id = record
            .team_id()
            .ok_or_else(|| missing_team_error::<AuthorRecord>())?
            .to_hex();

        Ok(Self {
            id: record.id.to_hex(),
            url: format!("/author/{}/", record.slug),
            name: record.name,
            slug: record.slug,
            profile_image: record.profile_image,
            cover_image: record.cover_image,
            bio: record.bio,
            website: record.website,
            location: record.location,
            facebook: record.facebook,
            twitter: record.twitter,
            meta_title: record.meta_title,
            meta_description: record.meta_description,
            team_id,
            is_default: record.is_default,
            created_at: record.created_at.map(|d| d.to_chrono()),
            updated_at: record.updated_at.map(|d| d.to_chrono()),
        })
    }
}

/// Compact author shape embedded in posts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(rename = "isDefault", default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl AuthorSummary {
    /// The fixed "Anonymous" author used when no real author resolves.
    pub fn anonymous() -> Self {
        Self {
            id: ANONYMOUS_AUTHOR_ID.to_string(),
            name: "Anonymous".to_string(),
            slug: "anonymous".to_string(),
            profile_image: Some(String::new()),
            bio: Some(String::new()),
            website: Some(String::new()),
            location: Some(String::new()),
            meta_title: Some(String::new()),
            meta_description: Some(String::new()),
            ..Self::default()
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.id == ANONYMOUS_AUTHOR_ID
    }
}

impl From<&AuthorRecord> for AuthorSummary {
    fn from(record: &AuthorRecord) -> Self {
        Self {
            id: record.id.to_hex(),
            name: record.name.clone(),
            slug: record.slug.clone(),
            profile_image: record.profile_image.clone(),
            cover_image: record.cover_image.clone(),
            bio: record.bio.clone(),
            website: record.website.clone(),
            location: record.location.clone(),
            facebook: record.facebook.clone(),
            twitter: record.twitter.clone(),
            meta_title: record.meta_title.clone(),
            meta_description: record.meta_description.clone(),
            team_id: record.team_id.map(|id| id.to_hex()),
            is_default: Some(record.is_default),
        }
    }
}

/// Integrity error for a tenant-owned record without a team reference.
pub(crate) fn missing_team_error<T: TenantOwned>() -> AppError {
    AppError::Integrity(format!("Invalid {} data: missing team_id", T::KIND))
}
