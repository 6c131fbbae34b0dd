use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::models::{TagRecord, TagVisibility, TenantOwned};
use crate::error::AppError;
use crate::models::author::missing_team_error;

/// Public representation of a tag returned by the tag endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagView {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_image: Option<String>,
    pub visibility: TagVisibility,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codeinjection_head: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codeinjection_foot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub team_id: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<TagRecord> for TagView {
    type Error = AppError;

    fn try_from(record: TagRecord) -> Result<Self, Self::Error> {
        let team_id = record
            .team_id()
            .ok_or_else(missing_team_error::<TagRecord>)?
            .to_hex();

        Ok(Self {
            id: record.id.to_hex(),
            name: record.name,
            slug: record.slug,
            description: record.description,
            feature_image: record.feature_image,
            visibility: record.visibility,
            meta_title: record.meta_title,
            meta_description: record.meta_description,
            og_image: record.og_image,
            og_title: record.og_title,
            og_description: record.og_description,
            twitter_image: record.twitter_image,
            twitter_title: record.twitter_title,
            twitter_description: record.twitter_description,
            codeinjection_head: record.codeinjection_head,
            codeinjection_foot: record.codeinjection_foot,
            canonical_url: record.canonical_url,
            accent_color: record.accent_color,
            url: record.url,
            team_id,
            created_at: record.created_at.map(|d| d.to_chrono()),
            updated_at: record.updated_at.map(|d| d.to_chrono()),
        })
    }
}

/// Tag snapshot embedded in a post (`tags`, `primary_tag`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TagSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub visibility: TagVisibility,
}
