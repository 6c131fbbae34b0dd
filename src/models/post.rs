use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::author::AuthorSummary;
use crate::models::tag::TagSummary;

/// Who may read a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostVisibility {
    #[default]
    Public,
    Members,
    Paid,
}

impl PostVisibility {
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "public" => Some(PostVisibility::Public),
            "members" => Some(PostVisibility::Members),
            "paid" => Some(PostVisibility::Paid),
            _ => None,
        }
    }
}

/// Publication state of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    #[default]
    Published,
    Scheduled,
}

impl PostStatus {
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(PostStatus::Draft),
            "published" => Some(PostStatus::Published),
            "scheduled" => Some(PostStatus::Scheduled),
            _ => None,
        }
    }
}

/// Public representation of a post, normalized from any record vintage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub title: String,
    pub slug: String,
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plaintext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_image_alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_image_caption: Option<String>,
    pub featured: bool,
    pub visibility: PostVisibility,
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_excerpt: Option<String>,
    pub authors: Vec<AuthorSummary>,
    pub primary_author: AuthorSummary,
    pub tags: Vec<TagSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_tag: Option<TagSummary>,
    /// Estimated reading time in minutes.
    pub reading_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_preset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_style: Option<String>,
    pub use_custom_style: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog_prompt: Option<String>,
    pub seo_keywords: Vec<String>,
    pub target_word_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codeinjection_head: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codeinjection_foot: Option<String>,
}
