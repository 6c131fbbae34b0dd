//! Field alias chains for post records.
//!
//! Older post records store the same concept under different keys. Each
//! logical field is described by a [`FieldChain`]: candidate keys in
//! priority order. Adding a new legacy alias is a one-line change here.

use bson::oid::ObjectId;
use bson::{Bson, Document};
use chrono::{DateTime, Utc};

/// Candidate keys for one logical field, canonical name first.
pub type FieldChain = &'static [&'static str];

pub const ID: FieldChain = &["_id"];
pub const UUID: FieldChain = &["uuid"];
pub const TITLE: FieldChain = &["title"];
pub const SLUG: FieldChain = &["slug"];
pub const HTML: FieldChain = &["html", "content"];
pub const PLAINTEXT: FieldChain = &["plaintext"];
pub const FEATURE_IMAGE: FieldChain = &["feature_image", "cover_image"];
pub const FEATURE_IMAGE_ALT: FieldChain = &["feature_image_alt"];
pub const FEATURE_IMAGE_CAPTION: FieldChain = &["feature_image_caption"];
pub const FEATURED: FieldChain = &["featured"];
pub const VISIBILITY: FieldChain = &["visibility"];
pub const STATUS: FieldChain = &["status"];
pub const CREATED_AT: FieldChain = &["created_at", "createdAt"];
pub const UPDATED_AT: FieldChain = &["updated_at", "updatedAt"];
pub const PUBLISHED_AT: FieldChain = &["published_at", "createdAt"];
pub const CUSTOM_EXCERPT: FieldChain = &["custom_excerpt", "preview"];
pub const AUTHORS: FieldChain = &["authors"];
pub const PRIMARY_AUTHOR: FieldChain = &["primary_author"];
pub const TAGS: FieldChain = &["tags"];
pub const PRIMARY_TAG: FieldChain = &["primary_tag"];
pub const READING_TIME: FieldChain = &["reading_time", "read_time"];
pub const TEAM: FieldChain = &["team_id", "team"];
pub const CREATED_BY: FieldChain = &["created_by", "createdBy"];
pub const STYLE_PRESET: FieldChain = &["style_preset", "stylePreset"];
pub const CUSTOM_STYLE: FieldChain = &["custom_style", "customStyle"];
pub const USE_CUSTOM_STYLE: FieldChain = &["use_custom_style", "useCustomStyle"];
pub const BLOG_PROMPT: FieldChain = &["blog_prompt", "blogPrompt"];
pub const SEO_KEYWORDS: FieldChain = &["seo_keywords", "seoKeywords"];
pub const TARGET_WORD_COUNT: FieldChain = &["target_word_count", "targetWordCount"];
pub const CANONICAL_URL: FieldChain = &["canonical_url"];
pub const META_TITLE: FieldChain = &["meta_title"];
pub const META_DESCRIPTION: FieldChain = &["meta_description"];
pub const EMAIL_SUBJECT: FieldChain = &["email_subject"];
pub const CUSTOM_TEMPLATE: FieldChain = &["custom_template"];
pub const CODEINJECTION_HEAD: FieldChain = &["codeinjection_head"];
pub const CODEINJECTION_FOOT: FieldChain = &["codeinjection_foot"];

// Embedded author / tag snapshots.
pub const SNAPSHOT_ID: FieldChain = &["id"];
pub const NAME: FieldChain = &["name"];
pub const DESCRIPTION: FieldChain = &["description"];
pub const TAG_FEATURE_IMAGE: FieldChain = &["feature_image"];
pub const PROFILE_IMAGE: FieldChain = &["profile_image"];
pub const COVER_IMAGE: FieldChain = &["cover_image"];
pub const BIO: FieldChain = &["bio"];
pub const WEBSITE: FieldChain = &["website"];
pub const LOCATION: FieldChain = &["location"];
pub const FACEBOOK: FieldChain = &["facebook"];
pub const TWITTER: FieldChain = &["twitter"];
pub const IS_DEFAULT: FieldChain = &["isDefault"];

/// Whether a stored value counts as "set".
///
/// Null, empty strings, `false` and numeric zero are treated as unset so
/// that the next candidate in a chain gets a chance.
pub fn is_set(value: &Bson) -> bool {
    match value {
        Bson::Null | Bson::Undefined => false,
        Bson::Boolean(b) => *b,
        Bson::String(s) => !s.is_empty(),
        Bson::Int32(n) => *n != 0,
        Bson::Int64(n) => *n != 0,
        Bson::Double(n) => *n != 0.0 && !n.is_nan(),
        _ => true,
    }
}

/// Reads logical fields out of a raw record by walking their chains.
///
/// Every accessor returns the first candidate that is set *and* converts to
/// the requested type.
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    doc: &'a Document,
}

impl<'a> FieldReader<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { doc }
    }

    fn first<T>(&self, chain: FieldChain, convert: impl Fn(&'a Bson) -> Option<T>) -> Option<T> {
        chain
            .iter()
            .filter_map(|key| self.doc.get(key))
            .filter(|value| is_set(value))
            .find_map(convert)
    }

    /// First set candidate, whatever its type.
    pub fn raw(&self, chain: FieldChain) -> Option<&'a Bson> {
        self.first(chain, Some)
    }

    /// Strings pass through; ObjectIds are rendered as hex.
    pub fn string(&self, chain: FieldChain) -> Option<String> {
        self.first(chain, |value| match value {
            Bson::String(s) => Some(s.clone()),
            Bson::ObjectId(oid) => Some(oid.to_hex()),
            _ => None,
        })
    }

    pub fn object_id(&self, chain: FieldChain) -> Option<ObjectId> {
        self.first(chain, |value| match value {
            Bson::ObjectId(oid) => Some(*oid),
            Bson::String(s) => ObjectId::parse_str(s).ok(),
            _ => None,
        })
    }

    /// Integers, truncated doubles and numeric strings.
    pub fn int(&self, chain: FieldChain) -> Option<i64> {
        self.first(chain, |value| match value {
            Bson::Int32(n) => Some(i64::from(*n)),
            Bson::Int64(n) => Some(*n),
            Bson::Double(n) if n.is_finite() => Some(n.trunc() as i64),
            Bson::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn flag(&self, chain: FieldChain) -> Option<bool> {
        self.first(chain, |value| match value {
            Bson::Boolean(b) => Some(*b),
            _ => None,
        })
    }

    /// BSON dates, or RFC 3339 strings written by older clients.
    pub fn datetime(&self, chain: FieldChain) -> Option<DateTime<Utc>> {
        self.first(chain, |value| match value {
            Bson::DateTime(dt) => Some(dt.to_chrono()),
            Bson::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            _ => None,
        })
    }

    pub fn document(&self, chain: FieldChain) -> Option<&'a Document> {
        self.first(chain, |value| value.as_document())
    }

    /// Sub-documents of an array field; non-document entries are skipped.
    pub fn documents(&self, chain: FieldChain) -> Vec<&'a Document> {
        self.first(chain, |value| value.as_array())
            .map(|items| items.iter().filter_map(Bson::as_document).collect())
            .unwrap_or_default()
    }

    /// String entries of an array field; other entries are skipped.
    pub fn strings(&self, chain: FieldChain) -> Vec<String> {
        self.first(chain, |value| value.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(Bson::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
