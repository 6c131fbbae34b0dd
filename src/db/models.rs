use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};

/// Read an explicit `null` the same way as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Visibility of a tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagVisibility {
    #[default]
    Public,
    Internal,
}

impl TagVisibility {
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "public" => Some(TagVisibility::Public),
            "internal" => Some(TagVisibility::Internal),
            _ => None,
        }
    }
}

/// Anything stored with a reference to its owning team.
pub trait TenantOwned {
    /// Human name used in error messages ("author", "tag").
    const KIND: &'static str;

    fn team_id(&self) -> Option<&ObjectId>;
}

/// An author as stored in the `authors` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
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
    pub team_id: Option<ObjectId>,
    #[serde(rename = "isDefault", default, deserialize_with = "null_as_default")]
    pub is_default: bool,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<bson::DateTime>,
}

impl TenantOwned for AuthorRecord {
    const KIND: &'static str = "author";

    fn team_id(&self) -> Option<&ObjectId> {
        self.team_id.as_ref()
    }
}

/// A tag as stored in the `tags` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<ObjectId>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<bson::DateTime>,
}

impl TenantOwned for TagRecord {
    const KIND: &'static str = "tag";

    fn team_id(&self) -> Option<&ObjectId> {
        self.team_id.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_record_minimal_document() {
        let oid = ObjectId::new();
        let team = ObjectId::new();
        let doc = bson::doc! { "_id": oid, "name": "Ada", "slug": "ada", "team_id": team };

        let author: AuthorRecord = bson::from_document(doc).unwrap();
        assert_eq!(author.id, oid);
        assert_eq!(author.name, "Ada");
        assert_eq!(author.team_id, Some(team));
        assert!(author.bio.is_none());
        assert!(!author.is_default);
    }

    #[test]
    fn test_author_record_missing_team() {
        let author: AuthorRecord =
            bson::from_document(bson::doc! { "_id": ObjectId::new(), "name": "Orphan" }).unwrap();
        assert!(TenantOwned::team_id(&author).is_none());
        assert_eq!(author.slug, "");
    }

    #[test]
    fn test_author_record_null_fields_read_as_defaults() {
        let author: AuthorRecord = bson::from_document(bson::doc! {
            "_id": ObjectId::new(),
            "name": bson::Bson::Null,
            "slug": bson::Bson::Null,
            "bio": bson::Bson::Null,
            "team_id": ObjectId::new(),
            "isDefault": bson::Bson::Null,
            "createdAt": bson::Bson::Null,
        })
        .unwrap();
        assert_eq!(author.name, "");
        assert_eq!(author.slug, "");
        assert!(author.bio.is_none());
        assert!(!author.is_default);
        assert!(author.created_at.is_none());
    }

    #[test]
    fn test_tag_record_null_fields_read_as_defaults() {
        let tag: TagRecord = bson::from_document(bson::doc! {
            "_id": ObjectId::new(),
            "name": bson::Bson::Null,
            "slug": "rust",
            "visibility": bson::Bson::Null,
        })
        .unwrap();
        assert_eq!(tag.name, "");
        assert_eq!(tag.visibility, TagVisibility::Public);
    }

    #[test]
    fn test_tag_visibility_defaults_to_public() {
        let tag: TagRecord = bson::from_document(
            bson::doc! { "_id": ObjectId::new(), "name": "Rust", "slug": "rust" },
        )
        .unwrap();
        assert_eq!(tag.visibility, TagVisibility::Public);
    }

    #[test]
    fn test_tag_visibility_internal() {
        let tag: TagRecord = bson::from_document(bson::doc! {
            "_id": ObjectId::new(),
            "name": "Hidden",
            "slug": "hidden",
            "visibility": "internal",
        })
        .unwrap();
        assert_eq!(tag.visibility, TagVisibility::Internal);
    }

    #[test]
    fn test_tag_record_round_trips_through_bson() {
        let tag = TagRecord {
            id: ObjectId::new(),
            name: "Engineering".into(),
            slug: "engineering".into(),
            description: Some("Posts about building things".into()),
            feature_image: None,
            visibility: TagVisibility::Public,
            meta_title: None,
            meta_description: None,
            og_image: None,
            og_title: None,
            og_description: None,
            twitter_image: None,
            twitter_title: None,
            twitter_description: None,
            codeinjection_head: None,
            codeinjection_foot: None,
            canonical_url: None,
            accent_color: Some("#ff5500".into()),
            url: None,
            team_id: Some(ObjectId::new()),
            created_at: None,
            updated_at: None,
        };

        let doc = bson::to_document(&tag).unwrap();
        assert!(!doc.contains_key("feature_image"));
        let back: TagRecord = bson::from_document(doc).unwrap();
        assert_eq!(back, tag);
    }
}
