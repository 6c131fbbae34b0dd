//! Turns raw post records into their public representation.

use bson::oid::ObjectId;
use bson::{Bson, Document};

use crate::assembler::fields::{self, FieldReader};
use crate::assembler::loader::{BatchLoader, Resolved};
use crate::auth::models::TenantId;
use crate::db::author_repository::AuthorRepository;
use crate::db::models::{AuthorRecord, TagVisibility};
use crate::error::AppError;
use crate::models::author::AuthorSummary;
use crate::models::post::{PostStatus, PostView, PostVisibility};
use crate::models::tag::TagSummary;

pub const DEFAULT_TARGET_WORD_COUNT: i64 = 1000;

/// Where a post's author summaries come from.
#[derive(Debug, Clone, Copy)]
pub enum Authorship<'a> {
    /// Resolve each author reference through a batch-loaded index.
    /// Unresolved co-authors are dropped.
    Joined(&'a Resolved<ObjectId, AuthorSummary>),
    /// Use the author snapshots stored on the post as they are.
    Embedded,
}

/// Assemble a page of posts, joining their authors with one storage call.
///
/// Author references are collected across the whole page and deduplicated
/// before the fetch. References that are not valid ObjectIds are logged and
/// skipped. A post whose primary author does not resolve gets the anonymous
/// placeholder.
pub async fn assemble_page(
    authors: &dyn AuthorRepository,
    tenant: TenantId,
    posts: &[Document],
) -> Result<Vec<PostView>, AppError> {
    let mut loader = BatchLoader::new();
    for post in posts {
        let reader = FieldReader::new(post);
        let snapshots = reader
            .document(fields::PRIMARY_AUTHOR)
            .into_iter()
            .chain(reader.documents(fields::AUTHORS));
        for snapshot in snapshots {
            if let Some(id) = author_reference(snapshot) {
                loader.request(id);
            }
        }
    }

    let index = loader
        .resolve(
            |ids| async move { authors.find_many(tenant, &ids).await },
            |record: &AuthorRecord| record.id,
        )
        .await?
        .map_values(|record| AuthorSummary::from(&record));

    posts
        .iter()
        .map(|post| normalize_post(post, Authorship::Joined(&index)))
        .collect()
}

/// Assemble a single post from its embedded author snapshots.
pub fn assemble_one(post: &Document) -> Result<PostView, AppError> {
    normalize_post(post, Authorship::Embedded)
}

/// Parse the author id of a snapshot for batch loading.
fn author_reference(snapshot: &Document) -> Option<ObjectId> {
    match FieldReader::new(snapshot).raw(fields::SNAPSHOT_ID)? {
        Bson::ObjectId(oid) => Some(*oid),
        Bson::String(raw) => match ObjectId::parse_str(raw) {
            Ok(oid) => Some(oid),
            Err(_) => {
                tracing::warn!(author_id = %raw, "skipping invalid author reference");
                None
            }
        },
        other => {
            tracing::warn!(author_id = %other, "skipping invalid author reference");
            None
        }
    }
}

/// Normalize one record field by field, walking each alias chain and
/// applying defaults for whatever is still missing.
pub fn normalize_post(post: &Document, authorship: Authorship<'_>) -> Result<PostView, AppError> {
    let r = FieldReader::new(post);

    let id = r
        .string(fields::ID)
        .ok_or_else(|| AppError::Integrity("Invalid post data: missing _id".into()))?;

    let (authors, primary_author) = match authorship {
        Authorship::Joined(index) => {
            let resolve = |snapshot: &Document| {
                FieldReader::new(snapshot)
                    .object_id(fields::SNAPSHOT_ID)
                    .and_then(|author_id| index.get(&author_id))
                    .cloned()
            };
            let authors = r
                .documents(fields::AUTHORS)
                .into_iter()
                .filter_map(resolve)
                .collect();
            let primary = r
                .document(fields::PRIMARY_AUTHOR)
                .and_then(resolve)
                .unwrap_or_else(AuthorSummary::anonymous);
            (authors, primary)
        }
        Authorship::Embedded => {
            let authors = r
                .documents(fields::AUTHORS)
                .into_iter()
                .map(embedded_author)
                .collect();
            let primary = r
                .document(fields::PRIMARY_AUTHOR)
                .map(embedded_author)
                .unwrap_or_else(AuthorSummary::anonymous);
            (authors, primary)
        }
    };

    Ok(PostView {
        id,
        uuid: r.string(fields::UUID),
        title: r.string(fields::TITLE).unwrap_or_default(),
        slug: r.string(fields::SLUG).unwrap_or_default(),
        html: r.string(fields::HTML).unwrap_or_default(),
        plaintext: r.string(fields::PLAINTEXT),
        feature_image: r.string(fields::FEATURE_IMAGE),
        feature_image_alt: r.string(fields::FEATURE_IMAGE_ALT),
        feature_image_caption: r.string(fields::FEATURE_IMAGE_CAPTION),
        featured: r.flag(fields::FEATURED).unwrap_or(false),
        visibility: r
            .string(fields::VISIBILITY)
            .and_then(|v| PostVisibility::from_str_ci(&v))
            .unwrap_or_default(),
        status: r
            .string(fields::STATUS)
            .and_then(|s| PostStatus::from_str_ci(&s))
            .unwrap_or_default(),
        created_at: r.datetime(fields::CREATED_AT),
        updated_at: r.datetime(fields::UPDATED_AT),
        published_at: r.datetime(fields::PUBLISHED_AT),
        custom_excerpt: r.string(fields::CUSTOM_EXCERPT),
        authors,
        primary_author,
        tags: r
            .documents(fields::TAGS)
            .into_iter()
            .map(embedded_tag)
            .collect(),
        primary_tag: r.document(fields::PRIMARY_TAG).map(embedded_tag),
        reading_time: r.int(fields::READING_TIME).unwrap_or(0),
        team_id: r.string(fields::TEAM),
        created_by: r.string(fields::CREATED_BY),
        style_preset: r.string(fields::STYLE_PRESET),
        custom_style: r.string(fields::CUSTOM_STYLE),
        use_custom_style: r.flag(fields::USE_CUSTOM_STYLE).unwrap_or(false),
        blog_prompt: r.string(fields::BLOG_PROMPT),
        seo_keywords: r.strings(fields::SEO_KEYWORDS),
        target_word_count: r
            .int(fields::TARGET_WORD_COUNT)
            .unwrap_or(DEFAULT_TARGET_WORD_COUNT),
        canonical_url: r.string(fields::CANONICAL_URL),
        meta_title: r.string(fields::META_TITLE),
        meta_description: r.string(fields::META_DESCRIPTION),
        email_subject: r.string(fields::EMAIL_SUBJECT),
        custom_template: r.string(fields::CUSTOM_TEMPLATE),
        codeinjection_head: r.string(fields::CODEINJECTION_HEAD),
        codeinjection_foot: r.string(fields::CODEINJECTION_FOOT),
    })
}

fn embedded_author(snapshot: &Document) -> AuthorSummary {
    let r = FieldReader::new(snapshot);
    AuthorSummary {
        id: r.string(fields::SNAPSHOT_ID).unwrap_or_default(),
        name: r.string(fields::NAME).unwrap_or_default(),
        slug: r.string(fields::SLUG).unwrap_or_default(),
        profile_image: r.string(fields::PROFILE_IMAGE),
        cover_image: r.string(fields::COVER_IMAGE),
        bio: r.string(fields::BIO),
        website: r.string(fields::WEBSITE),
        location: r.string(fields::LOCATION),
        facebook: r.string(fields::FACEBOOK),
        twitter: r.string(fields::TWITTER),
        meta_title: r.string(fields::META_TITLE),
        meta_description: r.string(fields::META_DESCRIPTION),
        team_id: r.string(fields::TEAM),
        is_default: r.flag(fields::IS_DEFAULT),
    }
}

fn embedded_tag(snapshot: &Document) -> TagSummary {
    let r = FieldReader::new(snapshot);
    TagSummary {
        id: r.string(fields::SNAPSHOT_ID),
        name: r.string(fields::NAME).unwrap_or_default(),
        slug: r.string(fields::SLUG).unwrap_or_default(),
        description: r.string(fields::DESCRIPTION),
        feature_image: r.string(fields::TAG_FEATURE_IMAGE),
        meta_title: r.string(fields::META_TITLE),
        meta_description: r.string(fields::META_DESCRIPTION),
        visibility: r
            .string(fields::VISIBILITY)
            .and_then(|v| TagVisibility::from_str_ci(&v))
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::author_repository::MockAuthorRepository;
    use bson::doc;

    fn tenant() -> TenantId {
        TenantId::new(ObjectId::new())
    }

    fn author_record(id: ObjectId, name: &str, slug: &str, team: TenantId) -> AuthorRecord {
        bson::from_document(doc! {
            "_id": id,
            "name": name,
            "slug": slug,
            "bio": format!("{name} writes here"),
            "team_id": team.object_id(),
        })
        .unwrap()
    }

    fn post(title: &str) -> Document {
        doc! { "_id": ObjectId::new(), "title": title, "slug": title.to_lowercase() }
    }

    #[tokio::test]
    async fn test_posts_without_authors_get_placeholder() {
        let mut repo = MockAuthorRepository::new();
        repo.expect_find_many().times(0);

        let posts = vec![post("One"), post("Two"), post("Three")];
        let views = assemble_page(&repo, tenant(), &posts).await.unwrap();

        assert_eq!(views.len(), 3);
        for view in &views {
            assert_eq!(view.primary_author, AuthorSummary::anonymous());
            assert!(view.authors.is_empty());
        }
    }

    #[tokio::test]
    async fn test_primary_author_resolves_through_join() {
        let team = tenant();
        let author_id = ObjectId::new();
        let record = author_record(author_id, "Ada", "ada", team);
        let expected = AuthorSummary::from(&record);

        let mut repo = MockAuthorRepository::new();
        repo.expect_find_many()
            .withf(move |t, ids| *t == team && ids == [author_id])
            .times(1)
            .returning(move |_, _| Ok(vec![record.clone()]));

        let mut p = post("Hello");
        p.insert("primary_author", doc! { "id": author_id.to_hex(), "name": "stale name" });
        p.insert("authors", vec![Bson::Document(doc! { "id": author_id.to_hex() })]);

        let views = assemble_page(&repo, team, &[p]).await.unwrap();
        assert_eq!(views[0].primary_author, expected);
        assert_eq!(views[0].authors, vec![expected]);
    }

    #[tokio::test]
    async fn test_shared_author_is_fetched_once() {
        let team = tenant();
        let author_id = ObjectId::new();
        let record = author_record(author_id, "Ada", "ada", team);

        let mut repo = MockAuthorRepository::new();
        repo.expect_find_many()
            .withf(|_, ids| ids.len() == 1)
            .times(1)
            .returning(move |_, _| Ok(vec![record.clone()]));

        let mut first = post("First");
        first.insert("primary_author", doc! { "id": author_id.to_hex() });
        let mut second = post("Second");
        second.insert("primary_author", doc! { "id": author_id });
        second.insert("authors", vec![Bson::Document(doc! { "id": author_id.to_hex() })]);

        let views = assemble_page(&repo, team, &[first, second]).await.unwrap();
        assert_eq!(views[0].primary_author.slug, "ada");
        assert_eq!(views[1].primary_author.slug, "ada");
    }

    #[tokio::test]
    async fn test_unresolved_references() {
        let team = tenant();
        let known = ObjectId::new();
        let missing = ObjectId::new();
        let record = author_record(known, "Grace", "grace", team);

        let mut repo = MockAuthorRepository::new();
        repo.expect_find_many()
            .withf(move |_, ids| ids.len() == 2 && ids.contains(&known) && ids.contains(&missing))
            .times(1)
            .returning(move |_, _| Ok(vec![record.clone()]));

        let mut p = post("Mixed");
        p.insert("primary_author", doc! { "id": missing.to_hex() });
        p.insert(
            "authors",
            vec![
                Bson::Document(doc! { "id": missing.to_hex() }),
                Bson::Document(doc! { "id": known.to_hex() }),
            ],
        );

        let views = assemble_page(&repo, team, &[p]).await.unwrap();
        assert!(views[0].primary_author.is_anonymous());
        assert_eq!(views[0].authors.len(), 1);
        assert_eq!(views[0].authors[0].slug, "grace");
    }

    #[tokio::test]
    async fn test_invalid_reference_is_skipped() {
        let mut repo = MockAuthorRepository::new();
        repo.expect_find_many().times(0);

        let mut p = post("Migrated");
        p.insert("primary_author", doc! { "id": "default-author", "name": "Default Author" });
        p.insert("authors", vec![Bson::Document(doc! { "id": "default-author" })]);

        let views = assemble_page(&repo, tenant(), &[p]).await.unwrap();
        assert!(views[0].primary_author.is_anonymous());
        assert!(views[0].authors.is_empty());
    }

    #[tokio::test]
    async fn test_author_lookup_failure_fails_the_page() {
        let mut repo = MockAuthorRepository::new();
        repo.expect_find_many()
            .returning(|_, _| Err(AppError::Database("primary stepped down".into())));

        let mut p = post("Doomed");
        p.insert("primary_author", doc! { "id": ObjectId::new().to_hex() });

        let result = assemble_page(&repo, tenant(), &[p]).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[test]
    fn test_legacy_fields_are_normalized() {
        let team = ObjectId::new();
        let creator = ObjectId::new();
        let created = bson::DateTime::from_millis(1_600_000_000_000);
        let p = doc! {
            "_id": ObjectId::new(),
            "title": "Legacy",
            "slug": "legacy",
            "content": "<p>old body</p>",
            "cover_image": "cover.jpg",
            "preview": "teaser",
            "read_time": 6,
            "team": team,
            "createdBy": creator,
            "createdAt": created,
            "stylePreset": "casual",
            "useCustomStyle": true,
            "blogPrompt": "write about rust",
            "seoKeywords": ["rust", "async"],
            "targetWordCount": 1500,
        };

        let view = assemble_one(&p).unwrap();
        assert_eq!(view.html, "<p>old body</p>");
        assert_eq!(view.feature_image.as_deref(), Some("cover.jpg"));
        assert_eq!(view.custom_excerpt.as_deref(), Some("teaser"));
        assert_eq!(view.reading_time, 6);
        assert_eq!(view.team_id, Some(team.to_hex()));
        assert_eq!(view.created_by, Some(creator.to_hex()));
        assert_eq!(view.created_at, Some(created.to_chrono()));
        assert_eq!(view.published_at, Some(created.to_chrono()));
        assert_eq!(view.style_preset.as_deref(), Some("casual"));
        assert!(view.use_custom_style);
        assert_eq!(view.blog_prompt.as_deref(), Some("write about rust"));
        assert_eq!(view.seo_keywords, vec!["rust", "async"]);
        assert_eq!(view.target_word_count, 1500);
    }

    #[test]
    fn test_canonical_fields_win_over_legacy() {
        let p = doc! {
            "_id": ObjectId::new(),
            "html": "<p>new</p>",
            "content": "<p>old</p>",
            "reading_time": 3,
            "read_time": 9,
        };
        let view = assemble_one(&p).unwrap();
        assert_eq!(view.html, "<p>new</p>");
        assert_eq!(view.reading_time, 3);
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let view = assemble_one(&doc! { "_id": ObjectId::new() }).unwrap();
        assert_eq!(view.visibility, PostVisibility::Public);
        assert_eq!(view.status, PostStatus::Published);
        assert!(!view.featured);
        assert!(!view.use_custom_style);
        assert_eq!(view.target_word_count, 1000);
        assert_eq!(view.reading_time, 0);
        assert!(view.tags.is_empty());
        assert!(view.seo_keywords.is_empty());
        assert!(view.primary_author.is_anonymous());
        assert!(view.authors.is_empty());
        assert_eq!(view.html, "");
    }

    #[test]
    fn test_explicit_enums_are_kept() {
        let view = assemble_one(&doc! {
            "_id": ObjectId::new(),
            "visibility": "paid",
            "status": "draft",
            "featured": true,
        })
        .unwrap();
        assert_eq!(view.visibility, PostVisibility::Paid);
        assert_eq!(view.status, PostStatus::Draft);
        assert!(view.featured);
    }

    #[test]
    fn test_embedded_authorship_passes_snapshots_through() {
        let p = doc! {
            "_id": ObjectId::new(),
            "primary_author": { "id": "a1", "name": "Snap Shot", "slug": "snap", "bio": "" },
            "authors": [{ "id": "a1", "name": "Snap Shot", "slug": "snap" }, "junk"],
            "tags": [{ "id": "t1", "name": "Rust", "slug": "rust", "visibility": "internal" }],
            "primary_tag": { "name": "Rust", "slug": "rust" },
        };

        let view = assemble_one(&p).unwrap();
        assert_eq!(view.primary_author.id, "a1");
        assert_eq!(view.primary_author.name, "Snap Shot");
        assert!(view.primary_author.bio.is_none());
        assert_eq!(view.authors.len(), 1);
        assert_eq!(view.tags.len(), 1);
        assert_eq!(view.tags[0].visibility, TagVisibility::Internal);
        assert_eq!(view.primary_tag.as_ref().map(|t| t.slug.as_str()), Some("rust"));
    }

    #[test]
    fn test_missing_id_is_integrity_error() {
        let result = assemble_one(&doc! { "title": "No id" });
        assert!(matches!(result, Err(AppError::Integrity(_))));
    }
}
