#![allow(dead_code)]

use std::collections::HashMap;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use bson::oid::ObjectId;
use bson::{doc, Document};
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

use lectern::app::{router, AppState};
use lectern::auth::hashing::hash_api_key;
use lectern::auth::middleware::API_KEY_HEADER;
use lectern::config::Config;

pub const PREFIX: &str = "/api/content/v1";

/// Holds the running MongoDB container and the router wired to it.
///
/// The container is stopped when this struct is dropped.
pub struct TestEnv {
    _mongo: ContainerAsync<Mongo>,
    pub db: mongodb::Database,
    pub router: Router,
}

impl TestEnv {
    pub async fn start() -> Self {
        Self::start_with(HashMap::new()).await
    }

    /// Start with extra configuration variables (e.g. `LECTERN_MAX_PAGE_SIZE`).
    pub async fn start_with(vars: HashMap<String, String>) -> Self {
        let mongo_container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");
        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);
        let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let db = mongo_client.database(&format!("lectern_test_{}", uuid::Uuid::new_v4().simple()));

        let config = Config::from_sources(None, vars).expect("Invalid test configuration");
        let state = AppState::from_database(&db, config.page_settings());
        let router = router(state, &config).expect("Failed to build router");

        Self {
            _mongo: mongo_container,
            db,
            router,
        }
    }

    /// Build an `axum_test::TestServer` that does not expect success by default.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }

    /// `GET {PREFIX}{path}` with the given API key.
    pub async fn get(
        &self,
        server: &axum_test::TestServer,
        path: &str,
        api_key: &str,
    ) -> axum_test::TestResponse {
        server
            .get(&format!("{PREFIX}{path}"))
            .add_header(
                HeaderName::from_static(API_KEY_HEADER),
                HeaderValue::from_str(api_key).expect("Invalid header value"),
            )
            .await
    }

    fn collection(&self, name: &str) -> mongodb::Collection<Document> {
        self.db.collection(name)
    }

    /// Insert a team holding one API key. Returns the team id.
    pub async fn seed_team(&self, name: &str, api_key: &str) -> ObjectId {
        let id = ObjectId::new();
        self.collection("teams")
            .insert_one(doc! {
                "_id": id,
                "name": name,
                "apiKeys": [{ "hash": hash_api_key(api_key), "lastUsed": bson::Bson::Null }],
            })
            .await
            .expect("Failed to seed team");
        id
    }

    pub async fn seed_author(&self, team: ObjectId, name: &str, slug: &str) -> ObjectId {
        let id = ObjectId::new();
        self.collection("authors")
            .insert_one(doc! {
                "_id": id,
                "name": name,
                "slug": slug,
                "bio": format!("{name} writes about things"),
                "team_id": team,
                "isDefault": false,
            })
            .await
            .expect("Failed to seed author");
        id
    }

    pub async fn seed_tag(&self, team: ObjectId, name: &str, slug: &str) -> ObjectId {
        let id = ObjectId::new();
        self.collection("tags")
            .insert_one(doc! {
                "_id": id,
                "name": name,
                "slug": slug,
                "visibility": "public",
                "team_id": team,
            })
            .await
            .expect("Failed to seed tag");
        id
    }

    /// Insert a raw document into any collection.
    pub async fn seed_raw(&self, collection: &str, document: Document) {
        self.collection(collection)
            .insert_one(document)
            .await
            .expect("Failed to seed document");
    }

    /// Insert a post for `team`; `extra` fields are merged over the minimal
    /// record. Returns the post id.
    pub async fn seed_post(&self, team: ObjectId, slug: &str, minutes_ago: i64, extra: Document) -> ObjectId {
        let id = ObjectId::new();
        let created = bson::DateTime::from_millis(
            bson::DateTime::now().timestamp_millis() - minutes_ago * 60_000,
        );
        let mut post = doc! {
            "_id": id,
            "title": format!("Title of {slug}"),
            "slug": slug,
            "html": format!("<p>{slug}</p>"),
            "team_id": team,
            "created_at": created,
        };
        for (key, value) in extra {
            post.insert(key, value);
        }
        self.seed_raw("blogposts", post).await;
        id
    }

    /// Fetch a team document as stored.
    pub async fn team(&self, id: ObjectId) -> Document {
        self.collection("teams")
            .find_one(doc! { "_id": id })
            .await
            .expect("Failed to read team")
            .expect("Team not found")
    }
}
