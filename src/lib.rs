pub mod app;
pub mod config;
pub mod error;
pub mod pagination;
pub mod reader;
pub mod auth {
    pub mod hashing;
    pub mod middleware;
    pub mod models;
}
pub mod db {
    pub mod author_repository;
    pub mod models;
    pub mod post_repository;
    pub mod tag_repository;
    pub mod team_repository;
}
pub mod models {
    pub mod author;
    pub mod post;
    pub mod tag;
}
pub mod assembler {
    pub mod fields;
    pub mod loader;
    pub mod post;
}
pub mod api {
    pub mod authors;
    pub mod envelope;
    pub mod errors;
    pub mod health;
    pub mod posts;
    pub mod tags;
}
