//! Application configuration.
//!
//! Built-in defaults, then an optional config file, then `LECTERN_*`
//! environment variables. The unprefixed `MONGODB_URI`, `MONGODB_DATABASE`,
//! `PORT` and `FRONTEND_URL` variables are honoured as well, below the
//! prefixed ones.

use std::collections::HashMap;

use anyhow::Context;
use serde::Deserialize;

use crate::pagination::{PageSettings, DEFAULT_LIMIT};

pub const ENV_PREFIX: &str = "LECTERN";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Listen address, e.g. "0.0.0.0:3001".
    pub bind_addr: String,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    /// Prefix under which the content routes are mounted.
    pub api_prefix: String,
    /// Origin allowed by the CORS layer.
    pub cors_origin: String,
    pub default_page_size: u64,
    /// Optional cap on `limit`. Unset means unbounded.
    #[serde(default)]
    pub max_page_size: Option<u64>,
}

impl Config {
    /// Load configuration from the process environment and, when given, a
    /// config file (any format the `config` crate recognises by extension).
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        Self::from_sources(path, std::env::vars().collect())
    }

    /// Load configuration from an explicit variable map instead of the
    /// process environment.
    pub fn from_sources(path: Option<&str>, vars: HashMap<String, String>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("bind_addr", "0.0.0.0:3001")?
            .set_default("mongodb_uri", "mongodb://localhost:27017")?
            .set_default("mongodb_database", "blog")?
            .set_default("api_prefix", "/api/content/v1")?
            .set_default("cors_origin", "http://localhost:3000")?
            .set_default("default_page_size", DEFAULT_LIMIT as i64)?;

        if let Some(uri) = vars.get("MONGODB_URI") {
            builder = builder.set_default("mongodb_uri", uri.as_str())?;
        }
        if let Some(db) = vars.get("MONGODB_DATABASE") {
            builder = builder.set_default("mongodb_database", db.as_str())?;
        }
        if let Some(origin) = vars.get("FRONTEND_URL") {
            builder = builder.set_default("cors_origin", origin.as_str())?;
        }
        if let Some(port) = vars.get("PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT value '{port}'"))?;
            builder = builder.set_default("bind_addr", format!("0.0.0.0:{port}"))?;
        }

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.into_iter().collect())),
            )
            .build()
            .context("failed to assemble configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.default_page_size == 0 {
            anyhow::bail!("default_page_size must be at least 1");
        }
        if self.max_page_size == Some(0) {
            anyhow::bail!("max_page_size must be at least 1 when set");
        }
        if !self.api_prefix.starts_with('/') || self.api_prefix.ends_with('/') {
            anyhow::bail!(
                "api_prefix must start with '/' and not end with one, got '{}'",
                self.api_prefix
            );
        }
        Ok(())
    }

    pub fn page_settings(&self) -> PageSettings {
        PageSettings {
            default_limit: self.default_page_size,
            max_limit: self.max_page_size,
        }
    }

    /// Connection string with any password masked, for logging.
    pub fn redacted_mongodb_uri(&self) -> String {
        match url::Url::parse(&self.mongodb_uri) {
            Ok(mut parsed) if parsed.password().is_some() => {
                let _ = parsed.set_password(Some("***"));
                parsed.to_string()
            }
            Ok(_) => self.mongodb_uri.clone(),
            Err(_) => "<unparseable uri>".to_string(),
        }
    }
}
