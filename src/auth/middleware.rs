use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use tokio::task::JoinHandle;

use crate::app::AppState;
use crate::auth::hashing::hash_api_key;
use crate::auth::models::TenantId;
use crate::db::team_repository::TeamRepository;
use crate::error::AppError;

/// Header carrying the raw API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Resolve the tenant owning `api_key`.
///
/// On success the key's last-used timestamp is refreshed in the background;
/// the request never waits on it and a failed refresh is only logged.
pub async fn resolve_tenant(
    teams: Arc<dyn TeamRepository>,
    api_key: Option<&str>,
) -> Result<TenantId, AppError> {
    let (tenant, key_hash) = authenticate(teams.as_ref(), api_key).await?;
    record_key_use(teams, tenant, key_hash);
    Ok(tenant)
}

/// Look up the team holding `api_key`. Returns its tenant and the key hash.
pub async fn authenticate(
    teams: &dyn TeamRepository,
    api_key: Option<&str>,
) -> Result<(TenantId, String), AppError> {
    let api_key = match api_key {
        Some(key) if !key.is_empty() => key,
        _ => {
            tracing::debug!("request without API key");
            return Err(AppError::Auth("API key is required".into()));
        }
    };

    let key_hash = hash_api_key(api_key);
    let team = teams.find_by_key_hash(&key_hash).await.map_err(|e| {
        tracing::error!("API key lookup failed: {e}");
        AppError::Internal(e.to_string()).during("Internal server error")
    })?;

    match team {
        Some(team) => Ok((team.tenant_id(), key_hash)),
        None => {
            tracing::debug!("unknown API key");
            Err(AppError::Auth("Invalid API key".into()))
        }
    }
}

/// Fire-and-forget update of the key's `lastUsed` timestamp.
pub fn record_key_use(
    teams: Arc<dyn TeamRepository>,
    tenant: TenantId,
    key_hash: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = teams.touch_key(tenant, &key_hash, Utc::now()).await {
            tracing::warn!(%tenant, "failed to record API key use: {e}");
        }
    })
}

/// Axum middleware guarding the content routes.
///
/// Inserts the resolved [`TenantId`] into the request extensions.
pub async fn require_api_key(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let tenant = resolve_tenant(state.teams.clone(), api_key.as_deref()).await?;
    request.extensions_mut().insert(tenant);

    Ok(next.run(request).await)
}
