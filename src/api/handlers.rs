//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{CacheInfo, FileCache, Tag};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    BulkDeleteResponse, DeleteResponse, GetResponse, HasResponse, HealthResponse, KeysResponse,
    PrefixRequest, SetRequest, SetResponse, StatsResponse, TagsRequest,
};

/// Application state shared across all handlers.
///
/// The cache synchronizes internally, so handlers share it through an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<FileCache>,
}

impl AppState {
    pub fn new(cache: FileCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Opens the cache described by the configuration.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let cache = FileCache::with_options(config.cache_options()).await?;
        Ok(Self::new(cache))
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.cache.try_set(&req.key, req.value, req.ttl).await?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, &value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /has/:key
pub async fn has_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<HasResponse> {
    let exists = state.cache.has(&key).await;
    Json(HasResponse { key, exists })
}

/// Handler for DELETE /del/:key
///
/// Succeeds for absent keys too. Keys literally named `prefix` or `tags`
/// resolve to the bulk routes instead, which only accept POST; remove those
/// with a prefix request.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.cache.try_del(&key).await?;
    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for POST /del/prefix
pub async fn delete_prefix_handler(
    State(state): State<AppState>,
    Json(req): Json<PrefixRequest>,
) -> Result<Json<BulkDeleteResponse>> {
    let removed = state.cache.try_del_prefix(&req.prefixes).await?;
    Ok(Json(BulkDeleteResponse { removed }))
}

/// Handler for POST /del/tags
pub async fn delete_tags_handler(
    State(state): State<AppState>,
    Json(req): Json<TagsRequest>,
) -> Result<Json<BulkDeleteResponse>> {
    let removed = state.cache.try_del_tags(req.tags.into_iter().map(Tag::from)).await?;
    Ok(Json(BulkDeleteResponse { removed }))
}

/// Handler for DELETE /clear
pub async fn clear_handler(State(state): State<AppState>) -> Result<Json<BulkDeleteResponse>> {
    let removed = state.cache.try_clear().await?;
    Ok(Json(BulkDeleteResponse { removed }))
}

/// Handler for GET /keys
pub async fn keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    Json(KeysResponse::new(state.cache.keys().await))
}

/// Handler for GET /info/:key
pub async fn info_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<CacheInfo>> {
    state
        .cache
        .info(&key)
        .await
        .map(Json)
        .ok_or(CacheError::NotFound(key))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
