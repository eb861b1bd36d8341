use crate::error::ServerError;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use bento_model::{Block, BlockData, BlockId, BlockType, PageId, PagePatch, PositionUpdate, Viewport};
use bento_renderer::{page_document, render_page, HtmlOptions, Mode};
use bento_sync::{BlockBackend, CacheInvalidator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Public pages
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct PublicQuery {
    #[serde(default)]
    viewport: Option<Viewport>,
}

/// Read-only page at `/{slug}`, served from cache when possible
pub async fn public_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<PublicQuery>,
) -> Result<Html<String>, ServerError> {
    let viewport = query.viewport.unwrap_or_default();
    let page = state
        .backend
        .page_by_slug(&slug)
        .ok_or_else(|| ServerError::PageNotFound(slug.clone()))?;
    let path = page.public_path();

    if let Some(html) = state.cache.get(&path, viewport) {
        tracing::debug!(path = %path, viewport = viewport.as_str(), "cache hit");
        return Ok(Html(html));
    }
    let generation = state.cache.generation(&path);

    let blocks = state.backend.fetch_blocks(&page.id).await?;
    let rendered = render_page(
        &page,
        &blocks,
        viewport,
        Mode::PublicReadOnly,
        state.metrics_for(viewport),
    );
    let html = page_document(&page, &rendered, &HtmlOptions::default());
    if !state.cache.insert(&path, viewport, generation, html.clone()) {
        tracing::debug!(path = %path, "page invalidated during render, not cached");
    }

    tracing::info!(path = %path, viewport = viewport.as_str(), blocks = blocks.len(), "page rendered");
    Ok(Html(html))
}

pub async fn health() -> &'static str {
    "ok"
}

// ============================================================================
// Block API
// ============================================================================

pub async fn list_blocks(
    State(state): State<Arc<AppState>>,
    Path(page_id): Path<String>,
) -> Result<Json<Vec<Block>>, ServerError> {
    let blocks = state.backend.fetch_blocks(&PageId::new(page_id)).await?;
    Ok(Json(blocks))
}

#[derive(Debug, Deserialize)]
pub struct CreateBlockRequest {
    #[serde(rename = "type")]
    block_type: BlockType,
    #[serde(default)]
    data: BlockData,
}

pub async fn create_block(
    State(state): State<Arc<AppState>>,
    Path(page_id): Path<String>,
    Json(request): Json<CreateBlockRequest>,
) -> Result<(StatusCode, Json<Block>), ServerError> {
    let block = state
        .backend
        .create_block(&PageId::new(page_id), request.block_type, request.data)
        .await?;
    tracing::info!(block = %block.id, "block created");
    Ok((StatusCode::CREATED, Json(block)))
}

pub async fn update_block(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<BlockData>,
) -> Result<StatusCode, ServerError> {
    state.backend.update_block(&BlockId::new(id), &patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_block(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.backend.delete_block(&BlockId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_blocks(
    State(state): State<Arc<AppState>>,
    Json(positions): Json<Vec<PositionUpdate>>,
) -> Result<StatusCode, ServerError> {
    state.backend.reorder_blocks(&positions).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_page(
    State(state): State<Arc<AppState>>,
    Path(page_id): Path<String>,
    Json(patch): Json<PagePatch>,
) -> Result<StatusCode, ServerError> {
    state.backend.update_page(&PageId::new(page_id), &patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct RevalidateRequest {
    path: String,
}

#[derive(Debug, Serialize)]
pub struct RevalidateResponse {
    revalidated: bool,
}

/// Drop cached HTML for a public path
pub async fn revalidate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RevalidateRequest>,
) -> impl IntoResponse {
    match state.cache.invalidate(&request.path).await {
        Ok(()) => (StatusCode::OK, Json(RevalidateResponse { revalidated: true })),
        Err(e) => {
            tracing::warn!(error = %e, path = %request.path, "revalidation failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(RevalidateResponse { revalidated: false }),
            )
        }
    }
}
