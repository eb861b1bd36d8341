//! # Bento Server
//!
//! Reference HTTP surface over the in-memory store:
//!
//! - `GET /{slug}`: public read-only page, cached per path and viewport
//! - `/api/...`: the block API the synchronizer's backend talks to
//! - `POST /api/revalidate`: cache invalidation by public path

mod cache;
mod error;
mod routes;

pub use cache::PageCache;
pub use error::ServerError;

use axum::routing::{get, patch, post, put};
use axum::Router;
use bento_model::{Block, GridMetrics, Page, Viewport};
use bento_sync::MemoryBackend;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub struct AppState {
    pub backend: Arc<MemoryBackend>,
    pub cache: Arc<PageCache>,
    pub desktop: GridMetrics,
    pub mobile: GridMetrics,
}

impl AppState {
    pub fn new(backend: Arc<MemoryBackend>) -> Self {
        Self {
            backend,
            cache: Arc::new(PageCache::new()),
            desktop: GridMetrics::default(),
            mobile: GridMetrics {
                container_width: 360.0,
                ..GridMetrics::default()
            },
        }
    }

    pub fn metrics_for(&self, viewport: Viewport) -> &GridMetrics {
        match viewport {
            Viewport::Desktop => &self.desktop,
            Viewport::Mobile => &self.mobile,
        }
    }
}

/// Pages and blocks to preload into the store
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Seed {
    pub fn load_into(self, backend: &MemoryBackend) {
        for page in self.pages {
            backend.insert_page(page);
        }
        backend.insert_blocks(self.blocks);
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/api/pages/:page_id/blocks",
            get(routes::list_blocks).post(routes::create_block),
        )
        .route("/api/pages/:page_id", patch(routes::update_page))
        .route(
            "/api/blocks/:id",
            patch(routes::update_block).delete(routes::delete_block),
        )
        .route("/api/order", put(routes::reorder_blocks))
        .route("/api/revalidate", post(routes::revalidate))
        .route("/:slug", get(routes::public_page))
        .with_state(state)
        .layer(CorsLayer::permissive())
}
