//! The `trailhead serve` command: a read-only JSON API over the roadmap
//! history store, for browser frontends.
//!
//! Routes:
//! - `GET /api/roadmaps?user_id=<uuid>` -- history listing, newest first.
//! - `GET /api/roadmaps/{id}` -- one document plus its freshly parsed
//!   section tree.

use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tracing::info;
use uuid::Uuid;

use trailhead_core::roadmap::{ParsedSection, parse};
use trailhead_db::models::Roadmap;
use trailhead_db::queries::roadmaps;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A document together with its display tree, rebuilt on every request.
#[derive(Debug, Serialize)]
pub struct RoadmapDetail {
    #[serde(flatten)]
    pub document: Roadmap,
    pub sections: Vec<ParsedSection>,
}

#[derive(Debug, Deserialize)]
struct HistoryParams {
    user_id: Uuid,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn list_roadmaps(
    State(pool): State<PgPool>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<Roadmap>>, AppError> {
    let rows = roadmaps::list_for_user(&pool, params.user_id)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(rows))
}

async fn get_roadmap(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoadmapDetail>, AppError> {
    let row = roadmaps::get_roadmap(&pool, id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(format!("roadmap {id} not found")))?;

    let sections = parse(&row.roadmap);
    Ok(Json(RoadmapDetail {
        document: row,
        sections,
    }))
}

// ---------------------------------------------------------------------------
// Router and entry point
// ---------------------------------------------------------------------------

/// Build the API router over a pool.
pub fn router(pool: PgPool) -> Router {
    Router::new()
        .route("/api/roadmaps", get(list_roadmaps))
        .route("/api/roadmaps/{id}", get(get_roadmap))
        .layer(CorsLayer::permissive())
        .with_state(pool)
}

/// Serve the API on localhost at the given port until interrupted.
pub async fn cmd_serve(pool: PgPool, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "serving roadmap API");
    axum::serve(listener, router(pool)).await?;
    Ok(())
}
