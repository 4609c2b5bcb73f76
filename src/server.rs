use crate::error::{InsightError, RiotApiError, SummaryError};
use crate::insight::{Insight, InsightClient};
use crate::player_summary::{PlayerSummary, fetch_player_summary};
use crate::riot_api::{DEFAULT_RECENT_MATCHES, RiotClient};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub riot: Arc<RiotClient>,
    pub insights: Option<Arc<InsightClient>>,
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Unavailable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal Server Error: {}", msg),
            ),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<RiotApiError> for ApiError {
    fn from(err: RiotApiError) -> Self {
        match err {
            RiotApiError::Decode { .. } => ApiError::Internal(err.to_string()),
            _ => ApiError::NotFound(err.to_string()),
        }
    }
}

impl From<SummaryError> for ApiError {
    fn from(err: SummaryError) -> Self {
        match err {
            SummaryError::Upstream(inner) => inner.into(),
            SummaryError::PlayerNotFound { .. } => ApiError::NotFound(err.to_string()),
            other => {
                error!("player summary failed: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<InsightError> for ApiError {
    fn from(err: InsightError) -> Self {
        error!("insight generation failed: {}", err);
        ApiError::Internal(err.to_string())
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/puuid/{game_name}/{tag_line}", get(puuid))
        .route("/recent-matches/{puuid}", get(recent_matches))
        .route("/match-details/{match_id}", get(match_details))
        .route("/match-timeline/{match_id}", get(match_timeline))
        .route("/player-summary/{puuid}/{match_id}", get(player_summary))
        .route("/player-insights/{puuid}/{match_id}", get(player_insights))
        .with_state(state)
}

pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "LOL Match Analyzer" }))
}

async fn puuid(
    State(state): State<AppState>,
    Path((game_name, tag_line)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let puuid = state.riot.get_puuid(&game_name, &tag_line).await?;
    Ok(Json(json!({ "puuid": puuid })))
}

#[derive(Debug, Deserialize)]
struct RecentMatchesParams {
    count: Option<usize>,
}

async fn recent_matches(
    State(state): State<AppState>,
    Path(puuid): Path<String>,
    Query(params): Query<RecentMatchesParams>,
) -> Result<Json<Value>, ApiError> {
    let count = params.count.unwrap_or(DEFAULT_RECENT_MATCHES);
    let matches = state.riot.get_match_ids_by_puuid(&puuid, count).await?;
    Ok(Json(json!({ "matches": matches })))
}

async fn match_details(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let details = state.riot.get_match_json(&match_id).await?;
    Ok(Json(json!({ "match_details": details })))
}

async fn match_timeline(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let timeline = state.riot.get_match_timeline_json(&match_id).await?;
    Ok(Json(json!({ "match_timeline": timeline })))
}

async fn player_summary(
    State(state): State<AppState>,
    Path((puuid, match_id)): Path<(String, String)>,
) -> Result<Json<PlayerSummary>, ApiError> {
    let summary = fetch_player_summary(&state.riot, &puuid, &match_id).await?;
    Ok(Json(summary))
}

#[derive(Debug, Deserialize)]
struct InsightParams {
    message: Option<String>,
}

async fn player_insights(
    State(state): State<AppState>,
    Path((puuid, match_id)): Path<(String, String)>,
    Query(params): Query<InsightParams>,
) -> Result<Json<Insight>, ApiError> {
    let Some(insights) = state.insights.clone() else {
        return Err(ApiError::Unavailable(
            "Insight generation is not configured".to_string(),
        ));
    };

    let summary = fetch_player_summary(&state.riot, &puuid, &match_id).await?;
    let insight = insights.generate(&summary, params.message.as_deref()).await?;
    Ok(Json(insight))
}
