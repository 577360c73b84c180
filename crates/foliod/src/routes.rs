//! API routes for foliod
//!
//! Public:
//! - GET /api/health
//! - GET /api/experience/levels
//! - GET /api/experience/levels/:years
//! - GET /api/experience/current
//! - GET /api/experience/progression?years=
//! - GET /api/experience/timeline
//!
//! Admin (bearer token):
//! - PUT /api/experience/levels
//! - GET /api/settings, GET /api/settings/:key, PUT /api/settings/:key

use crate::error::ApiError;
use crate::middleware::require_admin;
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use folio_shared::{
    candidate, estimate, replace_levels, resolve, start_date_or, ExperienceSnapshot,
    LevelCandidate, LevelRange, LevelStore, LevelTable, Progression, Setting, SettingKind,
    SettingsStore, TimelineEntry,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

type AppStateArc = Arc<AppState>;

/// Message shown when no level covers a duration
pub const NO_LEVEL_MESSAGE: &str = "No experience level configured for this duration";

// ============================================================================
// Health Routes
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub uptime_seconds: u64,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/api/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Folio API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

// ============================================================================
// Experience Routes
// ============================================================================

/// Body of PUT /api/experience/levels
///
/// Entries are taken as unchecked candidates so that missing or mistyped fields
/// come back in the itemized `errors` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateLevelsRequest {
    #[serde(default)]
    pub levels: Vec<LevelCandidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateLevelsResponse {
    pub message: String,
    pub updated: usize,
}

#[derive(Debug, Deserialize)]
pub struct ProgressionQuery {
    pub years: Option<String>,
}

pub fn experience_routes(state: &AppStateArc) -> Router<AppStateArc> {
    let admin = Router::new()
        .route("/api/experience/levels", put(update_levels))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    Router::new()
        .route("/api/experience/levels", get(list_levels))
        .route("/api/experience/levels/:years", get(level_by_years))
        .route("/api/experience/current", get(current_experience))
        .route("/api/experience/progression", get(progression))
        .route("/api/experience/timeline", get(timeline))
        .merge(admin)
}

/// Non-negative finite years, or 400
fn parse_years(raw: &str) -> Result<f64, ApiError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|years| years.is_finite() && *years >= 0.0)
        .ok_or_else(|| ApiError::BadRequest("Invalid years parameter".to_string()))
}

async fn load_table(state: &AppState) -> Result<LevelTable, ApiError> {
    let db = state.db.lock().await;
    Ok(db.load_table()?)
}

/// Active levels sorted by lower bound
async fn list_levels(State(state): State<AppStateArc>) -> Result<Json<Vec<LevelRange>>, ApiError> {
    let table = load_table(&state).await?;
    Ok(Json(table.normalized().to_vec()))
}

async fn level_by_years(
    State(state): State<AppStateArc>,
    Path(raw): Path<String>,
) -> Result<Json<LevelRange>, ApiError> {
    let years = parse_years(&raw)?;
    let table = load_table(&state).await?;

    resolve(years, &table)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NO_LEVEL_MESSAGE.to_string()))
}

async fn current_experience(
    State(state): State<AppStateArc>,
) -> Result<Json<ExperienceSnapshot>, ApiError> {
    let (table, start_date) = {
        let db = state.db.lock().await;
        let table = db.load_table()?;
        let start_date = start_date_or(&*db, state.engine.start_date())?;
        (table, start_date)
    };

    let snapshot = state.engine.with_start_date(start_date).snapshot(&table);

    if state.config.experience.track_analytics {
        let data = json!({
            "years": snapshot.years,
            "level": snapshot.level_label(),
            "timestamp": state.engine.now(),
        });
        let db = state.db.lock().await;
        if let Err(e) = db.record_event("experience", "experience_view", data) {
            warn!("  Failed to record experience_view: {:#}", e);
        }
    }

    Ok(Json(snapshot))
}

async fn progression(
    State(state): State<AppStateArc>,
    Query(query): Query<ProgressionQuery>,
) -> Result<Json<Progression>, ApiError> {
    let raw = query
        .years
        .ok_or_else(|| ApiError::BadRequest("Missing years parameter".to_string()))?;
    let years = parse_years(&raw)?;
    let table = load_table(&state).await?;
    Ok(Json(estimate(years, &table)))
}

async fn timeline(State(state): State<AppStateArc>) -> Result<Json<Vec<TimelineEntry>>, ApiError> {
    let (table, start_date) = {
        let db = state.db.lock().await;
        let table = db.load_table()?;
        let start_date = start_date_or(&*db, state.engine.start_date())?;
        (table, start_date)
    };

    Ok(Json(state.engine.with_start_date(start_date).timeline(&table)))
}

async fn update_levels(
    State(state): State<AppStateArc>,
    body: Result<Json<UpdateLevelsRequest>, JsonRejection>,
) -> Result<Json<UpdateLevelsResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        ApiError::BadRequest(format!("Levels must be an array of levels: {}", rejection.body_text()))
    })?;

    let levels = candidate::accept(&request.levels)?;

    let db = state.db.lock().await;
    let updated = replace_levels(&*db, &levels)?;
    info!("  Experience levels updated ({} entries)", updated);

    if state.config.experience.track_analytics {
        let data = json!({ "updatedLevels": updated, "updatedBy": "admin" });
        if let Err(e) = db.record_event("admin", "experience_config_update", data) {
            warn!("  Failed to record experience_config_update: {:#}", e);
        }
    }

    Ok(Json(UpdateLevelsResponse {
        message: "Experience levels updated successfully".to_string(),
        updated,
    }))
}

// ============================================================================
// Settings Routes (admin)
// ============================================================================

/// Body of PUT /api/settings/:key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSettingRequest {
    pub value: String,
    #[serde(rename = "type", default)]
    pub kind: Option<SettingKind>,
    #[serde(default)]
    pub description: Option<String>,
}

pub fn settings_routes(state: &AppStateArc) -> Router<AppStateArc> {
    Router::new()
        .route("/api/settings", get(list_settings))
        .route("/api/settings/:key", get(get_setting).put(update_setting))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ))
}

async fn list_settings(State(state): State<AppStateArc>) -> Result<Json<Vec<Setting>>, ApiError> {
    let db = state.db.lock().await;
    Ok(Json(db.list_settings()?))
}

async fn get_setting(
    State(state): State<AppStateArc>,
    Path(key): Path<String>,
) -> Result<Json<Setting>, ApiError> {
    let db = state.db.lock().await;
    db.get_setting(&key)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Setting not found".to_string()))
}

async fn update_setting(
    State(state): State<AppStateArc>,
    Path(key): Path<String>,
    body: Result<Json<UpdateSettingRequest>, JsonRejection>,
) -> Result<Json<Setting>, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    if key == folio_shared::EXPERIENCE_START_KEY {
        folio_shared::years::parse_date(&request.value)?;
    }

    let db = state.db.lock().await;
    // Keep the previous type and description unless the request replaces them
    let previous = db.get_setting(&key)?;
    let setting = Setting {
        key: key.clone(),
        value: request.value,
        kind: request
            .kind
            .or_else(|| previous.as_ref().map(|p| p.kind))
            .unwrap_or_default(),
        description: request
            .description
            .or_else(|| previous.map(|p| p.description))
            .unwrap_or_default(),
        updated_at: None,
    };

    let stored = db.set_setting(&setting)?;
    info!("  Setting {} updated", key);
    Ok(Json(stored))
}
