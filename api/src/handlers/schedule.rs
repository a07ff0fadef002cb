//! Notification schedule endpoints
//!
//! GET returns the active schedule; POST persists a new one to the
//! settings file and swaps in a fresh settings snapshot.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use shared::settings::Schedule;
use shared::Settings;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScheduleUpdate {
    pub schedule: Schedule,
}

pub async fn get_schedule(State(state): State<Arc<AppState>>) -> Json<Schedule> {
    Json(state.settings().schedule.clone())
}

pub async fn update_schedule(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ScheduleUpdate>,
) -> Result<Json<Value>, ApiError> {
    // the file is authoritative, so edit it rather than the snapshot
    let mut settings = Settings::load(state.settings_path());
    settings.schedule = update.schedule;
    settings.save(state.settings_path())?;

    let fresh = state.reload();
    Ok(Json(json!({ "success": true, "schedule": fresh.schedule })))
}
