use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use dreamweek_core::WeekId;
use dreamweek_core::calendar::current_iso_week;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StreakQuery {
    /// First day weeks count from; every stored week when absent.
    pub start: Option<jiff::civil::Date>,
    pub week: Option<WeekId>,
}

#[derive(Debug, Serialize)]
pub struct StreakView {
    pub week_id: WeekId,
    pub streak: u32,
}

/// GET /users/{user}/streak
pub async fn get_streak(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<StreakQuery>,
) -> Result<Json<StreakView>, ApiError> {
    let week_id = query.week.unwrap_or_else(current_iso_week);
    let start = query.start.unwrap_or(jiff::civil::Date::MIN);
    let streak = state.scheduler.streak(&user_id, start, week_id).await?;
    Ok(Json(StreakView { week_id, streak }))
}
