use axum::Json;
use axum::extract::{Path, Query, State};

use dreamweek_core::models::dream::DreamDocument;
use dreamweek_core::models::goal::Goal;
use dreamweek_scheduler::{GoalAdded, NewGoal, RepairReport};

use crate::error::ApiError;
use crate::routes::week::WeekQuery;
use crate::state::AppState;

/// GET /users/{user}/dreams
pub async fn list_dreams(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<DreamDocument>, ApiError> {
    let doc = state.scheduler.store().get_dreams(&user_id).await?;
    Ok(Json(doc))
}

/// POST /users/{user}/dreams/{dream}/goals
pub async fn add_goal(
    State(state): State<AppState>,
    Path((user_id, dream_id)): Path<(String, String)>,
    Query(query): Query<WeekQuery>,
    Json(new): Json<NewGoal>,
) -> Result<Json<GoalAdded>, ApiError> {
    let added = state
        .scheduler
        .add_dream_goal(&user_id, query.week_id(), &dream_id, new, jiff::Timestamp::now())
        .await?;
    Ok(Json(added))
}

/// POST /users/{user}/dreams/{dream}/goals/{goal}/deactivate
pub async fn deactivate_goal(
    State(state): State<AppState>,
    Path((user_id, dream_id, goal_id)): Path<(String, String, String)>,
) -> Result<Json<Goal>, ApiError> {
    let goal = state
        .scheduler
        .deactivate_goal(&user_id, &dream_id, &goal_id, jiff::Timestamp::now())
        .await?;
    Ok(Json(goal))
}

/// POST /users/{user}/dreams/{dream}/goals/{goal}/reactivate
pub async fn reactivate_goal(
    State(state): State<AppState>,
    Path((user_id, dream_id, goal_id)): Path<(String, String, String)>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<Goal>, ApiError> {
    let goal = state
        .scheduler
        .reactivate_goal(&user_id, query.week_id(), &dream_id, &goal_id, jiff::Timestamp::now())
        .await?;
    Ok(Json(goal))
}

/// POST /users/{user}/repair
pub async fn repair(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<RepairReport>, ApiError> {
    let report = state.scheduler.repair_legacy_templates(&user_id).await?;
    Ok(Json(report))
}
