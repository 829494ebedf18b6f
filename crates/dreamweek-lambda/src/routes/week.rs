use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use dreamweek_core::WeekId;
use dreamweek_core::calendar::current_iso_week;
use dreamweek_core::models::instance::WeekInstance;
use dreamweek_scheduler::local::BoardHandle;
use dreamweek_scheduler::{CompletionOutcome, SkipOutcome, WeekTarget, WriteOutcome};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    /// `YYYY-Www`; the current ISO week when absent.
    pub week: Option<WeekId>,
}

impl WeekQuery {
    pub fn week_id(&self) -> WeekId {
        self.week.unwrap_or_else(current_iso_week)
    }
}

#[derive(Debug, Serialize)]
pub struct WeekView {
    pub week_id: WeekId,
    pub goals: Vec<WeekInstance>,
    pub created: Vec<String>,
    pub degraded: bool,
    pub saved: bool,
}

/// GET /users/{user}/week
pub async fn get_week(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<WeekQuery>,
) -> Json<WeekView> {
    let week_id = query.week_id();
    let result = state
        .scheduler
        .instantiate_week(&user_id, week_id, jiff::Timestamp::now())
        .await;

    Json(WeekView {
        week_id: result.week_id,
        goals: result.visible,
        created: result.created,
        degraded: result.degraded,
        saved: matches!(result.write, WriteOutcome::Written | WriteOutcome::NotNeeded),
    })
}

/// POST /users/{user}/week/instances/{id}/toggle
pub async fn toggle(
    State(state): State<AppState>,
    Path((user_id, instance_id)): Path<(String, String)>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<CompletionOutcome>, ApiError> {
    // Clients keep their own rendered list; nothing to mirror server-side.
    let board = BoardHandle::detached();
    let target = WeekTarget {
        user_id: &user_id,
        week_id: query.week_id(),
        board: &board,
    };
    let outcome = state
        .scheduler
        .toggle_completion(target, &instance_id, jiff::Timestamp::now())
        .await?;
    Ok(Json(outcome))
}

/// POST /users/{user}/week/instances/{id}/increment
pub async fn increment(
    State(state): State<AppState>,
    Path((user_id, instance_id)): Path<(String, String)>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<CompletionOutcome>, ApiError> {
    let board = BoardHandle::detached();
    let target = WeekTarget {
        user_id: &user_id,
        week_id: query.week_id(),
        board: &board,
    };
    let outcome = state
        .scheduler
        .increment(target, &instance_id, jiff::Timestamp::now())
        .await?;
    Ok(Json(outcome))
}

/// POST /users/{user}/week/instances/{id}/decrement
pub async fn decrement(
    State(state): State<AppState>,
    Path((user_id, instance_id)): Path<(String, String)>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<CompletionOutcome>, ApiError> {
    let board = BoardHandle::detached();
    let target = WeekTarget {
        user_id: &user_id,
        week_id: query.week_id(),
        board: &board,
    };
    let outcome = state
        .scheduler
        .decrement(target, &instance_id, jiff::Timestamp::now())
        .await?;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct SkipRequest {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
pub struct SkipResponse {
    pub skipped: bool,
    pub instance: Option<WeekInstance>,
}

/// POST /users/{user}/week/instances/{id}/skip
///
/// Nothing happens unless the body carries `"confirm": true`.
pub async fn skip(
    State(state): State<AppState>,
    Path((user_id, instance_id)): Path<(String, String)>,
    Query(query): Query<WeekQuery>,
    Json(req): Json<SkipRequest>,
) -> Result<Json<SkipResponse>, ApiError> {
    let board = BoardHandle::detached();
    let target = WeekTarget {
        user_id: &user_id,
        week_id: query.week_id(),
        board: &board,
    };
    let outcome = state
        .scheduler
        .skip(target, &instance_id, |_| req.confirm, jiff::Timestamp::now())
        .await?;

    Ok(Json(match outcome {
        SkipOutcome::Declined => SkipResponse {
            skipped: false,
            instance: None,
        },
        SkipOutcome::Skipped(instance) => SkipResponse {
            skipped: true,
            instance: Some(instance),
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct FreestandingGoal {
    pub title: String,
    #[serde(default)]
    pub frequency: Option<u32>,
}

/// POST /users/{user}/week/goals
pub async fn add_goal(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<WeekQuery>,
    Json(req): Json<FreestandingGoal>,
) -> Result<Json<WeekInstance>, ApiError> {
    let title = req.title.trim();
    let instance = state
        .scheduler
        .add_freestanding_goal(&user_id, query.week_id(), title, req.frequency, jiff::Timestamp::now())
        .await?;
    Ok(Json(instance))
}
