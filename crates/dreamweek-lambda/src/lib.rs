//! dreamweek-lambda
//!
//! HTTP surface over the scheduler. Runs inside AWS Lambda via `lambda_http`,
//! or as a plain axum server for local use.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        // Week board
        .route("/users/{user}/week", get(routes::week::get_week))
        .route("/users/{user}/week/goals", post(routes::week::add_goal))
        .route(
            "/users/{user}/week/instances/{id}/toggle",
            post(routes::week::toggle),
        )
        .route(
            "/users/{user}/week/instances/{id}/increment",
            post(routes::week::increment),
        )
        .route(
            "/users/{user}/week/instances/{id}/decrement",
            post(routes::week::decrement),
        )
        .route(
            "/users/{user}/week/instances/{id}/skip",
            post(routes::week::skip),
        )
        // Definitions
        .route("/users/{user}/dreams", get(routes::dreams::list_dreams))
        .route(
            "/users/{user}/dreams/{dream}/goals",
            post(routes::dreams::add_goal),
        )
        .route(
            "/users/{user}/dreams/{dream}/goals/{goal}/deactivate",
            post(routes::dreams::deactivate_goal),
        )
        .route(
            "/users/{user}/dreams/{dream}/goals/{goal}/reactivate",
            post(routes::dreams::reactivate_goal),
        )
        .route("/users/{user}/repair", post(routes::dreams::repair))
        .route("/users/{user}/streak", get(routes::streak::get_streak))
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
