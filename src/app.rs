use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(handlers::get_status))
        .route(
            "/api/workouts",
            get(handlers::list_workouts).post(handlers::add_workout),
        )
        .route("/api/workouts/recent", get(handlers::recent_workouts))
        .route("/api/workouts/by-day", get(handlers::workouts_by_day))
        .route(
            "/api/workouts/:id",
            get(handlers::get_workout).delete(handlers::delete_workout),
        )
        .route("/api/stats/weekly", get(handlers::get_weekly_stats))
        .route("/api/stats/current-week", get(handlers::get_current_week_stats))
        .with_state(state)
}
