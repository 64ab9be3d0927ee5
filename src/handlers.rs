use crate::errors::AppError;
use crate::models::{
    DayGroupCard, RecentQuery, StatusResponse, WeeklyWorkoutStats, Workout, WorkoutCard,
    WorkoutForm,
};
use crate::state::AppState;
use crate::stats;
use crate::validation::validate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::debug;

pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let store = state.store.lock().await;
    Json(StatusResponse {
        status: store.status().as_str().to_string(),
        workout_count: store.workouts().len(),
    })
}

pub async fn list_workouts(State(state): State<AppState>) -> Json<Vec<Workout>> {
    let store = state.store.lock().await;
    Json(stats::sorted_descending(store.workouts()))
}

pub async fn recent_workouts(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Json<Vec<WorkoutCard>> {
    let limit = query.limit.unwrap_or(stats::DEFAULT_RECENT_LIMIT);
    let store = state.store.lock().await;
    let recent = stats::recent(store.workouts(), limit);
    Json(recent.into_iter().map(WorkoutCard::from).collect())
}

pub async fn workouts_by_day(State(state): State<AppState>) -> Json<Vec<DayGroupCard>> {
    let store = state.store.lock().await;
    let sorted = stats::sorted_descending(store.workouts());
    let groups = stats::grouped_by_day(&sorted);
    Json(groups.into_iter().map(DayGroupCard::from).collect())
}

pub async fn get_workout(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Workout>, AppError> {
    let store = state.store.lock().await;
    store
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("no workout with id {id}")))
}

pub async fn add_workout(
    State(state): State<AppState>,
    Json(form): Json<WorkoutForm>,
) -> Result<(StatusCode, Json<Workout>), AppError> {
    let input = validate(&form, Utc::now()).map_err(|fields| {
        debug!(?fields, "rejected workout form");
        AppError::invalid_fields(fields)
    })?;

    let mut store = state.store.lock().await;
    let workout = store.add(input).await;
    Ok((StatusCode::CREATED, Json(workout)))
}

pub async fn delete_workout(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    let mut store = state.store.lock().await;
    store.remove(&id).await;
    StatusCode::NO_CONTENT
}

pub async fn get_weekly_stats(State(state): State<AppState>) -> Json<Vec<WeeklyWorkoutStats>> {
    let store = state.store.lock().await;
    Json(stats::weekly_stats(store.workouts()))
}

pub async fn get_current_week_stats(State(state): State<AppState>) -> Json<WeeklyWorkoutStats> {
    let store = state.store.lock().await;
    Json(stats::current_week_stats(store.workouts()))
}
