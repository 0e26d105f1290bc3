//! Progress report routes under `/api/relatorioprogresso`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use database::{progress_report, NewProgressReport, ProgressReport, ProgressReportPatch};

use super::{created, ApiJson, PeriodQuery};
use crate::error::Result;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProgressReport>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(progress_report::list_reports(&mut conn).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProgressReport>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(progress_report::get_report(&mut conn, id).await?))
}

/// File a report dated now.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewProgressReport>,
) -> Result<Response> {
    let mut conn = state.db.acquire().await?;
    let report = progress_report::create_report(&mut conn, &new).await?;
    Ok(created(format!("/api/relatorioprogresso/{}", report.id), report))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(patch): ApiJson<ProgressReportPatch>,
) -> Result<Json<ProgressReport>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(progress_report::update_report(&mut conn, id, patch).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await?;
    progress_report::delete_report(&mut conn, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_by_person(
    State(state): State<AppState>,
    Path(person_id): Path<i64>,
) -> Result<Json<Vec<ProgressReport>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(
        progress_report::list_reports_by_person(&mut conn, person_id).await?,
    ))
}

pub async fn list_by_type(
    State(state): State<AppState>,
    Path(report_type): Path<String>,
) -> Result<Json<Vec<ProgressReport>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(
        progress_report::list_reports_by_type(&mut conn, &report_type).await?,
    ))
}

pub async fn list_in_period(
    State(state): State<AppState>,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<Vec<ProgressReport>>> {
    let (start, end) = period.bounds()?;
    let mut conn = state.db.acquire().await?;
    Ok(Json(
        progress_report::list_reports_in_period(&mut conn, start, end).await?,
    ))
}

/// The person's most recent report, 404 when they have none.
pub async fn latest_for_person(
    State(state): State<AppState>,
    Path(person_id): Path<i64>,
) -> Result<Json<ProgressReport>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(
        progress_report::latest_report_for_person(&mut conn, person_id).await?,
    ))
}

pub async fn list_with_progress(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProgressReport>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(progress_report::list_reports_with_progress(&mut conn).await?))
}
