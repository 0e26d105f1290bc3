//! Alert routes under `/api/alerta`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use database::{alert, Alert, AlertPatch, NewAlert};
use serde::Serialize;

use super::{created, ApiJson};
use crate::error::Result;
use crate::state::AppState;

/// Confirmation returned by the mark-sent endpoint.
#[derive(Serialize)]
pub struct MarkSentResponse {
    pub message: &'static str,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Alert>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(alert::list_alerts(&mut conn).await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Alert>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(alert::get_alert(&mut conn, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewAlert>,
) -> Result<Response> {
    let mut conn = state.db.acquire().await?;
    let alert = alert::create_alert(&mut conn, &new).await?;
    Ok(created(format!("/api/alerta/{}", alert.id), alert))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(patch): ApiJson<AlertPatch>,
) -> Result<Json<Alert>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(alert::update_alert(&mut conn, id, patch).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await?;
    alert::delete_alert(&mut conn, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_by_person(
    State(state): State<AppState>,
    Path(person_id): Path<i64>,
) -> Result<Json<Vec<Alert>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(alert::list_alerts_by_person(&mut conn, person_id).await?))
}

/// Pending alerts, earliest schedule first.
pub async fn list_unsent(State(state): State<AppState>) -> Result<Json<Vec<Alert>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(alert::list_unsent_alerts(&mut conn).await?))
}

pub async fn list_by_type(
    State(state): State<AppState>,
    Path(alert_type): Path<String>,
) -> Result<Json<Vec<Alert>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(alert::list_alerts_by_type(&mut conn, &alert_type).await?))
}

pub async fn list_by_priority(
    State(state): State<AppState>,
    Path(priority): Path<String>,
) -> Result<Json<Vec<Alert>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(alert::list_alerts_by_priority(&mut conn, &priority).await?))
}

/// Flag an alert as delivered now. Repeating the call refreshes the timestamp.
pub async fn mark_sent(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MarkSentResponse>> {
    let mut conn = state.db.acquire().await?;
    alert::mark_sent(&mut conn, id).await?;

    Ok(Json(MarkSentResponse {
        message: "Alerta marcado como enviado com sucesso",
    }))
}
