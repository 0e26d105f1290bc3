//! Support session routes under `/api/sessaoapoio`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use database::{support_session, NewSupportSession, SupportSession, SupportSessionPatch};

use super::{created, ApiJson, PeriodQuery};
use crate::error::Result;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<SupportSession>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(support_session::list_sessions(&mut conn).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SupportSession>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(support_session::get_session(&mut conn, id).await?))
}

/// Schedule a session. New sessions always start as "Agendada".
pub async fn create(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewSupportSession>,
) -> Result<Response> {
    let mut conn = state.db.acquire().await?;
    let session = support_session::create_session(&mut conn, &new).await?;
    Ok(created(format!("/api/sessaoapoio/{}", session.id), session))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(patch): ApiJson<SupportSessionPatch>,
) -> Result<Json<SupportSession>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(support_session::update_session(&mut conn, id, patch).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await?;
    support_session::delete_session(&mut conn, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_by_person(
    State(state): State<AppState>,
    Path(person_id): Path<i64>,
) -> Result<Json<Vec<SupportSession>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(
        support_session::list_sessions_by_person(&mut conn, person_id).await?,
    ))
}

pub async fn list_by_type(
    State(state): State<AppState>,
    Path(session_type): Path<String>,
) -> Result<Json<Vec<SupportSession>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(
        support_session::list_sessions_by_type(&mut conn, &session_type).await?,
    ))
}

/// Sessions dated inside `[dataInicio, dataFim]`, oldest first.
pub async fn list_in_period(
    State(state): State<AppState>,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<Vec<SupportSession>>> {
    let (start, end) = period.bounds()?;
    let mut conn = state.db.acquire().await?;
    Ok(Json(
        support_session::list_sessions_in_period(&mut conn, start, end).await?,
    ))
}

pub async fn list_performed(State(state): State<AppState>) -> Result<Json<Vec<SupportSession>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(support_session::list_performed_sessions(&mut conn).await?))
}
