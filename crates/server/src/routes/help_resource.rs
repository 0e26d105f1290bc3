//! Help resource catalog routes under `/api/recursoajuda`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use database::validation::validate_search_term;
use database::{help_resource, HelpResource, HelpResourcePatch, NewHelpResource};

use super::{created, ApiJson, SearchQuery};
use crate::error::Result;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<HelpResource>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(help_resource::list_resources(&mut conn).await?))
}

/// Fetch one resource. Every successful fetch counts as a view.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<HelpResource>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(help_resource::view_resource(&mut conn, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewHelpResource>,
) -> Result<Response> {
    let mut conn = state.db.acquire().await?;
    let resource = help_resource::create_resource(&mut conn, &new).await?;
    Ok(created(format!("/api/recursoajuda/{}", resource.id), resource))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(patch): ApiJson<HelpResourcePatch>,
) -> Result<Json<HelpResource>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(help_resource::update_resource(&mut conn, id, patch).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await?;
    help_resource::delete_resource(&mut conn, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<HelpResource>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(
        help_resource::list_resources_by_category(&mut conn, &category).await?,
    ))
}

pub async fn list_active(State(state): State<AppState>) -> Result<Json<Vec<HelpResource>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(help_resource::list_active_resources(&mut conn).await?))
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<HelpResource>>> {
    let term = validate_search_term(query.term.as_deref())?;
    let mut conn = state.db.acquire().await?;
    Ok(Json(help_resource::search_resources(&mut conn, term).await?))
}

pub async fn list_by_priority(
    State(state): State<AppState>,
    Path(priority): Path<String>,
) -> Result<Json<Vec<HelpResource>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(
        help_resource::list_resources_by_priority(&mut conn, &priority).await?,
    ))
}
