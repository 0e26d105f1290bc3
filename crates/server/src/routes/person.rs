//! Person registry routes under `/api/usuario`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use database::validation::validate_search_term;
use database::{person, NewPerson, Person, PersonPatch};

use super::{created, ApiJson, SearchQuery};
use crate::error::Result;
use crate::state::AppState;

/// List every registered person.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Person>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(person::list_persons(&mut conn).await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Person>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(person::get_person(&mut conn, id).await?))
}

/// Register a person. Answers 201 with a `Location` header.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewPerson>,
) -> Result<Response> {
    let mut conn = state.db.acquire().await?;
    let person = person::create_person(&mut conn, &new).await?;
    Ok(created(format!("/api/usuario/{}", person.id), person))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(patch): ApiJson<PersonPatch>,
) -> Result<Json<Person>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(person::update_person(&mut conn, id, patch).await?))
}

/// Delete a person along with everything they own.
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await?;
    person::delete_person(&mut conn, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Person>>> {
    let term = validate_search_term(query.term.as_deref())?;
    let mut conn = state.db.acquire().await?;
    Ok(Json(person::search_persons(&mut conn, term).await?))
}

pub async fn list_active(State(state): State<AppState>) -> Result<Json<Vec<Person>>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(person::list_active_persons(&mut conn).await?))
}

pub async fn get_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Person>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(person::get_person_by_email(&mut conn, &email).await?))
}
