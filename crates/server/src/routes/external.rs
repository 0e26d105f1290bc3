//! External advisory routes under `/api/externalapi`.
//!
//! None of these touch the database.

use advisory::{CityHealthResources, PostalLookup};
use axum::extract::{Path, State};
use axum::Json;
use database::validation::validate_postal_code;
use serde::Serialize;

use super::ApiJson;
use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Serialize)]
pub struct AdviceResponse {
    pub response: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Forward a prompt to the completion provider.
///
/// The body is a bare JSON string. Provider failures still answer 200 with a
/// fixed message.
pub async fn advise(
    State(state): State<AppState>,
    ApiJson(prompt): ApiJson<String>,
) -> Result<Json<AdviceResponse>> {
    if prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("Prompt é obrigatório".to_string()));
    }

    let response = state.advisory.advise(&prompt).await;
    Ok(Json(AdviceResponse { response }))
}

/// Look up an 8-digit postal code.
pub async fn postal_code(
    State(state): State<AppState>,
    Path(cep): Path<String>,
) -> Result<Json<PostalLookup>> {
    validate_postal_code(&cep)?;
    Ok(Json(state.advisory.lookup_postal_code(&cep).await))
}

pub async fn motivational_message() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: advisory::motivational_message(),
    })
}

pub async fn crisis_support() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: advisory::crisis_support_message(),
    })
}

pub async fn health_resources(Path(city): Path<String>) -> Json<CityHealthResources> {
    Json(advisory::health_resources_for_city(&city))
}
