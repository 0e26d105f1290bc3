//! Route handlers for the Sinais API.

pub mod alert;
pub mod external;
pub mod health;
pub mod help_resource;
pub mod person;
pub mod progress_report;
pub mod support_session;

use axum::extract::FromRequest;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::state::AppState;
use database::ValidationError;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Person registry
        .route("/api/usuario", get(person::list).post(person::create))
        .route("/api/usuario/search", get(person::search))
        .route("/api/usuario/ativos", get(person::list_active))
        .route("/api/usuario/email/:email", get(person::get_by_email))
        .route(
            "/api/usuario/:id",
            get(person::get).put(person::update).delete(person::delete),
        )
        // Support sessions
        .route(
            "/api/sessaoapoio",
            get(support_session::list).post(support_session::create),
        )
        .route("/api/sessaoapoio/usuario/:id", get(support_session::list_by_person))
        .route("/api/sessaoapoio/tipo/:tipo", get(support_session::list_by_type))
        .route("/api/sessaoapoio/periodo", get(support_session::list_in_period))
        .route("/api/sessaoapoio/realizadas", get(support_session::list_performed))
        .route(
            "/api/sessaoapoio/:id",
            get(support_session::get)
                .put(support_session::update)
                .delete(support_session::delete),
        )
        // Alerts
        .route("/api/alerta", get(alert::list).post(alert::create))
        .route("/api/alerta/usuario/:id", get(alert::list_by_person))
        .route("/api/alerta/nao-enviados", get(alert::list_unsent))
        .route("/api/alerta/tipo/:tipo", get(alert::list_by_type))
        .route("/api/alerta/prioridade/:prioridade", get(alert::list_by_priority))
        .route("/api/alerta/:id/marcar-enviado", post(alert::mark_sent))
        .route(
            "/api/alerta/:id",
            get(alert::get).put(alert::update).delete(alert::delete),
        )
        // Progress reports
        .route(
            "/api/relatorioprogresso",
            get(progress_report::list).post(progress_report::create),
        )
        .route(
            "/api/relatorioprogresso/usuario/:id",
            get(progress_report::list_by_person),
        )
        .route(
            "/api/relatorioprogresso/usuario/:id/ultimo",
            get(progress_report::latest_for_person),
        )
        .route("/api/relatorioprogresso/tipo/:tipo", get(progress_report::list_by_type))
        .route("/api/relatorioprogresso/periodo", get(progress_report::list_in_period))
        .route(
            "/api/relatorioprogresso/com-progresso",
            get(progress_report::list_with_progress),
        )
        .route(
            "/api/relatorioprogresso/:id",
            get(progress_report::get)
                .put(progress_report::update)
                .delete(progress_report::delete),
        )
        // Help resources
        .route(
            "/api/recursoajuda",
            get(help_resource::list).post(help_resource::create),
        )
        .route(
            "/api/recursoajuda/categoria/:categoria",
            get(help_resource::list_by_category),
        )
        .route("/api/recursoajuda/ativos", get(help_resource::list_active))
        .route("/api/recursoajuda/search", get(help_resource::search))
        .route(
            "/api/recursoajuda/prioridade/:prioridade",
            get(help_resource::list_by_priority),
        )
        .route(
            "/api/recursoajuda/:id",
            get(help_resource::get)
                .put(help_resource::update)
                .delete(help_resource::delete),
        )
        // External advisory gateway
        .route("/api/externalapi/openai", post(external::advise))
        .route("/api/externalapi/cep/:cep", get(external::postal_code))
        .route(
            "/api/externalapi/mensagem-motivacional",
            get(external::motivational_message),
        )
        .route("/api/externalapi/apoio-crise", get(external::crisis_support))
        .route(
            "/api/externalapi/recursos-saude/:cidade",
            get(external::health_resources),
        )
}

/// JSON body extractor whose rejections answer 400 with an error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// 201 response pointing at the new record.
pub fn created<T: Serialize>(location: String, body: T) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(body),
    )
        .into_response()
}

/// `?term=` query for the search endpoints.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub term: Option<String>,
}

/// `?dataInicio=&dataFim=` query for the period endpoints.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    #[serde(rename = "dataInicio")]
    pub start: Option<String>,
    #[serde(rename = "dataFim")]
    pub end: Option<String>,
}

impl PeriodQuery {
    /// Resolve both bounds, inclusive.
    ///
    /// A bare date means midnight of that day for either bound, so
    /// `dataFim=2026-01-31` stops at the first instant of the 31st. A missing
    /// or blank bound leaves that side open.
    pub fn bounds(&self) -> Result<(NaiveDateTime, NaiveDateTime)> {
        let start = parse_bound(self.start.as_deref(), "dataInicio")?.unwrap_or_else(earliest);
        let end = parse_bound(self.end.as_deref(), "dataFim")?.unwrap_or_else(latest);
        Ok((start, end))
    }
}

// Four-digit years keep the stored text form ordered.
fn earliest() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

fn latest() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|date| date.and_hms_nano_opt(23, 59, 59, 999_999_999))
        .unwrap_or(NaiveDateTime::MAX)
}

fn parse_bound(value: Option<&str>, field: &str) -> Result<Option<NaiveDateTime>> {
    let value = match value.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return Ok(None),
    };

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Some(at));
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(Some)
        .ok_or_else(|| {
            ApiError::Validation(ValidationError::Invalid {
                field: field.to_string(),
                reason: format!("'{}' is not a date", value),
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(start: Option<&str>, end: Option<&str>) -> PeriodQuery {
        PeriodQuery {
            start: start.map(str::to_string),
            end: end.map(str::to_string),
        }
    }

    #[test]
    fn test_period_bounds_from_dates() {
        let (start, end) = period(Some("2026-01-01"), Some("2026-01-31"))
            .bounds()
            .unwrap();
        assert_eq!(start.to_string(), "2026-01-01 00:00:00");
        assert_eq!(end.to_string(), "2026-01-31 00:00:00");

        // An afternoon on the last day falls outside a date-only end bound
        let afternoon = NaiveDate::from_ymd_opt(2026, 1, 31)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        assert!(afternoon > end);
    }

    #[test]
    fn test_period_bounds_from_datetimes() {
        let (start, end) = period(Some("2026-01-01T08:30:00"), Some("2026-01-01 18:00:00"))
            .bounds()
            .unwrap();
        assert_eq!(start.to_string(), "2026-01-01 08:30:00");
        assert_eq!(end.to_string(), "2026-01-01 18:00:00");
    }

    #[test]
    fn test_period_bounds_missing_side_is_open() {
        let (start, end) = period(None, Some("2026-01-31")).bounds().unwrap();
        assert_eq!(start, earliest());
        assert_eq!(end.to_string(), "2026-01-31 00:00:00");

        let (start, end) = period(Some("2026-01-01"), Some("  ")).bounds().unwrap();
        assert_eq!(start.to_string(), "2026-01-01 00:00:00");
        assert_eq!(end, latest());

        let (start, end) = period(None, None).bounds().unwrap();
        assert!(start < end);
        assert_eq!(start.to_string(), "0001-01-01 00:00:00");
        assert_eq!(end.to_string(), "9999-12-31 23:59:59.999999999");
    }

    #[test]
    fn test_period_bounds_rejects_garbage() {
        assert!(matches!(
            period(Some("2026-01-01"), Some("ontem")).bounds(),
            Err(ApiError::Validation(ValidationError::Invalid { .. }))
        ));
        assert!(matches!(
            period(Some("2026-13-01"), None).bounds(),
            Err(ApiError::Validation(ValidationError::Invalid { .. }))
        ));
    }
}
