//! Database models.
//!
//! Each stored record doubles as its transfer object: rows are mapped by
//! `FromRow` and serialized with the camelCase Portuguese field names the HTTP
//! clients expect. `New*` types carry create payloads, `*Patch` types carry
//! partial updates where every field is optional.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Session status assigned at creation.
pub const SESSION_SCHEDULED: &str = "Agendada";
/// Session status for sessions that took place.
pub const SESSION_PERFORMED: &str = "Realizada";
/// Session status for sessions that were called off.
pub const SESSION_CANCELLED: &str = "Cancelada";

/// Default priority for alerts and help resources.
pub const DEFAULT_PRIORITY: &str = "Media";
/// Default overall status for progress reports.
pub const DEFAULT_REPORT_STATUS: &str = "Bom";
/// Default session length.
pub const DEFAULT_SESSION_MINUTES: i32 = 60;

/// An end-user profile tracked for recovery support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Person {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    #[serde(rename = "dataNascimento")]
    pub birth_date: NaiveDate,
    /// Free-text gender code.
    #[serde(rename = "genero")]
    pub gender: String,
    /// Set once at creation.
    #[serde(rename = "dataCadastro")]
    pub registered_at: NaiveDateTime,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
}

/// Payload for registering a person.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPerson {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    #[serde(rename = "dataNascimento")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "genero", default)]
    pub gender: String,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
}

/// Partial update for a person.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonPatch {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    #[serde(rename = "dataNascimento")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "genero")]
    pub gender: Option<String>,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
    #[serde(rename = "ativo")]
    pub active: Option<bool>,
}

/// A scheduled or performed counseling session owned by one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SupportSession {
    pub id: i64,
    #[serde(rename = "usuarioId")]
    pub person_id: i64,
    #[serde(rename = "dataSessao")]
    pub session_date: NaiveDateTime,
    /// Free-text category, e.g. "Individual", "Grupo", "Online".
    #[serde(rename = "tipoSessao")]
    pub session_type: String,
    #[serde(rename = "temaSessao")]
    pub topic: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub status: String,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
    #[serde(rename = "duracaoMinutos")]
    pub duration_minutes: i32,
    #[serde(rename = "facilitador")]
    pub facilitator: Option<String>,
}

/// Payload for scheduling a session. Status is always forced to scheduled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSupportSession {
    #[serde(rename = "usuarioId")]
    pub person_id: Option<i64>,
    #[serde(rename = "dataSessao")]
    pub session_date: Option<NaiveDateTime>,
    #[serde(rename = "tipoSessao")]
    pub session_type: Option<String>,
    #[serde(rename = "temaSessao")]
    pub topic: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
    #[serde(rename = "duracaoMinutos")]
    pub duration_minutes: Option<i32>,
    #[serde(rename = "facilitador")]
    pub facilitator: Option<String>,
}

/// Partial update for a session. Any status string is accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupportSessionPatch {
    #[serde(rename = "dataSessao")]
    pub session_date: Option<NaiveDateTime>,
    #[serde(rename = "tipoSessao")]
    pub session_type: Option<String>,
    #[serde(rename = "temaSessao")]
    pub topic: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
    #[serde(rename = "duracaoMinutos")]
    pub duration_minutes: Option<i32>,
    #[serde(rename = "facilitador")]
    pub facilitator: Option<String>,
}

/// A reminder, warning or emergency notice owned by one person.
///
/// `sent_at` is stamped only by [`crate::alert::mark_sent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Alert {
    pub id: i64,
    #[serde(rename = "usuarioId")]
    pub person_id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "mensagem")]
    pub message: String,
    /// Free-text type, e.g. "Lembrete", "Aviso", "Emergencia".
    #[serde(rename = "tipoAlerta")]
    pub alert_type: String,
    #[serde(rename = "dataCriacao")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "dataAgendamento")]
    pub scheduled_at: Option<NaiveDateTime>,
    #[serde(rename = "enviado")]
    pub sent: bool,
    #[serde(rename = "dataEnvio")]
    pub sent_at: Option<NaiveDateTime>,
    #[serde(rename = "prioridade")]
    pub priority: String,
    /// Delivery channel tag, e.g. "Email", "SMS", "Push".
    #[serde(rename = "canalEnvio")]
    pub channel: Option<String>,
}

/// Payload for creating an alert. `sent` always starts false.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAlert {
    #[serde(rename = "usuarioId")]
    pub person_id: Option<i64>,
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "mensagem")]
    pub message: Option<String>,
    #[serde(rename = "tipoAlerta")]
    pub alert_type: Option<String>,
    #[serde(rename = "dataAgendamento")]
    pub scheduled_at: Option<NaiveDateTime>,
    #[serde(rename = "prioridade")]
    pub priority: Option<String>,
    #[serde(rename = "canalEnvio")]
    pub channel: Option<String>,
}

/// Partial update for an alert.
///
/// Setting `sent` here flips the flag without touching `sent_at`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertPatch {
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "mensagem")]
    pub message: Option<String>,
    #[serde(rename = "tipoAlerta")]
    pub alert_type: Option<String>,
    #[serde(rename = "dataAgendamento")]
    pub scheduled_at: Option<NaiveDateTime>,
    #[serde(rename = "prioridade")]
    pub priority: Option<String>,
    #[serde(rename = "canalEnvio")]
    pub channel: Option<String>,
    #[serde(rename = "enviado")]
    pub sent: Option<bool>,
}

/// A periodic self-assessment snapshot owned by one person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProgressReport {
    pub id: i64,
    #[serde(rename = "usuarioId")]
    pub person_id: i64,
    /// Stamped server-side at creation.
    #[serde(rename = "dataRelatorio")]
    pub report_date: NaiveDateTime,
    /// Free-text period label, e.g. "Semanal", "Mensal".
    #[serde(rename = "tipoRelatorio")]
    pub report_type: String,
    #[serde(rename = "diasSobriedade")]
    pub sobriety_days: i32,
    #[serde(rename = "sessoesRealizadas")]
    pub sessions_performed: i32,
    #[serde(rename = "alertasEnviados")]
    pub alerts_sent: i32,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
    #[serde(rename = "statusGeral")]
    pub overall_status: String,
    #[serde(rename = "pontuacaoProgresso")]
    pub progress_score: f64,
    #[serde(rename = "metasAlcancadas")]
    pub goals_achieved: Option<String>,
    #[serde(rename = "desafiosIdentificados")]
    pub challenges: Option<String>,
}

/// Payload for filing a progress report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProgressReport {
    #[serde(rename = "usuarioId")]
    pub person_id: Option<i64>,
    #[serde(rename = "tipoRelatorio")]
    pub report_type: Option<String>,
    #[serde(rename = "diasSobriedade", default)]
    pub sobriety_days: i32,
    #[serde(rename = "sessoesRealizadas", default)]
    pub sessions_performed: i32,
    #[serde(rename = "alertasEnviados", default)]
    pub alerts_sent: i32,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
    #[serde(rename = "statusGeral")]
    pub overall_status: Option<String>,
    #[serde(rename = "pontuacaoProgresso", default)]
    pub progress_score: f64,
    #[serde(rename = "metasAlcancadas")]
    pub goals_achieved: Option<String>,
    #[serde(rename = "desafiosIdentificados")]
    pub challenges: Option<String>,
}

/// Partial update for a progress report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressReportPatch {
    #[serde(rename = "tipoRelatorio")]
    pub report_type: Option<String>,
    #[serde(rename = "diasSobriedade")]
    pub sobriety_days: Option<i32>,
    #[serde(rename = "sessoesRealizadas")]
    pub sessions_performed: Option<i32>,
    #[serde(rename = "alertasEnviados")]
    pub alerts_sent: Option<i32>,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
    #[serde(rename = "statusGeral")]
    pub overall_status: Option<String>,
    #[serde(rename = "pontuacaoProgresso")]
    pub progress_score: Option<f64>,
    #[serde(rename = "metasAlcancadas")]
    pub goals_achieved: Option<String>,
    #[serde(rename = "desafiosIdentificados")]
    pub challenges: Option<String>,
}

/// A standalone informational or contact resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct HelpResource {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    /// Free-text category, e.g. "Artigo", "Video", "Contato", "Link".
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "descricao")]
    pub description: String,
    pub url: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(rename = "dataCriacao")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "prioridade")]
    pub priority: String,
    /// Comma-separated tags.
    pub tags: Option<String>,
    #[serde(rename = "visualizacoes")]
    pub view_count: i32,
}

/// Payload for cataloguing a help resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewHelpResource {
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "categoria")]
    pub category: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "prioridade")]
    pub priority: Option<String>,
    pub tags: Option<String>,
}

/// Partial update for a help resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HelpResourcePatch {
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "categoria")]
    pub category: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "ativo")]
    pub active: Option<bool>,
    #[serde(rename = "prioridade")]
    pub priority: Option<String>,
    pub tags: Option<String>,
}
