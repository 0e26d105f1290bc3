//! Support session ledger.

use chrono::NaiveDateTime;
use sqlx::SqliteConnection;

use crate::error::{DatabaseError, Result};
use crate::models::{
    NewSupportSession, SupportSession, SupportSessionPatch, DEFAULT_SESSION_MINUTES,
    SESSION_PERFORMED, SESSION_SCHEDULED,
};
use crate::validation::{check_length, check_person_id, require, require_text, ValidationError};

const SELECT_SESSION: &str = r#"
    SELECT id, person_id, session_date, session_type, topic, description, status,
           notes, duration_minutes, facilitator
    FROM support_sessions
"#;

impl NewSupportSession {
    /// Check required fields and lengths.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        check_person_id(self.person_id)?;
        require(self.session_date, "dataSessao")?;
        require_text(self.session_type.as_deref(), "tipoSessao", 50)?;
        require_text(self.topic.as_deref(), "temaSessao", 100)?;
        check_length(self.description.as_deref(), "descricao", 1000)?;
        check_length(self.notes.as_deref(), "observacoes", 500)?;
        check_length(self.facilitator.as_deref(), "facilitador", 100)?;
        Ok(())
    }
}

impl SupportSessionPatch {
    /// Check lengths of the present fields.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        check_length(self.session_type.as_deref(), "tipoSessao", 50)?;
        check_length(self.topic.as_deref(), "temaSessao", 100)?;
        check_length(self.description.as_deref(), "descricao", 1000)?;
        check_length(self.status.as_deref(), "status", 50)?;
        check_length(self.notes.as_deref(), "observacoes", 500)?;
        check_length(self.facilitator.as_deref(), "facilitador", 100)?;
        Ok(())
    }

    /// Overwrite only the fields present in the patch.
    pub fn apply(self, session: &mut SupportSession) {
        if let Some(session_date) = self.session_date {
            session.session_date = session_date;
        }
        if let Some(session_type) = self.session_type {
            session.session_type = session_type;
        }
        if let Some(topic) = self.topic {
            session.topic = topic;
        }
        if let Some(description) = self.description {
            session.description = Some(description);
        }
        if let Some(status) = self.status {
            session.status = status;
        }
        if let Some(notes) = self.notes {
            session.notes = Some(notes);
        }
        if let Some(duration_minutes) = self.duration_minutes {
            session.duration_minutes = duration_minutes;
        }
        if let Some(facilitator) = self.facilitator {
            session.facilitator = Some(facilitator);
        }
    }
}

/// List all sessions.
pub async fn list_sessions(conn: &mut SqliteConnection) -> Result<Vec<SupportSession>> {
    let sessions = sqlx::query_as::<_, SupportSession>(SELECT_SESSION)
        .fetch_all(conn)
        .await?;

    Ok(sessions)
}

/// Get a session by ID.
pub async fn get_session(conn: &mut SqliteConnection, id: i64) -> Result<SupportSession> {
    sqlx::query_as::<_, SupportSession>(&format!("{SELECT_SESSION} WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("SupportSession", id))
}

/// List a person's sessions, most recent session date first.
pub async fn list_sessions_by_person(
    conn: &mut SqliteConnection,
    person_id: i64,
) -> Result<Vec<SupportSession>> {
    let sessions = sqlx::query_as::<_, SupportSession>(&format!(
        "{SELECT_SESSION} WHERE person_id = ? ORDER BY session_date DESC"
    ))
    .bind(person_id)
    .fetch_all(conn)
    .await?;

    Ok(sessions)
}

/// Schedule a session. The stored status is always "Agendada".
pub async fn create_session(
    conn: &mut SqliteConnection,
    new: &NewSupportSession,
) -> Result<SupportSession> {
    new.validate()?;
    let person_id = check_person_id(new.person_id)?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO support_sessions
            (person_id, session_date, session_type, topic, description, status,
             notes, duration_minutes, facilitator)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(person_id)
    .bind(new.session_date)
    .bind(&new.session_type)
    .bind(&new.topic)
    .bind(&new.description)
    .bind(SESSION_SCHEDULED)
    .bind(&new.notes)
    .bind(new.duration_minutes.unwrap_or(DEFAULT_SESSION_MINUTES))
    .bind(&new.facilitator)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| DatabaseError::from_owned_write(e, person_id))?;

    tracing::info!(session_id = id, person_id, "Scheduled support session");

    get_session(conn, id).await
}

/// Apply a partial update to a session.
///
/// Status transitions are not checked; any status string is stored.
pub async fn update_session(
    conn: &mut SqliteConnection,
    id: i64,
    patch: SupportSessionPatch,
) -> Result<SupportSession> {
    patch.validate()?;

    let mut session = get_session(&mut *conn, id).await?;
    patch.apply(&mut session);

    sqlx::query(
        r#"
        UPDATE support_sessions
        SET session_date = ?, session_type = ?, topic = ?, description = ?, status = ?,
            notes = ?, duration_minutes = ?, facilitator = ?
        WHERE id = ?
        "#,
    )
    .bind(session.session_date)
    .bind(&session.session_type)
    .bind(&session.topic)
    .bind(&session.description)
    .bind(&session.status)
    .bind(&session.notes)
    .bind(session.duration_minutes)
    .bind(&session.facilitator)
    .bind(id)
    .execute(conn)
    .await?;

    Ok(session)
}

/// Delete a session by ID.
pub async fn delete_session(conn: &mut SqliteConnection, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM support_sessions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("SupportSession", id));
    }

    Ok(())
}

/// List sessions of one type, most recent first.
pub async fn list_sessions_by_type(
    conn: &mut SqliteConnection,
    session_type: &str,
) -> Result<Vec<SupportSession>> {
    let sessions = sqlx::query_as::<_, SupportSession>(&format!(
        "{SELECT_SESSION} WHERE session_type = ? ORDER BY session_date DESC"
    ))
    .bind(session_type)
    .fetch_all(conn)
    .await?;

    Ok(sessions)
}

/// List sessions whose date falls within `[start, end]`, oldest first.
pub async fn list_sessions_in_period(
    conn: &mut SqliteConnection,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<SupportSession>> {
    let sessions = sqlx::query_as::<_, SupportSession>(&format!(
        "{SELECT_SESSION} WHERE session_date >= ? AND session_date <= ? ORDER BY session_date ASC"
    ))
    .bind(start)
    .bind(end)
    .fetch_all(conn)
    .await?;

    Ok(sessions)
}

/// List sessions marked "Realizada", most recent first.
pub async fn list_performed_sessions(conn: &mut SqliteConnection) -> Result<Vec<SupportSession>> {
    let sessions = sqlx::query_as::<_, SupportSession>(&format!(
        "{SELECT_SESSION} WHERE status = ? ORDER BY session_date DESC"
    ))
    .bind(SESSION_PERFORMED)
    .fetch_all(conn)
    .await?;

    Ok(sessions)
}
