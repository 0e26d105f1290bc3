//! Progress report store.

use chrono::NaiveDateTime;
use sqlx::SqliteConnection;

use crate::error::{DatabaseError, Result};
use crate::models::{NewProgressReport, ProgressReport, ProgressReportPatch, DEFAULT_REPORT_STATUS};
use crate::validation::{check_length, check_person_id, require_text, ValidationError};

const SELECT_REPORT: &str = r#"
    SELECT id, person_id, report_date, report_type, sobriety_days, sessions_performed,
           alerts_sent, notes, overall_status, progress_score, goals_achieved, challenges
    FROM progress_reports
"#;

impl NewProgressReport {
    /// Check required fields and lengths.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        check_person_id(self.person_id)?;
        require_text(self.report_type.as_deref(), "tipoRelatorio", 50)?;
        check_length(self.notes.as_deref(), "observacoes", 1000)?;
        check_length(self.overall_status.as_deref(), "statusGeral", 50)?;
        check_length(self.goals_achieved.as_deref(), "metasAlcancadas", 500)?;
        check_length(self.challenges.as_deref(), "desafiosIdentificados", 500)?;
        check_score(Some(self.progress_score))?;
        Ok(())
    }
}

impl ProgressReportPatch {
    /// Check lengths of the present fields.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        check_length(self.report_type.as_deref(), "tipoRelatorio", 50)?;
        check_length(self.notes.as_deref(), "observacoes", 1000)?;
        check_length(self.overall_status.as_deref(), "statusGeral", 50)?;
        check_length(self.goals_achieved.as_deref(), "metasAlcancadas", 500)?;
        check_length(self.challenges.as_deref(), "desafiosIdentificados", 500)?;
        check_score(self.progress_score)?;
        Ok(())
    }

    /// Overwrite only the fields present in the patch.
    pub fn apply(self, report: &mut ProgressReport) {
        if let Some(report_type) = self.report_type {
            report.report_type = report_type;
        }
        if let Some(sobriety_days) = self.sobriety_days {
            report.sobriety_days = sobriety_days;
        }
        if let Some(sessions_performed) = self.sessions_performed {
            report.sessions_performed = sessions_performed;
        }
        if let Some(alerts_sent) = self.alerts_sent {
            report.alerts_sent = alerts_sent;
        }
        if let Some(notes) = self.notes {
            report.notes = Some(notes);
        }
        if let Some(overall_status) = self.overall_status {
            report.overall_status = overall_status;
        }
        if let Some(progress_score) = self.progress_score {
            report.progress_score = progress_score;
        }
        if let Some(goals_achieved) = self.goals_achieved {
            report.goals_achieved = Some(goals_achieved);
        }
        if let Some(challenges) = self.challenges {
            report.challenges = Some(challenges);
        }
    }
}

/// SQLite cannot store NaN or infinities as REAL.
fn check_score(score: Option<f64>) -> std::result::Result<(), ValidationError> {
    match score {
        Some(score) if !score.is_finite() => Err(ValidationError::Invalid {
            field: "pontuacaoProgresso".to_string(),
            reason: "must be a finite number".to_string(),
        }),
        _ => Ok(()),
    }
}

/// List all reports, newest first.
pub async fn list_reports(conn: &mut SqliteConnection) -> Result<Vec<ProgressReport>> {
    let reports = sqlx::query_as::<_, ProgressReport>(&format!(
        "{SELECT_REPORT} ORDER BY report_date DESC"
    ))
    .fetch_all(conn)
    .await?;

    Ok(reports)
}

/// Get a report by ID.
pub async fn get_report(conn: &mut SqliteConnection, id: i64) -> Result<ProgressReport> {
    sqlx::query_as::<_, ProgressReport>(&format!("{SELECT_REPORT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("ProgressReport", id))
}

/// List a person's reports, newest first.
pub async fn list_reports_by_person(
    conn: &mut SqliteConnection,
    person_id: i64,
) -> Result<Vec<ProgressReport>> {
    let reports = sqlx::query_as::<_, ProgressReport>(&format!(
        "{SELECT_REPORT} WHERE person_id = ? ORDER BY report_date DESC"
    ))
    .bind(person_id)
    .fetch_all(conn)
    .await?;

    Ok(reports)
}

/// File a report. The report date is always the current time.
pub async fn create_report(
    conn: &mut SqliteConnection,
    new: &NewProgressReport,
) -> Result<ProgressReport> {
    new.validate()?;
    let person_id = check_person_id(new.person_id)?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO progress_reports
            (person_id, report_date, report_type, sobriety_days, sessions_performed,
             alerts_sent, notes, overall_status, progress_score, goals_achieved, challenges)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(person_id)
    .bind(crate::local_now())
    .bind(&new.report_type)
    .bind(new.sobriety_days)
    .bind(new.sessions_performed)
    .bind(new.alerts_sent)
    .bind(&new.notes)
    .bind(new.overall_status.as_deref().unwrap_or(DEFAULT_REPORT_STATUS))
    .bind(new.progress_score)
    .bind(&new.goals_achieved)
    .bind(&new.challenges)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| DatabaseError::from_owned_write(e, person_id))?;

    tracing::info!(report_id = id, person_id, "Filed progress report");

    get_report(conn, id).await
}

/// Apply a partial update to a report.
pub async fn update_report(
    conn: &mut SqliteConnection,
    id: i64,
    patch: ProgressReportPatch,
) -> Result<ProgressReport> {
    patch.validate()?;

    let mut report = get_report(&mut *conn, id).await?;
    patch.apply(&mut report);

    sqlx::query(
        r#"
        UPDATE progress_reports
        SET report_type = ?, sobriety_days = ?, sessions_performed = ?, alerts_sent = ?,
            notes = ?, overall_status = ?, progress_score = ?, goals_achieved = ?, challenges = ?
        WHERE id = ?
        "#,
    )
    .bind(&report.report_type)
    .bind(report.sobriety_days)
    .bind(report.sessions_performed)
    .bind(report.alerts_sent)
    .bind(&report.notes)
    .bind(&report.overall_status)
    .bind(report.progress_score)
    .bind(&report.goals_achieved)
    .bind(&report.challenges)
    .bind(id)
    .execute(conn)
    .await?;

    Ok(report)
}

/// Delete a report by ID.
pub async fn delete_report(conn: &mut SqliteConnection, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM progress_reports
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("ProgressReport", id));
    }

    Ok(())
}

/// List reports of one period type, newest first.
pub async fn list_reports_by_type(
    conn: &mut SqliteConnection,
    report_type: &str,
) -> Result<Vec<ProgressReport>> {
    let reports = sqlx::query_as::<_, ProgressReport>(&format!(
        "{SELECT_REPORT} WHERE report_type = ? ORDER BY report_date DESC"
    ))
    .bind(report_type)
    .fetch_all(conn)
    .await?;

    Ok(reports)
}

/// List reports dated within `[start, end]`, oldest first.
pub async fn list_reports_in_period(
    conn: &mut SqliteConnection,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<ProgressReport>> {
    let reports = sqlx::query_as::<_, ProgressReport>(&format!(
        "{SELECT_REPORT} WHERE report_date >= ? AND report_date <= ? ORDER BY report_date ASC"
    ))
    .bind(start)
    .bind(end)
    .fetch_all(conn)
    .await?;

    Ok(reports)
}

/// Get the most recent report filed for a person.
pub async fn latest_report_for_person(
    conn: &mut SqliteConnection,
    person_id: i64,
) -> Result<ProgressReport> {
    sqlx::query_as::<_, ProgressReport>(&format!(
        "{SELECT_REPORT} WHERE person_id = ? ORDER BY report_date DESC, id DESC LIMIT 1"
    ))
    .bind(person_id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "ProgressReport",
        id: format!("latest for person {}", person_id),
    })
}

/// List reports with a strictly positive score, highest score first.
pub async fn list_reports_with_progress(conn: &mut SqliteConnection) -> Result<Vec<ProgressReport>> {
    let reports = sqlx::query_as::<_, ProgressReport>(&format!(
        "{SELECT_REPORT} WHERE progress_score > 0 ORDER BY progress_score DESC"
    ))
    .fetch_all(conn)
    .await?;

    Ok(reports)
}
