//! Alert record keeping and the sent-state transition.
//!
//! Alerts are only recorded here; nothing in this crate delivers them.

use sqlx::SqliteConnection;

use crate::error::{DatabaseError, Result};
use crate::models::{Alert, AlertPatch, NewAlert, DEFAULT_PRIORITY};
use crate::validation::{check_length, check_person_id, require_text, ValidationError};

const SELECT_ALERT: &str = r#"
    SELECT id, person_id, title, message, alert_type, created_at, scheduled_at,
           sent, sent_at, priority, channel
    FROM alerts
"#;

impl NewAlert {
    /// Check required fields and lengths.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        check_person_id(self.person_id)?;
        require_text(self.title.as_deref(), "titulo", 100)?;
        require_text(self.message.as_deref(), "mensagem", 500)?;
        require_text(self.alert_type.as_deref(), "tipoAlerta", 50)?;
        check_length(self.priority.as_deref(), "prioridade", 50)?;
        check_length(self.channel.as_deref(), "canalEnvio", 100)?;
        Ok(())
    }
}

impl AlertPatch {
    /// Check lengths of the present fields.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        check_length(self.title.as_deref(), "titulo", 100)?;
        check_length(self.message.as_deref(), "mensagem", 500)?;
        check_length(self.alert_type.as_deref(), "tipoAlerta", 50)?;
        check_length(self.priority.as_deref(), "prioridade", 50)?;
        check_length(self.channel.as_deref(), "canalEnvio", 100)?;
        Ok(())
    }

    /// Overwrite only the fields present in the patch.
    pub fn apply(self, alert: &mut Alert) {
        if let Some(title) = self.title {
            alert.title = title;
        }
        if let Some(message) = self.message {
            alert.message = message;
        }
        if let Some(alert_type) = self.alert_type {
            alert.alert_type = alert_type;
        }
        if let Some(scheduled_at) = self.scheduled_at {
            alert.scheduled_at = Some(scheduled_at);
        }
        if let Some(priority) = self.priority {
            alert.priority = priority;
        }
        if let Some(channel) = self.channel {
            alert.channel = Some(channel);
        }
        // sent_at only changes through mark_sent
        if let Some(sent) = self.sent {
            alert.sent = sent;
        }
    }
}

/// List all alerts, newest first.
pub async fn list_alerts(conn: &mut SqliteConnection) -> Result<Vec<Alert>> {
    let alerts = sqlx::query_as::<_, Alert>(&format!("{SELECT_ALERT} ORDER BY created_at DESC"))
        .fetch_all(conn)
        .await?;

    Ok(alerts)
}

/// Get an alert by ID.
pub async fn get_alert(conn: &mut SqliteConnection, id: i64) -> Result<Alert> {
    sqlx::query_as::<_, Alert>(&format!("{SELECT_ALERT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Alert", id))
}

/// List a person's alerts, newest first.
pub async fn list_alerts_by_person(conn: &mut SqliteConnection, person_id: i64) -> Result<Vec<Alert>> {
    let alerts = sqlx::query_as::<_, Alert>(&format!(
        "{SELECT_ALERT} WHERE person_id = ? ORDER BY created_at DESC"
    ))
    .bind(person_id)
    .fetch_all(conn)
    .await?;

    Ok(alerts)
}

/// Record a new, unsent alert stamped with the current time.
pub async fn create_alert(conn: &mut SqliteConnection, new: &NewAlert) -> Result<Alert> {
    new.validate()?;
    let person_id = check_person_id(new.person_id)?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO alerts
            (person_id, title, message, alert_type, created_at, scheduled_at,
             sent, sent_at, priority, channel)
        VALUES (?, ?, ?, ?, ?, ?, 0, NULL, ?, ?)
        RETURNING id
        "#,
    )
    .bind(person_id)
    .bind(&new.title)
    .bind(&new.message)
    .bind(&new.alert_type)
    .bind(crate::local_now())
    .bind(new.scheduled_at)
    .bind(new.priority.as_deref().unwrap_or(DEFAULT_PRIORITY))
    .bind(&new.channel)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| DatabaseError::from_owned_write(e, person_id))?;

    tracing::info!(alert_id = id, person_id, "Recorded alert");

    get_alert(conn, id).await
}

/// Apply a partial update to an alert.
pub async fn update_alert(conn: &mut SqliteConnection, id: i64, patch: AlertPatch) -> Result<Alert> {
    patch.validate()?;

    let mut alert = get_alert(&mut *conn, id).await?;
    patch.apply(&mut alert);

    sqlx::query(
        r#"
        UPDATE alerts
        SET title = ?, message = ?, alert_type = ?, scheduled_at = ?, sent = ?,
            priority = ?, channel = ?
        WHERE id = ?
        "#,
    )
    .bind(&alert.title)
    .bind(&alert.message)
    .bind(&alert.alert_type)
    .bind(alert.scheduled_at)
    .bind(alert.sent)
    .bind(&alert.priority)
    .bind(&alert.channel)
    .bind(id)
    .execute(conn)
    .await?;

    Ok(alert)
}

/// Delete an alert by ID.
pub async fn delete_alert(conn: &mut SqliteConnection, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM alerts
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Alert", id));
    }

    Ok(())
}

/// List unsent alerts by scheduled send time; unscheduled ones come first.
pub async fn list_unsent_alerts(conn: &mut SqliteConnection) -> Result<Vec<Alert>> {
    let alerts = sqlx::query_as::<_, Alert>(&format!(
        "{SELECT_ALERT} WHERE sent = 0 ORDER BY scheduled_at ASC"
    ))
    .fetch_all(conn)
    .await?;

    Ok(alerts)
}

/// List alerts of one type, newest first.
pub async fn list_alerts_by_type(conn: &mut SqliteConnection, alert_type: &str) -> Result<Vec<Alert>> {
    let alerts = sqlx::query_as::<_, Alert>(&format!(
        "{SELECT_ALERT} WHERE alert_type = ? ORDER BY created_at DESC"
    ))
    .bind(alert_type)
    .fetch_all(conn)
    .await?;

    Ok(alerts)
}

/// List alerts with one priority, newest first.
pub async fn list_alerts_by_priority(
    conn: &mut SqliteConnection,
    priority: &str,
) -> Result<Vec<Alert>> {
    let alerts = sqlx::query_as::<_, Alert>(&format!(
        "{SELECT_ALERT} WHERE priority = ? ORDER BY created_at DESC"
    ))
    .bind(priority)
    .fetch_all(conn)
    .await?;

    Ok(alerts)
}

/// Mark an alert as sent and stamp the send time.
///
/// Calling this again on a sent alert re-stamps `sent_at` with the new time.
pub async fn mark_sent(conn: &mut SqliteConnection, id: i64) -> Result<Alert> {
    let result = sqlx::query(
        r#"
        UPDATE alerts
        SET sent = 1, sent_at = ?
        WHERE id = ?
        "#,
    )
    .bind(crate::local_now())
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Alert", id));
    }

    tracing::info!(alert_id = id, "Marked alert as sent");

    get_alert(conn, id).await
}
