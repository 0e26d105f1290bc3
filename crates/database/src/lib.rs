//! SQLite persistence layer for the Sinais recovery-support API.
//!
//! This crate provides async database operations for persons, support
//! sessions, alerts, progress reports and help resources using SQLx with
//! SQLite. Every entity module takes a `&mut SqliteConnection`, so callers
//! decide how long a connection is held.
//!
//! # Example
//!
//! ```no_run
//! use database::{person, Database, NewPerson};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:sinais.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // One pooled connection for the unit of work
//!     let mut conn = db.acquire().await?;
//!     let new = NewPerson {
//!         name: Some("Ana".to_string()),
//!         email: Some("ana@x.com".to_string()),
//!         phone: Some("11999999999".to_string()),
//!         birth_date: "1990-01-01".parse().ok(),
//!         ..Default::default()
//!     };
//!     person::create_person(&mut conn, &new).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod alert;
pub mod error;
pub mod help_resource;
pub mod models;
pub mod person;
pub mod progress_report;
pub mod support_session;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{
    Alert, AlertPatch, HelpResource, HelpResourcePatch, NewAlert, NewHelpResource, NewPerson,
    NewProgressReport, NewSupportSession, Person, PersonPatch, ProgressReport,
    ProgressReportPatch, SupportSession, SupportSessionPatch,
};
pub use validation::ValidationError;

use chrono::NaiveDateTime;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    pub const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `sqlite::memory:` for a throwaway database in tests.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        // Cascading deletes depend on foreign key enforcement.
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations, including the help resource seed.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Check out one connection for the duration of a unit of work.
    ///
    /// The connection goes back to the pool when the guard is dropped.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>> {
        Ok(self.pool.acquire().await?)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Server-local wall clock time used for every server-stamped timestamp.
pub(crate) fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_seeded_help_resources() {
        let db = test_db().await;
        let mut conn = db.acquire().await.unwrap();

        let resources = help_resource::list_resources(&mut conn).await.unwrap();
        assert_eq!(resources.len(), 4);

        let hotline = resources.iter().find(|r| r.id == 1).unwrap();
        assert_eq!(hotline.category, "Contato");
        assert_eq!(hotline.priority, "Alta");
        assert_eq!(hotline.phone.as_deref(), Some("188"));

        let links = resources.iter().filter(|r| r.category == "Link").count();
        assert_eq!(links, 2);

        let article = resources.iter().find(|r| r.category == "Artigo").unwrap();
        assert_eq!(article.priority, "Media");
        assert!(resources.iter().all(|r| r.active && r.view_count == 0));
    }

    #[tokio::test]
    async fn test_person_delete_cascades() {
        let db = test_db().await;
        let mut conn = db.acquire().await.unwrap();
        let person_id = seed_person(&mut conn, "ana@x.com", "111").await;

        let session = support_session::create_session(
            &mut conn,
            &NewSupportSession {
                person_id: Some(person_id),
                session_date: Some(at("2026-01-10 14:00")),
                session_type: Some("Individual".to_string()),
                topic: Some("Gatilhos".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let alert = alert::create_alert(
            &mut conn,
            &NewAlert {
                person_id: Some(person_id),
                title: Some("Check-in".to_string()),
                message: Some("Como foi o dia?".to_string()),
                alert_type: Some("Lembrete".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let report = progress_report::create_report(
            &mut conn,
            &NewProgressReport {
                person_id: Some(person_id),
                report_type: Some("Semanal".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        person::delete_person(&mut conn, person_id).await.unwrap();

        assert!(support_session::list_sessions_by_person(&mut conn, person_id)
            .await
            .unwrap()
            .is_empty());
        assert!(alert::list_alerts_by_person(&mut conn, person_id)
            .await
            .unwrap()
            .is_empty());
        assert!(progress_report::list_reports_by_person(&mut conn, person_id)
            .await
            .unwrap()
            .is_empty());

        assert!(matches!(
            support_session::get_session(&mut conn, session.id).await,
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(matches!(
            alert::get_alert(&mut conn, alert.id).await,
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(matches!(
            progress_report::get_report(&mut conn, report.id).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }
}
