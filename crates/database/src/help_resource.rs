//! Help resource catalog.
//!
//! Resources are standalone rows with no owning person. Listings order by the
//! priority text and then the title, so "Alta" sorts before "Baixa" before
//! "Media".

use sqlx::SqliteConnection;

use crate::error::{DatabaseError, Result};
use crate::models::{HelpResource, HelpResourcePatch, NewHelpResource, DEFAULT_PRIORITY};
use crate::validation::{check_length, require_text, ValidationError};

const SELECT_RESOURCE: &str = r#"
    SELECT id, title, category, description, url, phone, email, active, created_at,
           priority, tags, view_count
    FROM help_resources
"#;

const CATALOG_ORDER: &str = "ORDER BY priority, title";

impl NewHelpResource {
    /// Check required fields and lengths.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        require_text(self.title.as_deref(), "titulo", 100)?;
        require_text(self.category.as_deref(), "categoria", 50)?;
        require_text(self.description.as_deref(), "descricao", 1000)?;
        check_length(self.url.as_deref(), "url", 500)?;
        check_length(self.phone.as_deref(), "telefone", 20)?;
        check_length(self.email.as_deref(), "email", 100)?;
        check_length(self.priority.as_deref(), "prioridade", 50)?;
        check_length(self.tags.as_deref(), "tags", 100)?;
        Ok(())
    }
}

impl HelpResourcePatch {
    /// Check lengths of the present fields.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        check_length(self.title.as_deref(), "titulo", 100)?;
        check_length(self.category.as_deref(), "categoria", 50)?;
        check_length(self.description.as_deref(), "descricao", 1000)?;
        check_length(self.url.as_deref(), "url", 500)?;
        check_length(self.phone.as_deref(), "telefone", 20)?;
        check_length(self.email.as_deref(), "email", 100)?;
        check_length(self.priority.as_deref(), "prioridade", 50)?;
        check_length(self.tags.as_deref(), "tags", 100)?;
        Ok(())
    }

    /// Overwrite only the fields present in the patch.
    pub fn apply(self, resource: &mut HelpResource) {
        if let Some(title) = self.title {
            resource.title = title;
        }
        if let Some(category) = self.category {
            resource.category = category;
        }
        if let Some(description) = self.description {
            resource.description = description;
        }
        if let Some(url) = self.url {
            resource.url = Some(url);
        }
        if let Some(phone) = self.phone {
            resource.phone = Some(phone);
        }
        if let Some(email) = self.email {
            resource.email = Some(email);
        }
        if let Some(active) = self.active {
            resource.active = active;
        }
        if let Some(priority) = self.priority {
            resource.priority = priority;
        }
        if let Some(tags) = self.tags {
            resource.tags = Some(tags);
        }
    }
}

/// List the whole catalog.
pub async fn list_resources(conn: &mut SqliteConnection) -> Result<Vec<HelpResource>> {
    let resources =
        sqlx::query_as::<_, HelpResource>(&format!("{SELECT_RESOURCE} {CATALOG_ORDER}"))
            .fetch_all(conn)
            .await?;

    Ok(resources)
}

/// Get a resource by ID without touching its view counter.
pub async fn get_resource(conn: &mut SqliteConnection, id: i64) -> Result<HelpResource> {
    sqlx::query_as::<_, HelpResource>(&format!("{SELECT_RESOURCE} WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("HelpResource", id))
}

/// Fetch a resource for display and count the view.
///
/// The returned record already carries the incremented counter.
pub async fn view_resource(conn: &mut SqliteConnection, id: i64) -> Result<HelpResource> {
    let mut resource = get_resource(&mut *conn, id).await?;
    resource.view_count = increment_views(conn, id).await?;
    Ok(resource)
}

/// Add one to a resource's view counter and return the new count.
///
/// Reads the current value and writes it back plus one, so two concurrent
/// calls for the same id can lose an increment.
pub async fn increment_views(conn: &mut SqliteConnection, id: i64) -> Result<i32> {
    let current = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT view_count FROM help_resources
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DatabaseError::not_found("HelpResource", id))?;

    let views = current + 1;
    sqlx::query(
        r#"
        UPDATE help_resources
        SET view_count = ?
        WHERE id = ?
        "#,
    )
    .bind(views)
    .bind(id)
    .execute(conn)
    .await?;

    tracing::debug!(resource_id = id, views, "Counted resource view");

    Ok(views)
}

/// Add a resource to the catalog. It starts active with no views.
pub async fn create_resource(
    conn: &mut SqliteConnection,
    new: &NewHelpResource,
) -> Result<HelpResource> {
    new.validate()?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO help_resources
            (title, category, description, url, phone, email, active, created_at,
             priority, tags, view_count)
        VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?, ?, 0)
        RETURNING id
        "#,
    )
    .bind(&new.title)
    .bind(&new.category)
    .bind(&new.description)
    .bind(&new.url)
    .bind(&new.phone)
    .bind(&new.email)
    .bind(crate::local_now())
    .bind(new.priority.as_deref().unwrap_or(DEFAULT_PRIORITY))
    .bind(&new.tags)
    .fetch_one(&mut *conn)
    .await?;

    tracing::info!(resource_id = id, "Created help resource");

    get_resource(conn, id).await
}

/// Apply a partial update to a resource.
pub async fn update_resource(
    conn: &mut SqliteConnection,
    id: i64,
    patch: HelpResourcePatch,
) -> Result<HelpResource> {
    patch.validate()?;

    let mut resource = get_resource(&mut *conn, id).await?;
    patch.apply(&mut resource);

    sqlx::query(
        r#"
        UPDATE help_resources
        SET title = ?, category = ?, description = ?, url = ?, phone = ?, email = ?,
            active = ?, priority = ?, tags = ?
        WHERE id = ?
        "#,
    )
    .bind(&resource.title)
    .bind(&resource.category)
    .bind(&resource.description)
    .bind(&resource.url)
    .bind(&resource.phone)
    .bind(&resource.email)
    .bind(resource.active)
    .bind(&resource.priority)
    .bind(&resource.tags)
    .bind(id)
    .execute(conn)
    .await?;

    Ok(resource)
}

/// Delete a resource by ID.
pub async fn delete_resource(conn: &mut SqliteConnection, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM help_resources
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("HelpResource", id));
    }

    Ok(())
}

/// List resources in one category.
pub async fn list_resources_by_category(
    conn: &mut SqliteConnection,
    category: &str,
) -> Result<Vec<HelpResource>> {
    let resources = sqlx::query_as::<_, HelpResource>(&format!(
        "{SELECT_RESOURCE} WHERE category = ? {CATALOG_ORDER}"
    ))
    .bind(category)
    .fetch_all(conn)
    .await?;

    Ok(resources)
}

/// List resources whose active flag is set.
pub async fn list_active_resources(conn: &mut SqliteConnection) -> Result<Vec<HelpResource>> {
    let resources = sqlx::query_as::<_, HelpResource>(&format!(
        "{SELECT_RESOURCE} WHERE active = 1 {CATALOG_ORDER}"
    ))
    .fetch_all(conn)
    .await?;

    Ok(resources)
}

/// Substring search across title, description and tags.
pub async fn search_resources(
    conn: &mut SqliteConnection,
    term: &str,
) -> Result<Vec<HelpResource>> {
    let resources = sqlx::query_as::<_, HelpResource>(&format!(
        "{SELECT_RESOURCE} WHERE instr(title, ?1) > 0 OR instr(description, ?1) > 0 OR instr(tags, ?1) > 0 {CATALOG_ORDER}"
    ))
    .bind(term)
    .fetch_all(conn)
    .await?;

    Ok(resources)
}

/// List resources with one priority, ordered by title.
pub async fn list_resources_by_priority(
    conn: &mut SqliteConnection,
    priority: &str,
) -> Result<Vec<HelpResource>> {
    let resources = sqlx::query_as::<_, HelpResource>(&format!(
        "{SELECT_RESOURCE} WHERE priority = ? ORDER BY title"
    ))
    .bind(priority)
    .fetch_all(conn)
    .await?;

    Ok(resources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    fn new_resource(title: &str, category: &str, priority: Option<&str>) -> NewHelpResource {
        NewHelpResource {
            title: Some(title.to_string()),
            category: Some(category.to_string()),
            description: Some(format!("Sobre {}", title)),
            priority: priority.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_view_counts_each_fetch() {
        let db = test_db().await;
        let mut conn = db.acquire().await.unwrap();

        let views: Vec<i32> = {
            let mut views = Vec::new();
            for _ in 0..3 {
                views.push(view_resource(&mut conn, 1).await.unwrap().view_count);
            }
            views
        };
        assert_eq!(views, vec![1, 2, 3]);
        assert_eq!(get_resource(&mut conn, 1).await.unwrap().view_count, 3);

        assert_eq!(increment_views(&mut conn, 1).await.unwrap(), 4);
        assert!(matches!(
            increment_views(&mut conn, 999).await,
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(matches!(
            view_resource(&mut conn, 999).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_forces_defaults() {
        let db = test_db().await;
        let mut conn = db.acquire().await.unwrap();

        let resource = create_resource(&mut conn, &new_resource("Guia", "Artigo", None))
            .await
            .unwrap();
        assert!(resource.active);
        assert_eq!(resource.view_count, 0);
        assert_eq!(resource.priority, DEFAULT_PRIORITY);

        let missing = NewHelpResource {
            title: Some("Sem categoria".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            create_resource(&mut conn, &missing).await,
            Err(DatabaseError::Validation(ValidationError::Missing(_)))
        ));
    }

    #[tokio::test]
    async fn test_lexicographic_priority_order() {
        let db = test_db().await;
        let mut conn = db.acquire().await.unwrap();

        create_resource(&mut conn, &new_resource("Zeta", "Video", Some("Baixa")))
            .await
            .unwrap();

        let priorities: Vec<String> = list_resources(&mut conn)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.priority)
            .collect();
        assert_eq!(priorities, vec!["Alta", "Alta", "Alta", "Baixa", "Media"]);

        let high = list_resources_by_priority(&mut conn, "Alta").await.unwrap();
        let titles: Vec<&str> = high.iter().map(|r| r.title.as_str()).collect();
        let mut sorted = titles.clone();
        sorted.sort();
        assert_eq!(titles, sorted);
        assert_eq!(high.len(), 3);
    }

    #[tokio::test]
    async fn test_filters_and_search() {
        let db = test_db().await;
        let mut conn = db.acquire().await.unwrap();

        let links = list_resources_by_category(&mut conn, "Link").await.unwrap();
        assert_eq!(links.len(), 2);

        let hits = search_resources(&mut conn, "suicidio").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
        assert!(search_resources(&mut conn, "SUICIDIO").await.unwrap().is_empty());
        assert!(search_resources(&mut conn, "%").await.unwrap().is_empty());

        update_resource(
            &mut conn,
            4,
            HelpResourcePatch {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let active = list_active_resources(&mut conn).await.unwrap();
        assert_eq!(active.len(), 3);
        assert!(active.iter().all(|r| r.active));

        let article = get_resource(&mut conn, 4).await.unwrap();
        assert_eq!(article.category, "Artigo");
        assert_eq!(article.priority, "Media");

        delete_resource(&mut conn, 4).await.unwrap();
        assert!(matches!(
            delete_resource(&mut conn, 4).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }
}
