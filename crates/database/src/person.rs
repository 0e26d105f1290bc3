//! Person registry: CRUD, search and lookup operations.

use sqlx::SqliteConnection;

use crate::error::{DatabaseError, Result};
use crate::models::{NewPerson, Person, PersonPatch};
use crate::validation::{check_length, require, require_text, validate_email, ValidationError};

const SELECT_PERSON: &str = r#"
    SELECT id, name, email, phone, birth_date, gender, registered_at, active, notes
    FROM persons
"#;

impl NewPerson {
    /// Check required fields, lengths and email format.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        require_text(self.name.as_deref(), "nome", 100)?;
        require_text(self.email.as_deref(), "email", 100)?;
        validate_email(self.email.as_deref().unwrap_or_default())?;
        require_text(self.phone.as_deref(), "telefone", 20)?;
        require(self.birth_date, "dataNascimento")?;
        check_length(Some(&self.gender), "genero", 10)?;
        check_length(self.notes.as_deref(), "observacoes", 500)?;
        Ok(())
    }
}

impl PersonPatch {
    /// Check lengths of the present fields and re-validate a new email.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        check_length(self.name.as_deref(), "nome", 100)?;
        if let Some(email) = self.email.as_deref() {
            validate_email(email)?;
        }
        check_length(self.phone.as_deref(), "telefone", 20)?;
        check_length(self.gender.as_deref(), "genero", 10)?;
        check_length(self.notes.as_deref(), "observacoes", 500)?;
        Ok(())
    }

    /// Overwrite only the fields present in the patch.
    pub fn apply(self, person: &mut Person) {
        if let Some(name) = self.name {
            person.name = name;
        }
        if let Some(email) = self.email {
            person.email = email.trim().to_string();
        }
        if let Some(phone) = self.phone {
            person.phone = phone;
        }
        if let Some(birth_date) = self.birth_date {
            person.birth_date = birth_date;
        }
        if let Some(gender) = self.gender {
            person.gender = gender;
        }
        if let Some(notes) = self.notes {
            person.notes = Some(notes);
        }
        if let Some(active) = self.active {
            person.active = active;
        }
    }
}

/// Map a unique-index violation to [`DatabaseError::AlreadyExists`].
fn unique_violation(err: sqlx::Error, email: &str, phone: &str) -> DatabaseError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            let id = if db_err.message().contains("phone") {
                phone.to_string()
            } else {
                email.to_string()
            };
            return DatabaseError::AlreadyExists {
                entity: "Person",
                id,
            };
        }
    }
    DatabaseError::Sqlx(err)
}

/// List every registered person.
pub async fn list_persons(conn: &mut SqliteConnection) -> Result<Vec<Person>> {
    let persons = sqlx::query_as::<_, Person>(&format!("{SELECT_PERSON} ORDER BY id"))
        .fetch_all(conn)
        .await?;

    Ok(persons)
}

/// Get a person by ID.
pub async fn get_person(conn: &mut SqliteConnection, id: i64) -> Result<Person> {
    sqlx::query_as::<_, Person>(&format!("{SELECT_PERSON} WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Person", id))
}

/// Register a new person.
///
/// The registration timestamp is stamped here and the person starts active.
/// Duplicate email or phone fails with [`DatabaseError::AlreadyExists`].
pub async fn create_person(conn: &mut SqliteConnection, new: &NewPerson) -> Result<Person> {
    new.validate()?;

    let email = new.email.as_deref().unwrap_or_default().trim();
    let phone = new.phone.as_deref().unwrap_or_default();

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO persons (name, email, phone, birth_date, gender, registered_at, active, notes)
        VALUES (?, ?, ?, ?, ?, ?, 1, ?)
        RETURNING id
        "#,
    )
    .bind(&new.name)
    .bind(email)
    .bind(phone)
    .bind(new.birth_date)
    .bind(&new.gender)
    .bind(crate::local_now())
    .bind(&new.notes)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| unique_violation(e, email, phone))?;

    tracing::info!(person_id = id, "Registered person");

    get_person(conn, id).await
}

/// Apply a partial update to a person.
pub async fn update_person(
    conn: &mut SqliteConnection,
    id: i64,
    patch: PersonPatch,
) -> Result<Person> {
    patch.validate()?;

    let mut person = get_person(&mut *conn, id).await?;
    patch.apply(&mut person);

    sqlx::query(
        r#"
        UPDATE persons
        SET name = ?, email = ?, phone = ?, birth_date = ?, gender = ?, active = ?, notes = ?
        WHERE id = ?
        "#,
    )
    .bind(&person.name)
    .bind(&person.email)
    .bind(&person.phone)
    .bind(person.birth_date)
    .bind(&person.gender)
    .bind(person.active)
    .bind(&person.notes)
    .bind(id)
    .execute(conn)
    .await
    .map_err(|e| unique_violation(e, &person.email, &person.phone))?;

    Ok(person)
}

/// Delete a person by ID.
///
/// Sessions, alerts and reports owned by the person go with it.
pub async fn delete_person(conn: &mut SqliteConnection, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM persons
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Person", id));
    }

    tracing::info!(person_id = id, "Deleted person");
    Ok(())
}

/// Substring search across name, email and phone.
pub async fn search_persons(conn: &mut SqliteConnection, term: &str) -> Result<Vec<Person>> {
    let persons = sqlx::query_as::<_, Person>(&format!(
        "{SELECT_PERSON} WHERE instr(name, ?1) > 0 OR instr(email, ?1) > 0 OR instr(phone, ?1) > 0 ORDER BY id"
    ))
    .bind(term)
    .fetch_all(conn)
    .await?;

    Ok(persons)
}

/// List persons whose active flag is set.
pub async fn list_active_persons(conn: &mut SqliteConnection) -> Result<Vec<Person>> {
    let persons = sqlx::query_as::<_, Person>(&format!("{SELECT_PERSON} WHERE active = 1 ORDER BY id"))
        .fetch_all(conn)
        .await?;

    Ok(persons)
}

/// Get a person by exact email match.
pub async fn get_person_by_email(conn: &mut SqliteConnection, email: &str) -> Result<Person> {
    sqlx::query_as::<_, Person>(&format!("{SELECT_PERSON} WHERE email = ?"))
        .bind(email)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Person", email))
}

/// Count registered persons.
pub async fn count_persons(conn: &mut SqliteConnection) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM persons")
        .fetch_one(conn)
        .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{new_person, test_db};

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let db = test_db().await;
        let mut conn = db.acquire().await.unwrap();

        let created = create_person(&mut conn, &new_person("Ana", "ana@x.com", "11999999999"))
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert!(created.active);
        assert_eq!(created.name, "Ana");
        assert_eq!(created.birth_date.to_string(), "1990-01-01");

        let fetched = get_person(&mut conn, created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_duplicate_email_and_phone_rejected() {
        let db = test_db().await;
        let mut conn = db.acquire().await.unwrap();

        create_person(&mut conn, &new_person("Ana", "ana@x.com", "111"))
            .await
            .unwrap();

        let dup_email = create_person(&mut conn, &new_person("Bia", "ana@x.com", "222")).await;
        assert!(matches!(
            dup_email,
            Err(DatabaseError::AlreadyExists { ref id, .. }) if id == "ana@x.com"
        ));

        let dup_phone = create_person(&mut conn, &new_person("Bia", "bia@x.com", "111")).await;
        assert!(matches!(
            dup_phone,
            Err(DatabaseError::AlreadyExists { ref id, .. }) if id == "111"
        ));

        assert_eq!(count_persons(&mut conn).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_requires_fields() {
        let db = test_db().await;
        let mut conn = db.acquire().await.unwrap();

        let mut missing_birth = new_person("Ana", "ana@x.com", "111");
        missing_birth.birth_date = None;
        assert!(matches!(
            create_person(&mut conn, &missing_birth).await,
            Err(DatabaseError::Validation(ValidationError::Missing(_)))
        ));

        let bad_email = new_person("Ana", "not-an-email", "111");
        assert!(matches!(
            create_person(&mut conn, &bad_email).await,
            Err(DatabaseError::Validation(ValidationError::InvalidEmail(_)))
        ));

        assert_eq!(count_persons(&mut conn).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_partial_update_leaves_other_fields() {
        let db = test_db().await;
        let mut conn = db.acquire().await.unwrap();

        let created = create_person(&mut conn, &new_person("Ana", "ana@x.com", "111"))
            .await
            .unwrap();

        let patch = PersonPatch {
            notes: Some("primeira consulta".to_string()),
            ..Default::default()
        };
        let updated = update_person(&mut conn, created.id, patch).await.unwrap();

        assert_eq!(updated.notes.as_deref(), Some("primeira consulta"));
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.phone, created.phone);
        assert_eq!(updated.registered_at, created.registered_at);
        assert_eq!(get_person(&mut conn, created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_person() {
        let db = test_db().await;
        let mut conn = db.acquire().await.unwrap();

        let result = update_person(&mut conn, 42, PersonPatch::default()).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_search_active_and_email_lookup() {
        let db = test_db().await;
        let mut conn = db.acquire().await.unwrap();

        let ana = create_person(&mut conn, &new_person("Ana Souza", "ana@x.com", "111"))
            .await
            .unwrap();
        let bruno = create_person(&mut conn, &new_person("Bruno", "bruno@y.com", "222"))
            .await
            .unwrap();

        let found = search_persons(&mut conn, "Souza").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, ana.id);

        // Phone and email are searched too
        assert_eq!(search_persons(&mut conn, "222").await.unwrap()[0].id, bruno.id);
        assert_eq!(search_persons(&mut conn, "@").await.unwrap().len(), 2);
        // Wildcards are literal
        assert!(search_persons(&mut conn, "%").await.unwrap().is_empty());

        let patch = PersonPatch {
            active: Some(false),
            ..Default::default()
        };
        update_person(&mut conn, bruno.id, patch).await.unwrap();
        let active = list_active_persons(&mut conn).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, ana.id);

        let by_email = get_person_by_email(&mut conn, "bruno@y.com").await.unwrap();
        assert_eq!(by_email.id, bruno.id);
        assert!(matches!(
            get_person_by_email(&mut conn, "nobody@z.com").await,
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_person() {
        let db = test_db().await;
        let mut conn = db.acquire().await.unwrap();

        let ana = create_person(&mut conn, &new_person("Ana", "ana@x.com", "111"))
            .await
            .unwrap();
        delete_person(&mut conn, ana.id).await.unwrap();

        assert!(matches!(
            get_person(&mut conn, ana.id).await,
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(matches!(
            delete_person(&mut conn, ana.id).await,
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(list_persons(&mut conn).await.unwrap().is_empty());
    }
}
