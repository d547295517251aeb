//! User repository
//!
//! Single-statement CRUD against the users table. Zero-row outcomes on
//! id-scoped operations become `DbError::NotFound`; email uniqueness is
//! the database's job and surfaces as a plain storage error on insert.

use sqlx::{FromRow, MySqlPool};

use crate::models::{NewUser, UserPatch};

/// User record from the database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} {id}")]
    NotFound { resource: &'static str, id: i64 },
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a MySqlPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert a user; the database assigns the id.
    ///
    /// A duplicate email violates the unique constraint and comes back as
    /// `DbError::Sqlx`.
    pub async fn create(&self, user: &NewUser) -> Result<User, DbError> {
        let result = sqlx::query("INSERT INTO users (name, email) VALUES (?, ?)")
            .bind(user.name())
            .bind(user.email())
            .execute(self.pool)
            .await?;

        Ok(User {
            id: result.last_insert_id() as i64,
            name: user.name().to_owned(),
            email: user.email().to_owned(),
        })
    }

    /// List all users.
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as::<_, User>("SELECT id, name, email FROM users")
            .fetch_all(self.pool)
            .await?;

        Ok(users)
    }

    /// Get a single user by id.
    pub async fn get(&self, id: i64) -> Result<User, DbError> {
        sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(DbError::NotFound {
                resource: "User",
                id,
            })
    }

    /// Partially update a user.
    ///
    /// Fields submitted as NULL keep their stored value via COALESCE.
    pub async fn update(&self, id: i64, patch: &UserPatch) -> Result<(), DbError> {
        let result = sqlx::query(
            "UPDATE users SET name = COALESCE(?, name), email = COALESCE(?, email) WHERE id = ?",
        )
        .bind(patch.name())
        .bind(patch.email())
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "User",
                id,
            });
        }

        Ok(())
    }

    /// Delete a user by id.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "User",
                id,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::{create_pool, DbConfig};
    use crate::db::schema::ensure_schema;

    // Integration tests - run with a disposable MySQL and:
    // DB_HOST=127.0.0.1 cargo test -p personas-server -- --ignored

    fn test_config() -> DbConfig {
        DbConfig {
            host: std::env::var("DB_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            ..DbConfig::default()
        }
    }

    async fn fresh_pool() -> MySqlPool {
        let config = test_config();
        let pool = create_pool(&config);
        ensure_schema(&pool, &config.database).await.expect("schema");
        pool
    }

    // Emails persist across runs and tests run in parallel, so every
    // insert gets a globally unique address.
    fn unique_email(tag: &str) -> String {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!("{tag}+{nanos}@example.com")
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_then_get_roundtrip() {
        let pool = fresh_pool().await;
        let repo = UserRepo::new(&pool);

        let new = NewUser::new(Some("Ada".into()), Some(unique_email("ada"))).unwrap();
        let created = repo.create(&new).await.expect("create");
        assert!(created.id > 0);

        let fetched = repo.get(created.id).await.expect("get");
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_email_is_storage_error() {
        let pool = fresh_pool().await;
        let repo = UserRepo::new(&pool);

        let email = unique_email("dup");
        let new = NewUser::new(Some("Ada".into()), Some(email.clone())).unwrap();
        repo.create(&new).await.expect("first insert");

        let again = NewUser::new(Some("Other".into()), Some(email)).unwrap();
        let err = repo.create(&again).await.unwrap_err();
        assert!(matches!(err, DbError::Sqlx(_)));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_merges_missing_fields() {
        let pool = fresh_pool().await;
        let repo = UserRepo::new(&pool);

        let email = unique_email("merge");
        let new = NewUser::new(Some("Ada".into()), Some(email.clone())).unwrap();
        let created = repo.create(&new).await.expect("create");

        let patch = UserPatch::new(Some("Ada L.".into()), None).unwrap();
        repo.update(created.id, &patch).await.expect("update");

        let merged = repo.get(created.id).await.expect("get");
        assert_eq!(merged.name, "Ada L.");
        // Email submitted as NULL: COALESCE kept the stored value.
        assert_eq!(merged.email, email);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn id_scoped_operations_report_not_found() {
        let pool = fresh_pool().await;
        let repo = UserRepo::new(&pool);

        let missing = 999_999_999;
        assert!(matches!(
            repo.get(missing).await.unwrap_err(),
            DbError::NotFound { .. }
        ));

        let patch = UserPatch::new(Some("X".into()), None).unwrap();
        assert!(matches!(
            repo.update(missing, &patch).await.unwrap_err(),
            DbError::NotFound { .. }
        ));

        assert!(matches!(
            repo.delete(missing).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_twice_reports_not_found_second_time() {
        let pool = fresh_pool().await;
        let repo = UserRepo::new(&pool);

        let new = NewUser::new(Some("Ada".into()), Some(unique_email("del"))).unwrap();
        let created = repo.create(&new).await.expect("create");

        repo.delete(created.id).await.expect("first delete");
        assert!(matches!(
            repo.delete(created.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
