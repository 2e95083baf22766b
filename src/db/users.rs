use crate::db::models::AdminUser;
use crate::db::sqlite::SqlitePool;
use crate::error::CatalogError;
use crate::service::password;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tracing::warn;

const SELECT_USERS: &str =
    "SELECT id, username, password_hash, created_at, last_login FROM users";

/// Administrator accounts.
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminUser>, CatalogError> {
        let row = sqlx::query(&format!("{SELECT_USERS} WHERE username = ?"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_model).transpose()
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<AdminUser>, CatalogError> {
        let row = sqlx::query(&format!("{SELECT_USERS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_model).transpose()
    }

    /// Check a username/password pair.
    ///
    /// Returns the user on success and stamps `last_login`. Unknown users and wrong
    /// passwords are indistinguishable to the caller.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<AdminUser>, CatalogError> {
        let Some(mut user) = self.find_by_username(username).await? else {
            return Ok(None);
        };
        if !password::verify_password(password, &user.password_hash) {
            return Ok(None);
        }

        let now = Utc::now();
        if let Err(e) = sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(now.to_rfc3339())
            .bind(user.id)
            .execute(&self.pool)
            .await
        {
            warn!(user_id = user.id, error = %e, "failed to record last login");
        } else {
            user.last_login = Some(now);
        }
        Ok(Some(user))
    }

    /// Set or replace the password hash for `username`, creating the user if absent.
    /// Returns the row id.
    pub async fn upsert_admin(&self, username: &str, password: &str) -> Result<i64, CatalogError> {
        let password_hash = password::hash_password(password)?;
        sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(username) DO UPDATE SET
                password_hash = excluded.password_hash
            "#,
        )
        .bind(username)
        .bind(&password_hash)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        // Fetch id after upsert
        let rec: (i64,) = sqlx::query_as("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    fn row_to_model(row: SqliteRow) -> Result<AdminUser, CatalogError> {
        let created_at: String = row.try_get("created_at")?;
        let last_login: Option<String> = row.try_get("last_login")?;

        Ok(AdminUser {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            created_at: parse_timestamp(&created_at)?,
            last_login: last_login.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, CatalogError> {
    let parsed = DateTime::parse_from_rfc3339(s).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    Ok(parsed.with_timezone(&Utc))
}
