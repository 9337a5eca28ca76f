use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{is_unique_violation, Database};
use crate::models::User;
use crate::{Error, Result};

/// Repository for user operations
pub struct UserRepository<'a> {
    db: &'a Database,
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, user: &User) -> Result<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, created_at, updated_at, name)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(&user.name)
        .execute(self.db.pool())
        .await;

        match result {
            Ok(_) => self.find_by_id(user.id).await,
            Err(e) if is_unique_violation(&e) => Err(Error::UserExists(user.name.clone())),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_name(&self, name: &str) -> Result<User> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, created_at, updated_at
            FROM users
            WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(self.db.pool())
        .await?;

        row.map(User::from)
            .ok_or_else(|| Error::UserNotFound(name.to_string()))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.db.pool())
        .await?;

        row.map(User::from)
            .ok_or_else(|| Error::UserNotFound(id.to_string()))
    }

    pub async fn list_all(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, created_at, updated_at
            FROM users
            ORDER BY created_at ASC, name ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM users")
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected())
    }
}
