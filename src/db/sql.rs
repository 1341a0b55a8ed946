// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! sea-orm connection wrapper with typed user operations.
//!
//! The backend is picked from the connection URL, so the same code runs
//! against Postgres in production and in-memory SQLite in tests.

use crate::error::AppError;
use crate::models::user::{ActiveModel as UserActiveModel, Column as UserColumn};
use crate::models::{User, UserEntity};
use crate::time_utils::now_rfc3339;
use sea_orm::sea_query::Table;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, Schema, Set, SqlErr,
};

/// Database client.
#[derive(Clone)]
pub struct Database {
    conn: DatabaseConnection,
}

impl Database {
    /// Connect to the database named by `url`.
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let mut options = ConnectOptions::new(url.to_string());
        options.sqlx_logging(false);

        // Every pooled connection to `:memory:` is a separate database, so
        // pin the pool to one connection that is never reaped.
        if is_in_memory_sqlite(url) {
            options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(std::time::Duration::from_secs(u32::MAX as u64))
                .max_lifetime(std::time::Duration::from_secs(u32::MAX as u64));
        }

        let conn = sea_orm::Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        tracing::info!(
            backend = ?conn.get_database_backend(),
            "Connected to database"
        );

        Ok(Self { conn })
    }

    /// Connect and make sure the schema exists.
    pub async fn connect_and_migrate(url: &str) -> Result<Self, AppError> {
        let db = Self::connect(url).await?;
        db.ensure_schema().await?;
        Ok(db)
    }

    /// Underlying sea-orm connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    // ─── Schema ──────────────────────────────────────────────────

    /// Create the `users` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        let backend = self.conn.get_database_backend();
        let mut create = Schema::new(backend).create_table_from_entity(UserEntity);
        create.if_not_exists();

        self.conn.execute(backend.build(&create)).await?;
        Ok(())
    }

    /// Drop all tables and recreate them empty.
    pub async fn reset_schema(&self) -> Result<(), AppError> {
        let backend = self.conn.get_database_backend();
        let drop = Table::drop().table(UserEntity).if_exists().to_owned();

        self.conn.execute(backend.build(&drop)).await?;
        tracing::warn!(table = super::tables::USERS, "Dropped table");

        self.ensure_schema().await
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Whether a user with this username exists.
    pub async fn user_exists(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.find_user_by_username(username).await?.is_some())
    }

    /// Get a user by username.
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(UserEntity::find()
            .filter(UserColumn::Username.eq(username))
            .one(&self.conn)
            .await?)
    }

    /// Resolve a session key to the user currently holding it.
    pub async fn find_user_by_session_key(
        &self,
        session_key: &str,
    ) -> Result<Option<User>, AppError> {
        Ok(UserEntity::find()
            .filter(UserColumn::SessionKey.eq(session_key))
            .one(&self.conn)
            .await?)
    }

    /// Insert a new user.
    ///
    /// Returns `AppError::Conflict` if the username is already taken.
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        session_key: &str,
    ) -> Result<User, AppError> {
        let user = UserActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            session_key: Set(Some(session_key.to_string())),
            created_at: Set(now_rfc3339()),
            last_login_at: Set(None),
            ..Default::default()
        };

        user.insert(&self.conn).await.map_err(map_insert_error)
    }

    /// Replace a user's session key and stamp the login time.
    pub async fn set_session_key(&self, user: User, session_key: &str) -> Result<User, AppError> {
        let mut active: UserActiveModel = user.into();
        active.session_key = Set(Some(session_key.to_string()));
        active.last_login_at = Set(Some(now_rfc3339()));

        Ok(active.update(&self.conn).await?)
    }
}

fn map_insert_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("User already exists".to_string())
        }
        _ => AppError::from(err),
    }
}

fn is_in_memory_sqlite(url: &str) -> bool {
    url.starts_with("sqlite:") && (url.contains(":memory:") || url.contains("mode=memory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> Database {
        Database::connect_and_migrate("sqlite::memory:")
            .await
            .expect("in-memory database")
    }

    #[test]
    fn test_is_in_memory_sqlite() {
        assert!(is_in_memory_sqlite("sqlite::memory:"));
        assert!(is_in_memory_sqlite("sqlite://file.db?mode=memory"));
        assert!(!is_in_memory_sqlite("sqlite://posthere.db?mode=rwc"));
        assert!(!is_in_memory_sqlite("postgres://localhost/posthere"));
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let db = memory_db().await;

        assert!(!db.user_exists("alice").await.unwrap());
        let created = db.create_user("alice", "hash", "key-1").await.unwrap();
        assert_eq!(created.username, "alice");
        assert_eq!(created.session_key.as_deref(), Some("key-1"));
        assert!(db.user_exists("alice").await.unwrap());

        let by_key = db.find_user_by_session_key("key-1").await.unwrap();
        assert_eq!(by_key.map(|u| u.id), Some(created.id));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let db = memory_db().await;
        db.create_user("bob", "hash", "key-1").await.unwrap();

        let err = db.create_user("bob", "other", "key-2").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_set_session_key_replaces_old_key() {
        let db = memory_db().await;
        let user = db.create_user("carol", "hash", "old").await.unwrap();

        let updated = db.set_session_key(user, "new").await.unwrap();
        assert_eq!(updated.session_key.as_deref(), Some("new"));
        assert!(updated.last_login_at.is_some());

        assert!(db.find_user_by_session_key("old").await.unwrap().is_none());
        assert!(db.find_user_by_session_key("new").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_reset_schema_drops_users() {
        let db = memory_db().await;
        db.create_user("dave", "hash", "key").await.unwrap();

        db.reset_schema().await.unwrap();
        assert!(!db.user_exists("dave").await.unwrap());

        // Table is usable again after the reset.
        db.create_user("dave", "hash", "key").await.unwrap();
    }
}
