//! User account stored in the `users` table.

use sea_orm::entity::prelude::*;

/// A registered user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    /// PBKDF2 encoded hash, never the plaintext password
    pub password_hash: String,
    /// Bearer token issued at registration and replaced on every login
    pub session_key: Option<String>,
    /// When the account was registered (RFC3339)
    pub created_at: String,
    /// Last successful login (RFC3339)
    pub last_login_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_model_table() {
        let user = Model {
            id: 1,
            username: "alice".to_string(),
            password_hash: "pbkdf2-sha256$1$AA$AA".to_string(),
            session_key: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            last_login_at: None,
        };
        assert_eq!(user.clone(), user);
        assert_eq!(Entity.table_name(), "users");
    }
}
