//! Database layer (sea-orm over SQLite or Postgres).

pub mod sql;

pub use sql::Database;

/// Table names as constants.
pub mod tables {
    pub const USERS: &str = "users";
}
