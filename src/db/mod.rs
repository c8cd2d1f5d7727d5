//! Database module: the account table and its store.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: pool-backed store operations

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::Account;
pub use schema::SQLITE_INIT;
pub use sqlite::{AccountStore, SqlitePool, validate_fields};
