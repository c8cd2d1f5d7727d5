//! SQL DDL for the account table.

/// `userstable` with every column `NOT NULL UNIQUE`.
/// The UNIQUE constraints are what actually rejects concurrent duplicate sign-ups.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS userstable (
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL UNIQUE
);
"#;
