use crate::db::models::Account;
use crate::db::schema::SQLITE_INIT;
use crate::error::StockcastError;
use crate::hashing;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::{info, warn};

pub type SqlitePool = Pool<Sqlite>;

/// Account storage over a connection pool; each call checks out its own connection.
#[derive(Clone)]
pub struct AccountStore {
    pool: SqlitePool,
}

impl AccountStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url`, creating the file if absent, and ensure the schema.
    pub async fn open(database_url: &str) -> Result<Self, StockcastError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create `userstable` if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StockcastError> {
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Every account in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Account>, StockcastError> {
        let rows = sqlx::query_as::<_, Account>(
            "SELECT username, password, name FROM userstable ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert a new account.
    ///
    /// `password` is stored exactly as given; the display name is stored as its digest.
    /// The username pre-check only gives a friendlier error: a duplicate that races past it
    /// is rejected by the UNIQUE constraint and surfaces as [`StockcastError::Storage`].
    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
        display_name: &str,
    ) -> Result<(), StockcastError> {
        validate_fields(username, password, display_name)?;

        let existing = self.list_all().await?;
        if existing.iter().any(|a| a.username == username) {
            return Err(StockcastError::DuplicateUser(username.to_string()));
        }

        sqlx::query("INSERT INTO userstable (username, password, name) VALUES (?, ?, ?)")
            .bind(username)
            .bind(password)
            .bind(hashing::digest(display_name))
            .execute(&self.pool)
            .await
            .inspect_err(|e| {
                let unique = e
                    .as_database_error()
                    .is_some_and(|d| d.is_unique_violation());
                warn!(username, unique, error = %e, "account insert rejected");
            })?;

        info!(username, "account created");
        Ok(())
    }

    /// Exact match on username and stored password digest. Does not hash.
    pub async fn authenticate(
        &self,
        username: &str,
        password_digest: &str,
    ) -> Result<Option<Account>, StockcastError> {
        let row = sqlx::query_as::<_, Account>(
            "SELECT username, password, name FROM userstable WHERE username = ? AND password = ?",
        )
        .bind(username)
        .bind(password_digest)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

/// Required account fields must be neither empty nor a single space.
pub fn validate_fields(
    username: &str,
    password: &str,
    display_name: &str,
) -> Result<(), StockcastError> {
    let blank = |s: &str| s.is_empty() || s == " ";
    if blank(username) || blank(password) || blank(display_name) {
        return Err(StockcastError::validation("Not a valid input"));
    }
    Ok(())
}
