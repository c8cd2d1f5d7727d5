use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of `userstable`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Account {
    pub username: String,
    #[sqlx(rename = "password")]
    pub password_digest: String,
    #[sqlx(rename = "name")]
    pub display_name_digest: String,
}
