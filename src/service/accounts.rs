use crate::db::{Account, AccountStore, validate_fields};
use crate::error::StockcastError;
use crate::hashing;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpForm {
    pub name: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Register a new account, storing the digest of the password.
///
/// The plaintext is checked before hashing; the digest of an empty password is not empty.
pub async fn sign_up(store: &AccountStore, form: &SignUpForm) -> Result<(), StockcastError> {
    validate_fields(&form.username, &form.password, &form.name)?;
    store
        .create_account(&form.username, &hashing::digest(&form.password), &form.name)
        .await
}

/// Resolve the account for a username/password pair.
///
/// Any mismatch is reported as [`StockcastError::InvalidCredentials`] without saying which
/// field was wrong. The stored digest is re-checked against the plaintext in constant time.
pub async fn log_in(store: &AccountStore, form: &LoginForm) -> Result<Account, StockcastError> {
    let account = store
        .authenticate(&form.username, &hashing::digest(&form.password))
        .await?
        .ok_or(StockcastError::InvalidCredentials)?;
    hashing::verify(&form.password, &account.password_digest)
        .ok_or(StockcastError::InvalidCredentials)?;
    info!(username = %account.username, "login succeeded");
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn store() -> AccountStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = AccountStore::new(pool);
        store.ensure_schema().await.unwrap();
        store
    }

    fn form(name: &str, username: &str, password: &str) -> SignUpForm {
        SignUpForm {
            name: name.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn sign_up_stores_password_digest() {
        let store = store().await;
        sign_up(&store, &form("Bob", "bob", "secret")).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].password_digest, hashing::digest("secret"));
        assert_eq!(all[0].display_name_digest, hashing::digest("Bob"));
        assert_eq!(
            hashing::verify("secret", &all[0].password_digest),
            Some(all[0].password_digest.clone())
        );
    }

    #[tokio::test]
    async fn sign_up_rejects_blank_plaintext_password() {
        let store = store().await;
        let err = sign_up(&store, &form("Bob", "bob", "")).await.unwrap_err();
        assert!(matches!(err, StockcastError::Validation(_)));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn log_in_checks_both_fields() {
        let store = store().await;
        sign_up(&store, &form("Bob", "bob", "secret")).await.unwrap();

        let login = |u: &str, p: &str| LoginForm {
            username: u.into(),
            password: p.into(),
        };
        let bob = log_in(&store, &login("bob", "secret")).await.unwrap();
        assert_eq!(bob.username, "bob");
        assert!(matches!(
            log_in(&store, &login("bob", "wrong")).await,
            Err(StockcastError::InvalidCredentials)
        ));
        assert!(matches!(
            log_in(&store, &login("nobody", "secret")).await,
            Err(StockcastError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn log_in_rejects_rows_without_a_password_digest() {
        let store = store().await;
        // Written below the service layer, so the password column holds plaintext.
        store.create_account("legacy", "secret", "Legacy").await.unwrap();

        let err = log_in(
            &store,
            &LoginForm {
                username: "legacy".into(),
                password: "secret".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StockcastError::InvalidCredentials));
    }
}
