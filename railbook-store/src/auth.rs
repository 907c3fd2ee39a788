use railbook_core::models::Account;
use railbook_core::password::hash_password;
use railbook_core::{Identity, SessionContext};
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::error::EngineError;

/// Extract the active identity or refuse before touching the store.
pub fn require_identity(session: &SessionContext) -> Result<&Identity, EngineError> {
    session.current().ok_or(EngineError::NotAuthenticated)
}

/// Registers and verifies identities against the accounts table.
#[derive(Clone)]
pub struct AuthService {
    pool: Pool<Sqlite>,
    salt: String,
}

impl AuthService {
    pub fn new(pool: Pool<Sqlite>, salt: impl Into<String>) -> Self {
        Self {
            pool,
            salt: salt.into(),
        }
    }

    /// Create an account. The username is checked by lookup first so a
    /// taken name surfaces as `Conflict` rather than a store error.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), EngineError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(EngineError::InvalidInput(
                "username and password cannot be empty".into(),
            ));
        }

        let taken: Option<String> =
            sqlx::query_scalar("SELECT username FROM accounts WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        if taken.is_some() {
            return Err(EngineError::Conflict(format!(
                "username '{username}' is already taken"
            )));
        }

        let account = Account {
            username: username.to_string(),
            password_hash: hash_password(password, &self.salt),
        };
        sqlx::query("INSERT INTO accounts (username, password_hash) VALUES (?, ?)")
            .bind(&account.username)
            .bind(&account.password_hash)
            .execute(&self.pool)
            .await?;

        info!(username = %account.username, "account registered");
        Ok(())
    }

    /// Verify credentials. Unknown username and wrong password are both
    /// `Ok(None)` so the caller cannot probe which half was wrong.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Identity>, EngineError> {
        let stored: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM accounts WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        let Some(stored) = stored else {
            return Ok(None);
        };

        if stored == hash_password(password, &self.salt) {
            Ok(Some(Identity::new(username)))
        } else {
            Ok(None)
        }
    }
}
