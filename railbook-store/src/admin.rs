use railbook_core::password::hash_password;
use railbook_core::{Identity, SessionContext};
use sqlx::{Pool, Sqlite};
use tracing::{info, warn};

use crate::auth::require_identity;
use crate::error::EngineError;

/// The administrator account name is matched case-insensitively, as the
/// original deployment did.
pub fn is_admin(identity: &Identity, admin_username: &str) -> bool {
    identity.as_str().eq_ignore_ascii_case(admin_username)
}

/// Privileged bulk maintenance. Both operations are irreversible and
/// gated on the configured administrator identity.
#[derive(Clone)]
pub struct AdminMaintenance {
    pool: Pool<Sqlite>,
    salt: String,
    admin_username: String,
}

impl AdminMaintenance {
    pub fn new(
        pool: Pool<Sqlite>,
        salt: impl Into<String>,
        admin_username: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            salt: salt.into(),
            admin_username: admin_username.into(),
        }
    }

    fn authorize<'a>(&self, session: &'a SessionContext) -> Result<&'a Identity, EngineError> {
        let identity = require_identity(session)?;
        if !is_admin(identity, &self.admin_username) {
            return Err(EngineError::NotAuthorized(format!(
                "'{identity}' is not the administrator"
            )));
        }
        Ok(identity)
    }

    /// Purge every reservation and restore every train to full
    /// capacity. Returns the number of reservations purged.
    pub async fn reset_seating(&self, session: &SessionContext) -> Result<u64, EngineError> {
        self.authorize(session)?;

        let mut tx = self.pool.begin().await?;

        let purged = sqlx::query("DELETE FROM reservations")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("UPDATE trains SET available_seats = total_seats")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        warn!(purged, "seating reset: all reservations cleared");

        Ok(purged)
    }

    /// Purge every account (and, first, every reservation referencing
    /// one), then re-register the administrator under the new password.
    /// On success the caller's session is cleared: the identity that
    /// ran the reset no longer exists under its old credential.
    pub async fn reset_accounts(
        &self,
        session: &mut SessionContext,
        new_admin_password: &str,
    ) -> Result<(), EngineError> {
        self.authorize(session)?;
        if new_admin_password.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "new administrator password cannot be empty".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        // Reservations reference accounts, so they go first. With every
        // reservation gone the seat counters must read full again or the
        // count invariant would be left broken.
        sqlx::query("DELETE FROM reservations")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM accounts").execute(&mut *tx).await?;
        sqlx::query("UPDATE trains SET available_seats = total_seats")
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO accounts (username, password_hash) VALUES (?, ?)")
            .bind(&self.admin_username)
            .bind(hash_password(new_admin_password, &self.salt))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        session.logout();
        info!(admin = %self.admin_username, "account reset complete, administrator re-registered");

        Ok(())
    }
}
