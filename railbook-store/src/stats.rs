use railbook_core::models::StatsSnapshot;
use sqlx::{Pool, Sqlite};

use crate::error::EngineError;

/// Read-only aggregation for the admin dashboard. The reads are not
/// serialized against in-flight bookings; a slightly stale snapshot is
/// acceptable here.
#[derive(Clone)]
pub struct StatsReporter {
    pool: Pool<Sqlite>,
}

impl StatsReporter {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn stats(&self) -> Result<StatsSnapshot, EngineError> {
        let total_accounts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;
        let total_trains: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trains")
            .fetch_one(&self.pool)
            .await?;
        let total_reservations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations")
            .fetch_one(&self.pool)
            .await?;

        let (total_seats, booked_seats): (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(total_seats), 0),
                    COALESCE(SUM(total_seats - available_seats), 0)
             FROM trains",
        )
        .fetch_one(&self.pool)
        .await?;

        let occupancy_percent = if total_seats > 0 {
            booked_seats as f64 / total_seats as f64 * 100.0
        } else {
            0.0
        };

        Ok(StatsSnapshot {
            total_accounts,
            total_trains,
            total_reservations,
            total_seats,
            booked_seats,
            occupancy_percent,
        })
    }
}
