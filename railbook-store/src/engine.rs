use chrono::{DateTime, Utc};
use railbook_core::models::{BookingConfirmation, Reservation, ReservationDetail, TrainSummary};
use railbook_core::{pnr, seats, SessionContext};
use sqlx::{Pool, Sqlite, Transaction};
use tracing::{info, warn};

use crate::admin::is_admin;
use crate::auth::require_identity;
use crate::error::EngineError;

/// Give up on PNR generation after this many collisions in a row.
const MAX_PNR_ATTEMPTS: u32 = 8;

/// Books, cancels, views and searches reservations.
///
/// Every mutation runs inside its own transaction on a pooled
/// connection. SQLite has no `SELECT ... FOR UPDATE`; the equivalent
/// here is making the transaction's first statement a no-op `UPDATE` of
/// the contended row, which takes the store's exclusive write lock and
/// serializes concurrent book/cancel calls until commit or rollback.
/// The sqlx transaction guard rolls back on every early-return path, so
/// a failed call leaves the train row and reservation set untouched.
#[derive(Clone)]
pub struct ReservationEngine {
    pool: Pool<Sqlite>,
    admin_username: String,
}

impl ReservationEngine {
    pub fn new(pool: Pool<Sqlite>, admin_username: impl Into<String>) -> Self {
        Self {
            pool,
            admin_username: admin_username.into(),
        }
    }

    /// Exact-match route search over trains that still have seats.
    pub async fn search(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<Vec<TrainSummary>, EngineError> {
        let rows: Vec<TrainSummaryRow> = sqlx::query_as(
            "SELECT train_number, name, source, destination, available_seats
             FROM trains
             WHERE source = ? AND destination = ? AND available_seats > 0
             ORDER BY train_number",
        )
        .bind(source)
        .bind(destination)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TrainSummaryRow::into).collect())
    }

    /// Book one seat on `train_number` for the passenger, owned by the
    /// session's identity. Assigns the lowest seat number not held by a
    /// surviving reservation and a freshly generated PNR.
    pub async fn book(
        &self,
        train_number: &str,
        session: &SessionContext,
        passenger_name: &str,
        age: i32,
    ) -> Result<BookingConfirmation, EngineError> {
        let identity = require_identity(session)?;
        if passenger_name.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "passenger name cannot be empty".into(),
            ));
        }
        if age <= 0 {
            return Err(EngineError::InvalidInput(
                "passenger age must be positive".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        // Lock the train row for the rest of the transaction. Zero rows
        // affected doubles as the existence check.
        let locked =
            sqlx::query("UPDATE trains SET available_seats = available_seats WHERE train_number = ?")
                .bind(train_number)
                .execute(&mut *tx)
                .await?;
        if locked.rows_affected() == 0 {
            return Err(EngineError::NotFound(format!("train {train_number}")));
        }

        let (available_seats, total_seats): (i32, i32) = sqlx::query_as(
            "SELECT available_seats, total_seats FROM trains WHERE train_number = ?",
        )
        .bind(train_number)
        .fetch_one(&mut *tx)
        .await?;

        if available_seats <= 0 {
            return Err(EngineError::CapacityExceeded(train_number.to_string()));
        }

        let occupied: Vec<i32> =
            sqlx::query_scalar("SELECT seat_number FROM reservations WHERE train_number = ?")
                .bind(train_number)
                .fetch_all(&mut *tx)
                .await?;
        let seat_number = seats::lowest_free_seat(&occupied, total_seats)
            .ok_or_else(|| EngineError::CapacityExceeded(train_number.to_string()))?;

        let reservation = Reservation {
            pnr: fresh_pnr(&mut tx).await?,
            train_number: train_number.to_string(),
            username: identity.as_str().to_string(),
            passenger_name: passenger_name.to_string(),
            age,
            seat_number,
            booking_timestamp: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO reservations
                 (pnr, train_number, username, passenger_name, age, seat_number, booking_timestamp)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&reservation.pnr)
        .bind(&reservation.train_number)
        .bind(&reservation.username)
        .bind(&reservation.passenger_name)
        .bind(reservation.age)
        .bind(reservation.seat_number)
        .bind(reservation.booking_timestamp)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE trains SET available_seats = available_seats - 1 WHERE train_number = ?")
            .bind(train_number)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(pnr = %reservation.pnr, train = train_number, seat = seat_number, user = %identity, "booking confirmed");

        Ok(BookingConfirmation {
            pnr: reservation.pnr,
            seat_number,
        })
    }

    /// Cancel the reservation behind `pnr` and free its seat. Only the
    /// booking owner or the administrator may cancel.
    pub async fn cancel(&self, pnr: &str, session: &SessionContext) -> Result<(), EngineError> {
        let identity = require_identity(session)?;

        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query("UPDATE reservations SET seat_number = seat_number WHERE pnr = ?")
            .bind(pnr)
            .execute(&mut *tx)
            .await?;
        if locked.rows_affected() == 0 {
            return Err(EngineError::NotFound(format!("PNR {pnr}")));
        }

        let (train_number, owner): (String, String) =
            sqlx::query_as("SELECT train_number, username FROM reservations WHERE pnr = ?")
                .bind(pnr)
                .fetch_one(&mut *tx)
                .await?;

        if owner != identity.as_str() && !is_admin(identity, &self.admin_username) {
            return Err(EngineError::NotAuthorized(format!(
                "PNR {pnr} was booked by '{owner}'"
            )));
        }

        sqlx::query("DELETE FROM reservations WHERE pnr = ?")
            .bind(pnr)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE trains SET available_seats = available_seats + 1 WHERE train_number = ?")
            .bind(&train_number)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(%pnr, train = %train_number, user = %identity, "reservation cancelled");

        Ok(())
    }

    /// Full reservation detail (route, train name, passenger, seat,
    /// booking time). `NotFound` is checked before ownership so the two
    /// failure kinds stay distinguishable.
    pub async fn view(
        &self,
        pnr: &str,
        session: &SessionContext,
    ) -> Result<ReservationDetail, EngineError> {
        let identity = require_identity(session)?;

        let row: Option<ReservationDetailRow> = sqlx::query_as(
            "SELECT r.pnr, r.train_number, t.name AS train_name, t.source, t.destination,
                    r.username, r.passenger_name, r.age, r.seat_number, r.booking_timestamp
             FROM reservations r
             JOIN trains t ON r.train_number = t.train_number
             WHERE r.pnr = ?",
        )
        .bind(pnr)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or_else(|| EngineError::NotFound(format!("PNR {pnr}")))?;

        if row.username != identity.as_str() && !is_admin(identity, &self.admin_username) {
            return Err(EngineError::NotAuthorized(format!(
                "PNR {pnr} was booked by '{}'",
                row.username
            )));
        }

        Ok(row.into())
    }
}

/// Generate a PNR that does not collide with an existing reservation.
/// Collisions are retried inside the booking transaction, never
/// surfaced to the caller.
async fn fresh_pnr(tx: &mut Transaction<'_, Sqlite>) -> Result<String, EngineError> {
    for _ in 0..MAX_PNR_ATTEMPTS {
        let candidate = pnr::generate();
        let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM reservations WHERE pnr = ?")
            .bind(&candidate)
            .fetch_optional(&mut **tx)
            .await?;
        if exists.is_none() {
            return Ok(candidate);
        }
        warn!(pnr = %candidate, "PNR collision, regenerating");
    }
    Err(EngineError::Conflict(
        "could not generate a unique PNR".into(),
    ))
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct TrainSummaryRow {
    train_number: String,
    name: String,
    source: String,
    destination: String,
    available_seats: i32,
}

impl From<TrainSummaryRow> for TrainSummary {
    fn from(row: TrainSummaryRow) -> Self {
        TrainSummary {
            train_number: row.train_number,
            name: row.name,
            source: row.source,
            destination: row.destination,
            available_seats: row.available_seats,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReservationDetailRow {
    pnr: String,
    train_number: String,
    train_name: String,
    source: String,
    destination: String,
    username: String,
    passenger_name: String,
    age: i32,
    seat_number: i32,
    booking_timestamp: DateTime<Utc>,
}

impl From<ReservationDetailRow> for ReservationDetail {
    fn from(row: ReservationDetailRow) -> Self {
        ReservationDetail {
            pnr: row.pnr,
            train_number: row.train_number,
            train_name: row.train_name,
            source: row.source,
            destination: row.destination,
            username: row.username,
            passenger_name: row.passenger_name,
            age: row.age,
            seat_number: row.seat_number,
            booking_timestamp: row.booking_timestamp,
        }
    }
}
