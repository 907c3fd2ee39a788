use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. The username is the identity key; the hash is
/// opaque to everything except the auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub password_hash: String,
}

/// A train in the catalog. `total_seats` is fixed at import time;
/// `available_seats` is the only counter booking activity may touch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Train {
    pub train_number: String,
    pub name: String,
    pub source: String,
    pub destination: String,
    pub total_seats: i32,
    pub available_seats: i32,
}

/// Search result row: what a caller needs to pick a train to book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainSummary {
    pub train_number: String,
    pub name: String,
    pub source: String,
    pub destination: String,
    pub available_seats: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub pnr: String,
    pub train_number: String,
    pub username: String,
    pub passenger_name: String,
    pub age: i32,
    pub seat_number: i32,
    pub booking_timestamp: DateTime<Utc>,
}

/// What `book` hands back on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub pnr: String,
    pub seat_number: i32,
}

/// Reservation joined with its train, for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationDetail {
    pub pnr: String,
    pub train_number: String,
    pub train_name: String,
    pub source: String,
    pub destination: String,
    pub username: String,
    pub passenger_name: String,
    pub age: i32,
    pub seat_number: i32,
    pub booking_timestamp: DateTime<Utc>,
}

/// Dashboard snapshot. Approximate by design: the reads behind it are
/// not serialized against in-flight bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_accounts: i64,
    pub total_trains: i64,
    pub total_reservations: i64,
    pub total_seats: i64,
    pub booked_seats: i64,
    pub occupancy_percent: f64,
}
