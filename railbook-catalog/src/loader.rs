use railbook_core::models::Train;
use serde::Deserialize;
use sqlx::{Pool, Sqlite};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse catalog file: {0}")]
    Csv(#[from] csv::Error),

    #[error("store unavailable: {0}")]
    Store(#[from] sqlx::Error),
}

/// Outcome of one import run.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportReport {
    pub rows_read: usize,
    pub imported: usize,
    pub skipped: usize,
}

/// One row of the external catalog dump. Column names come from the
/// upstream export, not from us.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Train no.")]
    train_number: String,
    #[serde(rename = "Train name")]
    name: String,
    #[serde(rename = "Starts")]
    source: String,
    #[serde(rename = "Ends")]
    destination: String,
}

/// Bulk-load trains from a headered CSV into the trains table.
///
/// Every train gets `default_seats` as its capacity, with all seats
/// available. Re-importing a known train number updates its descriptive
/// fields and resets both seat counters. The whole file goes in as one
/// transaction; a half-imported catalog is never observable. Rows that
/// fail to parse are skipped with a warning rather than aborting the
/// run.
pub async fn import_trains(
    pool: &Pool<Sqlite>,
    csv_path: impl AsRef<Path>,
    default_seats: i32,
) -> Result<ImportReport, CatalogError> {
    let mut reader = csv::Reader::from_path(csv_path.as_ref())?;
    let mut report = ImportReport::default();
    let mut trains = Vec::new();

    for record in reader.deserialize::<CatalogRow>() {
        report.rows_read += 1;
        match record {
            Ok(row) => {
                let train_number = row.train_number.trim().to_string();
                if train_number.is_empty() {
                    warn!(row = report.rows_read, "skipping row with empty train number");
                    report.skipped += 1;
                    continue;
                }
                trains.push(Train {
                    train_number,
                    name: row.name.trim().to_string(),
                    source: row.source.trim().to_string(),
                    destination: row.destination.trim().to_string(),
                    total_seats: default_seats,
                    available_seats: default_seats,
                });
            }
            Err(err) => {
                warn!(row = report.rows_read, %err, "skipping malformed catalog row");
                report.skipped += 1;
            }
        }
    }

    let mut tx = pool.begin().await?;
    for train in trains {
        sqlx::query(
            "INSERT INTO trains
                 (train_number, name, source, destination, total_seats, available_seats)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT (train_number) DO UPDATE SET
                 name = excluded.name,
                 source = excluded.source,
                 destination = excluded.destination,
                 total_seats = excluded.total_seats,
                 available_seats = excluded.available_seats",
        )
        .bind(&train.train_number)
        .bind(&train.name)
        .bind(&train.source)
        .bind(&train.destination)
        .bind(train.total_seats)
        .bind(train.available_seats)
        .execute(&mut *tx)
        .await?;
        report.imported += 1;
    }
    tx.commit().await?;

    info!(
        rows_read = report.rows_read,
        imported = report.imported,
        skipped = report.skipped,
        "catalog import complete"
    );
    Ok(report)
}
