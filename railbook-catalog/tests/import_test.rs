use railbook_catalog::import_trains;
use railbook_store::DbClient;
use std::io::Write;
use tempfile::TempDir;

async fn setup() -> (TempDir, DbClient) {
    let dir = TempDir::new().unwrap();
    let db = DbClient::connect(dir.path().join("catalog-test.db"))
        .await
        .unwrap();
    db.migrate().await.unwrap();
    (dir, db)
}

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[tokio::test]
async fn test_import_assigns_default_capacity() {
    let (dir, db) = setup().await;
    let path = write_csv(
        &dir,
        "trains.csv",
        "Train no.,Train name,Starts,Ends\n\
         12301,Rajdhani Express,Delhi,Mumbai\n\
         12302,Shatabdi Express,Delhi,Chennai\n",
    );

    let report = import_trains(&db.pool, &path, 500).await.unwrap();
    assert_eq!(report.rows_read, 2);
    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped, 0);

    let (total, available): (i32, i32) = sqlx::query_as(
        "SELECT total_seats, available_seats FROM trains WHERE train_number = '12301'",
    )
    .fetch_one(&db.pool)
    .await
    .unwrap();
    assert_eq!((total, available), (500, 500));
}

#[tokio::test]
async fn test_reimport_updates_fields_and_resets_counters() {
    let (dir, db) = setup().await;
    let path = write_csv(
        &dir,
        "trains.csv",
        "Train no.,Train name,Starts,Ends\n12301,Rajdhani Express,Delhi,Mumbai\n",
    );
    import_trains(&db.pool, &path, 100).await.unwrap();

    // Simulate booking activity, then a re-ingestion with a renamed train
    sqlx::query("UPDATE trains SET available_seats = 90 WHERE train_number = '12301'")
        .execute(&db.pool)
        .await
        .unwrap();
    let path = write_csv(
        &dir,
        "trains2.csv",
        "Train no.,Train name,Starts,Ends\n12301,Rajdhani Superfast,Delhi,Mumbai\n",
    );
    import_trains(&db.pool, &path, 100).await.unwrap();

    let (name, available): (String, i32) =
        sqlx::query_as("SELECT name, available_seats FROM trains WHERE train_number = '12301'")
            .fetch_one(&db.pool)
            .await
            .unwrap();
    assert_eq!(name, "Rajdhani Superfast");
    assert_eq!(available, 100);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trains")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_rows_with_empty_train_number_are_skipped() {
    let (dir, db) = setup().await;
    let path = write_csv(
        &dir,
        "trains.csv",
        "Train no.,Train name,Starts,Ends\n\
         ,Ghost Train,Delhi,Mumbai\n\
         12303,Duronto Express,Delhi,Pune\n",
    );

    let report = import_trains(&db.pool, &path, 500).await.unwrap();
    assert_eq!(report.rows_read, 2);
    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped, 1);
}
