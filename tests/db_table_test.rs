//! Tests for the subscription repository queries.

use chrono::Duration;
use chrono::Utc;
use jobwatch::database::table::Table;

mod common;

#[tokio::test]
async fn test_select_active_filters_by_frequency() {
    let (db, db_path) = common::setup_db().await;

    common::seed_user(&db, "u1", "Cook", "Victoria", "EN", Some("daily")).await;
    common::seed_user(&db, "u2", "Nurse", "Vancouver", "FR", Some("weekly")).await;

    let daily = db
        .subscription_table
        .select_active_by_cadence("daily", true)
        .await
        .expect("Failed to select");
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].user_id, "u1");

    let weekly = db
        .subscription_table
        .select_active_by_cadence("weekly", false)
        .await
        .expect("Failed to select");
    assert_eq!(weekly.len(), 1);
    assert_eq!(weekly[0].user_id, "u2");

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_unset_frequency_falls_under_default_cadence() {
    let (db, db_path) = common::setup_db().await;

    common::seed_user(&db, "u1", "Cook", "Victoria", "EN", None).await;

    let daily = db
        .subscription_table
        .select_active_by_cadence("daily", true)
        .await
        .expect("Failed to select");
    assert_eq!(daily.len(), 1);

    let weekly = db
        .subscription_table
        .select_active_by_cadence("weekly", false)
        .await
        .expect("Failed to select");
    assert!(weekly.is_empty());

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_removed_subscriptions_are_excluded() {
    let (db, db_path) = common::setup_db().await;

    let id = common::seed_subscription(&db, "u1", "Cook", "Victoria", "EN", Some("daily")).await;
    common::seed_token(&db, "u1", "token-u1", Utc::now()).await;

    let removed = db
        .subscription_table
        .mark_removed(id)
        .await
        .expect("Failed to mark removed");
    assert!(removed);

    let rows = db
        .subscription_table
        .select_active_by_cadence("daily", true)
        .await
        .expect("Failed to select");
    assert!(rows.is_empty());

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_joins_only_most_recent_token() {
    let (db, db_path) = common::setup_db().await;

    common::seed_subscription(&db, "u1", "Cook", "Victoria", "EN", Some("daily")).await;
    let now = Utc::now();
    common::seed_token(&db, "u1", "old-token", now - Duration::days(30)).await;
    common::seed_token(&db, "u1", "new-token", now).await;

    let rows = db
        .subscription_table
        .select_active_by_cadence("daily", true)
        .await
        .expect("Failed to select");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].token, "new-token");

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_users_without_token_are_excluded() {
    let (db, db_path) = common::setup_db().await;

    common::seed_subscription(&db, "u1", "Cook", "Victoria", "EN", Some("daily")).await;

    let rows = db
        .subscription_table
        .select_active_by_cadence("daily", true)
        .await
        .expect("Failed to select");
    assert!(rows.is_empty());

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_latest_token_lookup() {
    let (db, db_path) = common::setup_db().await;

    let now = Utc::now();
    common::seed_token(&db, "u1", "old-token", now - Duration::days(1)).await;
    common::seed_token(&db, "u1", "new-token", now).await;

    let latest = db
        .device_token_table
        .select_latest_by_user_id("u1")
        .await
        .expect("Failed to select")
        .expect("Expected a token");
    assert_eq!(latest.token, "new-token");

    let missing = db
        .device_token_table
        .select_latest_by_user_id("nobody")
        .await
        .expect("Failed to select");
    assert!(missing.is_none());

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_subscription_crud_roundtrip() {
    let (db, db_path) = common::setup_db().await;

    let id = common::seed_subscription(&db, "u1", "Cook", "Victoria", "EN", Some("daily")).await;

    let mut model = db
        .subscription_table
        .select(&id)
        .await
        .expect("Failed to select");
    assert_eq!(model.keyword, "Cook");

    model.keyword = "Baker".to_string();
    db.subscription_table
        .update(&model)
        .await
        .expect("Failed to update");

    let updated = db
        .subscription_table
        .select(&id)
        .await
        .expect("Failed to select");
    assert_eq!(updated.keyword, "Baker");

    db.subscription_table
        .delete(&id)
        .await
        .expect("Failed to delete");
    let all = db
        .subscription_table
        .select_all()
        .await
        .expect("Failed to select all");
    assert!(all.is_empty());

    common::teardown_db(db_path).await;
}
