//! Common test utilities.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use jobwatch::database::Database;
use jobwatch::database::model::DeviceTokenModel;
use jobwatch::database::model::SubscriptionModel;
use jobwatch::database::table::Table;
use uuid::Uuid;

/// Sets up a temporary test database.
pub async fn setup_db() -> (Arc<Database>, PathBuf) {
    let uuid = Uuid::new_v4();
    let db_path = std::env::temp_dir().join(format!("jobwatch-test-{}.db", uuid));
    let db_url = format!("sqlite://{}", db_path.to_str().unwrap());

    let db = Database::new(&db_url, db_path.to_str().unwrap())
        .await
        .expect("Failed to create database");

    db.run_migrations().await.expect("Failed to run migrations");

    (Arc::new(db), db_path)
}

/// Cleans up the test database file.
pub async fn teardown_db(db_path: PathBuf) {
    if db_path.exists() {
        let _ = std::fs::remove_file(db_path);
    }
}

#[allow(dead_code)]
pub async fn seed_subscription(
    db: &Database,
    user_id: &str,
    keyword: &str,
    location: &str,
    language: &str,
    frequency: Option<&str>,
) -> i64 {
    let model = SubscriptionModel {
        user_id: user_id.to_string(),
        keyword: keyword.to_string(),
        location: location.to_string(),
        language: language.to_string(),
        frequency: frequency.map(|f| f.to_string()),
        created_at: Utc::now(),
        ..Default::default()
    };
    db.subscription_table
        .insert(&model)
        .await
        .expect("Failed to insert subscription")
}

#[allow(dead_code)]
pub async fn seed_token(db: &Database, user_id: &str, token: &str, created_at: DateTime<Utc>) {
    let model = DeviceTokenModel {
        user_id: user_id.to_string(),
        token: token.to_string(),
        platform: "android".to_string(),
        created_at,
        ..Default::default()
    };
    db.device_token_table
        .insert(&model)
        .await
        .expect("Failed to insert device token");
}

/// Seeds one subscription plus a current device token for the user.
#[allow(dead_code)]
pub async fn seed_user(
    db: &Database,
    user_id: &str,
    keyword: &str,
    location: &str,
    language: &str,
    frequency: Option<&str>,
) {
    seed_subscription(db, user_id, keyword, location, language, frequency).await;
    seed_token(db, user_id, &format!("token-{user_id}"), Utc::now()).await;
}
