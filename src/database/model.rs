use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use sqlx::FromRow;

/// One saved job search belonging to a user.
#[derive(FromRow, Debug, Clone, Serialize)]
pub struct SubscriptionModel {
    pub id: i64,
    pub user_id: String,
    pub keyword: String,
    pub location: String,
    pub language: String,
    /// Notification cadence: "daily", "weekly" or "monthly". Unset means
    /// the default cadence (daily).
    pub frequency: Option<String>,
    pub removed: bool,
    pub created_at: DateTime<Utc>,
}

impl Default for SubscriptionModel {
    fn default() -> Self {
        Self {
            id: 0,
            user_id: String::new(),
            keyword: String::new(),
            location: String::new(),
            language: String::new(),
            frequency: None,
            removed: false,
            created_at: DateTime::<Utc>::MIN_UTC,
        }
    }
}

/// A push token registered by a user's device. Only the most recently
/// created token per user is targeted.
#[derive(FromRow, Debug, Clone, Serialize)]
pub struct DeviceTokenModel {
    pub id: i64,
    pub user_id: String,
    pub token: String,
    pub platform: String,
    pub created_at: DateTime<Utc>,
}

impl Default for DeviceTokenModel {
    fn default() -> Self {
        Self {
            id: 0,
            user_id: String::new(),
            token: String::new(),
            platform: String::new(),
            created_at: DateTime::<Utc>::MIN_UTC,
        }
    }
}

/// Join of a subscription with its owner's current device token, as
/// consumed by a notification pass.
#[derive(FromRow, Debug, Clone, Serialize)]
pub struct ActiveSubscriptionRow {
    pub user_id: String,
    pub keyword: String,
    pub location: String,
    pub language: String,
    pub token: String,
    pub platform: String,
}
