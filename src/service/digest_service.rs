//! Weekly/monthly digest passes.
//!
//! A digest is a reminder listing all of a user's saved searches; no
//! external search call is made and no new-posting detection occurs.

use std::collections::HashMap;
use std::sync::Arc;

use log::info;
use uuid::Uuid;

use crate::config::Config;
use crate::database::Database;
use crate::database::error::DatabaseError;
use crate::database::model::ActiveSubscriptionRow;
use crate::push::PushSender;
use crate::push::payload::NavigationData;
use crate::push::payload::NotificationPayload;
use crate::push::payload::SavedSearchRef;
use crate::push::payload::digest_text;
use crate::service::alert_service::PassSummary;
use crate::service::cadence::Cadence;
use crate::service::error::ServiceError;
use crate::service::resolver::NotificationResolver;

/// Service running digest notification passes.
pub struct DigestService {
    pub db: Arc<Database>,
    pub push: Arc<dyn PushSender>,
    config: Arc<Config>,
}

impl DigestService {
    pub fn new(db: Arc<Database>, push: Arc<dyn PushSender>, config: Arc<Config>) -> Self {
        Self { db, push, config }
    }

    /// Runs one digest pass: one notification per user carrying all of
    /// that user's saved searches for the cadence.
    ///
    /// # Performance
    /// * DB calls: 1
    /// * API calls: one push per user
    pub async fn run_pass(&self, cadence: Cadence) -> Result<PassSummary, ServiceError> {
        let label = cadence
            .digest_label()
            .ok_or_else(|| ServiceError::UnexpectedResult {
                message: format!("{cadence} cadence has no digest variant"),
            })?;

        let pass_id = Uuid::new_v4();
        info!("[{pass_id}] Starting {cadence} digest pass.");

        // A repository error is fatal, abort before any external calls.
        let rows = self
            .db
            .subscription_table
            .select_active_by_cadence(cadence.frequency(), cadence.includes_unset_frequency())
            .await
            .map_err(DatabaseError::from)?;

        let batch = Self::build_digests(&rows, label);
        let subscriptions = rows.len();

        let mut resolver =
            NotificationResolver::new(self.push.as_ref(), self.config.notify_chunk_size);
        resolver.dispatch(batch).await;

        let summary = PassSummary {
            cadence,
            subscriptions,
            distinct_queries: 0,
            failed_queries: 0,
            notified: resolver.notified_count(),
            failed_notifications: resolver.failed_count(),
        };
        info!("[{pass_id}] Finished: {summary}");
        Ok(summary)
    }

    /// Groups rows by `(user_id, token)` in first-seen order and builds
    /// one digest payload per group. Title and content are localized by
    /// the user's first search's language.
    fn build_digests(
        rows: &[ActiveSubscriptionRow],
        label: &str,
    ) -> Vec<(String, NotificationPayload)> {
        let mut order: Vec<(String, String)> = Vec::new();
        let mut groups: HashMap<(String, String), Vec<&ActiveSubscriptionRow>> = HashMap::new();

        for row in rows {
            let group = (row.user_id.clone(), row.token.clone());
            groups
                .entry(group.clone())
                .or_insert_with(|| {
                    order.push(group.clone());
                    Vec::new()
                })
                .push(row);
        }

        order
            .into_iter()
            .map(|group| {
                let searches = &groups[&group];
                let first = searches[0];
                let (title, content) = digest_text(&first.language, label);

                let entries = searches
                    .iter()
                    .map(|s| SavedSearchRef {
                        keyword: s.keyword.clone(),
                        city: s.location.clone(),
                        language: s.language.clone(),
                        digest: label.to_string(),
                    })
                    .collect();

                (
                    group.0,
                    NotificationPayload {
                        title: title.to_string(),
                        content,
                        token: first.token.clone(),
                        platform: first.platform.clone(),
                        data: NavigationData::Digest { searches: entries },
                    },
                )
            })
            .collect()
    }
}
