//! Results-pass orchestration: load, deduplicate, query, resolve, notify.

use std::sync::Arc;

use chrono::Utc;
use log::error;
use log::info;
use uuid::Uuid;

use crate::config::Config;
use crate::database::Database;
use crate::database::error::DatabaseError;
use crate::push::PushSender;
use crate::search::JobSearch;
use crate::service::cadence::Cadence;
use crate::service::dedup::InterestIndex;
use crate::service::error::ServiceError;
use crate::service::resolver::NotificationResolver;

/// Outcome of one completed pass. Individual query and delivery
/// failures are recorded here, not propagated; only a repository
/// failure aborts a pass.
#[derive(Debug, Clone)]
pub struct PassSummary {
    pub cadence: Cadence,
    pub subscriptions: usize,
    pub distinct_queries: usize,
    pub failed_queries: usize,
    pub notified: usize,
    pub failed_notifications: usize,
}

impl PassSummary {
    fn empty(cadence: Cadence) -> Self {
        Self {
            cadence,
            subscriptions: 0,
            distinct_queries: 0,
            failed_queries: 0,
            notified: 0,
            failed_notifications: 0,
        }
    }
}

impl std::fmt::Display for PassSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} pass: {} subscriptions, {} distinct queries ({} failed), {} notified ({} failed)",
            self.cadence,
            self.subscriptions,
            self.distinct_queries,
            self.failed_queries,
            self.notified,
            self.failed_notifications
        )
    }
}

/// Service running results notification passes.
pub struct AlertService {
    pub db: Arc<Database>,
    pub search: Arc<dyn JobSearch>,
    pub push: Arc<dyn PushSender>,
    config: Arc<Config>,
}

impl AlertService {
    pub fn new(
        db: Arc<Database>,
        search: Arc<dyn JobSearch>,
        push: Arc<dyn PushSender>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            db,
            search,
            push,
            config,
        }
    }

    /// Runs one full pass for the given cadence.
    ///
    /// All pass state is constructed here and dropped at the end;
    /// nothing persists between passes.
    ///
    /// # Performance
    /// * DB calls: 1
    /// * API calls: one search per distinct query, one push per notified user
    pub async fn run_pass(&self, cadence: Cadence) -> Result<PassSummary, ServiceError> {
        let pass_id = Uuid::new_v4();
        info!("[{pass_id}] Starting {cadence} results pass.");

        // Loading: a repository error is fatal, abort before any
        // external calls.
        let rows = self
            .db
            .subscription_table
            .select_active_by_cadence(cadence.frequency(), cadence.includes_unset_frequency())
            .await
            .map_err(DatabaseError::from)?;

        // Deduplicating
        let index = InterestIndex::build(&rows);
        if index.is_empty() {
            info!("[{pass_id}] No active subscriptions for {cadence}, nothing to do.");
            return Ok(PassSummary::empty(cadence));
        }

        // Querying + Resolving, highest-interest queries first
        let min_posted = Cadence::minimum_posted_date(Utc::now(), self.config.daily_hour);
        let mut resolver =
            NotificationResolver::new(self.push.as_ref(), self.config.notify_chunk_size);
        let mut failed_queries = 0;

        for key in index.prioritized() {
            match self
                .search
                .search(&key.keyword, &key.location, &key.language, min_posted)
                .await
            {
                Ok(result) => resolver.resolve(key, &result, &index).await,
                Err(e) => {
                    // One bad search must not block the others.
                    error!("[{pass_id}] Search failed for {key}: {e}");
                    failed_queries += 1;
                }
            }
        }

        let summary = PassSummary {
            cadence,
            subscriptions: rows.len(),
            distinct_queries: index.distinct_queries(),
            failed_queries,
            notified: resolver.notified_count(),
            failed_notifications: resolver.failed_count(),
        };
        info!("[{pass_id}] Finished: {summary}");
        Ok(summary)
    }
}
