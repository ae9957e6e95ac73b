//! Per-pass notification resolution.

use std::collections::HashSet;

use futures::future::join_all;
use log::debug;
use log::error;
use log::warn;

use crate::push::PushSender;
use crate::push::payload::NavigationData;
use crate::push::payload::NotificationPayload;
use crate::push::payload::alert_text;
use crate::search::model::SearchResult;
use crate::service::dedup::InterestIndex;
use crate::service::dedup::QueryKey;

/// Resolves which users get notified for each search result and
/// dispatches the deliveries.
///
/// Owns the pass-local notified set: a user id enters it at most once
/// per pass, and once present no further notification is sent to that
/// user regardless of how many later QueryKeys match them. A user whose
/// delivery failed is NOT inserted and stays eligible for later keys.
pub struct NotificationResolver<'a> {
    push: &'a dyn PushSender,
    chunk_size: usize,
    notified: HashSet<String>,
    failed: usize,
}

impl<'a> NotificationResolver<'a> {
    pub fn new(push: &'a dyn PushSender, chunk_size: usize) -> Self {
        Self {
            push,
            chunk_size: chunk_size.max(1),
            notified: HashSet::new(),
            failed: 0,
        }
    }

    /// Users successfully notified so far this pass.
    pub fn notified_count(&self) -> usize {
        self.notified.len()
    }

    /// Deliveries that failed so far this pass.
    pub fn failed_count(&self) -> usize {
        self.failed
    }

    /// Notifies every interested, not-yet-notified user for one
    /// QueryKey's search result.
    pub async fn resolve(&mut self, key: &QueryKey, result: &SearchResult, index: &InterestIndex) {
        if !result.has_new_postings() {
            debug!("No new postings for {key}, nothing to notify.");
            return;
        }

        // The navigation target is decided once per result; every
        // interested user for this key gets the same target.
        let target = navigation_for(key, result);

        let mut batch = Vec::new();
        for user_id in index.interested_users(key) {
            if self.notified.contains(user_id) {
                continue;
            }
            // Recover token/platform/language from the user's own
            // subscription matching this key.
            let sub = index
                .subscriptions_of(user_id)
                .iter()
                .find(|s| s.keyword == key.keyword && s.location == key.location);
            let Some(sub) = sub else {
                warn!("User {user_id} has no subscription matching {key}, skipping.");
                continue;
            };

            let (title, content) = alert_text(&sub.language);
            batch.push((
                user_id.clone(),
                NotificationPayload {
                    title: title.to_string(),
                    content: content.to_string(),
                    token: sub.token.clone(),
                    platform: sub.platform.clone(),
                    data: target.clone(),
                },
            ));
        }

        self.dispatch(batch).await;
    }

    /// Delivers a batch of notifications in bounded chunks, awaiting
    /// each chunk's outbound calls before starting the next. The
    /// notified set is only mutated here, sequentially per chunk.
    pub async fn dispatch(&mut self, batch: Vec<(String, NotificationPayload)>) {
        let push = self.push;
        for chunk in batch.chunks(self.chunk_size) {
            let sends = chunk
                .iter()
                .filter(|(user_id, _)| !self.notified.contains(user_id))
                .map(|(user_id, payload)| async move { (user_id, push.send(payload).await) })
                .collect::<Vec<_>>();

            for (user_id, result) in join_all(sends).await {
                match result {
                    Ok(()) => {
                        self.notified.insert(user_id.clone());
                    }
                    Err(e) => {
                        error!("Failed to notify user {user_id}: {e}");
                        self.failed += 1;
                    }
                }
            }
        }
    }
}

/// Tie-break policy for the navigation target.
///
/// A single new posting with an identifier deep-links to its detail
/// screen; anything ambiguous (several postings, or no identifier)
/// navigates to the generic search-results screen and lets the user
/// choose.
fn navigation_for(key: &QueryKey, result: &SearchResult) -> NavigationData {
    if result.new_count == 1
        && let Some(posting) = result.postings.first()
        && let Some(job_id) = &posting.job_id
    {
        return NavigationData::JobDetail {
            job_id: job_id.clone(),
        };
    }
    NavigationData::SearchResults {
        keyword: key.keyword.clone(),
        city: key.location.clone(),
        language: key.language.clone(),
    }
}
