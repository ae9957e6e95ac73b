//! Search query deduplication.
//!
//! Many users save the same search; the job search backend is the
//! rate-limited resource, so a pass issues one query per distinct
//! `(keyword, location, language)` tuple rather than one per
//! subscription.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::collections::HashSet;

use crate::database::model::ActiveSubscriptionRow;

/// Canonical `(keyword, location, language)` tuple, the unit of
/// external-API deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub keyword: String,
    pub location: String,
    pub language: String,
}

impl QueryKey {
    pub fn of(row: &ActiveSubscriptionRow) -> Self {
        Self {
            keyword: row.keyword.clone(),
            location: row.location.clone(),
            language: row.language.clone(),
        }
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.keyword, self.location, self.language)
    }
}

/// Pass-local index from QueryKey to the users interested in it, and
/// from user to that user's subscription rows. Built once per pass and
/// dropped at its end.
pub struct InterestIndex {
    /// Keys in first-seen order.
    keys: Vec<QueryKey>,
    /// Distinct interested user ids per key, insertion order preserved.
    interested: HashMap<QueryKey, Vec<String>>,
    /// Each user's rows, used to recover token/platform for payloads.
    by_user: HashMap<String, Vec<ActiveSubscriptionRow>>,
}

impl InterestIndex {
    pub fn build(rows: &[ActiveSubscriptionRow]) -> Self {
        let mut keys: Vec<QueryKey> = Vec::new();
        let mut interested: HashMap<QueryKey, Vec<String>> = HashMap::new();
        let mut by_user: HashMap<String, Vec<ActiveSubscriptionRow>> = HashMap::new();
        let mut seen: HashSet<(QueryKey, String)> = HashSet::new();

        for row in rows {
            let key = QueryKey::of(row);

            if !interested.contains_key(&key) {
                keys.push(key.clone());
            }
            if seen.insert((key.clone(), row.user_id.clone())) {
                interested.entry(key).or_default().push(row.user_id.clone());
            }

            by_user
                .entry(row.user_id.clone())
                .or_default()
                .push(row.clone());
        }

        Self {
            keys,
            interested,
            by_user,
        }
    }

    /// Keys ordered by descending distinct-user count; ties keep
    /// first-seen order. Processing the most-shared queries first
    /// serves the most users before any rate limit truncates the pass.
    pub fn prioritized(&self) -> Vec<&QueryKey> {
        let mut keys: Vec<&QueryKey> = self.keys.iter().collect();
        // Stable sort preserves first-seen order between equal counts
        keys.sort_by_key(|key| Reverse(self.interested[*key].len()));
        keys
    }

    pub fn interested_users(&self, key: &QueryKey) -> &[String] {
        self.interested.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn subscriptions_of(&self, user_id: &str) -> &[ActiveSubscriptionRow] {
        self.by_user.get(user_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn distinct_queries(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
