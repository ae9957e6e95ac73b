//! Push notification payloads and their wire shapes.

use serde_json::Value;
use serde_json::json;

/// One saved search entry inside a digest payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSearchRef {
    pub keyword: String,
    pub city: String,
    pub language: String,
    /// "weekly" or "monthly".
    pub digest: String,
}

/// In-app screen the notification navigates to when tapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationData {
    /// Deep link to one posting's detail screen.
    JobDetail { job_id: String },
    /// Generic search-results screen for the user's saved search.
    SearchResults {
        keyword: String,
        city: String,
        language: String,
    },
    /// Reminder digest listing all of the user's saved searches.
    Digest { searches: Vec<SavedSearchRef> },
}

impl NavigationData {
    pub fn to_value(&self) -> Value {
        match self {
            Self::JobDetail { job_id } => json!({
                "screen": "job-details",
                "jobId": job_id,
            }),
            Self::SearchResults {
                keyword,
                city,
                language,
            } => json!({
                "screen": "job-search",
                "keyword": keyword,
                "city": city,
                "language": language,
            }),
            Self::Digest { searches } => {
                let entries = searches
                    .iter()
                    .map(|s| {
                        json!({
                            "keyword": s.keyword,
                            "city": s.city,
                            "language": s.language,
                            "digest": s.digest,
                        })
                    })
                    .collect::<Vec<_>>();
                json!({
                    "screen": "saved-searches",
                    "searches": entries,
                })
            }
        }
    }
}

/// Everything needed for one push delivery.
#[derive(Debug, Clone)]
pub struct NotificationPayload {
    pub title: String,
    pub content: String,
    pub token: String,
    pub platform: String,
    pub data: NavigationData,
}

/// Localized title and content for a new-postings notification.
pub fn alert_text(language: &str) -> (&'static str, &'static str) {
    if language.eq_ignore_ascii_case("fr") {
        (
            "Nouveaux emplois pour vous",
            "De nouvelles offres correspondent à votre recherche d'emploi sauvegardée.",
        )
    } else {
        (
            "New jobs for you",
            "New postings match your saved job search.",
        )
    }
}

/// Localized title and content for a weekly/monthly digest.
pub fn digest_text(language: &str, digest: &str) -> (&'static str, String) {
    if language.eq_ignore_ascii_case("fr") {
        let cadence = if digest == "monthly" {
            "mensuel"
        } else {
            "hebdomadaire"
        };
        (
            "Vos recherches d'emploi sauvegardées",
            format!("Voici votre rappel {cadence} de vos recherches sauvegardées."),
        )
    } else {
        (
            "Your saved job searches",
            format!("Here is your {digest} reminder of your saved searches."),
        )
    }
}
