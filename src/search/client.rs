//! Job search API client.

use std::num::NonZeroU32;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use governor::Quota;
use governor::RateLimiter;
use governor::clock::QuantaClock;
use governor::state::InMemoryState;
use governor::state::direct::NotKeyed;
use log::debug;
use reqwest::Client;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::USER_AGENT;
use serde_json::Value;

use crate::search::error::SearchError;
use crate::search::model::JobPosting;
use crate::search::model::SearchResult;

/// Interface to the external job search backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobSearch: Send + Sync {
    /// Fetches postings for one `(keyword, location, language)` query,
    /// restricted to postings at or after `minimum_posted_date`.
    async fn search(
        &self,
        keyword: &str,
        location: &str,
        language: &str,
        minimum_posted_date: DateTime<Utc>,
    ) -> Result<SearchResult, SearchError>;
}

/// HTTP client for the job search API.
pub struct JobSearchClient {
    pub api_url: String,
    client: Client,
    limiter: RateLimiter<NotKeyed, InMemoryState, QuantaClock>,
}

impl JobSearchClient {
    pub fn new(api_url: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("jobwatch/0.3"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to create client");

        // The job bank enforces a request budget; stay well under it so
        // a large pass never gets throttled mid-way.
        let limiter = RateLimiter::direct(Quota::per_second(NonZeroU32::new(5).unwrap()));

        Self {
            api_url: api_url.to_string(),
            client,
            limiter,
        }
    }

    fn get_count_from_resp(resp: &Value) -> Result<u64, SearchError> {
        resp.get("new")
            .or_else(|| resp.get("count"))
            .and_then(|v| v.as_u64())
            .ok_or_else(|| SearchError::MalformedResponse {
                field: "new or count".to_string(),
            })
    }

    fn get_postings_from_resp(resp: &Value) -> Result<Vec<JobPosting>, SearchError> {
        let jobs = match resp.get("jobs") {
            // An absent list is an empty result, but a present non-array
            // is a contract violation.
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(v) => v.as_array().ok_or_else(|| SearchError::MalformedResponse {
                field: "jobs".to_string(),
            })?,
        };

        Ok(jobs
            .iter()
            .map(|job| JobPosting {
                job_id: job
                    .get("JobId")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
            })
            .collect())
    }
}

#[async_trait]
impl JobSearch for JobSearchClient {
    async fn search(
        &self,
        keyword: &str,
        location: &str,
        language: &str,
        minimum_posted_date: DateTime<Utc>,
    ) -> Result<SearchResult, SearchError> {
        self.limiter.until_ready().await;

        debug!("Searching jobs: {keyword} / {location} / {language}");
        let resp = self
            .client
            .get(&self.api_url)
            .query(&[
                ("jobTitle", keyword),
                ("location", location),
                ("language", language),
                ("minimumPostedDate", &minimum_posted_date.to_rfc3339()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(SearchError::ApiError {
                status: resp.status().as_u16(),
            });
        }

        let body = resp.json::<Value>().await?;
        let new_count = Self::get_count_from_resp(&body)?;
        let postings = Self::get_postings_from_resp(&body)?;

        Ok(SearchResult {
            new_count,
            postings,
        })
    }
}
