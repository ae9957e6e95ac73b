/// One posting returned by the job search API.
///
/// The identifier is optional on the wire; a missing identifier forces
/// the generic search-results navigation target.
#[derive(Debug, Clone)]
pub struct JobPosting {
    pub job_id: Option<String>,
}

/// Result of one deduplicated search query. Consumed immediately to
/// drive notification decisions, never retained across a pass.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub new_count: u64,
    pub postings: Vec<JobPosting>,
}

impl SearchResult {
    /// Whether this result should trigger notifications at all.
    pub fn has_new_postings(&self) -> bool {
        self.new_count > 0 && !self.postings.is_empty()
    }
}
