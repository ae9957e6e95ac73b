pub mod client;
pub mod error;
pub mod model;

pub use client::JobSearch;
pub use client::JobSearchClient;
pub use model::JobPosting;
pub use model::SearchResult;
