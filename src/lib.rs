//! jobwatch - scheduled job-search alerts over push notifications.
//!
//! Re-evaluates saved job searches on a daily/weekly/monthly cadence
//! against an external job search API, deduplicates the external calls
//! per distinct search, and pushes at most one notification per user
//! per pass.

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod push;
pub mod search;
pub mod server;
pub mod service;
pub mod task;
