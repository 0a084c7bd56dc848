// src/search/mod.rs
use serde::{Deserialize, Serialize};

pub mod coordinator;
pub mod extractor;
pub mod fetcher;
pub mod pipeline;
pub mod rate_limit;

pub use extractor::{ExtractError, SelectorTable};
pub use fetcher::{FetchError, FetchResult, Fetcher};
pub use pipeline::JobSearch;
pub use rate_limit::RateLimiter;

/// One extracted listing. Only the extractor constructs these, and only
/// with every required field populated and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub link: String,
}

/// Validated parameters for one search request.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub title: String,
    pub location: String,
    /// Result offset passed through to the listing site.
    pub start: usize,
    /// Cards taken from the page before extraction, not records guaranteed
    /// in the output.
    pub max_results: usize,
}
