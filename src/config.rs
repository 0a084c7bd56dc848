// src/config.rs
use std::time::Duration;

/// Outbound request settings: client identity, timeout, retry and throttle.
///
/// Built once at startup and handed to the fetcher; nothing here is global
/// process state.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub request_timeout: Duration,
    /// Total attempts per fetch, including the first one.
    pub max_attempts: u32,
    /// First retry delay; doubles on each further attempt.
    pub backoff_base: Duration,
    pub max_calls_per_period: u32,
    pub rate_period: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            request_timeout: Duration::from_secs(10),
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
            max_calls_per_period: 10,
            rate_period: Duration::from_secs(60),
        }
    }
}

impl FetchConfig {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    pub fn with_rate_limit(mut self, max_calls: u32, period: Duration) -> Self {
        self.max_calls_per_period = max_calls;
        self.rate_period = period;
        self
    }
}

/// Structural lookup rules for the listing markup.
///
/// Kept as plain strings so a markup change on the source site is a
/// one-place edit, not a hunt through the extraction code. Compiled into a
/// `SelectorTable` before use.
#[derive(Debug, Clone)]
pub struct SelectorRules {
    pub card: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub link: String,
}

impl Default for SelectorRules {
    fn default() -> Self {
        Self {
            card: "div.base-card".to_string(),
            title: "h3.base-search-card__title".to_string(),
            company: "h4.base-search-card__subtitle".to_string(),
            location: "span.job-search-card__location".to_string(),
            salary: "span.job-search-card__salary-info".to_string(),
            link: "a.base-card__full-link".to_string(),
        }
    }
}

/// Everything the search pipeline needs to talk to the listing site.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub fetch: FetchConfig,
    pub selectors: SelectorRules,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.linkedin.com/jobs/search".to_string(),
            fetch: FetchConfig::default(),
            selectors: SelectorRules::default(),
        }
    }
}

impl ScrapeConfig {
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }
}
