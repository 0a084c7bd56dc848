// src/search/pipeline.rs
use super::coordinator;
use super::extractor::SelectorTable;
use super::fetcher::{FetchResult, Fetcher};
use super::{JobRecord, SearchQuery};
use crate::config::ScrapeConfig;
use anyhow::{Context, Result};
use reqwest::Url;
use scraper::Html;
use std::sync::Arc;
use tracing::{info, warn};

/// The whole search path: build the outbound URL, fetch the listing page,
/// cut it into cards, extract records concurrently.
pub struct JobSearch {
    fetcher: Fetcher,
    selectors: Arc<SelectorTable>,
    base_url: Url,
}

impl JobSearch {
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        let selectors = Arc::new(SelectorTable::compile(&config.selectors)?);
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid listing base URL: {}", config.base_url))?;
        let fetcher = Fetcher::new(config.fetch)?;

        Ok(Self {
            fetcher,
            selectors,
            base_url,
        })
    }

    /// Never fails: any fetch problem degrades to an empty result list,
    /// with the detail going to the log.
    pub async fn search(&self, query: &SearchQuery) -> Vec<JobRecord> {
        let url = self.build_url(query);
        info!("Scraping listing page: {}", url);

        let body = match self.fetcher.fetch(url.as_str()).await {
            FetchResult::Success { status, body } => {
                info!("Listing page status: {}", status);
                body
            }
            FetchResult::Failure(e) => {
                warn!("Listing fetch failed, returning no results: {}", e);
                return Vec::new();
            }
        };

        self.records_from_page(&body, query.max_results).await
    }

    fn build_url(&self, query: &SearchQuery) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("keywords", &query.title)
            .append_pair("location", &query.location)
            .append_pair("start", &query.start.to_string());
        url
    }

    async fn records_from_page(&self, body: &str, max_results: usize) -> Vec<JobRecord> {
        // The parsed document is not Send, so card fragments are detached
        // as owned HTML before anything crosses a task boundary.
        let fragments: Vec<String> = {
            let page = Html::parse_document(body);
            page.select(&self.selectors.card)
                .map(|card| card.html())
                .collect()
        };
        info!("Found {} job cards on page", fragments.len());

        coordinator::extract_all(Arc::clone(&self.selectors), fragments, max_results).await
    }
}
