// src/lib.rs
pub mod config;
pub mod search;
pub mod web;

pub use config::{FetchConfig, ScrapeConfig, SelectorRules};
pub use search::{JobRecord, JobSearch, SearchQuery};
pub use web::start_web_server;
