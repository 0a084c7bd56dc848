// src/search/extractor.rs
use super::JobRecord;
use crate::config::SelectorRules;
use anyhow::{anyhow, Result};
use scraper::{Html, Selector};
use thiserror::Error;

/// Salary shown when the card carries no salary element at all.
pub const SALARY_NOT_PROVIDED: &str = "Not provided";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Compiled lookup rules, one selector per record field.
///
/// The string form lives in `SelectorRules`; compiling up front surfaces a
/// bad rule at startup instead of on every card.
pub struct SelectorTable {
    pub card: Selector,
    title: Selector,
    company: Selector,
    location: Selector,
    salary: Selector,
    link: Selector,
}

impl SelectorTable {
    pub fn compile(rules: &SelectorRules) -> Result<Self> {
        Ok(Self {
            card: parse_selector(&rules.card)?,
            title: parse_selector(&rules.title)?,
            company: parse_selector(&rules.company)?,
            location: parse_selector(&rules.location)?,
            salary: parse_selector(&rules.salary)?,
            link: parse_selector(&rules.link)?,
        })
    }
}

fn parse_selector(rule: &str) -> Result<Selector> {
    Selector::parse(rule).map_err(|e| anyhow!("invalid selector '{}': {}", rule, e))
}

/// Pulls one `JobRecord` out of a single card fragment.
///
/// Emits a complete record or nothing: any required field that fails to
/// resolve aborts this card only, and the error names the field. Pure with
/// respect to its input, so cards can be processed concurrently.
pub fn extract_job(table: &SelectorTable, fragment: &str) -> Result<JobRecord, ExtractError> {
    let card = Html::parse_fragment(fragment);

    let title = required_text(&card, &table.title, "title")?;
    let company = required_text(&card, &table.company, "company")?;
    let location = required_text(&card, &table.location, "location")?;

    let salary = card
        .select(&table.salary)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| SALARY_NOT_PROVIDED.to_string());

    // The link comes from the anchor's attribute, not its text; an anchor
    // without an href is as useless as no anchor.
    let link = card
        .select(&table.link)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .ok_or(ExtractError::MissingField("link"))?;

    Ok(JobRecord {
        title,
        company,
        location,
        salary,
        link,
    })
}

fn required_text(
    card: &Html,
    selector: &Selector,
    field: &'static str,
) -> Result<String, ExtractError> {
    card.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(ExtractError::MissingField(field))
}
