//! Translation of dashboard request parameters into record filters.
//!
//! A [`TransactionFilter`] is built once from the raw query string values and
//! can then be rendered as a sea-orm [`Condition`] for the store, or evaluated
//! in memory against a single record with the same semantics.

use crate::database::entities::transactions;
use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};
use std::{fmt, str::FromStr};
use thiserror::Error;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 10;
pub const MAX_PER_PAGE: u64 = 100;

const LIKE_ESCAPE: char = '\\';

/// Rejected request parameters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid month '{0}': expected a number between 1 and 12")]
    InvalidMonth(String),
    #[error("Invalid page '{0}': expected a positive integer")]
    InvalidPage(String),
    #[error("Invalid perPage '{0}': expected an integer between 1 and {max}", max = MAX_PER_PAGE)]
    InvalidPerPage(String),
    #[error("Invalid force '{0}': expected true or false")]
    InvalidFlag(String),
}

/// Calendar month, matched against the sale date text regardless of year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(u8);

impl Month {
    pub fn new(number: u8) -> Option<Self> {
        (1..=12).contains(&number).then_some(Self(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Substring that a matching `dateOfSale` must contain, e.g. `-03-`
    pub fn pattern(self) -> String {
        format!("-{:02}-", self.0)
    }
}

impl FromStr for Month {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Month::new)
            .ok_or_else(|| QueryError::InvalidMonth(s.to_string()))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Free-text search over title, description and exact price
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTerm {
    text: String,
    price: Option<f64>,
}

impl SearchTerm {
    /// Returns `None` for blank input, which means "no search".
    ///
    /// The price clause only exists when the whole term is a finite number;
    /// a term like `shirt` never matches on price.
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        let price = text.parse::<f64>().ok().filter(|p| p.is_finite());

        Some(Self {
            text: text.to_string(),
            price,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    fn condition(&self) -> Condition {
        let needle = self.text.to_ascii_lowercase();
        let mut any = Condition::any()
            .add(contains_ignore_case(transactions::Column::Title, &needle))
            .add(contains_ignore_case(
                transactions::Column::Description,
                &needle,
            ));

        if let Some(price) = self.price {
            any = any.add(transactions::Column::Price.eq(price));
        }

        any
    }

    #[cfg(test)]
    fn matches(&self, record: &transactions::Model) -> bool {
        let needle = self.text.to_ascii_lowercase();
        let text_match = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|value| value.to_ascii_lowercase().contains(&needle))
        };

        text_match(&record.title)
            || text_match(&record.description)
            || matches!((self.price, record.price), (Some(wanted), Some(actual)) if wanted == actual)
    }
}

/// Filter shared by the listing endpoints and the aggregations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub search: Option<SearchTerm>,
    pub month: Option<Month>,
}

impl TransactionFilter {
    /// Filter that matches every record
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_month(month: Option<Month>) -> Self {
        Self {
            search: None,
            month,
        }
    }

    /// Build a filter from raw query string values; blank values count as absent
    pub fn from_params(search: Option<&str>, month: Option<&str>) -> Result<Self, QueryError> {
        Ok(Self {
            search: search.and_then(SearchTerm::parse),
            month: parse_month(month)?,
        })
    }

    /// Store-side form of the filter; search and month combine with AND
    pub fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(search) = &self.search {
            condition = condition.add(search.condition());
        }
        if let Some(month) = self.month {
            condition = condition.add(transactions::Column::DateOfSale.contains(month.pattern()));
        }

        condition
    }

    /// In-memory form of the filter, consistent with [`Self::condition`]
    #[cfg(test)]
    pub fn matches(&self, record: &transactions::Model) -> bool {
        if let Some(month) = self.month {
            let pattern = month.pattern();
            let in_month = record
                .date_of_sale
                .as_deref()
                .is_some_and(|date| date.contains(&pattern));
            if !in_month {
                return false;
            }
        }

        match &self.search {
            Some(search) => search.matches(record),
            None => true,
        }
    }
}

/// Parse an optional month parameter; blank means no month filter
pub fn parse_month(raw: Option<&str>) -> Result<Option<Month>, QueryError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

/// Parse an optional boolean switch such as `force`; blank means off
pub fn parse_flag(raw: Option<&str>) -> Result<bool, QueryError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(false),
        Some(value) if value.eq_ignore_ascii_case("true") || value == "1" => Ok(true),
        Some(value) if value.eq_ignore_ascii_case("false") || value == "0" => Ok(false),
        Some(value) => Err(QueryError::InvalidFlag(value.to_string())),
    }
}

/// Validated 1-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub per_page: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    pub fn new(page: u64, per_page: u64) -> Result<Self, QueryError> {
        if page == 0 {
            return Err(QueryError::InvalidPage(page.to_string()));
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(QueryError::InvalidPerPage(per_page.to_string()));
        }
        Ok(Self { page, per_page })
    }

    pub fn from_params(page: Option<&str>, per_page: Option<&str>) -> Result<Self, QueryError> {
        let page = match page.map(str::trim) {
            None | Some("") => DEFAULT_PAGE,
            Some(raw) => raw
                .parse()
                .map_err(|_| QueryError::InvalidPage(raw.to_string()))?,
        };
        let per_page = match per_page.map(str::trim) {
            None | Some("") => DEFAULT_PER_PAGE,
            Some(raw) => raw
                .parse()
                .map_err(|_| QueryError::InvalidPerPage(raw.to_string()))?,
        };

        Self::new(page, per_page)
    }

    /// Number of matches skipped before this page, clamped to what SQL can bind
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.per_page)
            .min(i64::MAX as u64)
    }

    pub fn total_pages(&self, total_records: u64) -> u64 {
        total_records.div_ceil(self.per_page)
    }
}

fn contains_ignore_case(column: transactions::Column, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(needle));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
