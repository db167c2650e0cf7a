//! Query parameters handed to the repository layer.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult};

/// Closed time interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timespan {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Timespan {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> RepositoryResult<Self> {
        if start > end {
            return Err(RepositoryError::validation(
                format!("timespan start {} is after end {}", start, end),
                ErrorContext::new("create_timespan"),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Inclusive on both ends.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Immutable query for one data request.
#[derive(Debug, Clone, PartialEq)]
pub struct DbQuery {
    timespan: Timespan,
    expanded: bool,
    locale: Option<String>,
    href_base: Option<String>,
}

impl DbQuery {
    pub fn new(timespan: Timespan) -> Self {
        Self {
            timespan,
            expanded: false,
            locale: None,
            href_base: None,
        }
    }

    pub fn builder(timespan: Timespan) -> DbQueryBuilder {
        DbQueryBuilder {
            query: Self::new(timespan),
        }
    }

    pub fn timespan(&self) -> &Timespan {
        &self.timespan
    }

    /// Whether reference series were requested.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn href_base(&self) -> Option<&str> {
        self.href_base.as_deref()
    }
}

impl fmt::Display for DbQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timespan={}, expanded={}", self.timespan, self.expanded)
    }
}

pub struct DbQueryBuilder {
    query: DbQuery,
}

impl DbQueryBuilder {
    pub fn expanded(mut self, expanded: bool) -> Self {
        self.query.expanded = expanded;
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.query.locale = Some(locale.into());
        self
    }

    pub fn href_base(mut self, href_base: impl Into<String>) -> Self {
        self.query.href_base = Some(href_base.into());
        self
    }

    pub fn build(self) -> DbQuery {
        self.query
    }
}
