//! Errors raised by sessions, store reads and configuration loading.
//!
//! Every failure below the assembly layer is a [`RepositoryError`]. Its
//! [`ErrorContext`] names the store operation and, where one is involved, the
//! series and session, so a `DataAccess` failure can be traced to the read
//! that caused it.

use std::fmt;

use crate::models::SeriesId;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Where in the store a failure happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Store operation, e.g. `acquire_session` or `fetch_observations`
    pub operation: Option<&'static str>,
    pub series: Option<SeriesId>,
    pub session: Option<u64>,
    /// Free-form detail such as a config file path
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation: Some(operation),
            ..Default::default()
        }
    }

    pub fn for_series(mut self, series: SeriesId) -> Self {
        self.series = Some(series);
        self
    }

    pub fn in_session(mut self, session: u64) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Renders as ` (operation=..., series=..., ...)`, or nothing when empty.
impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let mut parts = Vec::with_capacity(4);
        if let Some(op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(series) = self.series {
            parts.push(format!("series={}", series));
        }
        if let Some(session) = self.session {
            parts.push(format!("session={}", session));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, " ({})", parts.join(", "))
    }
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// No session could be acquired, or the session was no longer usable.
    #[error("session unavailable: {message}{context}")]
    Connection {
        message: String,
        context: ErrorContext,
    },

    /// A lookup or observation read failed.
    #[error("store read failed: {message}{context}")]
    Query {
        message: String,
        context: ErrorContext,
    },

    #[error("not found: {message}{context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// Input rejected before the store is touched.
    #[error("invalid input: {message}{context}")]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("configuration error: {message}{context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// The blocking task running a request did not complete.
    #[error("internal error: {message}{context}")]
    Internal {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    pub fn connection(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Connection {
            message: message.into(),
            context,
        }
    }

    pub fn query(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Query {
            message: message.into(),
            context,
        }
    }

    pub fn not_found(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    pub fn validation(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Validation {
            message: message.into(),
            context,
        }
    }

    pub fn configuration(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Configuration {
            message: message.into(),
            context,
        }
    }

    pub fn internal(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Internal {
            message: message.into(),
            context,
        }
    }

    /// Whether a later request could succeed where this one failed.
    ///
    /// Only session failures qualify. Informational: nothing here retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Connection { context, .. }
            | Self::Query { context, .. }
            | Self::NotFound { context, .. }
            | Self::Validation { context, .. }
            | Self::Configuration { context, .. }
            | Self::Internal { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Connection { context, .. }
            | Self::Query { context, .. }
            | Self::NotFound { context, .. }
            | Self::Validation { context, .. }
            | Self::Configuration { context, .. }
            | Self::Internal { context, .. } => context,
        }
    }

    /// Tag the error with the series being read when it failed.
    pub fn for_series(mut self, series: SeriesId) -> Self {
        self.context_mut().series = Some(series);
        self
    }
}
