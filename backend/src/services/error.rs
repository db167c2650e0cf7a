//! Errors surfaced by the series data services.

use crate::db::repository::RepositoryError;

pub type SeriesDataResult<T> = Result<T, SeriesDataError>;

/// Failure of a series data request.
///
/// Either the requested series does not exist, or reading it failed. There is
/// no partial result in either case.
#[derive(Debug, thiserror::Error)]
pub enum SeriesDataError {
    #[error("Resource with id '{series_id}' could not be found.")]
    NotFound { series_id: String },

    #[error("Could not get data for series '{series_id}' ({query}): {source}")]
    DataAccess {
        series_id: String,
        /// Timespan and expansion flag of the failing request
        query: String,
        #[source]
        source: RepositoryError,
    },
}

impl SeriesDataError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The store error behind a data access failure.
    pub fn repository_error(&self) -> Option<&RepositoryError> {
        match self {
            Self::DataAccess { source, .. } => Some(source),
            Self::NotFound { .. } => None,
        }
    }
}
