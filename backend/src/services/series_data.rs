//! Series data assembly.
//!
//! [`SeriesDataAssembler`] resolves a series, reads its observations inside one
//! store session and maps them to output values. When the query asks for an
//! expanded response, every published reference series of the primary series
//! is assembled as well and run through the density policy:
//!
//! | observations in span | reference entry                                  |
//! |----------------------|--------------------------------------------------|
//! | 0                    | last known value repeated at both span bounds    |
//! | 1                    | that observation repeated at both span bounds    |
//! | 2 or more            | the observations as stored                       |
//!
//! Reference series that are not published are left out without notice.

use async_trait::async_trait;
use log::{debug, warn};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::task;

use super::error::{SeriesDataError, SeriesDataResult};
use super::interval_expander::IntervalExpander;
use super::value_mapper::ValueMapper;
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult, SeriesRepository};
use crate::db::session::with_session;
use crate::models::{
    DbQuery, Observation, SeriesData, SeriesDataMetadata, SeriesEntity, SeriesId,
};

/// Outbound data access for one kind of series.
#[async_trait]
pub trait DataRepository: Send + Sync {
    type Data: Send;

    /// Assemble the data of `series_id` for `query`.
    ///
    /// # Returns
    /// * `Ok(Data)` - values of the series and, for expanded queries, its reference series
    /// * `Err(SeriesDataError::NotFound)` - if the id does not resolve to a series
    /// * `Err(SeriesDataError::DataAccess)` - if the store or session failed
    async fn get_data(&self, series_id: &str, query: &DbQuery) -> SeriesDataResult<Self::Data>;
}

/// Assembles [`SeriesData`] from a [`SeriesRepository`].
///
/// The assembler keeps no per-request state; a single instance can serve any
/// number of concurrent requests, each of which gets its own store session.
pub struct SeriesDataAssembler<R, V> {
    repository: Arc<R>,
    mapper: ValueMapper,
    expander: IntervalExpander,
    _value: PhantomData<fn() -> V>,
}

impl<R, V> Clone for SeriesDataAssembler<R, V> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            mapper: self.mapper,
            expander: self.expander,
            _value: PhantomData,
        }
    }
}

/// Why a request failed inside the session.
enum Failure {
    Unresolved,
    Store(RepositoryError),
}

impl From<RepositoryError> for Failure {
    fn from(err: RepositoryError) -> Self {
        Failure::Store(err)
    }
}

impl<R, V> SeriesDataAssembler<R, V>
where
    R: SeriesRepository<V>,
    V: Clone,
{
    pub fn new(repository: Arc<R>, mapper: ValueMapper) -> Self {
        Self {
            repository,
            mapper,
            expander: IntervalExpander::new(mapper),
            _value: PhantomData,
        }
    }

    pub fn mapper(&self) -> &ValueMapper {
        &self.mapper
    }

    /// Synchronous form of [`DataRepository::get_data`].
    ///
    /// Holds exactly one store session for the duration of the call.
    pub fn get_data_blocking(
        &self,
        series_id: &str,
        query: &DbQuery,
    ) -> SeriesDataResult<SeriesData<V>> {
        let outcome = with_session(self.repository.as_ref(), |session| -> Result<_, Failure> {
            let series = self.resolve(session, series_id, query)?;
            let data = if query.is_expanded() {
                self.assemble_with_references(session, &series, query)?
            } else {
                self.assemble_data(session, &series, query)?
            };
            Ok(data)
        });

        outcome.map_err(|failure| match failure {
            Failure::Unresolved => {
                debug!("series '{}' not found", series_id);
                SeriesDataError::NotFound {
                    series_id: series_id.to_string(),
                }
            }
            Failure::Store(source) => {
                warn!("data access failed for series '{}': {}", series_id, source);
                SeriesDataError::DataAccess {
                    series_id: series_id.to_string(),
                    query: query.to_string(),
                    source,
                }
            }
        })
    }

    fn resolve(
        &self,
        session: &mut R::Session,
        series_id: &str,
        query: &DbQuery,
    ) -> Result<SeriesEntity<V>, Failure> {
        let id: SeriesId = series_id.parse().map_err(|e| {
            debug!("{}", e);
            Failure::Unresolved
        })?;
        match self.repository.find_series(session, id, query) {
            Ok(Some(series)) => Ok(series),
            Ok(None) => Err(Failure::Unresolved),
            Err(e) if e.is_not_found() => Err(Failure::Unresolved),
            Err(e) => Err(Failure::Store(e.for_series(id))),
        }
    }

    /// Values of `series` inside the query timespan, in store order.
    ///
    /// Gaps returned by the store are skipped.
    pub fn assemble_data(
        &self,
        session: &mut R::Session,
        series: &SeriesEntity<V>,
        query: &DbQuery,
    ) -> RepositoryResult<SeriesData<V>> {
        let observations = self.fetch(session, series, query)?;
        Ok(self.map_observations(&observations))
    }

    /// Primary values plus the reference series data in the metadata.
    ///
    /// Metadata is only set when at least one reference series is published.
    pub fn assemble_with_references(
        &self,
        session: &mut R::Session,
        series: &SeriesEntity<V>,
        query: &DbQuery,
    ) -> RepositoryResult<SeriesData<V>> {
        let mut result = self.assemble_data(session, series, query)?;

        let mut references = HashMap::new();
        for reference in series.reference_values.iter().filter(|r| r.published) {
            let data = self.assemble_reference(session, reference, query)?;
            references.insert(reference.pkid.to_string(), data);
        }

        if !references.is_empty() {
            result.set_metadata(SeriesDataMetadata::new(references));
        }
        Ok(result)
    }

    fn assemble_reference(
        &self,
        session: &mut R::Session,
        reference: &SeriesEntity<V>,
        query: &DbQuery,
    ) -> RepositoryResult<SeriesData<V>> {
        let observations = self.fetch(session, reference, query)?;
        let span = query.timespan();

        let mut present = observations.iter().flatten();
        match (present.next(), present.next()) {
            (None, _) => {
                let mut data = SeriesData::new();
                match reference.last_value {
                    Some(ref last) => data.add_values(self.expander.expand(span, last, reference)),
                    None => debug!(
                        "reference series {} has no values and no last value",
                        reference.pkid
                    ),
                }
                Ok(data)
            }
            (Some(single), None) => {
                let mut data = SeriesData::new();
                data.add_values(self.expander.expand(span, single, reference));
                Ok(data)
            }
            (Some(_), Some(_)) => Ok(self.map_observations(&observations)),
        }
    }

    fn fetch(
        &self,
        session: &mut R::Session,
        series: &SeriesEntity<V>,
        query: &DbQuery,
    ) -> RepositoryResult<Vec<Option<Observation<V>>>> {
        self.repository
            .fetch_observations(session, series, query)
            .map_err(|e| e.for_series(series.pkid))
    }

    fn map_observations(&self, observations: &[Option<Observation<V>>]) -> SeriesData<V> {
        let mut data = SeriesData::new();
        data.add_values(
            observations
                .iter()
                .filter_map(|o| self.mapper.to_output_value(o.as_ref())),
        );
        data
    }
}

#[async_trait]
impl<R, V> DataRepository for SeriesDataAssembler<R, V>
where
    R: SeriesRepository<V> + 'static,
    V: Clone + Send + Sync + 'static,
{
    type Data = SeriesData<V>;

    /// Runs [`SeriesDataAssembler::get_data_blocking`] on the blocking pool.
    async fn get_data(
        &self,
        series_id: &str,
        query: &DbQuery,
    ) -> SeriesDataResult<SeriesData<V>> {
        let assembler = self.clone();
        let id = series_id.to_string();
        let owned_query = query.clone();

        task::spawn_blocking(move || assembler.get_data_blocking(&id, &owned_query))
            .await
            .map_err(|e| SeriesDataError::DataAccess {
                series_id: series_id.to_string(),
                query: query.to_string(),
                source: RepositoryError::internal(
                    format!("Task join error: {}", e),
                    ErrorContext::new("spawn_blocking"),
                ),
            })?
    }
}

#[cfg(test)]
#[path = "series_data_tests.rs"]
mod series_data_tests;
