//! In-memory local repository implementation.
//!
//! Stores series and their observations in `HashMap`s behind a
//! `parking_lot::RwLock`, so it can be shared between concurrent requests the
//! same way a pooled database store would be. Session accounting and fault
//! injection make it suitable for exercising the assembly services in tests.

use log::{debug, warn};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::db::repository::{
    ErrorContext, ObservationStore, RepositoryError, RepositoryResult, SeriesLookup,
    SessionProvider,
};
use crate::models::{DbQuery, Observation, ObservationValue, SeriesEntity, SeriesId};

/// In-memory local repository.
///
/// # Example
/// ```
/// use series_data::db::repositories::LocalRepository;
/// use series_data::models::SeriesId;
///
/// let repo: LocalRepository = LocalRepository::new();
/// repo.insert_series(SeriesId(1), true);
/// assert_eq!(repo.series_count(), 1);
/// ```
#[derive(Clone)]
pub struct LocalRepository<V = ObservationValue> {
    data: Arc<RwLock<LocalData<V>>>,
    counters: Arc<Counters>,
}

struct SeriesRecord<V> {
    published: bool,
    last_value: Option<Observation<V>>,
    references: Vec<SeriesId>,
}

struct LocalData<V> {
    series: HashMap<SeriesId, SeriesRecord<V>>,
    observations: HashMap<SeriesId, Vec<Option<Observation<V>>>>,
    failing_lookups: HashSet<SeriesId>,
    failing_fetches: HashSet<SeriesId>,
    /// Unknown ids fail the lookup with `NotFound` instead of yielding `None`.
    strict_lookups: bool,
    is_healthy: bool,
}

impl<V> Default for LocalData<V> {
    fn default() -> Self {
        Self {
            series: HashMap::new(),
            observations: HashMap::new(),
            failing_lookups: HashSet::new(),
            failing_fetches: HashSet::new(),
            strict_lookups: false,
            is_healthy: true,
        }
    }
}

#[derive(Default)]
struct Counters {
    next_session_id: AtomicU64,
    acquired: AtomicU64,
    released: AtomicU64,
    lookups: AtomicU64,
    fetches: AtomicU64,
}

/// Session handed out by [`LocalRepository`].
#[derive(Debug)]
pub struct LocalSession {
    id: u64,
    released: bool,
}

impl LocalSession {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Snapshot of session and read accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub acquired: u64,
    pub released: u64,
    /// Sessions acquired but not yet released
    pub open: u64,
    pub lookups: u64,
    /// Observation reads, one per `fetch_observations` call
    pub fetches: u64,
}

impl<V> Default for LocalRepository<V> {
    fn default() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            counters: Arc::new(Counters::default()),
        }
    }
}

impl<V: Clone> LocalRepository<V> {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a series, or update the publication flag of an existing one.
    pub fn insert_series(&self, id: SeriesId, published: bool) {
        let mut data = self.data.write();
        data.series
            .entry(id)
            .and_modify(|record| record.published = published)
            .or_insert_with(|| SeriesRecord {
                published,
                last_value: None,
                references: Vec::new(),
            });
        data.observations.entry(id).or_default();
    }

    /// Attach `reference` as a reference series of `series`.
    pub fn add_reference(&self, series: SeriesId, reference: SeriesId) -> RepositoryResult<()> {
        let mut data = self.data.write();
        if !data.series.contains_key(&reference) {
            return Err(Self::unknown_series(reference, "add_reference"));
        }
        let record = data
            .series
            .get_mut(&series)
            .ok_or_else(|| Self::unknown_series(series, "add_reference"))?;
        if !record.references.contains(&reference) {
            record.references.push(reference);
        }
        Ok(())
    }

    pub fn set_last_value(&self, series: SeriesId, value: Observation<V>) -> RepositoryResult<()> {
        let mut data = self.data.write();
        let record = data
            .series
            .get_mut(&series)
            .ok_or_else(|| Self::unknown_series(series, "set_last_value"))?;
        record.last_value = Some(value);
        Ok(())
    }

    /// Append an observation. Callers append in timestamp order.
    pub fn add_observation(
        &self,
        series: SeriesId,
        observation: Observation<V>,
    ) -> RepositoryResult<()> {
        self.push_entry(series, Some(observation))
    }

    /// Append a gap: an entry the store returns as `None`.
    pub fn add_gap(&self, series: SeriesId) -> RepositoryResult<()> {
        self.push_entry(series, None)
    }

    fn push_entry(&self, series: SeriesId, entry: Option<Observation<V>>) -> RepositoryResult<()> {
        let mut data = self.data.write();
        if !data.series.contains_key(&series) {
            return Err(Self::unknown_series(series, "add_observation"));
        }
        data.observations.entry(series).or_default().push(entry);
        Ok(())
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Make every lookup of `series` fail with a query error.
    pub fn fail_lookups_for(&self, series: SeriesId) {
        self.data.write().failing_lookups.insert(series);
    }

    /// Make every observation read for `series` fail.
    pub fn fail_fetches_for(&self, series: SeriesId) {
        self.data.write().failing_fetches.insert(series);
    }

    /// Report unknown series as a `NotFound` error rather than `Ok(None)`.
    pub fn set_strict_lookups(&self, strict: bool) {
        self.data.write().strict_lookups = strict;
    }

    pub fn session_stats(&self) -> SessionStats {
        let acquired = self.counters.acquired.load(Ordering::SeqCst);
        let released = self.counters.released.load(Ordering::SeqCst);
        SessionStats {
            acquired,
            released,
            open: acquired.saturating_sub(released),
            lookups: self.counters.lookups.load(Ordering::SeqCst),
            fetches: self.counters.fetches.load(Ordering::SeqCst),
        }
    }

    pub fn series_count(&self) -> usize {
        self.data.read().series.len()
    }

    /// Clear all data, keeping the health flag and counters.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    fn unknown_series(id: SeriesId, operation: &'static str) -> RepositoryError {
        RepositoryError::not_found(
            format!("Series {} does not exist", id),
            ErrorContext::new(operation).for_series(id),
        )
    }

    fn check_session(session: &LocalSession, operation: &'static str) -> RepositoryResult<()> {
        if session.released {
            return Err(RepositoryError::connection(
                "session already released",
                ErrorContext::new(operation).in_session(session.id),
            ));
        }
        Ok(())
    }

    fn build_entity(
        data: &LocalData<V>,
        id: SeriesId,
        record: &SeriesRecord<V>,
    ) -> SeriesEntity<V> {
        let mut entity = SeriesEntity::new(id).with_published(record.published);
        entity.last_value = record.last_value.clone();
        for reference_id in &record.references {
            match data.series.get(reference_id) {
                Some(reference) => {
                    let mut reference_entity =
                        SeriesEntity::new(*reference_id).with_published(reference.published);
                    reference_entity.last_value = reference.last_value.clone();
                    entity.reference_values.push(reference_entity);
                }
                None => warn!("series {} references unknown series {}", id, reference_id),
            }
        }
        entity
    }
}

impl<V: Send + Sync> SessionProvider for LocalRepository<V> {
    type Session = LocalSession;

    fn acquire(&self) -> RepositoryResult<LocalSession> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection(
                "local repository is unhealthy",
                ErrorContext::new("acquire_session"),
            ));
        }
        let id = self.counters.next_session_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(LocalSession {
            id,
            released: false,
        })
    }

    fn release(&self, session: &mut LocalSession) {
        if session.released {
            warn!("session {} released twice", session.id);
            return;
        }
        session.released = true;
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

impl<V: Clone + Send + Sync> SeriesLookup<V> for LocalRepository<V> {
    fn find_series(
        &self,
        session: &mut LocalSession,
        id: SeriesId,
        _query: &DbQuery,
    ) -> RepositoryResult<Option<SeriesEntity<V>>> {
        Self::check_session(session, "find_series")?;
        self.counters.lookups.fetch_add(1, Ordering::SeqCst);

        let data = self.data.read();
        if data.failing_lookups.contains(&id) {
            return Err(RepositoryError::query(
                "injected lookup failure",
                ErrorContext::new("find_series")
                    .for_series(id)
                    .in_session(session.id),
            ));
        }
        match data.series.get(&id) {
            Some(record) => Ok(Some(Self::build_entity(&data, id, record))),
            None if data.strict_lookups => Err(Self::unknown_series(id, "find_series")),
            None => Ok(None),
        }
    }
}

impl<V: Clone + Send + Sync> ObservationStore<V> for LocalRepository<V> {
    fn fetch_observations(
        &self,
        session: &mut LocalSession,
        series: &SeriesEntity<V>,
        query: &DbQuery,
    ) -> RepositoryResult<Vec<Option<Observation<V>>>> {
        Self::check_session(session, "fetch_observations")?;
        self.counters.fetches.fetch_add(1, Ordering::SeqCst);

        let data = self.data.read();
        if data.failing_fetches.contains(&series.pkid) {
            return Err(RepositoryError::query(
                "injected fetch failure",
                ErrorContext::new("fetch_observations")
                    .for_series(series.pkid)
                    .in_session(session.id),
            ));
        }

        let span = query.timespan();
        let entries: Vec<Option<Observation<V>>> = data
            .observations
            .get(&series.pkid)
            .map(|stored| {
                stored
                    .iter()
                    .filter(|entry| match entry {
                        Some(observation) => span.contains(observation.timestamp),
                        None => true,
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        debug!(
            "fetched {} entries for series {} in {}",
            entries.len(),
            series.pkid,
            span
        );
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timespan;
    use chrono::{TimeZone, Utc};

    fn query(start: i64, end: i64) -> DbQuery {
        let span = Timespan::new(
            Utc.timestamp_opt(start, 0).unwrap(),
            Utc.timestamp_opt(end, 0).unwrap(),
        )
        .unwrap();
        DbQuery::new(span)
    }

    fn obs(secs: i64, value: &str) -> Observation<ObservationValue> {
        Observation::new(Utc.timestamp_opt(secs, 0).unwrap(), ObservationValue::text(value))
    }

    #[test]
    fn test_fetch_filters_by_span_and_keeps_gaps() {
        let repo: LocalRepository = LocalRepository::new();
        repo.insert_series(SeriesId(1), true);
        repo.add_observation(SeriesId(1), obs(-5, "before")).unwrap();
        repo.add_observation(SeriesId(1), obs(0, "start")).unwrap();
        repo.add_gap(SeriesId(1)).unwrap();
        repo.add_observation(SeriesId(1), obs(10, "end")).unwrap();
        repo.add_observation(SeriesId(1), obs(11, "after")).unwrap();

        let mut session = repo.acquire().unwrap();
        let q = query(0, 10);
        let series = repo
            .find_series(&mut session, SeriesId(1), &q)
            .unwrap()
            .unwrap();
        let entries = repo.fetch_observations(&mut session, &series, &q).unwrap();
        repo.release(&mut session);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].as_ref().unwrap().value, ObservationValue::text("start"));
        assert!(entries[1].is_none());
        assert_eq!(entries[2].as_ref().unwrap().value, ObservationValue::text("end"));
    }

    #[test]
    fn test_lookup_resolves_references() {
        let repo: LocalRepository = LocalRepository::new();
        repo.insert_series(SeriesId(1), true);
        repo.insert_series(SeriesId(2), false);
        repo.add_reference(SeriesId(1), SeriesId(2)).unwrap();
        repo.set_last_value(SeriesId(2), obs(3, "cold")).unwrap();

        let mut session = repo.acquire().unwrap();
        let series = repo
            .find_series(&mut session, SeriesId(1), &query(0, 10))
            .unwrap()
            .unwrap();
        repo.release(&mut session);

        assert_eq!(series.reference_values.len(), 1);
        let reference = &series.reference_values[0];
        assert_eq!(reference.pkid, SeriesId(2));
        assert!(!reference.published);
        assert_eq!(reference.last_value, Some(obs(3, "cold")));
    }

    #[test]
    fn test_unknown_series_lookup_is_none() {
        let repo: LocalRepository = LocalRepository::new();
        let mut session = repo.acquire().unwrap();
        let found = repo
            .find_series(&mut session, SeriesId(99), &query(0, 10))
            .unwrap();
        repo.release(&mut session);
        assert!(found.is_none());
    }

    #[test]
    fn test_add_reference_to_unknown_series_fails() {
        let repo: LocalRepository = LocalRepository::new();
        repo.insert_series(SeriesId(1), true);
        let err = repo.add_reference(SeriesId(1), SeriesId(2)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_session_accounting() {
        let repo: LocalRepository = LocalRepository::new();
        let mut first = repo.acquire().unwrap();
        let mut second = repo.acquire().unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(repo.session_stats().open, 2);

        repo.release(&mut first);
        repo.release(&mut first);
        repo.release(&mut second);

        let stats = repo.session_stats();
        assert_eq!(stats.acquired, 2);
        assert_eq!(stats.released, 2);
        assert_eq!(stats.open, 0);
    }

    #[test]
    fn test_released_session_rejected() {
        let repo: LocalRepository = LocalRepository::new();
        repo.insert_series(SeriesId(1), true);
        let mut session = repo.acquire().unwrap();
        repo.release(&mut session);

        let err = repo
            .find_series(&mut session, SeriesId(1), &query(0, 10))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Connection { .. }));
    }

    #[test]
    fn test_strict_lookup_reports_unknown_series() {
        let repo: LocalRepository = LocalRepository::new();
        repo.set_strict_lookups(true);
        let mut session = repo.acquire().unwrap();
        let err = repo
            .find_series(&mut session, SeriesId(99), &query(0, 10))
            .unwrap_err();
        repo.release(&mut session);

        assert!(err.is_not_found());
        assert_eq!(err.context().series, Some(SeriesId(99)));
    }

    #[test]
    fn test_injected_lookup_failure() {
        let repo: LocalRepository = LocalRepository::new();
        repo.insert_series(SeriesId(1), true);
        repo.fail_lookups_for(SeriesId(1));

        let mut session = repo.acquire().unwrap();
        let err = repo
            .find_series(&mut session, SeriesId(1), &query(0, 10))
            .unwrap_err();
        let session_id = session.id();
        repo.release(&mut session);

        assert!(matches!(err, RepositoryError::Query { .. }));
        assert_eq!(err.context().operation, Some("find_series"));
        assert_eq!(err.context().session, Some(session_id));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_unhealthy_repository_refuses_sessions() {
        let repo: LocalRepository = LocalRepository::new();
        repo.set_healthy(false);
        let err = repo.acquire().unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(repo.session_stats().acquired, 0);
    }

    #[test]
    fn test_clear_keeps_health() {
        let repo: LocalRepository = LocalRepository::new();
        repo.insert_series(SeriesId(1), true);
        repo.set_healthy(false);
        repo.clear();
        assert_eq!(repo.series_count(), 0);
        assert!(repo.acquire().is_err());
    }
}
