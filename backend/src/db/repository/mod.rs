//! Collaborator contracts consumed by the assembly services.
//!
//! Store access is split into three focused traits:
//!
//! - [`SessionProvider`]: acquire and release a store session
//! - [`SeriesLookup`]: resolve a series id to a [`SeriesEntity`]
//! - [`ObservationStore`]: read the raw observations of a series
//!
//! Lookup and fetch both run against a session the caller already holds; they
//! never open one themselves. Implementations are shared between concurrent
//! requests, hence the `Send + Sync` bounds, and are expected to apply any
//! visibility or access filtering before returning.
//!
//! # Convenience Trait Bound
//!
//! [`SeriesRepository`] bundles all three and is implemented automatically:
//!
//! ```ignore
//! fn count<R: SeriesRepository<V>, V>(repo: &R, query: &DbQuery) -> RepositoryResult<usize> {
//!     let mut session = repo.acquire()?;
//!     let series = repo.find_series(&mut session, SeriesId(1), query)?;
//!     // ...
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use crate::models::{DbQuery, Observation, SeriesEntity, SeriesId};

/// Hands out store sessions.
///
/// A session is owned by exactly one unit of work. Use
/// [`ScopedSession`](crate::db::session::ScopedSession) rather than pairing
/// `acquire`/`release` by hand.
pub trait SessionProvider: Send + Sync {
    type Session: Send;

    /// Open a new session.
    ///
    /// # Returns
    /// * `Ok(Session)` - a session ready for lookups and fetches
    /// * `Err(RepositoryError)` - if no session could be opened
    fn acquire(&self) -> RepositoryResult<Self::Session>;

    /// Return a session to the provider. Called exactly once per acquired session.
    fn release(&self, session: &mut Self::Session);
}

/// Resolves series ids.
pub trait SeriesLookup<V>: SessionProvider {
    /// Fetch a series scoped to `query`.
    ///
    /// # Returns
    /// * `Ok(Some(SeriesEntity))` - the series, with its reference series attached
    /// * `Ok(None)` - if no series matches
    /// * `Err(RepositoryError)` - if the lookup itself fails
    fn find_series(
        &self,
        session: &mut Self::Session,
        id: SeriesId,
        query: &DbQuery,
    ) -> RepositoryResult<Option<SeriesEntity<V>>>;
}

/// Reads raw observations.
pub trait ObservationStore<V>: SessionProvider {
    /// Observations of `series` inside the query timespan, in timestamp order.
    ///
    /// `None` entries mark gaps in the stored sequence. The returned vector may
    /// be empty.
    fn fetch_observations(
        &self,
        session: &mut Self::Session,
        series: &SeriesEntity<V>,
        query: &DbQuery,
    ) -> RepositoryResult<Vec<Option<Observation<V>>>>;
}

/// Composite trait bound for a complete store.
pub trait SeriesRepository<V>: SeriesLookup<V> + ObservationStore<V> {}

impl<V, T> SeriesRepository<V> for T where T: SeriesLookup<V> + ObservationStore<V> {}
