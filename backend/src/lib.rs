//! # Series Data
//!
//! Assembly of time series data for a requested timespan.
//!
//! Given a series id and a query, the crate resolves the series, reads its
//! observations inside a single store session and maps them to output values.
//! Expanded queries also carry the data of the series' published reference
//! series, each guaranteed at least two points so it can be drawn across the
//! whole span even when the store holds one observation or none.
//!
//! ## Architecture
//!
//! - [`models`]: series, observations, queries and assembled output
//! - [`db`]: store contracts, scoped sessions, configuration and the in-memory store
//! - [`services`]: value mapping, interval expansion and the assembler
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use chrono::{TimeZone, Utc};
//! use series_data::db::LocalRepository;
//! use series_data::models::{DbQuery, Observation, ObservationValue, SeriesId, Timespan};
//! use series_data::services::{SeriesDataAssembler, ValueMapper};
//!
//! let repo: Arc<LocalRepository> = Arc::new(LocalRepository::new());
//! repo.insert_series(SeriesId(1), true);
//! repo.add_observation(
//!     SeriesId(1),
//!     Observation::new(Utc.timestamp_opt(5, 0).unwrap(), ObservationValue::from(12.5)),
//! )
//! .unwrap();
//!
//! let span = Timespan::new(
//!     Utc.timestamp_opt(0, 0).unwrap(),
//!     Utc.timestamp_opt(10, 0).unwrap(),
//! )
//! .unwrap();
//! let assembler: SeriesDataAssembler<_, ObservationValue> =
//!     SeriesDataAssembler::new(repo, ValueMapper::new(4326));
//! let data = assembler.get_data_blocking("1", &DbQuery::new(span)).unwrap();
//! assert_eq!(data.len(), 1);
//! ```

pub mod db;
pub mod models;
pub mod services;
