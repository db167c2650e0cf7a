#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use series_data::db::LocalRepository;
use series_data::models::{DbQuery, Observation, ObservationValue, SeriesId, Timespan};
use series_data::services::{SeriesDataAssembler, ValueMapper};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

pub type TextAssembler = SeriesDataAssembler<LocalRepository, ObservationValue>;

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn text(secs: i64, value: &str) -> Observation<ObservationValue> {
    Observation::new(at(secs), ObservationValue::text(value))
}

pub fn span_query(start: i64, end: i64, expanded: bool) -> DbQuery {
    DbQuery::builder(Timespan::new(at(start), at(end)).unwrap())
        .expanded(expanded)
        .build()
}

pub fn assembler(repo: &Arc<LocalRepository>) -> TextAssembler {
    SeriesDataAssembler::new(Arc::clone(repo), ValueMapper::new(4326))
}

/// Series `T0` (id 100) with reference series
/// - `T1` (101): one observation at t=5 ("ok")
/// - `T2` (102): no observations, last value "cold"
/// - `T3` (103): observations at t=2 ("a") and t=7 ("b")
/// - 104: unpublished, dense
pub fn reference_fixture() -> Arc<LocalRepository> {
    let repo = Arc::new(LocalRepository::new());
    for id in 100..=103 {
        repo.insert_series(SeriesId(id), true);
    }
    repo.insert_series(SeriesId(104), false);
    for id in 101..=104 {
        repo.add_reference(SeriesId(100), SeriesId(id)).unwrap();
    }

    repo.add_observation(SeriesId(100), text(1, "p1")).unwrap();
    repo.add_observation(SeriesId(100), text(6, "p2")).unwrap();

    repo.add_observation(SeriesId(101), text(5, "ok")).unwrap();

    repo.set_last_value(SeriesId(102), text(-50, "cold")).unwrap();

    repo.add_observation(SeriesId(103), text(2, "a")).unwrap();
    repo.add_observation(SeriesId(103), text(7, "b")).unwrap();

    repo.add_observation(SeriesId(104), text(3, "x")).unwrap();
    repo.add_observation(SeriesId(104), text(4, "y")).unwrap();
    repo
}
