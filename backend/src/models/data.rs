//! Assembled output handed to serializers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use super::observation::{Geometry, Parameter};

/// One point of assembled series data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputValue<V> {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub value: V,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub valid_time_start: Option<DateTime<Utc>>,
    #[serde(
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub valid_time_end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
}

impl<V> OutputValue<V> {
    pub fn new(timestamp: DateTime<Utc>, value: V) -> Self {
        Self {
            timestamp,
            value,
            geometry: None,
            valid_time_start: None,
            valid_time_end: None,
            parameters: None,
        }
    }
}

/// Reference series data keyed by the reference series id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDataMetadata<V> {
    pub reference_values: HashMap<String, SeriesData<V>>,
}

impl<V> SeriesDataMetadata<V> {
    pub fn new(reference_values: HashMap<String, SeriesData<V>>) -> Self {
        Self { reference_values }
    }

    pub fn reference(&self, id: &str) -> Option<&SeriesData<V>> {
        self.reference_values.get(id)
    }
}

/// Chronological values of a series, as delivered by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesData<V> {
    pub values: Vec<OutputValue<V>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SeriesDataMetadata<V>>,
}

impl<V> Default for SeriesData<V> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            metadata: None,
        }
    }
}

impl<V> SeriesData<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_values(&mut self, values: impl IntoIterator<Item = OutputValue<V>>) {
        self.values.extend(values);
    }

    pub fn values(&self) -> &[OutputValue<V>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn set_metadata(&mut self, metadata: SeriesDataMetadata<V>) {
        self.metadata = Some(metadata);
    }

    pub fn metadata(&self) -> Option<&SeriesDataMetadata<V>> {
        self.metadata.as_ref()
    }
}
