//! Raw observations as read from the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point location expressed in a spatial reference system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    pub srid: u32,
}

/// Geometry as stored alongside an observation.
///
/// The stored SRID is optional; rows written without one are interpreted in
/// the database SRID.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryEntity {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub srid: Option<u32>,
}

impl GeometryEntity {
    pub fn point(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            srid: None,
        }
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    pub fn with_srid(mut self, srid: u32) -> Self {
        self.srid = Some(srid);
        self
    }

    /// Geometry tagged with its stored SRID, falling back to `database_srid`.
    pub fn geometry(&self, database_srid: u32) -> Geometry {
        Geometry {
            x: self.x,
            y: self.y,
            z: self.z,
            srid: self.srid.unwrap_or(database_srid),
        }
    }
}

/// Validity range of an observation. Either end may be unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidTime {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Named parameter attached to an observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: serde_json::Value,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single stored observation of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation<V> {
    pub timestamp: DateTime<Utc>,
    pub value: V,
    pub geometry: Option<GeometryEntity>,
    pub valid_time: ValidTime,
    /// Declared parameters in source order.
    pub parameters: Vec<Parameter>,
}

impl<V> Observation<V> {
    pub fn new(timestamp: DateTime<Utc>, value: V) -> Self {
        Self {
            timestamp,
            value,
            geometry: None,
            valid_time: ValidTime::default(),
            parameters: Vec::new(),
        }
    }

    pub fn with_geometry(mut self, geometry: GeometryEntity) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_valid_start(mut self, start: DateTime<Utc>) -> Self {
        self.valid_time.start = Some(start);
        self
    }

    pub fn with_valid_end(mut self, end: DateTime<Utc>) -> Self {
        self.valid_time.end = Some(end);
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }
}

impl<V: Clone> Observation<V> {
    /// Copy of this observation moved to another instant.
    ///
    /// Everything except the timestamp is carried over unchanged.
    pub fn at(&self, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            ..self.clone()
        }
    }
}
