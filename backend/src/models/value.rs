use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload of a single observation.
///
/// Series are typed by their value kind; a series never mixes kinds, but the
/// assembly path treats the payload as opaque and only ever clones it.
///
/// The JSON form is untagged. Reading it back picks the first variant that
/// fits: integral numbers become `Count`, other numbers `Quantity`, and every
/// string becomes `Text`, since a category label is indistinguishable from text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservationValue {
    Count(i64),
    Quantity(f64),
    Boolean(bool),
    Text(String),
    Category(String),
}

impl ObservationValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn category(value: impl Into<String>) -> Self {
        Self::Category(value.into())
    }
}

impl From<f64> for ObservationValue {
    fn from(value: f64) -> Self {
        Self::Quantity(value)
    }
}

impl From<i64> for ObservationValue {
    fn from(value: i64) -> Self {
        Self::Count(value)
    }
}

impl From<bool> for ObservationValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for ObservationValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for ObservationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quantity(v) => write!(f, "{}", v),
            Self::Count(v) => write!(f, "{}", v),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::Text(v) | Self::Category(v) => f.write_str(v),
        }
    }
}
