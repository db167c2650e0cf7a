//! Series identity and the series entity tree.

use std::fmt;
use std::str::FromStr;

use super::observation::Observation;

/// Observation kinds a series id may be prefixed with (`text_12`, `count_7`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationType {
    Measurement,
    Count,
    Boolean,
    Text,
    Category,
}

impl ObservationType {
    pub const ALL: [ObservationType; 5] = [
        Self::Measurement,
        Self::Count,
        Self::Boolean,
        Self::Text,
        Self::Category,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Measurement => "measurement",
            Self::Count => "count",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::Category => "category",
        }
    }

    /// Strip a known type prefix from a raw series id.
    ///
    /// Ids without a recognised prefix are returned unchanged.
    pub fn extract_id(raw: &str) -> &str {
        if let Some((prefix, rest)) = raw.split_once('_') {
            if Self::ALL
                .iter()
                .any(|t| t.prefix().eq_ignore_ascii_case(prefix))
            {
                return rest;
            }
        }
        raw
    }
}

/// Database key of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(pub i64);

impl FromStr for SeriesId {
    type Err = String;

    /// Parse a public series id, with or without an observation type prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = ObservationType::extract_id(s.trim());
        id.parse::<i64>()
            .map(SeriesId)
            .map_err(|e| format!("Invalid series id '{}': {}", s, e))
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A series as resolved by the lookup, with its reference series attached.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesEntity<V> {
    pub pkid: SeriesId,
    pub published: bool,
    /// Most recent observation known for the series, regardless of any span.
    pub last_value: Option<Observation<V>>,
    pub reference_values: Vec<SeriesEntity<V>>,
}

impl<V> SeriesEntity<V> {
    pub fn new(pkid: SeriesId) -> Self {
        Self {
            pkid,
            published: true,
            last_value: None,
            reference_values: Vec::new(),
        }
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    pub fn with_reference(mut self, reference: SeriesEntity<V>) -> Self {
        self.reference_values.push(reference);
        self
    }
}
