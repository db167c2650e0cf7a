//! Interval boundary synthesis for sparse reference series.

use log::debug;

use super::value_mapper::ValueMapper;
use crate::models::{Observation, OutputValue, SeriesEntity, Timespan};

/// Spreads one observation over both ends of a timespan.
///
/// Used for reference series whose data inside the span is too sparse to draw
/// a line: the source value is repeated at the span start and the span end.
#[derive(Debug, Clone, Copy)]
pub struct IntervalExpander {
    mapper: ValueMapper,
}

impl IntervalExpander {
    pub fn new(mapper: ValueMapper) -> Self {
        Self { mapper }
    }

    /// Two values at `span.start()` and `span.end()` carrying `source`'s payload.
    ///
    /// The synthetic observations copy geometry, valid time and parameters from
    /// `source`; they are never written back to the store.
    pub fn expand<V: Clone>(
        &self,
        span: &Timespan,
        source: &Observation<V>,
        series: &SeriesEntity<V>,
    ) -> [OutputValue<V>; 2] {
        debug!(
            "expanding value of series {} from {} to {}",
            series.pkid,
            source.timestamp,
            span
        );
        let start = source.at(span.start());
        let end = source.at(span.end());
        [
            self.mapper.map_observation(&start),
            self.mapper.map_observation(&end),
        ]
    }
}
