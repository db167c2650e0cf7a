//! Observation to output value mapping.

use crate::models::{Observation, OutputValue};

/// Converts stored observations into output values.
///
/// Geometries stored without an SRID are tagged with `database_srid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueMapper {
    database_srid: u32,
}

impl ValueMapper {
    pub fn new(database_srid: u32) -> Self {
        Self { database_srid }
    }

    pub fn database_srid(&self) -> u32 {
        self.database_srid
    }

    /// Map an observation that may be absent.
    ///
    /// Absent observations are gaps in the store, not errors: they map to `None`
    /// and the caller skips them.
    pub fn to_output_value<V: Clone>(
        &self,
        observation: Option<&Observation<V>>,
    ) -> Option<OutputValue<V>> {
        observation.map(|o| self.map_observation(o))
    }

    pub fn map_observation<V: Clone>(&self, observation: &Observation<V>) -> OutputValue<V> {
        let mut value = OutputValue::new(observation.timestamp, observation.value.clone());
        self.add_geometry(observation, &mut value);
        add_valid_time(observation, &mut value);
        add_parameters(observation, &mut value);
        value
    }

    fn add_geometry<V>(&self, observation: &Observation<V>, value: &mut OutputValue<V>) {
        if let Some(ref geometry) = observation.geometry {
            value.geometry = Some(geometry.geometry(self.database_srid));
        }
    }
}

// Either end of the valid time may be set on its own.
fn add_valid_time<V>(observation: &Observation<V>, value: &mut OutputValue<V>) {
    if let Some(start) = observation.valid_time.start {
        value.valid_time_start = Some(start);
    }
    if let Some(end) = observation.valid_time.end {
        value.valid_time_end = Some(end);
    }
}

fn add_parameters<V>(observation: &Observation<V>, value: &mut OutputValue<V>) {
    if observation.has_parameters() {
        value.parameters = Some(observation.parameters.clone());
    }
}
