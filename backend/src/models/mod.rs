//! Domain types shared by the repository layer and the assembly services.
//!
//! Every type that carries an observation payload is generic over `V`, the value
//! kind of the series. [`ObservationValue`] is the default kind set used by the
//! in-memory repository and the tests.

pub mod data;
pub mod observation;
pub mod query;
pub mod series;
pub mod value;

pub use data::{OutputValue, SeriesData, SeriesDataMetadata};
pub use observation::{Geometry, GeometryEntity, Observation, Parameter, ValidTime};
pub use query::{DbQuery, DbQueryBuilder, Timespan};
pub use series::{ObservationType, SeriesEntity, SeriesId};
pub use value::ObservationValue;
