//! Series data services.
//!
//! - [`value_mapper`]: one stored observation to one output value
//! - [`interval_expander`]: boundary values for sparse reference series
//! - [`series_data`]: the assembler tying lookup, session and store together
//! - [`builder`]: assembler construction from configuration

pub mod builder;
pub mod error;
pub mod interval_expander;
pub mod series_data;
pub mod value_mapper;

pub use builder::SeriesDataAssemblerBuilder;
pub use error::{SeriesDataError, SeriesDataResult};
pub use interval_expander::IntervalExpander;
pub use series_data::{DataRepository, SeriesDataAssembler};
pub use value_mapper::ValueMapper;
