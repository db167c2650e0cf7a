//! Builder for configuring assembler creation.

use std::path::Path;
use std::sync::Arc;

use super::series_data::SeriesDataAssembler;
use super::value_mapper::ValueMapper;
use crate::db::config::{SeriesConfig, DEFAULT_DATABASE_SRID};
use crate::db::repository::{RepositoryError, SeriesRepository};

/// Fluent construction of a [`SeriesDataAssembler`].
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use series_data::db::LocalRepository;
/// use series_data::models::ObservationValue;
/// use series_data::services::SeriesDataAssemblerBuilder;
///
/// let repo: Arc<LocalRepository> = Arc::new(LocalRepository::new());
/// let assembler = SeriesDataAssemblerBuilder::new(repo)
///     .database_srid(31467)
///     .build::<ObservationValue>();
/// assert_eq!(assembler.mapper().database_srid(), 31467);
/// ```
pub struct SeriesDataAssemblerBuilder<R> {
    repository: Arc<R>,
    database_srid: u32,
}

impl<R> SeriesDataAssemblerBuilder<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            database_srid: DEFAULT_DATABASE_SRID,
        }
    }

    pub fn database_srid(mut self, srid: u32) -> Self {
        self.database_srid = srid;
        self
    }

    /// Take settings from an already loaded configuration.
    pub fn config(mut self, config: &SeriesConfig) -> Self {
        self.database_srid = config.assembler.database_srid;
        self
    }

    /// Load settings from a TOML file, with environment overrides applied.
    pub fn from_config_file<P: AsRef<Path>>(self, path: P) -> Result<Self, RepositoryError> {
        let config = SeriesConfig::from_file(path)?.with_env_overrides();
        Ok(self.config(&config))
    }

    /// Load settings from `series.toml` in the standard locations.
    pub fn from_default_config(self) -> Result<Self, RepositoryError> {
        let config = SeriesConfig::from_default_location()?.with_env_overrides();
        Ok(self.config(&config))
    }

    pub fn build<V>(self) -> SeriesDataAssembler<R, V>
    where
        R: SeriesRepository<V>,
        V: Clone,
    {
        SeriesDataAssembler::new(self.repository, ValueMapper::new(self.database_srid))
    }
}
