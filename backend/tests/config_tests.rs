//! Tests for configuration loading and assembler construction.

mod support;

use std::io::Write;
use std::sync::Arc;

use series_data::db::{LocalRepository, RepositoryError, SeriesConfig};
use series_data::models::{GeometryEntity, ObservationValue, SeriesId};
use series_data::services::SeriesDataAssemblerBuilder;
use support::{span_query, text, with_scoped_env};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_config_from_file() {
    let file = write_config("[assembler]\ndatabase_srid = 25832\n");
    let config = SeriesConfig::from_file(file.path()).unwrap();
    assert_eq!(config.assembler.database_srid, 25832);
}

#[test]
fn test_invalid_config_file() {
    let file = write_config("[assembler]\ndatabase_srid = \"not a number\"\n");
    let err = SeriesConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, RepositoryError::Configuration { .. }));
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_env_override() {
    let config = with_scoped_env(
        &[("SERIES_DATABASE_SRID", Some("3857"))],
        SeriesConfig::from_env,
    );
    assert_eq!(config.assembler.database_srid, 3857);
}

#[test]
fn test_invalid_env_override_is_ignored() {
    let config = with_scoped_env(
        &[("SERIES_DATABASE_SRID", Some("epsg"))],
        SeriesConfig::from_env,
    );
    assert_eq!(config, SeriesConfig::default());
}

#[test]
fn test_builder_applies_configured_srid() {
    let file = write_config("[assembler]\ndatabase_srid = 31467\n");
    let repo = Arc::new(LocalRepository::new());
    repo.insert_series(SeriesId(1), true);
    repo.add_observation(
        SeriesId(1),
        text(5, "ok").with_geometry(GeometryEntity::point(3.5, 5.4)),
    )
    .unwrap();

    let assembler = with_scoped_env(&[("SERIES_DATABASE_SRID", None)], || {
        SeriesDataAssemblerBuilder::new(Arc::clone(&repo))
            .from_config_file(file.path())
            .unwrap()
            .build::<ObservationValue>()
    });

    let data = assembler
        .get_data_blocking("1", &span_query(0, 10, false))
        .unwrap();
    assert_eq!(data.values()[0].geometry.as_ref().unwrap().srid, 31467);
}
