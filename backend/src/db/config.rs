//! Assembler configuration file support.
//!
//! Settings are read from a TOML file and may be overridden from the
//! environment:
//!
//! ```toml
//! [assembler]
//! database_srid = 4326
//! ```
//!
//! - `SERIES_DATABASE_SRID`: SRID of geometries stored without one (default: 4326)

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::repository::{ErrorContext, RepositoryError};

pub const DEFAULT_DATABASE_SRID: u32 = 4326;

/// Configuration for the series data services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    #[serde(default)]
    pub assembler: AssemblerSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblerSettings {
    #[serde(default = "default_database_srid")]
    pub database_srid: u32,
}

impl Default for AssemblerSettings {
    fn default() -> Self {
        Self {
            database_srid: default_database_srid(),
        }
    }
}

fn default_database_srid() -> u32 {
    DEFAULT_DATABASE_SRID
}

impl SeriesConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(SeriesConfig)` if successful
    /// * `Err(RepositoryError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let context = || ErrorContext::new("load_config").with_details(path.display().to_string());

        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(
                format!("Failed to read config file: {}", e),
                context(),
            )
        })?;

        let config: SeriesConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(
                format!("Failed to parse config file: {}", e),
                context(),
            )
        })?;

        debug!("loaded series config from {}", path.display());
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `series.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("series.toml"),
            PathBuf::from("backend/series.toml"),
            PathBuf::from("../series.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(
            "No series.toml found in standard locations",
            ErrorContext::new("load_config"),
        ))
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `SERIES_DATABASE_SRID` if set. Unparsable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var("SERIES_DATABASE_SRID") {
            match raw.trim().parse::<u32>() {
                Ok(srid) => self.assembler.database_srid = srid,
                Err(e) => warn!("ignoring SERIES_DATABASE_SRID={}: {}", raw, e),
            }
        }
        self
    }
}
