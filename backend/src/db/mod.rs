//! Store access for series data.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Service Layer (services/) - series data assembly        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │  one ScopedSession per request
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface    │
//! │  - SessionProvider                                       │
//! │  - SeriesLookup                                          │
//! │  - ObservationStore                                      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!         ┌───────────▼─────────────┐
//!         │  Local Repository       │
//!         │  (in-memory)            │
//!         └─────────────────────────┘
//! ```

pub mod config;
pub mod repositories;
pub mod repository;
pub mod session;

pub use config::{AssemblerSettings, SeriesConfig};
pub use repositories::{LocalRepository, SessionStats};
pub use repository::{
    ErrorContext, ObservationStore, RepositoryError, RepositoryResult, SeriesLookup,
    SeriesRepository, SessionProvider,
};
pub use session::{with_session, ScopedSession};
