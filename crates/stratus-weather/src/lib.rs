//! Location-to-weather pipeline for Stratus
//!
//! Acquires a geographic fix, fetches current weather for it from an
//! OpenWeatherMap-compatible API, persists the last successful payload,
//! and maps it into display fields.

pub mod cache;
pub mod error;
pub mod location;
pub mod pipeline;
pub mod present;
pub mod provider;
pub mod types;

pub use cache::WeatherCache;
pub use error::{CacheError, FetchError, LocationError, PipelineError};
pub use location::{LocationAcquirer, LocationSource, PermissionGate, PermissionOutcome};
pub use pipeline::WeatherPipeline;
pub use present::{DisplayModel, WeatherIcon, WeatherPresenter};
pub use provider::{ConnectivityProbe, WeatherProvider};
pub use types::{Coordinate, WeatherRecord};
