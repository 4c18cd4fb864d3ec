pub mod app_config;
pub mod config;
pub mod export;
pub mod field_map;
pub mod normalize;
pub mod property;
pub mod resolve;
pub mod saved;
pub mod sources;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use export::render_report;
pub use field_map::FieldMap;
pub use normalize::{normalize, normalize_default};
pub use property::{LatLng, Property, PropertySource, PropertyView, NOT_AVAILABLE};
pub use resolve::{resolve_field, resolve_field_or, resolve_number, resolve_text, RawAttributes};
pub use saved::{SavedError, SavedProperties, SavedProperty, SavedStore};
pub use sources::{load_sources, EndpointList, SearchExtent, SearchSettings, SourcesConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sources file {path}: {source}")]
    SourcesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[source] serde_yaml::Error),

    #[error("sources validation error: {0}")]
    Validation(String),
}
