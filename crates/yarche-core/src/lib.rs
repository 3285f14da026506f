mod app_config;
mod categories;
mod config;
mod products;
mod regions;
mod selection;

pub use app_config::{AppConfig, DelayRange, SmtpConfig};
pub use categories::{is_aggregate_url, CategoryNode, CategoryTree, CATALOG_PREFIX, CATEGORY_PREFIX};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{FieldValue, ProductField, ProductRecord, ProductSnapshot, PRODUCT_CSV_FIELDS};
pub use regions::Region;
pub use selection::{load_category_selection, CategorySelection};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read category selection file {path}: {source}")]
    SelectionFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse category selection file: {0}")]
    SelectionFileParse(#[source] serde_yaml::Error),

    #[error("config validation failed: {0}")]
    Validation(String),
}
