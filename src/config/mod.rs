//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, FeaturesConfig, LogFormat, LoggingConfig, ServerConfig, StorageConfig,
};
