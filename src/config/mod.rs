//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ApplicationConfig, CacheSettings, ImportConfig, LogFormat, LoggingConfig,
    ServerConfig, StorageSettings,
};
