pub mod app_config;
pub mod database;

pub use app_config::{AppConfig, AppEnv, ConfigError};
pub use database::{create_tables, establish_connection};
