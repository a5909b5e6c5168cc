mod app_config;
mod file_config;
mod loader;

pub use app_config::{AppConfig, BackendConfig, LiveConfig, LogConfig, ReconnectConfig};
pub use loader::load;
