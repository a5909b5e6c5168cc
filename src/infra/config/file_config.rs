use std::path::PathBuf;

use serde::Deserialize;

use crate::infra::config::{AppConfig, BackendConfig, LiveConfig, LogConfig, ReconnectConfig};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub backend: Option<FileBackendConfig>,
    pub live: Option<FileLiveConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(backend) = self.backend {
            backend.merge_into(&mut config.backend);
        }

        if let Some(live) = self.live {
            live.merge_into(&mut config.live);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
    pub file_dir: Option<PathBuf>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }

        if let Some(file_dir) = self.file_dir {
            config.file_dir = Some(file_dir);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileBackendConfig {
    pub base_url: Option<String>,
    pub request_timeout_ms: Option<u64>,
}

impl FileBackendConfig {
    fn merge_into(self, config: &mut BackendConfig) {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url.trim_end_matches('/').to_owned();
        }

        if let Some(timeout_ms) = self.request_timeout_ms {
            config.request_timeout_ms = timeout_ms;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLiveConfig {
    pub endpoint: Option<String>,
    pub open_timeout_ms: Option<u64>,
    pub reconnect: Option<FileReconnectConfig>,
}

impl FileLiveConfig {
    fn merge_into(self, config: &mut LiveConfig) {
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }

        if let Some(timeout_ms) = self.open_timeout_ms {
            config.open_timeout_ms = timeout_ms;
        }

        if let Some(reconnect) = self.reconnect {
            reconnect.merge_into(&mut config.reconnect);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileReconnectConfig {
    pub max_attempts: Option<u32>,
    pub initial_backoff_ms: Option<u64>,
    pub max_backoff_ms: Option<u64>,
}

impl FileReconnectConfig {
    fn merge_into(self, config: &mut ReconnectConfig) {
        if let Some(max_attempts) = self.max_attempts {
            config.max_attempts = max_attempts;
        }

        if let Some(initial_backoff_ms) = self.initial_backoff_ms {
            config.initial_backoff_ms = initial_backoff_ms;
        }

        if let Some(max_backoff_ms) = self.max_backoff_ms {
            config.max_backoff_ms = max_backoff_ms;
        }
    }
}
