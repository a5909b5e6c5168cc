use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    backend::RestBackend,
    infra::{config::AppConfig, session_store::FileSessionStore},
    live::{LiveUpdateChannel, ReconnectPolicy, WebSocketTransport},
};

/// Application-wide collaborators.
///
/// Fields drop in declaration order: the live channel goes before the
/// runtime that drives its worker, and the log guard flushes last.
pub struct AppContext {
    pub config: AppConfig,
    pub channel: LiveUpdateChannel,
    pub backend: RestBackend,
    pub sessions: FileSessionStore,
    _runtime: Runtime,
    log_guard: Option<WorkerGuard>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        runtime: Runtime,
        backend: RestBackend,
        sessions: FileSessionStore,
    ) -> Self {
        let transport = WebSocketTransport::new(
            runtime.handle().clone(),
            ReconnectPolicy::from(&config.live.reconnect),
        );
        let channel = LiveUpdateChannel::new(config.live.endpoint.clone(), Arc::new(transport));

        Self {
            config,
            channel,
            backend,
            sessions,
            _runtime: runtime,
            log_guard: None,
        }
    }

    pub fn with_log_guard(mut self, guard: Option<WorkerGuard>) -> Self {
        self.log_guard = guard;
        self
    }

    pub fn writes_log_file(&self) -> bool {
        self.log_guard.is_some()
    }
}
