use std::path::Path;

use crate::{
    backend::RestBackend,
    infra::{
        self, error::AppError, session_store::FileSessionStore, storage_layout::StorageLayout,
    },
    usecases::context::AppContext,
};

pub fn bootstrap(config_path: Option<&Path>) -> Result<AppContext, AppError> {
    let config = infra::config::load(config_path)?;
    let log_guard = infra::logging::init(&config.logging)?;
    let context = build_context(config)?.with_log_guard(log_guard);

    tracing::debug!(
        backend = context.backend.base_url(),
        live_endpoint = context.channel.endpoint(),
        log_file = context.writes_log_file(),
        "application context ready"
    );
    Ok(context)
}

fn build_context(config: infra::config::AppConfig) -> Result<AppContext, AppError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("fintrack-io")
        .build()
        .map_err(AppError::RuntimeStart)?;
    let backend = RestBackend::new(&config.backend, runtime.handle().clone())?;

    let layout = StorageLayout::resolve()?;
    layout.ensure_dirs()?;
    let sessions = FileSessionStore::from_layout(&layout);

    Ok(AppContext::new(config, runtime, backend, sessions))
}
