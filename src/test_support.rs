use std::{
    env,
    ffi::OsString,
    path::Path,
    sync::{Mutex, MutexGuard},
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Points `XDG_CONFIG_HOME` at a fresh temp dir until dropped.
/// Hold `env_lock()` for the whole lifetime of this value.
pub struct ScopedXdgConfigHome {
    dir: tempfile::TempDir,
    previous: Option<OsString>,
}

impl ScopedXdgConfigHome {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp xdg dir should be creatable");
        let previous = env::var_os("XDG_CONFIG_HOME");
        env::set_var("XDG_CONFIG_HOME", dir.path());

        Self { dir, previous }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Drop for ScopedXdgConfigHome {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => env::set_var("XDG_CONFIG_HOME", value),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }
    }
}
