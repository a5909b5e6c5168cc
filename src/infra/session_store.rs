use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{
    domain::session::UserSession,
    infra::{contracts::SessionStore, error::AppError, storage_layout::StorageLayout},
};

/// Session record kept as a single JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_layout(layout: &StorageLayout) -> Self {
        Self::new(layout.session_file())
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<UserSession>, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(AppError::SessionIo {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| AppError::SessionDecode {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, session: &UserSession) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| AppError::StorageDirCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let raw = serde_json::to_string(session).map_err(AppError::SessionEncode)?;
        fs::write(&self.path, raw).map_err(|source| AppError::SessionIo {
            path: self.path.clone(),
            source,
        })
    }

    fn clear(&self) -> Result<bool, AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(AppError::SessionIo {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
