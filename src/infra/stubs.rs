use std::sync::Mutex;

use crate::{
    domain::session::UserSession,
    infra::{contracts::SessionStore, error::AppError},
};

/// Session store that never touches the disk.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    session: Mutex<Option<UserSession>>,
}

impl InMemorySessionStore {
    pub fn with_session(session: UserSession) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> Result<Option<UserSession>, AppError> {
        Ok(self
            .session
            .lock()
            .map(|session| session.clone())
            .unwrap_or_default())
    }

    fn save(&self, session: &UserSession) -> Result<(), AppError> {
        if let Ok(mut slot) = self.session.lock() {
            *slot = Some(session.clone());
        }
        Ok(())
    }

    fn clear(&self) -> Result<bool, AppError> {
        Ok(self
            .session
            .lock()
            .map(|mut slot| slot.take().is_some())
            .unwrap_or(false))
    }
}
