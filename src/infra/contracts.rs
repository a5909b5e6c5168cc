use crate::{domain::session::UserSession, infra::error::AppError};

/// Device-local storage for the signed-in user record.
pub trait SessionStore {
    fn load(&self) -> Result<Option<UserSession>, AppError>;
    fn save(&self, session: &UserSession) -> Result<(), AppError>;
    /// Returns whether a record was removed.
    fn clear(&self) -> Result<bool, AppError>;
}
