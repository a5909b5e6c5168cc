//! Sign-in, sign-up and sign-out workflows.
//!
//! The only state kept across runs is the session record written by
//! [`sign_in`] and removed by [`sign_out`].

use crate::{
    domain::session::UserSession,
    infra::{contracts::SessionStore, secrets::mask_email},
    usecases::contracts::{AccountGateway, SourceError},
};

const AUTH_SIGNED_IN: &str = "AUTH_SIGNED_IN";
const AUTH_SIGN_IN_FAILED: &str = "AUTH_SIGN_IN_FAILED";
const AUTH_SIGNED_UP: &str = "AUTH_SIGNED_UP";
const AUTH_SESSION_SAVE_FAILED: &str = "AUTH_SESSION_SAVE_FAILED";
const AUTH_SIGNED_OUT: &str = "AUTH_SIGNED_OUT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInCommand {
    pub email: String,
    pub password: String,
}

/// Sign-up form as entered, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Validated sign-up request handed to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpCommand {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    MissingFields,
    PasswordMismatch,
    /// The backend refused the request; `message` is shown to the user.
    Rejected { message: String },
    TemporarilyUnavailable,
    DataContractViolation,
    SessionNotSaved,
    SessionNotCleared,
}

pub fn sign_in(
    gateway: &dyn AccountGateway,
    store: &dyn SessionStore,
    command: SignInCommand,
) -> Result<UserSession, AuthError> {
    let email = command.email.trim();
    if email.is_empty() || command.password.is_empty() {
        return Err(AuthError::MissingFields);
    }

    let session = gateway
        .sign_in(email, &command.password)
        .map_err(|error| {
            tracing::warn!(
                code = AUTH_SIGN_IN_FAILED,
                email = %mask_email(email),
                error = ?error,
                "sign-in refused"
            );
            map_source_error(error)
        })?;

    if let Err(error) = store.save(&session) {
        tracing::error!(
            code = AUTH_SESSION_SAVE_FAILED,
            error = %error,
            "signed in but the session record could not be written"
        );
        return Err(AuthError::SessionNotSaved);
    }

    tracing::info!(
        code = AUTH_SIGNED_IN,
        email = %mask_email(&session.email),
        "signed in"
    );
    Ok(session)
}

pub fn sign_up(gateway: &dyn AccountGateway, input: SignUpInput) -> Result<(), AuthError> {
    let command = validate_sign_up(input)?;

    gateway.sign_up(&command).map_err(map_source_error)?;

    tracing::info!(
        code = AUTH_SIGNED_UP,
        email = %mask_email(&command.email),
        "account created"
    );
    Ok(())
}

/// Removes the session record. Returns whether one existed.
pub fn sign_out(store: &dyn SessionStore) -> Result<bool, AuthError> {
    let removed = store.clear().map_err(|error| {
        tracing::error!(error = %error, "session record could not be removed");
        AuthError::SessionNotCleared
    })?;

    tracing::info!(code = AUTH_SIGNED_OUT, removed, "signed out");
    Ok(removed)
}

/// Loads the signed-in user, if any. A corrupted record counts as signed out.
pub fn current_session(store: &dyn SessionStore) -> Option<UserSession> {
    match store.load() {
        Ok(session) => session,
        Err(error) => {
            tracing::warn!(error = %error, "ignoring unreadable session record");
            None
        }
    }
}

fn validate_sign_up(input: SignUpInput) -> Result<SignUpCommand, AuthError> {
    let first_name = input.first_name.trim();
    let last_name = input.last_name.trim();
    let email = input.email.trim();

    if first_name.is_empty()
        || last_name.is_empty()
        || email.is_empty()
        || input.password.is_empty()
        || input.confirm_password.is_empty()
    {
        return Err(AuthError::MissingFields);
    }

    if input.password != input.confirm_password {
        return Err(AuthError::PasswordMismatch);
    }

    Ok(SignUpCommand {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: email.to_owned(),
        password: input.password,
    })
}

fn map_source_error(error: SourceError) -> AuthError {
    match error {
        SourceError::Rejected { message } => AuthError::Rejected { message },
        SourceError::Unavailable => AuthError::TemporarilyUnavailable,
        SourceError::InvalidData => AuthError::DataContractViolation,
    }
}
