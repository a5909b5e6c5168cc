//! Domain layer: core entities and business rules.

pub mod catalog;
pub mod channel_status;
pub mod events;
pub mod list_state;
pub mod session;
pub mod transaction;
pub mod update_message;
pub mod wallet;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
