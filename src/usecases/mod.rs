//! Use case layer: application workflows and orchestration.

pub mod auth;
pub mod bootstrap;
pub mod broadcast;
pub mod context;
pub mod contracts;
pub mod list_transactions;
pub mod list_wallets;
pub mod load_catalog;
pub mod manage_transaction;
pub mod manage_wallet;
pub mod screen;
pub mod watch;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
