//! REST backend adapter: wallets, transactions, catalog data and accounts.

pub mod rest;
pub mod wire;

pub use rest::RestBackend;

/// Returns the backend module name for smoke checks.
pub fn module_name() -> &'static str {
    "backend"
}
