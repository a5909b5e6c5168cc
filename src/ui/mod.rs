//! UI layer: terminal rendering and console IO for the CLI commands.

mod console;
mod event_source;
pub mod format;
mod styles;
mod terminal;
mod view;

#[cfg(test)]
pub(crate) use console::FakeConsole;
pub(crate) use console::{Console, StdConsole};
pub(crate) use event_source::CrosstermInput;
pub(crate) use terminal::TerminalSession;

/// Returns the UI module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
