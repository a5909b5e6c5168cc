use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    domain::{events::ScreenEvent, update_message::RefreshTarget},
    usecases::watch::ScreenInput,
};

/// Keyboard commands for the watch screen.
#[derive(Default)]
pub struct CrosstermInput;

impl ScreenInput for CrosstermInput {
    fn next_event(&mut self, timeout: Duration) -> Result<Option<ScreenEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => Ok(map_key(key)),
            _ => Ok(None),
        }
    }
}

fn map_key(key: KeyEvent) -> Option<ScreenEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(ScreenEvent::QuitRequested),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ScreenEvent::QuitRequested)
        }
        KeyCode::Char('w') => Some(ScreenEvent::Refresh(RefreshTarget::Wallets)),
        KeyCode::Char('t') => Some(ScreenEvent::Refresh(RefreshTarget::Transactions)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn quit_keys_request_quit() {
        assert_eq!(
            map_key(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(ScreenEvent::QuitRequested)
        );
        assert_eq!(
            map_key(key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(ScreenEvent::QuitRequested)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(ScreenEvent::QuitRequested)
        );
    }

    #[test]
    fn plain_c_is_ignored() {
        assert_eq!(map_key(key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn letter_keys_request_manual_refresh() {
        assert_eq!(
            map_key(key(KeyCode::Char('t'), KeyModifiers::NONE)),
            Some(ScreenEvent::Refresh(RefreshTarget::Transactions))
        );
    }

    #[test]
    fn key_release_is_ignored() {
        let mut release = key(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;

        assert_eq!(map_key(release), None);
    }
}
