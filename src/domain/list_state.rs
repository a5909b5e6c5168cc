/// Load state of a fetched list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListUiState {
    Loading,
    Ready,
    Empty,
    Error,
}

/// Transient per-screen copy of a backend list. Replaced wholesale on every
/// re-fetch; nothing here outlives the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    ui_state: ListUiState,
    items: Vec<T>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            ui_state: ListUiState::Loading,
            items: Vec::new(),
        }
    }
}

impl<T> ListState<T> {
    pub fn ui_state(&self) -> ListUiState {
        self.ui_state
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn set_loading(&mut self) {
        self.ui_state = ListUiState::Loading;
    }

    pub fn set_ready(&mut self, items: Vec<T>) {
        self.ui_state = if items.is_empty() {
            ListUiState::Empty
        } else {
            ListUiState::Ready
        };
        self.items = items;
    }

    /// Keeps the last good items so a failed refresh does not blank the screen.
    pub fn set_error(&mut self) {
        self.ui_state = ListUiState::Error;
    }
}
