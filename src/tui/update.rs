//! State transitions: (Screen, KeyEvent) → Transition.
//!
//! The navigation logic of the toolkit. Fully testable without a
//! terminal. Keys a screen doesn't understand keep it current.

use crate::types::{KeyEvent, LogicalKey, MenuItem, ScreenId};

use super::state::{FunctionScreen, MenuScreen, Screen, Transition};

impl<Id: ScreenId> Screen<Id> {
    /// Consume one key and decide where to go.
    pub fn handle_key(&mut self, key: KeyEvent) -> Transition<Id> {
        match self {
            Screen::Menu(menu) => menu.handle_key(key),
            Screen::Function(function) => function.handle_key(key),
        }
    }
}

// ============================================================================
// PER-SCREEN HANDLERS
// ============================================================================

impl<Id: ScreenId> MenuScreen<Id> {
    /// Arrows move the selection, Enter or a shortcut chooses an item.
    pub fn handle_key(&mut self, key: KeyEvent) -> Transition<Id> {
        match key.key {
            LogicalKey::Down => {
                if self.selected + 1 < self.items.len() {
                    self.selected += 1;
                }
                self.stay()
            }
            LogicalKey::Up => {
                self.selected = self.selected.saturating_sub(1);
                self.stay()
            }
            LogicalKey::Enter => match self.items.get(self.selected) {
                Some(item) => choose(item),
                // Empty menu: nothing to choose.
                None => self.stay(),
            },
            LogicalKey::Other => {
                let chosen = key
                    .ch
                    .and_then(|c| self.items.iter().find(|item| item.key == Some(c)));
                match chosen {
                    Some(item) => choose(item),
                    None => self.stay(),
                }
            }
        }
    }

    fn stay(&self) -> Transition<Id> {
        Transition::Screen(self.id.clone())
    }
}

impl<Id: ScreenId> FunctionScreen<Id> {
    /// Any key dismisses the screen.
    pub fn handle_key(&mut self, _key: KeyEvent) -> Transition<Id> {
        Transition::Screen(self.next.clone())
    }
}

/// Termination items quit; everything else goes to its target.
fn choose<Id: ScreenId>(item: &MenuItem<Id>) -> Transition<Id> {
    match &item.target {
        Some(target) => Transition::Screen(target.clone()),
        None => Transition::Quit,
    }
}

// ============================================================================
// TESTS
// ============================================================================
