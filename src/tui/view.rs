//! Rendering: draw the current screen onto a surface.
//!
//! Menus draw synchronously. Function screens await their action between
//! clearing the surface and drawing the continue prompt. Temporary colors
//! are always set inside a [`ColorReset`] scope.

use std::io;

use crate::types::ScreenId;

use super::state::{FunctionScreen, MenuScreen, Screen};
use super::surface::{ColorReset, RenderSurface};
use super::theme::{COLORS_ALERT, COLORS_SELECTED};

/// Prompt shown under a function screen's output.
pub const CONTINUE_PROMPT: &str = "Press any key to continue";

impl<Id: ScreenId> Screen<Id> {
    /// Draw the screen, running its action if it has one.
    pub async fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        match self {
            Screen::Menu(menu) => menu.render(surface),
            Screen::Function(function) => function.render(surface).await,
        }
    }
}

// ============================================================================
// MENU
// ============================================================================

impl<Id: ScreenId> MenuScreen<Id> {
    /// Draw one row per item, marking the selected one.
    ///
    /// Leaves the cursor on the bottom row so later output doesn't land
    /// inside the list.
    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        surface.clear()?;

        let (pad_x, pad_y) = self.padding;
        for (i, item) in self.items.iter().enumerate() {
            let row = pad_y.saturating_add(u16::try_from(i).unwrap_or(u16::MAX));
            surface.set_cursor(pad_x, row)?;

            if i == self.selected {
                let mut scoped = ColorReset::new(&mut *surface);
                scoped.set_colors(COLORS_SELECTED.0, COLORS_SELECTED.1)?;
                scoped.write(">")?;
            } else {
                surface.write(" ")?;
            }

            let key = item.key.unwrap_or(' ');
            surface.write(&format!(" {} {}", key, item.text))?;
        }

        let bottom = surface.height().saturating_sub(1);
        surface.set_cursor(0, bottom)?;
        surface.flush()
    }
}

// ============================================================================
// FUNCTION
// ============================================================================

impl<Id: ScreenId> FunctionScreen<Id> {
    /// Clear, run the action to completion, then prompt for a key.
    ///
    /// Without an action an alert naming the screen is drawn instead.
    pub async fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        surface.clear()?;

        match &self.action {
            Some(action) => {
                // Action output goes straight to the terminal; ours must precede it.
                surface.flush()?;
                tracing::debug!(screen = ?self.id, "running action");
                action().await;
                tracing::debug!(screen = ?self.id, "action finished");
            }
            None => {
                tracing::warn!(screen = ?self.id, "function screen has no action");
                let mut scoped = ColorReset::new(&mut *surface);
                scoped.set_colors(COLORS_ALERT.0, COLORS_ALERT.1)?;
                scoped.write_line(&missing_action_message(&self.id))?;
            }
        }

        surface.write_line("")?;
        surface.write_line(CONTINUE_PROMPT)?;
        surface.flush()
    }
}

fn missing_action_message<Id: ScreenId>(id: &Id) -> String {
    format!("ERROR: Action not set for screen '{:?}'.", id)
}

// ============================================================================
// TESTS
// ============================================================================
