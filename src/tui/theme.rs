//! Color pairs used while drawing screens.
//!
//! Each constant is a `(foreground, background)` pair applied inside a
//! [`ColorReset`](super::surface::ColorReset) scope, so none of them
//! outlives the draw that set it.

use crossterm::style::Color;

/// Foreground/background pair.
pub type ColorPair = (Color, Color);

/// Terminal defaults. Starting state of every surface.
pub const COLORS_DEFAULT: ColorPair = (Color::Reset, Color::Reset);

/// Selection marker in a menu — inverted.
pub const COLORS_SELECTED: ColorPair = (Color::Black, Color::White);

/// Alert text, e.g. a function screen with no action.
pub const COLORS_ALERT: ColorPair = (Color::White, Color::Red);
