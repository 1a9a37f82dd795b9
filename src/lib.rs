//! console-menu: build menu-driven console applications.
//!
//! Register screens on an [`Application`], wire transitions with the
//! builder calls, then `run` it against a surface and an input source.

pub mod error;
pub mod logging;
pub mod tui;
pub mod types;

pub use error::{AppError, Result};
pub use tui::run::Application;
pub use tui::state::{FunctionScreen, MenuScreen, Screen, Transition};
pub use types::{KeyEvent, LogicalKey, MenuItem, ScreenId};
