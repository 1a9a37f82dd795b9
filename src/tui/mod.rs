//! TUI module: screens, their rendering, and the run loop.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: screen types and builders
//! - `update`: key handling, (Screen, KeyEvent) → Transition
//! - `view`: drawing onto a `RenderSurface`
//! - `run`: the registry and event loop (effects)
//! - `surface`, `input`: the terminal edges, behind traits
//! - `theme`: color pairs

pub mod input;
pub mod run;
pub mod state;
pub mod surface;
pub mod theme;
pub mod update;
pub mod view;
