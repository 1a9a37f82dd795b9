//! Input sources: where key events come from.
//!
//! [`InputSource`] is a blocking, one-event-per-call reader.
//! - [`CrosstermInput`]: the real keyboard, in raw mode only while reading
//! - [`ScriptedInput`]: a pre-recorded sequence (tests, `--replay`)

use std::collections::VecDeque;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::types::KeyEvent;

/// Blocking source of key events.
pub trait InputSource {
    /// Block until the next key press.
    ///
    /// With `intercept` set the key is not echoed.
    fn read_key(&mut self, intercept: bool) -> io::Result<KeyEvent>;
}

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a crossterm key event to the logical key a screen understands.
///
/// Ctrl and Alt chords produce no printable character, so they never
/// match a shortcut.
pub fn map_key(key: event::KeyEvent) -> KeyEvent {
    match key.code {
        KeyCode::Up => KeyEvent::UP,
        KeyCode::Down => KeyEvent::DOWN,
        KeyCode::Enter => KeyEvent::ENTER,
        KeyCode::Char(_) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            KeyEvent::other()
        }
        KeyCode::Char(c) if !c.is_control() => KeyEvent::char(c),
        _ => KeyEvent::other(),
    }
}

/// Ctrl+C. Raw mode swallows SIGINT, so it has to be caught here.
fn is_interrupt(key: &event::KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

// ============================================================================
// TERMINAL
// ============================================================================

/// Raw mode for the lifetime of the guard.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        // Best-effort restoration
        let _ = disable_raw_mode();
    }
}

/// Keyboard input through crossterm.
///
/// Raw mode is held only for the duration of a read, so screen actions
/// can print with ordinary line discipline.
#[derive(Debug, Default)]
pub struct CrosstermInput;

impl CrosstermInput {
    pub fn new() -> Self {
        CrosstermInput
    }
}

impl InputSource for CrosstermInput {
    fn read_key(&mut self, intercept: bool) -> io::Result<KeyEvent> {
        let key = {
            let _raw = RawMode::enable()?;
            loop {
                match event::read()? {
                    // Windows reports releases too; only presses count.
                    Event::Key(key) if key.kind == KeyEventKind::Press => break key,
                    _ => {} // ignore mouse, resize, focus, etc.
                }
            }
        };

        if is_interrupt(&key) {
            tracing::info!("ctrl-c while waiting for a key");
            return Err(io::Error::new(io::ErrorKind::Interrupted, "ctrl-c"));
        }

        let mapped = map_key(key);
        if !intercept {
            if let Some(c) = mapped.ch {
                let mut out = io::stdout();
                write!(out, "{}", c)?;
                out.flush()?;
            }
        }
        Ok(mapped)
    }
}

// ============================================================================
// SCRIPTED
// ============================================================================

/// Replays a fixed sequence of keys.
///
/// Once exhausted, reads fail with `UnexpectedEof`, which ends a run that
/// never reached a termination item.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    keys: VecDeque<KeyEvent>,
}

impl ScriptedInput {
    pub fn new(keys: impl IntoIterator<Item = KeyEvent>) -> Self {
        ScriptedInput {
            keys: keys.into_iter().collect(),
        }
    }

    /// Load a JSON array of key names, e.g. `["down", "enter", "q"]`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid key list.
    pub fn from_json_file(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let keys: Vec<KeyEvent> = serde_json::from_str(&content).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Invalid key script: {}", e))
        })?;
        Ok(ScriptedInput::new(keys))
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl InputSource for ScriptedInput {
    fn read_key(&mut self, _intercept: bool) -> io::Result<KeyEvent> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "key script exhausted"))
    }
}

// ============================================================================
// TESTS
// ============================================================================
