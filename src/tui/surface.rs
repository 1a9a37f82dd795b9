//! Rendering surfaces: where screens draw.
//!
//! [`RenderSurface`] is the only drawing API screens know about. Two
//! implementations ship with the crate:
//! - [`CrosstermSurface`]: any `Write` (normally stdout) driven by crossterm
//! - [`GridSurface`]: an in-memory character grid, for tests and headless runs
//!
//! [`ColorReset`] brackets temporary color changes so they never leak
//! across draws.

use std::io::{self, Write};
use std::ops::{Deref, DerefMut};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};

use super::theme::{ColorPair, COLORS_DEFAULT};

// ============================================================================
// SURFACE TRAIT
// ============================================================================

/// A fixed-size character grid with a cursor and a current color pair.
pub trait RenderSurface {
    /// Blank the whole surface and home the cursor to (0, 0).
    fn clear(&mut self) -> io::Result<()>;

    fn set_cursor(&mut self, x: u16, y: u16) -> io::Result<()>;

    /// Write at the cursor, advancing it.
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Write, then move the cursor to the start of the next row.
    fn write_line(&mut self, text: &str) -> io::Result<()>;

    fn set_colors(&mut self, foreground: Color, background: Color) -> io::Result<()>;

    /// Current `(foreground, background)`.
    fn colors(&self) -> ColorPair;

    /// Number of visible rows.
    fn height(&self) -> u16;

    /// Push buffered output to the device.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// COLOR SCOPE
// ============================================================================

/// Scope guard restoring a surface's colors on drop.
///
/// Captures the colors at creation and derefs to the surface, so the
/// protected block draws through the guard. Restoration happens on every
/// exit path, including `?` early returns and unwinding.
pub struct ColorReset<'a, S: RenderSurface + ?Sized> {
    surface: &'a mut S,
    saved: ColorPair,
}

impl<'a, S: RenderSurface + ?Sized> ColorReset<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        let saved = surface.colors();
        ColorReset { surface, saved }
    }
}

impl<S: RenderSurface + ?Sized> Deref for ColorReset<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: RenderSurface + ?Sized> DerefMut for ColorReset<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: RenderSurface + ?Sized> Drop for ColorReset<'_, S> {
    fn drop(&mut self) {
        let (fg, bg) = self.saved;
        // Drop can't report; a failing device will fail the next draw anyway.
        let _ = self.surface.set_colors(fg, bg);
    }
}

// ============================================================================
// CROSSTERM
// ============================================================================

/// Surface backed by a crossterm-driven writer.
///
/// Commands are queued and sent on [`flush`](RenderSurface::flush).
/// Terminals can't be asked for their current colors, so the surface
/// tracks the last pair it set.
pub struct CrosstermSurface<W: Write> {
    out: W,
    colors: ColorPair,
}

impl CrosstermSurface<io::Stdout> {
    pub fn stdout() -> Self {
        CrosstermSurface::new(io::stdout())
    }
}

impl<W: Write> CrosstermSurface<W> {
    pub fn new(out: W) -> Self {
        CrosstermSurface {
            out,
            colors: COLORS_DEFAULT,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSurface for CrosstermSurface<W> {
    fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))
    }

    fn set_cursor(&mut self, x: u16, y: u16) -> io::Result<()> {
        queue!(self.out, MoveTo(x, y))
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text))
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        // Raw mode is off while screens draw, so "\n" also returns the carriage.
        queue!(self.out, Print(text), Print("\n"))
    }

    fn set_colors(&mut self, foreground: Color, background: Color) -> io::Result<()> {
        self.colors = (foreground, background);
        if self.colors == COLORS_DEFAULT {
            return queue!(self.out, ResetColor);
        }
        queue!(
            self.out,
            SetForegroundColor(foreground),
            SetBackgroundColor(background)
        )
    }

    fn colors(&self) -> ColorPair {
        self.colors
    }

    fn height(&self) -> u16 {
        // Fall back to the classic 24 rows when not attached to a terminal.
        terminal::size().map(|(_, rows)| rows).unwrap_or(24)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

// ============================================================================
// IN-MEMORY GRID
// ============================================================================

/// One character cell and the colors it was drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            fg: COLORS_DEFAULT.0,
            bg: COLORS_DEFAULT.1,
        }
    }
}

/// In-memory surface. Writes outside the grid are clipped.
#[derive(Debug, Clone)]
pub struct GridSurface {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    cursor: (u16, u16),
    colors: ColorPair,
}

impl GridSurface {
    pub fn new(width: u16, height: u16) -> Self {
        GridSurface {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
            cursor: (0, 0),
            colors: COLORS_DEFAULT,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y as usize * self.width as usize + x as usize)
    }

    /// Row `y` as text, trailing blanks trimmed.
    pub fn row(&self, y: u16) -> String {
        let row: String = (0..self.width)
            .filter_map(|x| self.cell(x, y))
            .map(|c| c.ch)
            .collect();
        row.trim_end().to_string()
    }

    /// All rows joined by newlines, trailing blank rows dropped.
    pub fn contents(&self) -> String {
        let rows: Vec<String> = (0..self.height).map(|y| self.row(y)).collect();
        rows.join("\n").trim_end().to_string()
    }

    fn put(&mut self, ch: char) {
        let (x, y) = self.cursor;
        if x < self.width && y < self.height {
            let (fg, bg) = self.colors;
            self.cells[y as usize * self.width as usize + x as usize] = Cell { ch, fg, bg };
        }
        self.cursor.0 = x.saturating_add(1);
    }
}

impl RenderSurface for GridSurface {
    fn clear(&mut self) -> io::Result<()> {
        self.cells.fill(Cell::default());
        self.cursor = (0, 0);
        Ok(())
    }

    fn set_cursor(&mut self, x: u16, y: u16) -> io::Result<()> {
        self.cursor = (x, y);
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        for ch in text.chars() {
            if ch == '\n' {
                self.cursor = (0, self.cursor.1.saturating_add(1));
            } else {
                self.put(ch);
            }
        }
        Ok(())
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.write(text)?;
        self.cursor = (0, self.cursor.1.saturating_add(1));
        Ok(())
    }

    fn set_colors(&mut self, foreground: Color, background: Color) -> io::Result<()> {
        self.colors = (foreground, background);
        Ok(())
    }

    fn colors(&self) -> ColorPair {
        self.colors
    }

    fn height(&self) -> u16 {
        self.height
    }
}

// ============================================================================
// TESTS
// ============================================================================
