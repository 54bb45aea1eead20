//! Terminal mouse tracking as a cursor position source.
//!
//! [`TerminalPointer`] puts the terminal into raw mode with mouse capture
//! and reports the last pointer cell seen. Coordinates are terminal cells,
//! not screen pixels, which is enough for parity sampling as long as the
//! user keeps moving over the window.

use crate::sampling::{CursorSample, PositionError, PositionSource};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::stderr;
use std::time::Duration;

/// Pointer position tracked from terminal mouse events.
///
/// Restores the terminal on drop.
#[derive(Debug)]
pub struct TerminalPointer {
    last: CursorSample,
    events: u64,
}

impl TerminalPointer {
    /// Enables raw mode and mouse motion reporting.
    pub fn open() -> Result<Self, PositionError> {
        enable_raw_mode()?;

        let mut out = stderr();
        if let Err(err) = execute!(out, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        tracing::debug!("Terminal mouse capture enabled");
        Ok(Self {
            last: CursorSample::default(),
            events: 0,
        })
    }

    /// Number of mouse events consumed so far.
    pub fn events_seen(&self) -> u64 {
        self.events
    }

    /// Consumes every pending terminal event without blocking.
    fn drain(&mut self) -> Result<(), PositionError> {
        while event::poll(Duration::ZERO)? {
            if track(&mut self.last, event::read()?)? {
                self.events += 1;
            }
        }
        Ok(())
    }
}

impl PositionSource for TerminalPointer {
    fn position(&mut self) -> Result<CursorSample, PositionError> {
        self.drain()?;
        Ok(self.last)
    }
}

impl Drop for TerminalPointer {
    fn drop(&mut self) {
        let _ = execute!(stderr(), DisableMouseCapture);
        let _ = disable_raw_mode();
        tracing::debug!(events = self.events, "Terminal mouse capture released");
    }
}

/// Applies one terminal event to `last`.
///
/// Returns whether the event was a mouse event. Raw mode swallows SIGINT,
/// so Ctrl+C arrives here as a key press and is reported as an interrupt.
fn track(last: &mut CursorSample, event: Event) -> Result<bool, PositionError> {
    match event {
        Event::Mouse(mouse) => {
            *last = CursorSample::new(i32::from(mouse.column), i32::from(mouse.row));
            Ok(true)
        }
        Event::Key(key)
            if key.kind == KeyEventKind::Press
                && key.modifiers.contains(KeyModifiers::CONTROL)
                && key.code == KeyCode::Char('c') =>
        {
            Err(PositionError::Interrupted)
        }
        _ => Ok(false),
    }
}
