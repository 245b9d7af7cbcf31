//! Keyboard input handling for the picker.
//!
//! Translates key events into application state changes. Returns true
//! from `handle_input` when the app should quit.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Level, PAGE_SCROLL_SIZE};

pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Help overlay swallows everything except its close keys
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Filter entry mode
    if matches!(app.state, AppState::Filtering) {
        match key.code {
            KeyCode::Esc => {
                app.clear_filter();
                app.state = AppState::Normal;
            }
            KeyCode::Enter => {
                // Keep the filter, go back to navigating
                app.state = AppState::Normal;
            }
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Char(c) => app.push_filter_char(c),
            _ => {}
        }
        return Ok(false);
    }

    // Any keypress clears a lingering status message
    app.status_message = None;

    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,

        KeyCode::Down | KeyCode::Char('j') => app.move_down(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_up(1),
        KeyCode::PageDown => app.move_down(PAGE_SCROLL_SIZE),
        KeyCode::PageUp => app.move_up(PAGE_SCROLL_SIZE),
        KeyCode::Home => app.move_up(usize::MAX),

        KeyCode::Right | KeyCode::Char('l') => app.descend(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Esc => app.ascend(),

        KeyCode::Enter => {
            if app.level == Level::Region {
                app.confirm()?;
            } else {
                app.descend();
            }
        }

        KeyCode::Char('/') => app.start_filter(),
        KeyCode::Char('r') => app.reload(),

        _ => {}
    }

    Ok(false)
}
