// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// coordinator, or into local ViewState mutations (cursor movement and
// table scrolling).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::ViewState;
use crate::protocol::UserCommand;

/// Rows moved per PageUp/PageDown press.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to
/// the coordinator (selection, refresh, quit). Returns `None` when the key
/// press was handled locally by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of state (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    match key_event.code {
        // Competition list navigation
        KeyCode::Up | KeyCode::Char('k') => {
            cursor_up(view_state);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            cursor_down(view_state);
            None
        }

        // Load the standings for the competition under the cursor
        KeyCode::Enter => {
            if view_state.competitions.is_empty() {
                None
            } else {
                Some(UserCommand::Select(view_state.cursor))
            }
        }

        // Re-fetch the current competition's standings
        KeyCode::Char('r') => Some(UserCommand::Refresh),

        // Standings table scrolling
        KeyCode::PageUp => {
            view_state.table_scroll = view_state.table_scroll.saturating_sub(PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            scroll_table_down(view_state, PAGE_SIZE);
            None
        }

        KeyCode::Char('q') => Some(UserCommand::Quit),

        _ => None,
    }
}

fn cursor_up(view_state: &mut ViewState) {
    view_state.cursor = view_state.cursor.saturating_sub(1);
}

fn cursor_down(view_state: &mut ViewState) {
    if view_state.competitions.is_empty() {
        return;
    }
    let last = view_state.competitions.len() - 1;
    if view_state.cursor < last {
        view_state.cursor += 1;
    }
}

fn scroll_table_down(view_state: &mut ViewState, amount: usize) {
    let max = view_state.display_rows.len().saturating_sub(1);
    view_state.table_scroll = (view_state.table_scroll + amount).min(max);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
