// src/app/navigation_helpers.rs
use ratatui::widgets::{ListState, TableState};

pub fn table_next(state: &mut TableState, list_len: usize) {
    if list_len == 0 { return; }
    let i = match state.selected() {
        Some(i) if i >= list_len - 1 => 0,
        Some(i) => i + 1,
        None => 0,
    };
    state.select(Some(i));
}

pub fn table_previous(state: &mut TableState, list_len: usize) {
    if list_len == 0 { return; }
    let i = match state.selected() {
        Some(i) if i == 0 => list_len - 1,
        Some(i) => i - 1,
        None => list_len.saturating_sub(1),
    };
    state.select(Some(i));
}

pub fn list_next(state: &mut ListState, list_len: usize) {
    if list_len == 0 { return; }
    let i = match state.selected() {
        Some(i) if i >= list_len - 1 => 0,
        Some(i) => i + 1,
        None => 0,
    };
    state.select(Some(i));
}

pub fn list_previous(state: &mut ListState, list_len: usize) {
    if list_len == 0 { return; }
    let i = match state.selected() {
        Some(i) if i == 0 => list_len - 1,
        Some(i) => i - 1,
        None => list_len.saturating_sub(1),
    };
    state.select(Some(i));
}

/// Clamps a table selection after the underlying list changed size.
pub fn ensure_table_selection(state: &mut TableState, list_len: usize) {
    if list_len == 0 {
        state.select(None);
    } else if state.selected().map_or(true, |i| i >= list_len) {
        state.select(Some(list_len - 1));
    }
}
