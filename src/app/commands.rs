//! Command handlers - business logic for processing UI events

use crate::app::state::{SidebarRow, TestDialog};
use crate::app::AppState;
use crate::compose;
use crate::messages::ui_events::{DialogTab, InputMode};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::Header;
use crate::navigation::NavigationOutcome;

impl AppState {
    // ========================
    // Navigation
    // ========================

    /// Apply a fragment change; the sidebar follows a successful match
    pub fn navigate_to(&mut self, fragment: &str) -> NavigationOutcome {
        let outcome = self.nav.navigate(&self.document, fragment);
        match &outcome {
            NavigationOutcome::Resolved { key, .. } => {
                self.sidebar.reveal(key);
                self.detail_scroll = 0;
                self.status_message = None;
            }
            NavigationOutcome::Unchanged(_) => self.status_message = None,
            NavigationOutcome::Unresolved => {
                self.status_message = Some(format!("No endpoint matches #{}", fragment.trim_start_matches('#')));
            }
            NavigationOutcome::Ignored => {}
        }
        outcome
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn sidebar_up(&mut self) {
        self.sidebar.move_up();
    }

    pub fn sidebar_down(&mut self) {
        self.sidebar.move_down();
    }

    /// Enter on a section toggles it; on an endpoint it sets the fragment
    pub fn sidebar_activate(&mut self) {
        match self.sidebar.selected() {
            Some(SidebarRow::Section(section)) => self.sidebar.toggle_section(section),
            Some(SidebarRow::Endpoint { section, index }) => {
                let Some(anchor) = self.sidebar.endpoint(section, index).map(|k| k.anchor()) else {
                    return;
                };
                self.navigate_to(&anchor);
            }
            None => {}
        }
    }

    // ========================
    // Detail pane
    // ========================

    pub fn scroll_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    pub fn next_response_tab(&mut self) {
        self.nav.next_response_tab(&self.document);
    }

    pub fn prev_response_tab(&mut self) {
        self.nav.prev_response_tab(&self.document);
    }

    pub fn cycle_snippet_language(&mut self) {
        self.snippet_language = self.snippet_language.next();
    }

    // ========================
    // Go-to prompt
    // ========================

    pub fn open_goto(&mut self) {
        self.goto_input = Some(String::new());
    }

    pub fn goto_char(&mut self, c: char) {
        if let Some(input) = self.goto_input.as_mut() {
            input.push(c);
        }
    }

    pub fn goto_backspace(&mut self) {
        if let Some(input) = self.goto_input.as_mut() {
            input.pop();
        }
    }

    pub fn goto_submit(&mut self) {
        if let Some(input) = self.goto_input.take() {
            self.navigate_to(&input);
        }
    }

    pub fn goto_cancel(&mut self) {
        self.goto_input = None;
    }

    // ========================
    // Test dialog
    // ========================

    /// Open the dialog with a freshly seeded draft for the displayed endpoint
    pub fn open_test_dialog(&mut self) {
        let base_url = self.base_url().to_string();
        let session = self.next_session_id;
        let Some(resolved) = self.nav.resolved(&self.document) else {
            self.status_message = Some("Select an endpoint first".to_string());
            return;
        };
        let dialog = TestDialog::new(session, &resolved, base_url);
        tracing::debug!(session, path = %dialog.endpoint.path, "Opening test dialog");
        self.next_session_id += 1;
        self.dialog = Some(dialog);
    }

    /// Close the dialog; the draft and any late response are discarded
    pub fn close_test_dialog(&mut self) {
        if let Some(dialog) = self.dialog.take() {
            tracing::debug!(session = dialog.session, "Closed test dialog");
        }
    }

    pub fn dialog_next_tab(&mut self) {
        self.step_dialog_tab(1);
    }

    pub fn dialog_prev_tab(&mut self) {
        self.step_dialog_tab(-1);
    }

    fn step_dialog_tab(&mut self, step: isize) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        let tabs = dialog.tabs();
        let current = tabs.iter().position(|t| *t == dialog.active_tab).unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(tabs.len() as isize) as usize;
        dialog.active_tab = tabs[next];
        dialog.selected = 0;
        dialog.input_mode = InputMode::Normal;
        dialog.editing_key = false;
    }

    pub fn next_field(&mut self) {
        if let Some(dialog) = self.dialog.as_mut() {
            let count = dialog.field_count();
            if count > 0 {
                dialog.selected = (dialog.selected + 1) % count;
            }
        }
    }

    pub fn prev_field(&mut self) {
        if let Some(dialog) = self.dialog.as_mut() {
            let count = dialog.field_count();
            if count > 0 {
                dialog.selected = dialog.selected.checked_sub(1).unwrap_or(count - 1);
            }
        }
    }

    pub fn response_scroll_up(&mut self) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.response_scroll = dialog.response_scroll.saturating_sub(1);
        }
    }

    pub fn response_scroll_down(&mut self) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.response_scroll = dialog.response_scroll.saturating_add(1);
        }
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        self.begin_edit(false);
    }

    pub fn start_editing_key(&mut self) {
        self.begin_edit(true);
    }

    fn begin_edit(&mut self, key: bool) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        dialog.editing_key = key && dialog.active_tab == DialogTab::Headers;
        if let Some(len) = dialog.current_input().map(str::len) {
            dialog.input_mode = InputMode::Editing;
            dialog.cursor_position = len;
        }
    }

    pub fn stop_editing(&mut self) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.input_mode = InputMode::Normal;
            dialog.editing_key = false;
        }
    }

    pub fn move_cursor_left(&mut self) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        let Some(input) = dialog.current_input() else {
            return;
        };
        if dialog.cursor_position > 0 {
            let new_pos = input[..dialog.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            dialog.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        let Some(input) = dialog.current_input() else {
            return;
        };
        if dialog.cursor_position < input.len() {
            let new_pos = input[dialog.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| dialog.cursor_position + i)
                .unwrap_or(input.len());
            dialog.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        let cursor_pos = dialog.cursor_position;
        let Some(input) = dialog.current_input_mut() else {
            return;
        };
        if cursor_pos <= input.len() {
            input.insert(cursor_pos, c);
            dialog.cursor_position = cursor_pos + c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        let cursor_pos = dialog.cursor_position;
        if cursor_pos == 0 {
            return;
        }
        let Some(input) = dialog.current_input_mut() else {
            return;
        };
        let prev_pos = input[..cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        input.remove(prev_pos);
        dialog.cursor_position = prev_pos;
    }

    // ========================
    // Headers
    // ========================

    fn headers_dialog(&mut self) -> Option<&mut TestDialog> {
        self.dialog
            .as_mut()
            .filter(|d| d.active_tab == DialogTab::Headers)
    }

    pub fn toggle_header(&mut self) {
        if let Some(dialog) = self.headers_dialog() {
            if let Some(header) = dialog.draft.headers.get_mut(dialog.selected) {
                header.enabled = !header.enabled;
            }
        }
    }

    pub fn add_header(&mut self) {
        if let Some(dialog) = self.headers_dialog() {
            dialog.draft.headers.push(Header::new("X-Custom", "value"));
            dialog.selected = dialog.draft.headers.len() - 1;
        }
    }

    pub fn delete_header(&mut self) {
        if let Some(dialog) = self.headers_dialog() {
            if dialog.selected < dialog.draft.headers.len() {
                dialog.draft.headers.remove(dialog.selected);
                if dialog.selected > 0 {
                    dialog.selected -= 1;
                }
            }
        }
    }

    // ========================
    // Request execution
    // ========================

    /// Snapshot the draft into a request; ignored while one is in flight
    pub fn prepare_request(&mut self) -> Option<NetworkCommand> {
        if self.dialog.as_ref()?.is_loading {
            return None;
        }
        let id = self.next_id();
        let dialog = self.dialog.as_mut()?;
        dialog.input_mode = InputMode::Normal;
        dialog.editing_key = false;

        let request = compose::prepare_request(
            dialog.endpoint.method,
            &dialog.base_url,
            &dialog.endpoint.path,
            &dialog.draft,
        );
        dialog.is_loading = true;
        dialog.pending_request_id = Some(id);
        dialog.outcome = None;
        dialog.response_scroll = 0;
        let session = dialog.session;

        Some(NetworkCommand::ExecuteRequest { id, session, request })
    }

    /// Show a completed request if its dialog is still the open one
    pub fn handle_response(&mut self, response: NetworkResponse) {
        let Some(dialog) = self.dialog.as_mut() else {
            tracing::warn!(id = response.id, session = response.session, "Dropping response for closed dialog");
            return;
        };
        if dialog.session != response.session || dialog.pending_request_id != Some(response.id) {
            tracing::warn!(id = response.id, session = response.session, "Dropping stale response");
            return;
        }
        dialog.outcome = Some(response.outcome);
        dialog.is_loading = false;
        dialog.pending_request_id = None;
        dialog.response_scroll = 0;
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}
