//! App actor - message loop processing UI events and network responses

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::config::AppSettings;
use crate::document::ApiDocument;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        document: Arc<ApiDocument>,
        settings: AppSettings,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(document, settings),
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Deep link from the command line, resolved once before the first frame
        if let Some(fragment) = self.state.settings.initial_fragment.clone() {
            let outcome = self.state.navigate_to(&fragment);
            tracing::info!(fragment = %fragment, ?outcome, "Initial navigation");
        }
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Browser panes
            UiEvent::FocusNext => self.state.focus_next(),
            UiEvent::SidebarUp => self.state.sidebar_up(),
            UiEvent::SidebarDown => self.state.sidebar_down(),
            UiEvent::SidebarActivate => self.state.sidebar_activate(),
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),
            UiEvent::NextResponseTab => self.state.next_response_tab(),
            UiEvent::PrevResponseTab => self.state.prev_response_tab(),
            UiEvent::CycleSnippetLanguage => self.state.cycle_snippet_language(),

            // Go-to prompt
            UiEvent::OpenGoto => self.state.open_goto(),
            UiEvent::GotoChar(c) => self.state.goto_char(c),
            UiEvent::GotoBackspace => self.state.goto_backspace(),
            UiEvent::GotoSubmit => self.state.goto_submit(),
            UiEvent::GotoCancel => self.state.goto_cancel(),

            // Test dialog
            UiEvent::OpenTestDialog => self.state.open_test_dialog(),
            UiEvent::CloseTestDialog => self.state.close_test_dialog(),
            UiEvent::DialogNextTab => self.state.dialog_next_tab(),
            UiEvent::DialogPrevTab => self.state.dialog_prev_tab(),
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),
            UiEvent::ResponseScrollUp => self.state.response_scroll_up(),
            UiEvent::ResponseScrollDown => self.state.response_scroll_down(),
            UiEvent::SendRequest => {
                if let Some(cmd) = self.state.prepare_request() {
                    let _ = self.network_tx.send(cmd);
                }
            }

            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StartEditingKey => self.state.start_editing_key(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Newline => self.state.enter_char('\n'),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),

            // Headers
            UiEvent::ToggleHeader => self.state.toggle_header(),
            UiEvent::AddHeader => self.state.add_header(),
            UiEvent::DeleteHeader => self.state.delete_header(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{parse_document, DocumentFormat};

    const DOC: &str = r#"{
        "info": { "title": "Actor" },
        "paths": { "/users/{id}": { "get": { "responses": {} } } }
    }"#;

    #[tokio::test]
    async fn test_initial_fragment_and_quit() {
        let document = Arc::new(parse_document(DOC, DocumentFormat::Json).unwrap());
        let settings = AppSettings {
            configured_base_url: None,
            initial_fragment: Some("get-users-5".to_string()),
        };
        let (network_tx, mut network_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (_net_tx, net_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(AppActor::new(document, settings, network_tx, render_tx).run(ui_rx, net_rx));

        let first = render_rx.recv().await.unwrap();
        assert_eq!(first.fragment.as_deref(), Some("get-users-5"));
        assert_eq!(first.endpoint.unwrap().path, "/users/{id}");

        ui_tx.send(UiEvent::OpenTestDialog).unwrap();
        let opened = render_rx.recv().await.unwrap();
        assert!(opened.dialog.is_some());

        ui_tx.send(UiEvent::Quit).unwrap();
        handle.await.unwrap();
        assert!(matches!(network_rx.recv().await, Some(NetworkCommand::Shutdown)));
    }
}
