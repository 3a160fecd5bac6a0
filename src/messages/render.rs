//! Render state - data structure sent from App layer to UI for rendering

use crate::app::state::TestDialog;
use crate::messages::ui_events::{Focus, InputMode, KeyContext};
use crate::models::HttpMethod;
use crate::presenter::EndpointView;
use crate::snippet::SnippetLanguage;

#[derive(Debug, Clone, PartialEq)]
pub enum SidebarRowKind {
    Section { open: bool },
    Endpoint { method: HttpMethod },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarRowView {
    pub kind: SidebarRowKind,
    pub label: String,
    /// The endpoint currently shown in the detail pane
    pub active: bool,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Document
    pub title: String,
    pub version: Option<String>,
    pub base_url: String,

    // Sidebar
    pub sidebar_rows: Vec<SidebarRowView>,
    pub sidebar_cursor: usize,
    pub focus: Focus,

    // Detail pane
    pub fragment: Option<String>,
    pub endpoint: Option<EndpointView>,
    pub active_response_tab: Option<String>,
    pub detail_scroll: u16,
    pub snippet_language: SnippetLanguage,
    pub snippet: Option<String>,

    // Test dialog
    pub dialog: Option<TestDialog>,

    // Popups
    pub goto_input: Option<String>,
    pub show_help: bool,
    pub status_message: Option<String>,
}

impl RenderState {
    pub fn key_context(&self) -> KeyContext {
        KeyContext {
            focus: self.focus,
            dialog_tab: self.dialog.as_ref().map(|d| d.active_tab),
            input_mode: self
                .dialog
                .as_ref()
                .map(|d| d.input_mode)
                .unwrap_or(InputMode::Normal),
            show_help: self.show_help,
            goto_open: self.goto_input.is_some(),
        }
    }
}
