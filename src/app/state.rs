//! App state - pure data structure with no I/O logic

use std::sync::Arc;

use crate::compose;
use crate::config::AppSettings;
use crate::document::{ApiDocument, EndpointKey, SidebarSection};
use crate::messages::ui_events::{DialogTab, Focus, InputMode};
use crate::messages::render::{SidebarRowView, SidebarRowKind};
use crate::messages::RenderState;
use crate::models::{RequestDraft, RequestOutcome};
use crate::navigation::{NavigationController, ResolvedEndpoint};
use crate::presenter;
use crate::snippet::{self, SnippetLanguage, SnippetRequest};

/// One line of the flattened sidebar
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SidebarRow {
    Section(usize),
    Endpoint { section: usize, index: usize },
}

/// Collapsible sections plus the cursor over their flattened rows
#[derive(Clone, Debug, Default)]
pub struct SidebarState {
    pub sections: Vec<SidebarSection>,
    pub open: Vec<bool>,
    pub cursor: usize,
}

impl SidebarState {
    /// Every section starts expanded
    pub fn new(sections: Vec<SidebarSection>) -> Self {
        let open = vec![true; sections.len()];
        SidebarState {
            sections,
            open,
            cursor: 0,
        }
    }

    pub fn rows(&self) -> Vec<SidebarRow> {
        let mut rows = Vec::new();
        for (section, s) in self.sections.iter().enumerate() {
            rows.push(SidebarRow::Section(section));
            if self.open[section] {
                rows.extend((0..s.endpoints.len()).map(|index| SidebarRow::Endpoint { section, index }));
            }
        }
        rows
    }

    pub fn selected(&self) -> Option<SidebarRow> {
        self.rows().get(self.cursor).copied()
    }

    pub fn endpoint(&self, section: usize, index: usize) -> Option<&EndpointKey> {
        self.sections.get(section)?.endpoints.get(index)
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let len = self.rows().len();
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn toggle_section(&mut self, section: usize) {
        if let Some(open) = self.open.get_mut(section) {
            *open = !*open;
        }
        self.cursor = self
            .rows()
            .iter()
            .position(|r| *r == SidebarRow::Section(section))
            .unwrap_or(0);
    }

    /// Expand the first section listing `key` and move the cursor onto it
    pub fn reveal(&mut self, key: &EndpointKey) {
        let found = self.sections.iter().enumerate().find_map(|(section, s)| {
            s.endpoints
                .iter()
                .position(|k| k == key)
                .map(|index| (section, index))
        });
        let Some((section, index)) = found else {
            return;
        };
        self.open[section] = true;
        if let Some(pos) = self
            .rows()
            .iter()
            .position(|r| *r == SidebarRow::Endpoint { section, index })
        {
            self.cursor = pos;
        }
    }
}

/// The "try it" dialog. Owns its draft; closing drops everything.
#[derive(Clone, Debug)]
pub struct TestDialog {
    /// Distinguishes this dialog from earlier ones for late responses
    pub session: u64,
    pub endpoint: EndpointKey,
    pub base_url: String,
    pub draft: RequestDraft,
    pub active_tab: DialogTab,
    pub selected: usize,
    pub input_mode: InputMode,
    /// Editing a header name instead of its value
    pub editing_key: bool,
    pub cursor_position: usize,
    pub is_loading: bool,
    pub pending_request_id: Option<u64>,
    pub outcome: Option<RequestOutcome>,
    pub response_scroll: u16,
}

impl TestDialog {
    pub fn new(session: u64, endpoint: &ResolvedEndpoint<'_>, base_url: impl Into<String>) -> Self {
        TestDialog {
            session,
            endpoint: endpoint.key(),
            base_url: base_url.into(),
            draft: compose::seed_draft(endpoint),
            active_tab: DialogTab::Headers,
            selected: 0,
            input_mode: InputMode::Normal,
            editing_key: false,
            cursor_position: 0,
            is_loading: false,
            pending_request_id: None,
            outcome: None,
            response_scroll: 0,
        }
    }

    pub fn tabs(&self) -> &'static [DialogTab] {
        DialogTab::available(self.endpoint.method.sends_body())
    }

    /// Number of selectable rows on the active tab
    pub fn field_count(&self) -> usize {
        match self.active_tab {
            DialogTab::Headers => self.draft.headers.len(),
            DialogTab::Parameters => self.draft.path_params.len(),
            DialogTab::Query => self.draft.query_params.len(),
            DialogTab::Body => 1,
        }
    }

    /// Get the current input field content
    pub fn current_input(&self) -> Option<&str> {
        match self.active_tab {
            DialogTab::Headers => self.draft.headers.get(self.selected).map(|h| {
                if self.editing_key {
                    h.key.as_str()
                } else {
                    h.value.as_str()
                }
            }),
            DialogTab::Parameters => self.draft.path_params.get(self.selected).map(|p| p.value.as_str()),
            DialogTab::Query => self.draft.query_params.get(self.selected).map(|p| p.value.as_str()),
            DialogTab::Body => Some(self.draft.body.as_str()),
        }
    }

    /// Get mutable reference to current input field
    pub fn current_input_mut(&mut self) -> Option<&mut String> {
        match self.active_tab {
            DialogTab::Headers => {
                let editing_key = self.editing_key;
                self.draft.headers.get_mut(self.selected).map(|h| {
                    if editing_key {
                        &mut h.key
                    } else {
                        &mut h.value
                    }
                })
            }
            DialogTab::Parameters => self.draft.path_params.get_mut(self.selected).map(|p| &mut p.value),
            DialogTab::Query => self.draft.query_params.get_mut(self.selected).map(|p| &mut p.value),
            DialogTab::Body => Some(&mut self.draft.body),
        }
    }

    /// URL the next send would hit
    pub fn url_preview(&self) -> String {
        compose::request_url(&self.base_url, &self.endpoint.path, &self.draft)
    }
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub document: Arc<ApiDocument>,
    pub settings: AppSettings,
    pub nav: NavigationController,

    // Browser panes
    pub sidebar: SidebarState,
    pub focus: Focus,
    pub detail_scroll: u16,
    pub snippet_language: SnippetLanguage,

    // Test dialog
    pub dialog: Option<TestDialog>,
    pub next_session_id: u64,
    pub next_request_id: u64,

    // Popups
    pub goto_input: Option<String>,
    pub show_help: bool,
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(document: Arc<ApiDocument>, settings: AppSettings) -> Self {
        let sidebar = SidebarState::new(document.sidebar_sections());
        AppState {
            document,
            settings,
            nav: NavigationController::new(),
            sidebar,
            focus: Focus::Sidebar,
            detail_scroll: 0,
            snippet_language: SnippetLanguage::default(),
            dialog: None,
            next_session_id: 1,
            next_request_id: 1,
            goto_input: None,
            show_help: false,
            status_message: None,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn base_url(&self) -> &str {
        compose::resolve_base_url(&self.document, self.settings.configured_base_url.as_deref())
    }

    fn sidebar_rows(&self) -> Vec<SidebarRowView> {
        let current = self.nav.current();
        self.sidebar
            .rows()
            .into_iter()
            .filter_map(|row| match row {
                SidebarRow::Section(section) => Some(SidebarRowView {
                    kind: SidebarRowKind::Section {
                        open: self.sidebar.open[section],
                    },
                    label: self.sidebar.sections[section].name.clone(),
                    active: false,
                }),
                SidebarRow::Endpoint { section, index } => {
                    let key = self.sidebar.endpoint(section, index)?;
                    Some(SidebarRowView {
                        kind: SidebarRowKind::Endpoint { method: key.method },
                        label: key.path.clone(),
                        active: current == Some(key),
                    })
                }
            })
            .collect()
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let resolved = self.nav.resolved(&self.document);
        let base_url = self.base_url().to_string();

        let snippet = resolved.as_ref().map(|r| {
            // An open dialog contributes its filled-in path and query values
            let url = match &self.dialog {
                Some(dialog) if dialog.endpoint == r.key() => dialog.url_preview(),
                _ => format!("{}{}", base_url.trim_end_matches('/'), r.path),
            };
            snippet::render(
                self.snippet_language,
                &SnippetRequest {
                    method: r.method,
                    url: &url,
                    body: r.operation.request_properties(),
                },
            )
        });

        RenderState {
            title: self.document.title().to_string(),
            version: self.document.version.clone(),
            base_url,
            sidebar_rows: self.sidebar_rows(),
            sidebar_cursor: self.sidebar.cursor,
            focus: self.focus,
            fragment: self.nav.fragment().map(String::from),
            endpoint: resolved.as_ref().map(presenter::present),
            active_response_tab: self.nav.active_response_tab().map(String::from),
            detail_scroll: self.detail_scroll,
            snippet_language: self.snippet_language,
            snippet,
            dialog: self.dialog.clone(),
            goto_input: self.goto_input.clone(),
            show_help: self.show_help,
            status_message: self.status_message.clone(),
        }
    }
}
